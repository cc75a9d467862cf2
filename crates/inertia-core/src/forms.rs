//! Admissions inquiries
//!
//! Inquiries that pass the rate limiter are appended to a local JSON-lines
//! outbox. Delivering them to the hosted backend is someone else's job.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{Error, Result};

/// Longest contact string accepted from the popup
pub const MAX_CONTACT_LEN: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    /// Email address or phone number
    pub contact: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn new(contact: &str, message: &str) -> Result<Self> {
        let contact = contact.trim();
        if contact.is_empty() {
            return Err(Error::Validation("contact is required".to_string()));
        }
        if contact.chars().count() > MAX_CONTACT_LEN {
            return Err(Error::Validation(format!(
                "contact is longer than {} characters",
                MAX_CONTACT_LEN
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            contact: contact.to_string(),
            message: message.trim().to_string(),
            submitted_at: Utc::now(),
        })
    }
}

/// Append-only JSON-lines store
#[derive(Debug, Clone)]
pub struct InquiryOutbox {
    path: PathBuf,
}

impl InquiryOutbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, inquiry: &Inquiry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(inquiry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(id = %inquiry.id, path = %self.path.display(), "inquiry queued");
        Ok(())
    }

    /// Read back every stored inquiry; a missing outbox is empty.
    /// Unreadable lines (a torn write, a hand edit) are skipped with a warning.
    pub async fn load_all(&self) -> Result<Vec<Inquiry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let inquiries: Vec<Inquiry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(inquiry) => Some(inquiry),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "skipping unreadable inquiry"
                    );
                    None
                }
            })
            .collect();
        Ok(inquiries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_outbox() -> (tempfile::TempDir, InquiryOutbox) {
        let dir = tempfile::tempdir().unwrap();
        let outbox = InquiryOutbox::new(dir.path().join("outbox").join("inquiries.jsonl"));
        (dir, outbox)
    }

    #[test]
    fn test_inquiry_requires_contact() {
        assert!(matches!(Inquiry::new("   ", "hi"), Err(Error::Validation(_))));
        let long = "x".repeat(MAX_CONTACT_LEN + 1);
        assert!(matches!(Inquiry::new(&long, ""), Err(Error::Validation(_))));

        let inquiry = Inquiry::new("  parent@example.com ", " Grade 4 seats? ").unwrap();
        assert_eq!(inquiry.contact, "parent@example.com");
        assert_eq!(inquiry.message, "Grade 4 seats?");
    }

    #[tokio::test]
    async fn test_missing_outbox_is_empty() {
        let (_dir, outbox) = temp_outbox();
        assert!(outbox.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load() {
        let (_dir, outbox) = temp_outbox();
        let first = Inquiry::new("parent@example.com", "Open day dates").unwrap();
        let second = Inquiry::new("+20 100 000 0000", "").unwrap();

        outbox.append(&first).await.unwrap();
        outbox.append(&second).await.unwrap();

        let stored = outbox.load_all().await.unwrap();
        assert_eq!(stored, vec![first, second]);
    }

    #[tokio::test]
    async fn test_load_skips_corrupt_lines() {
        let (_dir, outbox) = temp_outbox();
        let first = Inquiry::new("parent@example.com", "Bus routes").unwrap();
        let second = Inquiry::new("guardian@example.com", "Uniform shop").unwrap();

        outbox.append(&first).await.unwrap();
        // A write cut off mid-line
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(outbox.path())
            .await
            .unwrap();
        file.write_all(b"{\"id\":\"0000\",\"contact\":\"par\n").await.unwrap();
        file.flush().await.unwrap();
        drop(file);
        outbox.append(&second).await.unwrap();

        let stored = outbox.load_all().await.unwrap();
        assert_eq!(stored, vec![first, second]);
    }
}
