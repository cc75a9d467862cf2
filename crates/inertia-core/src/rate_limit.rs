//! Sliding-window limiter for public form submissions
//!
//! Keeps the timestamps of recent accepted submissions and refuses new ones
//! once `max_attempts` fall inside the window. Purely local: it throttles a
//! single session, it is not a server-side guard.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::FormsConfig;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: VecDeque::new(),
        }
    }

    pub fn from_config(config: &FormsConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.window_secs))
    }

    /// Record an attempt at `now` if the window allows it
    pub fn can_submit_at(&mut self, now: Instant) -> bool {
        self.prune(now);

        if self.attempts.len() >= self.max_attempts {
            tracing::debug!(
                attempts = self.attempts.len(),
                max_attempts = self.max_attempts,
                "submission rate limited"
            );
            return false;
        }

        self.attempts.push_back(now);
        true
    }

    pub fn can_submit(&mut self) -> bool {
        self.can_submit_at(Instant::now())
    }

    /// Attempts still available at `now`, without recording anything
    pub fn remaining_attempts_at(&self, now: Instant) -> usize {
        let recent = self
            .attempts
            .iter()
            .filter(|t| now.saturating_duration_since(**t) < self.window)
            .count();
        self.max_attempts.saturating_sub(recent)
    }

    pub fn remaining_attempts(&self) -> usize {
        self.remaining_attempts_at(Instant::now())
    }

    /// How long until the oldest attempt leaves the window, if currently blocked
    pub fn retry_after_at(&self, now: Instant) -> Option<Duration> {
        if self.remaining_attempts_at(now) > 0 {
            return None;
        }
        self.attempts
            .iter()
            .find(|t| now.saturating_duration_since(**t) < self.window)
            .map(|oldest| self.window - now.saturating_duration_since(*oldest))
    }

    pub fn reset(&mut self) {
        self.attempts.clear();
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.attempts.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.attempts.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&FormsConfig::default())
    }
}
