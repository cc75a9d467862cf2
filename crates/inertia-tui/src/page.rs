//! The school landing page shown in the viewer
//!
//! A page is a list of sections laid out top to bottom. Most sections are
//! prose; the gallery is a horizontal strip of cards that carries the
//! scroll-container marker, so wheel input over it scrolls the strip instead
//! of the page.

use std::collections::{HashMap, HashSet};

use inertia_core::scroll::{ElementTree, NodeId};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ROOT: NodeId = NodeId(0);
const STRIP_BASE: u32 = 1_000;
const CARD_BASE: u32 = 10_000;
const CARDS_PER_STRIP: u32 = 100;

/// Rows taken by a gallery strip
pub const GALLERY_ROWS: usize = 5;
/// Columns taken by one gallery card, including the gap
pub const CARD_WIDTH: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Prose(Vec<String>),
    Gallery(Vec<GalleryCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub title: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub kind: SectionKind,
}

impl Section {
    pub fn prose(title: &str, paragraphs: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            kind: SectionKind::Prose(paragraphs.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn gallery(title: &str, cards: &[(&str, &str)]) -> Self {
        Self {
            title: title.to_string(),
            kind: SectionKind::Gallery(
                cards
                    .iter()
                    .map(|(title, caption)| GalleryCard {
                        title: title.to_string(),
                        caption: caption.to_string(),
                    })
                    .collect(),
            ),
        }
    }
}

/// One section's placement, in document rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    pub top: usize,
    pub height: usize,
    /// Wrapped body lines for prose sections
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    pub sections: Vec<SectionLayout>,
    pub total_rows: usize,
}

/// Page content plus its static element hierarchy
#[derive(Debug, Clone)]
pub struct Page {
    pub sections: Vec<Section>,
    parents: HashMap<NodeId, NodeId>,
    containers: HashSet<NodeId>,
}

impl Page {
    pub fn new(sections: Vec<Section>) -> Self {
        let mut parents = HashMap::new();
        let mut containers = HashSet::new();

        for (idx, section) in sections.iter().enumerate() {
            let section_node = Self::section_node(idx);
            parents.insert(section_node, ROOT);

            if let SectionKind::Gallery(cards) = &section.kind {
                let strip = Self::strip_node(idx);
                parents.insert(strip, section_node);
                containers.insert(strip);
                for card in 0..cards.len() {
                    parents.insert(Self::card_node(idx, card), strip);
                }
            }
        }

        Self {
            sections,
            parents,
            containers,
        }
    }

    pub fn section_node(idx: usize) -> NodeId {
        NodeId(1 + idx as u32)
    }

    pub fn strip_node(idx: usize) -> NodeId {
        NodeId(STRIP_BASE + idx as u32)
    }

    pub fn card_node(section: usize, card: usize) -> NodeId {
        NodeId(CARD_BASE + section as u32 * CARDS_PER_STRIP + card as u32)
    }

    /// Section index owning a node, if any
    pub fn section_of(&self, node: NodeId) -> Option<usize> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.parents.get(&current) == Some(&ROOT) {
                return Some(current.0 as usize - 1);
            }
            cursor = self.parents.get(&current).copied();
        }
        None
    }

    /// Lay the page out for a content width
    pub fn layout(&self, width: usize) -> PageLayout {
        let mut sections = Vec::with_capacity(self.sections.len());
        let mut top = 0;

        for section in &self.sections {
            let (lines, body_rows) = match &section.kind {
                SectionKind::Prose(paragraphs) => {
                    let mut lines = Vec::new();
                    for (i, paragraph) in paragraphs.iter().enumerate() {
                        if i > 0 {
                            lines.push(String::new());
                        }
                        lines.extend(wrap_text(paragraph, width));
                    }
                    let rows = lines.len();
                    (lines, rows)
                }
                SectionKind::Gallery(_) => (Vec::new(), GALLERY_ROWS),
            };

            // title + blank + body + trailing blank
            let height = 2 + body_rows + 1;
            sections.push(SectionLayout { top, height, lines });
            top += height;
        }

        PageLayout {
            width,
            sections,
            total_rows: top,
        }
    }

    /// Deepest node under a document position
    ///
    /// `gallery_offset` is the horizontal scroll of the strip in that section.
    pub fn node_at(
        &self,
        layout: &PageLayout,
        row: usize,
        column: usize,
        gallery_offset: impl Fn(usize) -> usize,
    ) -> NodeId {
        let Some(idx) = layout
            .sections
            .iter()
            .position(|s| row >= s.top && row < s.top + s.height)
        else {
            return ROOT;
        };

        let section = &layout.sections[idx];
        if let SectionKind::Gallery(cards) = &self.sections[idx].kind {
            let strip_top = section.top + 2;
            if row >= strip_top && row < strip_top + GALLERY_ROWS {
                let card = (column + gallery_offset(idx)) / CARD_WIDTH;
                if card < cards.len() {
                    return Self::card_node(idx, card);
                }
                return Self::strip_node(idx);
            }
        }

        Self::section_node(idx)
    }

    /// Built-in landing page
    pub fn sample() -> Self {
        Self::new(vec![
            Section::prose(
                "Riverside Schools Group",
                &[
                    "Four campuses, one community. From kindergarten to graduation we teach \
                        children to think clearly, speak two languages with confidence and \
                        care for the people around them.",
                    "Scroll with the mouse wheel to glide through the page, or press ? for keys.",
                ],
            ),
            Section::prose(
                "About us",
                &[
                    "Founded in 1998 with a single kindergarten, the group now serves more than \
                        3,000 students across four campuses.",
                    "Every campus follows the same charter: small classes, bilingual \
                        instruction from the first year and a dedicated counsellor for each \
                        grade.",
                    "Our teachers hold international certifications and spend two weeks a year \
                        in paid professional development.",
                ],
            ),
            Section::prose(
                "Academic programs",
                &[
                    "British system: IGCSE and A-Level tracks with Cambridge and Edexcel \
                        examinations held on campus.",
                    "American system: a standards-based diploma with AP courses, SAT \
                        preparation and college counselling from grade 9.",
                    "National system: the national curriculum taught in Arabic with enriched \
                        English, science and mathematics hours.",
                    "All programs share the same arts, sports and community service calendar.",
                ],
            ),
            Section::gallery(
                "Campus life",
                &[
                    ("Science fair", "Grade 8 robotics finals"),
                    ("Sports day", "Relay cup, north campus"),
                    ("Book week", "Authors visit the library"),
                    ("Model UN", "Delegates from 12 schools"),
                    ("Spring concert", "Choir and strings"),
                    ("Graduation", "Class of 2025"),
                    ("Eco club", "Rooftop garden harvest"),
                ],
            ),
            Section::prose(
                "News",
                &[
                    "Admissions for the new academic year are open. Assessment days run every \
                        Saturday in March and April.",
                    "Our under-16 football team won the regional league for the second year \
                        running.",
                    "The new science building on the east campus opens in September with six \
                        laboratories and a maker space.",
                    "Parents' evening for grades 1 to 6 moves to the main auditorium this term.",
                ],
            ),
            Section::prose(
                "Admissions",
                &[
                    "Applications are reviewed in the order they arrive. Siblings of current \
                        students receive priority placement.",
                    "Press i to leave your email or phone number and the admissions office will \
                        call you back within two working days.",
                    "To protect the office from spam, each visitor can send a limited number of \
                        inquiries in a short period.",
                ],
            ),
            Section::prose(
                "Contact",
                &[
                    "Main office: 14 Nile Corniche, open Sunday to Thursday, 8:00 to 15:00.",
                    "Press g to glide back to the top.",
                ],
            ),
        ])
    }
}

impl ElementTree for Page {
    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    fn is_scroll_container(&self, node: NodeId) -> bool {
        self.containers.contains(&node)
    }
}

/// Greedy word wrap by display width; words wider than the line are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let cw = c.width().unwrap_or(0);
                if line_width + cw > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += cw;
            }
            continue;
        }

        let needed = if line.is_empty() { word_width } else { line_width + 1 + word_width };
        if needed > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if !line.is_empty() {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
