//! Read-only views of a scraped page.
//!
//! These are plain values built from an HTML snapshot, so the heuristics
//! never touch a live document.

/// Whether an element sits inside a forward or reversed flex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutOrientation {
    Forward,
    Reversed,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    /// Visible text of the anchor's parent element.
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrestImage {
    pub src: String,
    pub alt: String,
    pub orientation: LayoutOrientation,
}

impl CrestImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            orientation: LayoutOrientation::Unknown,
        }
    }

    pub fn with_orientation(mut self, orientation: LayoutOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// The detail block of a match page: its text lines in document order,
/// plus the anchors found inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailBlock {
    pub lines: Vec<String>,
    pub anchors: Vec<Anchor>,
}

impl DetailBlock {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            anchors: Vec::new(),
        }
    }

    pub fn raw_text(&self) -> String {
        self.lines.join("\n")
    }
}
