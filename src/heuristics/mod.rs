//! Heuristic extractors over read-only page views.
//!
//! Nothing here touches the network or a live document, and nothing here
//! fails: a field that cannot be recovered comes back empty.

pub mod crest;
pub mod staff;
pub mod text;

pub use crest::{CrestAssignment, CrestConfig, CrestResolver};
pub use staff::extract_staff;
pub use text::extract_match_info;

/// Lowercase, turn punctuation into spaces and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `text` mentions `token` once both are normalized.
pub fn mentions(text: &str, token: &str) -> bool {
    let token = normalize_name(token);
    !token.is_empty() && normalize_name(text).contains(&token)
}
