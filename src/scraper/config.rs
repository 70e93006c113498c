use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::DEFAULT_CONCURRENCY;

/// Browser and run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Hard navigation timeout per page in seconds (default: 30)
    pub timeout_secs: u64,

    /// How long to wait for a ready selector before reading the page
    /// anyway, in milliseconds (default: 3000)
    pub ready_fallback_ms: u64,

    /// Detail pages scraped in parallel per chunk (default: 15)
    pub concurrency: usize,

    /// Abort image, font and media requests (default: true)
    pub block_resources: bool,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            ready_fallback_ms: 3000,
            concurrency: DEFAULT_CONCURRENCY,
            block_resources: true,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    /// Get the navigation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the ready-selector fallback delay as a Duration
    pub fn ready_fallback(&self) -> Duration {
        Duration::from_millis(self.ready_fallback_ms)
    }
}

/// Where to find things on the fixture listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Selectors that signal the listing has rendered
    pub ready_selectors: Vec<String>,

    /// Fixture list container, in priority order
    pub container_selectors: Vec<String>,

    /// Per-match wrapper around a match link, in priority order
    pub match_container_selectors: Vec<String>,

    /// Competition label inside a match wrapper, in priority order
    pub competition_selectors: Vec<String>,

    /// Crest images inside a match wrapper, in priority order
    pub crest_selectors: Vec<String>,

    /// Regex a link's href must match to count as a match detail link
    pub detail_url_pattern: String,

    /// Minutes between meeting time and kickoff (default: 90)
    pub meeting_offset_minutes: i64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            ready_selectors: vec![
                "a[href*=\"/match\"]".to_string(),
                "a[href*=\"/rencontre\"]".to_string(),
            ],
            container_selectors: vec![
                "#calendrier".to_string(),
                "[class*=\"calendrier\"]".to_string(),
                "[class*=\"calendar\"]".to_string(),
                "[id*=\"match\"]".to_string(),
                "main".to_string(),
            ],
            match_container_selectors: vec![
                "[class*=\"match-card\"]".to_string(),
                "li".to_string(),
                "article".to_string(),
                "[class*=\"match\"]".to_string(),
            ],
            competition_selectors: vec![
                "[class*=\"competition\"]".to_string(),
                "[class*=\"championnat\"]".to_string(),
                "[data-competition]".to_string(),
            ],
            crest_selectors: vec![
                "img[src*=\"logo\"]".to_string(),
                "img[alt]".to_string(),
                "img".to_string(),
            ],
            detail_url_pattern: r"/(match|matchs|rencontre|rencontres)/".to_string(),
            meeting_offset_minutes: 90,
        }
    }
}

/// Where to find things on a match detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// Selectors that signal the detail content has rendered
    pub ready_selectors: Vec<String>,

    /// Detail block: full-page content container, then the legacy
    /// bordered panel, then a generic attribute match
    pub block_selectors: Vec<String>,

    /// Team crest images on the detail page, in priority order
    pub crest_selectors: Vec<String>,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            ready_selectors: vec![
                "[class*=\"match-detail\"]".to_string(),
                "div.border.rounded".to_string(),
            ],
            block_selectors: vec![
                "[class*=\"match-detail\"]".to_string(),
                "div.border.rounded".to_string(),
                "[class*=\"detail\"]".to_string(),
            ],
            crest_selectors: vec![
                "[class*=\"team\"] img".to_string(),
                "[class*=\"equipe\"] img".to_string(),
                "img[src*=\"logo\"]".to_string(),
            ],
        }
    }
}
