//! Browser-driven discovery and detail scraping of club fixtures.
//!
//! # Architecture
//!
//! ```text
//! Listing page → ListingScraper → stubs → Orchestrator
//!     → DetailScraper × N (heuristics) → MatchDetail
//! ```
//!
//! Pages are fetched through a [`PageLoader`], which hands back a static
//! HTML snapshot. Everything after that is plain parsing, so the listing
//! and detail parsers can be exercised with literal HTML.
//!
//! # Usage
//!
//! ```rust,ignore
//! use matchday::scraper::{ChromeLoader, ScraperConfig};
//!
//! let loader = ChromeLoader::launch(ScraperConfig::default()).await?;
//! let page = loader.load("https://club.example/calendrier", &[]).await?;
//! ```

mod chrome;
mod config;
pub mod detail;
pub mod dom;
pub mod listing;
pub mod orchestrator;

pub use chrome::ChromeLoader;
pub use config::{DetailConfig, ListingConfig, ScraperConfig};
pub use detail::{DetailParser, DetailScraper};
pub use listing::ListingScraper;
pub use orchestrator::{Orchestrator, Progress, RunObserver, RunPhase, DEFAULT_CONCURRENCY};

use async_trait::async_trait;

use crate::app::Result;

/// A page as it stood once its content was ready.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub requested_url: String,
    /// Where navigation ended up after redirects
    pub final_url: String,
    pub html: String,
}

/// Loads pages for scraping.
///
/// Each call gets its own isolated browsing context, which is torn down
/// before the call returns whatever the outcome.
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Navigate to `url` and snapshot it once any of `ready_selectors`
    /// shows up, or after the loader's fallback delay.
    async fn load(&self, url: &str, ready_selectors: &[String]) -> Result<LoadedPage>;
}
