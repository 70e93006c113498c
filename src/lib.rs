//! # Matchday
//!
//! Discovers a club's upcoming fixtures on its listing page, scrapes every
//! match detail page with a headless browser and hands back one result
//! grouped by match date.
//!
//! ## Architecture
//!
//! ```text
//! Listing → stubs → Orchestrator (chunks of W) → Detail scrape × N → Aggregator
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape using ~/.config/matchday/config.toml
//! matchday scrape --out run.json
//!
//! # Override the club on the command line
//! matchday scrape --url https://club.example/calendrier --token "AFP 18"
//!
//! # Debug the extractors on a saved page
//! matchday inspect saved.html --local "Afp 18 U13" --away "Adversaire FC" --home
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct holds the loaded configuration
/// and builds the browser and the pipeline from it.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/matchday/config.toml`, supporting:
/// - Club identity and listing URL
/// - Browser timeouts and chunk width
/// - Selector lists for listing and detail pages
pub mod config;

/// Command-line interface using clap.
///
/// - `scrape` - Run a full scrape
/// - `config` - Show the effective configuration
/// - `inspect <file>` - Run the extractors on a saved detail page
pub mod cli;

/// Core domain models.
///
/// - [`MatchStub`](domain::MatchStub): a fixture found on the listing
/// - [`MatchDetail`](domain::MatchDetail): a stub plus its detail page data
/// - [`ScrapeRun`](domain::ScrapeRun): the grouped result of one run
pub mod domain;

/// Text, staff and crest heuristics over read-only page views.
pub mod heuristics;

/// Groups match details by date into a [`ScrapeRun`](domain::ScrapeRun).
pub mod output;

/// The full scrape: listing, detail pages, aggregation.
pub mod pipeline;

/// Browser-driven page loading and the listing and detail scrapers.
///
/// - [`PageLoader`](scraper::PageLoader): Async trait for page loading
/// - [`ChromeLoader`](scraper::ChromeLoader): headless Chrome implementation
/// - [`Orchestrator`](scraper::Orchestrator): chunked concurrent detail scraping
pub mod scraper;
