//! The single "run a full scrape" operation.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::app::Result;
use crate::config::{ClubConfig, Config};
use crate::domain::ScrapeRun;
use crate::output::aggregate;
use crate::scraper::{
    DetailParser, DetailScraper, ListingScraper, Orchestrator, PageLoader, RunObserver, RunPhase,
};

/// Listing → detail scrapes → aggregation, over one [`PageLoader`].
pub struct ScrapePipeline {
    club: ClubConfig,
    loader: Arc<dyn PageLoader>,
    listing: ListingScraper,
    listing_ready: Vec<String>,
    orchestrator: Orchestrator,
    observer: Option<Arc<dyn RunObserver>>,
}

impl ScrapePipeline {
    /// Build every stage from `config`. Fails on missing club settings or
    /// invalid selectors and patterns.
    pub fn new(config: &Config, loader: Arc<dyn PageLoader>) -> Result<Self> {
        config.validate()?;
        let token = &config.club.identity_token;

        let listing = ListingScraper::new(&config.listing, &config.crest, token)?;
        let parser = DetailParser::new(&config.detail, &config.crest, token)?;
        let scraper = DetailScraper::new(loader.clone(), parser, config.detail.ready_selectors.clone());

        Ok(Self {
            club: config.club.clone(),
            loader,
            listing,
            listing_ready: config.listing.ready_selectors.clone(),
            orchestrator: Orchestrator::new(scraper, config.scraper.concurrency),
            observer: None,
        })
    }

    /// Attach an observer; it starts out seeing [`RunPhase::Idle`].
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        observer.phase(RunPhase::Idle);
        self.orchestrator = self.orchestrator.with_observer(observer.clone());
        self.observer = Some(observer);
        self
    }

    fn phase(&self, phase: RunPhase) {
        info!(?phase, "Run phase");
        if let Some(observer) = &self.observer {
            observer.phase(phase);
        }
    }

    /// Run a full scrape.
    ///
    /// Only the listing stage can fail the run; every discovered match
    /// comes back in the result, failed detail scrapes included.
    pub async fn run(&self) -> Result<ScrapeRun> {
        let scraped_at = Utc::now();
        let url = self.club.listing_url.as_str();

        self.phase(RunPhase::Listing);
        let page = self.loader.load(url, &self.listing_ready).await?;
        if page.final_url != page.requested_url {
            info!(from = %page.requested_url, to = %page.final_url, "Listing redirected");
        }
        let stubs = self.listing.parse(&page.final_url, &page.html)?;
        info!(count = stubs.len(), url = %page.final_url, "Listing parsed");

        self.phase(RunPhase::Chunking);
        info!(
            matches = stubs.len(),
            width = self.orchestrator.width(),
            "Scraping detail pages"
        );
        let details = self.orchestrator.run(stubs).await;

        self.phase(RunPhase::Aggregating);
        let run = aggregate(details, self.club.display_name(), url, scraped_at);

        self.phase(RunPhase::Done);
        info!(
            matches = run.match_count(),
            failed = run.failed_count(),
            dates = run.matches.len(),
            "Scrape complete"
        );
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::MatchdayError;
    use crate::scraper::LoadedPage;

    const LISTING_URL: &str = "https://club.example/calendrier";

    const LISTING_HTML: &str = r#"<html><body><div id="calendrier">
  <h3>Samedi 12/06/2025</h3>
  <ul>
    <li class="match-card"><a href="/match/101/">Afp 18 U13 15:00 Adversaire FC</a></li>
    <li class="match-card"><a href="/match/102/">Rival 17h00 Afp 18 U15</a></li>
  </ul>
  <h3>Dimanche 13/06/2025</h3>
  <ul>
    <li class="match-card"><a href="/match/103/">Afp 18 Seniors 10:00 Paris FC</a></li>
  </ul>
</div></body></html>"#;

    const DETAIL_HTML: &str = r#"<html><body><section class="match-detail">
  <p>12/06/2025 - 15:00</p>
  <p>STADE DES FILLETTES</p>
  <p>Arbitre Centre : MARTIN P.</p>
</section></body></html>"#;

    /// Serves fixed pages by URL; unknown URLs fail like a dead link.
    struct FakeSite {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new(pages: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageLoader for FakeSite {
        async fn load(&self, url: &str, _ready: &[String]) -> Result<LoadedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            let html = self
                .pages
                .get(url)
                .ok_or_else(|| MatchdayError::Browser(format!("net::ERR_NAME_NOT_RESOLVED {}", url)))?;
            Ok(LoadedPage {
                requested_url: url.to_string(),
                final_url: url.to_string(),
                html: html.clone(),
            })
        }
    }

    #[derive(Default)]
    struct Phases(Mutex<Vec<RunPhase>>);

    impl RunObserver for Phases {
        fn phase(&self, phase: RunPhase) {
            self.0.lock().unwrap().push(phase);
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.club.name = "AFP 18".into();
        config.club.identity_token = "AFP 18".into();
        config.club.listing_url = LISTING_URL.into();
        config.scraper.concurrency = 2;
        config
    }

    #[tokio::test]
    async fn test_full_run() {
        let site = FakeSite::new(&[
            (LISTING_URL, LISTING_HTML),
            ("https://club.example/match/101/", DETAIL_HTML),
            ("https://club.example/match/103/", DETAIL_HTML),
        ]);
        let phases = Arc::new(Phases::default());
        let pipeline = ScrapePipeline::new(&config(), site.clone())
            .unwrap()
            .with_observer(phases.clone());

        let run = pipeline.run().await.unwrap();

        assert_eq!(run.club, "AFP 18");
        assert_eq!(run.url, LISTING_URL);
        assert_eq!(run.match_count(), 3);
        assert_eq!(run.failed_count(), 1);
        assert_eq!(run.matches["12/06/2025"].len(), 2);
        assert_eq!(run.matches["13/06/2025"].len(), 1);

        let failed = run
            .matches
            .values()
            .flatten()
            .find(|m| m.is_failed())
            .unwrap();
        assert_eq!(failed.stub.id, "102");
        assert_eq!(failed.stub.time, "17:00");
        assert!(failed.details.is_none());

        let ok = run.matches["13/06/2025"].first().unwrap();
        assert_eq!(ok.staff.as_ref().unwrap().referee, "MARTIN P.");

        assert_eq!(site.requested.lock().unwrap().len(), 4);
        assert_eq!(
            *phases.0.lock().unwrap(),
            vec![
                RunPhase::Idle,
                RunPhase::Listing,
                RunPhase::Chunking,
                RunPhase::ChunkInFlight(0),
                RunPhase::ChunkInFlight(1),
                RunPhase::Aggregating,
                RunPhase::Done,
            ]
        );
    }

    #[test]
    fn test_observer_starts_idle() {
        let phases = Arc::new(Phases::default());
        let _pipeline = ScrapePipeline::new(&config(), FakeSite::new(&[]))
            .unwrap()
            .with_observer(phases.clone());
        assert_eq!(*phases.0.lock().unwrap(), vec![RunPhase::Idle]);
    }

    #[tokio::test]
    async fn test_listing_failure_fails_the_run() {
        let site = FakeSite::new(&[]);
        let pipeline = ScrapePipeline::new(&config(), site.clone()).unwrap();
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, MatchdayError::Browser(_)));
        assert_eq!(site.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_without_matches_fails_the_run() {
        let site = FakeSite::new(&[(
            LISTING_URL,
            "<html><body><div id=\"calendrier\"><p>Aucun match</p></div></body></html>",
        )]);
        let pipeline = ScrapePipeline::new(&config(), site).unwrap();
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, MatchdayError::NoMatches { .. }));
    }

    #[test]
    fn test_missing_listing_url_rejected() {
        let mut config = config();
        config.club.listing_url.clear();
        let site = FakeSite::new(&[]);
        assert!(matches!(
            ScrapePipeline::new(&config, site),
            Err(MatchdayError::Config(_))
        ));
    }
}
