use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::app::{MatchdayError, Result};
use crate::domain::{MatchDetail, MatchStub};
use crate::heuristics::{extract_match_info, extract_staff, CrestConfig, CrestResolver};
use crate::scraper::config::DetailConfig;
use crate::scraper::{dom, LoadedPage, PageLoader};

/// Extracts a [`MatchDetail`] from a loaded detail page.
pub struct DetailParser {
    blocks: Vec<Selector>,
    crests: Vec<Selector>,
    resolver: CrestResolver,
}

impl DetailParser {
    pub fn new(config: &DetailConfig, crest: &CrestConfig, identity_token: &str) -> Result<Self> {
        Ok(Self {
            blocks: dom::compile_selectors(&config.block_selectors)?,
            crests: dom::compile_selectors(&config.crest_selectors)?,
            resolver: CrestResolver::new(crest.clone(), identity_token),
        })
    }

    pub fn parse(&self, stub: &MatchStub, page: &LoadedPage) -> Result<MatchDetail> {
        let base = Url::parse(&page.final_url).or_else(|_| Url::parse(&page.requested_url))?;
        let doc = Html::parse_document(&page.html);
        let root = doc.root_element();

        let block_el = dom::select_first(root, &self.blocks).ok_or_else(|| {
            MatchdayError::DetailBlockMissing {
                url: page.final_url.clone(),
            }
        })?;
        let block = dom::detail_block(block_el, &base);

        // The detail page's own crests beat whatever the listing showed.
        let images = dom::crest_images(root, &self.crests, &base);
        let crests = self.resolver.resolve(
            &stub.local_team,
            &stub.away_team,
            stub.is_home(),
            &images,
        );

        let info = extract_match_info(&block);
        let staff = extract_staff(&info.raw_text);
        if info.stadium.is_empty() {
            debug!(id = %stub.id, "no stadium line found");
        }

        let mut detail = MatchDetail::from_stub(stub.clone());
        detail.apply_crests(&crests.local, &crests.away);
        detail.details = Some(info);
        detail.staff = staff;
        detail.final_url = Some(page.final_url.clone());
        Ok(detail)
    }
}

/// Scrapes one match's detail page. Never fails: problems end up in
/// [`MatchDetail::error`].
#[derive(Clone)]
pub struct DetailScraper {
    loader: Arc<dyn PageLoader>,
    parser: Arc<DetailParser>,
    ready_selectors: Arc<Vec<String>>,
}

impl DetailScraper {
    pub fn new(loader: Arc<dyn PageLoader>, parser: DetailParser, ready_selectors: Vec<String>) -> Self {
        Self {
            loader,
            parser: Arc::new(parser),
            ready_selectors: Arc::new(ready_selectors),
        }
    }

    pub async fn scrape(&self, stub: MatchStub) -> MatchDetail {
        let outcome = match self.loader.load(&stub.detail_url, &self.ready_selectors).await {
            Ok(page) => self.parser.parse(&stub, &page),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(detail) => detail,
            Err(e) => {
                warn!(id = %stub.id, url = %stub.detail_url, "Detail scrape failed: {}", e);
                MatchDetail::failed(stub, e.to_string())
            }
        }
    }
}
