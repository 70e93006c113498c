use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    EnableParams, EventRequestPaused, FailRequestParams, RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{MatchdayError, Result};
use crate::scraper::config::ScraperConfig;
use crate::scraper::{LoadedPage, PageLoader};

/// How often to look for a ready selector while racing the fallback delay.
const READY_POLL: Duration = Duration::from_millis(100);

/// Heavy resources that never matter for text extraction.
const BLOCKED_RESOURCES: [ResourceType; 3] =
    [ResourceType::Image, ResourceType::Font, ResourceType::Media];

/// Page loader backed by headless Chrome via chromiumoxide.
///
/// One browser is shared; every load runs in a fresh browser context.
pub struct ChromeLoader {
    browser: Arc<Browser>,
    config: ScraperConfig,
    handler: JoinHandle<()>,
}

impl ChromeLoader {
    /// Launch a browser with the given configuration
    pub async fn launch(config: ScraperConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| MatchdayError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            MatchdayError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the CDP connection
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            config,
            handler,
        })
    }

    /// Close the browser. Failures are logged, not returned.
    pub async fn close(self) {
        match Arc::try_unwrap(self.browser) {
            Ok(mut browser) => {
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    warn!("Failed to wait for browser exit: {}", e);
                }
            }
            Err(_) => warn!("Browser still in use; leaving it to exit on drop"),
        }
        self.handler.abort();
    }

    async fn create_context(&self) -> Result<BrowserContextId> {
        let response = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| MatchdayError::Browser(format!("Failed to create context: {}", e)))?;
        Ok(response.result.browser_context_id)
    }

    async fn dispose_context(&self, context_id: BrowserContextId) {
        if let Err(e) = self
            .browser
            .execute(DisposeBrowserContextParams::new(context_id))
            .await
        {
            warn!("Failed to dispose browser context: {}", e);
        }
    }

    async fn load_in_context(
        &self,
        context_id: &BrowserContextId,
        url: &str,
        ready_selectors: &[String],
    ) -> Result<LoadedPage> {
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(MatchdayError::Browser)?;

        let page = self
            .browser
            .new_page(target)
            .await
            .map_err(|e| MatchdayError::Browser(format!("Failed to create page: {}", e)))?;

        let result = self.navigate(&page, url, ready_selectors).await;

        if let Err(e) = page.close().await {
            warn!(url, "Failed to close page: {}", e);
        }
        result
    }

    async fn navigate(&self, page: &Page, url: &str, ready_selectors: &[String]) -> Result<LoadedPage> {
        // Set user agent if configured
        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| MatchdayError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        let filter = if self.config.block_resources {
            Some(install_request_filter(page).await?)
        } else {
            None
        };

        let outcome = tokio::time::timeout(self.config.timeout(), async {
            page.goto(url)
                .await
                .map_err(|e| MatchdayError::Browser(format!("Navigation failed: {}", e)))?;

            wait_until_ready(page, ready_selectors, self.config.ready_fallback()).await;

            let html = page
                .content()
                .await
                .map_err(|e| MatchdayError::Browser(format!("Failed to read content: {}", e)))?;
            let final_url = page
                .url()
                .await
                .map_err(|e| MatchdayError::Browser(format!("Failed to read URL: {}", e)))?
                .unwrap_or_else(|| url.to_string());

            Ok::<_, MatchdayError>(LoadedPage {
                requested_url: url.to_string(),
                final_url,
                html,
            })
        })
        .await;

        if let Some(task) = filter {
            task.abort();
        }

        outcome.map_err(|_| MatchdayError::Timeout {
            url: url.to_string(),
            secs: self.config.timeout_secs,
        })?
    }
}

#[async_trait]
impl PageLoader for ChromeLoader {
    async fn load(&self, url: &str, ready_selectors: &[String]) -> Result<LoadedPage> {
        let context_id = self.create_context().await?;
        let result = self.load_in_context(&context_id, url, ready_selectors).await;
        self.dispose_context(context_id).await;
        result
    }
}

/// Fail image, font and media requests before they hit the network.
async fn install_request_filter(page: &Page) -> Result<JoinHandle<()>> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(|e| MatchdayError::Browser(format!("Failed to listen for requests: {}", e)))?;

    let patterns = BLOCKED_RESOURCES.iter().map(|kind| {
        RequestPattern::builder()
            .resource_type(kind.clone())
            .request_stage(RequestStage::Request)
            .build()
    });
    page.execute(EnableParams::builder().patterns(patterns).build())
        .await
        .map_err(|e| MatchdayError::Browser(format!("Failed to enable request filter: {}", e)))?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let fail = FailRequestParams::new(event.request_id.clone(), ErrorReason::BlockedByClient);
            if let Err(e) = page.execute(fail).await {
                debug!("Failed to block request: {}", e);
            }
        }
    }))
}

/// Race "a ready selector is present" against a fixed delay, so a page
/// missing the selector still gets read.
async fn wait_until_ready(page: &Page, selectors: &[String], fallback: Duration) {
    let appeared = async {
        loop {
            for selector in selectors {
                if page.find_element(selector.as_str()).await.is_ok() {
                    return selector.clone();
                }
            }
            tokio::time::sleep(READY_POLL).await;
        }
    };

    tokio::select! {
        selector = appeared => debug!(%selector, "Content ready"),
        _ = tokio::time::sleep(fallback) => debug!("No ready selector before fallback delay"),
    }
}
