use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::pipeline::ScrapePipeline;
use crate::scraper::{ChromeLoader, PageLoader};

pub struct AppContext {
    pub config: Config,
    /// File the configuration came from
    pub config_path: PathBuf,
}

impl AppContext {
    /// Load configuration from `config_path`, or from the default location
    /// (creating it on first use) when none is given.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, config_path) = match config_path {
            Some(path) => (Config::load_from(path)?, path.to_path_buf()),
            None => (Config::load()?, Config::default_config_path()?),
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn with_config(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Start the browser used for this run.
    pub async fn launch_loader(&self) -> Result<ChromeLoader> {
        ChromeLoader::launch(self.config.scraper.clone()).await
    }

    pub fn pipeline(&self, loader: Arc<dyn PageLoader>) -> Result<ScrapePipeline> {
        ScrapePipeline::new(&self.config, loader)
    }
}
