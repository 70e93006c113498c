use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::app::{AppContext, Result};
use crate::domain::{MatchStub, ScrapeRun, Venue};
use crate::scraper::{DetailParser, LoadedPage};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct ScrapeOverrides {
    pub url: Option<String>,
    pub club: Option<String>,
    pub token: Option<String>,
    pub width: Option<usize>,
}

impl ScrapeOverrides {
    pub fn apply(self, ctx: &mut AppContext) {
        let club = &mut ctx.config.club;
        if let Some(url) = self.url {
            club.listing_url = url;
        }
        if let Some(name) = self.club {
            club.name = name;
        }
        if let Some(token) = self.token {
            club.identity_token = token;
        }
        if let Some(width) = self.width {
            ctx.config.scraper.concurrency = width;
        }
    }
}

pub async fn scrape(
    ctx: &mut AppContext,
    overrides: ScrapeOverrides,
    out: Option<PathBuf>,
) -> Result<()> {
    overrides.apply(ctx);
    ctx.config.validate()?;

    let loader = Arc::new(ctx.launch_loader().await?);
    let outcome = match ctx.pipeline(loader.clone()) {
        Ok(pipeline) => pipeline.run().await,
        Err(e) => Err(e),
    };

    match Arc::try_unwrap(loader) {
        Ok(loader) => loader.close().await,
        Err(_) => warn!("Browser still referenced after the run"),
    }

    let run = outcome?;
    write_run(&run, out.as_deref())?;

    eprintln!(
        "Scraped {} matches over {} dates ({} failed)",
        run.match_count(),
        run.matches.len(),
        run.failed_count()
    );
    Ok(())
}

fn write_run(run: &ScrapeRun, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(run)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn show_config(ctx: &AppContext) -> Result<()> {
    println!("# {}", ctx.config_path.display());
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}

/// Run the detail extractors on a saved page and print what they found.
pub fn inspect(
    ctx: &AppContext,
    path: &Path,
    local: &str,
    away: &str,
    home: bool,
    base: &str,
) -> Result<()> {
    let html = std::fs::read_to_string(path)?;
    let config = &ctx.config;
    let parser = DetailParser::new(&config.detail, &config.crest, &config.club.identity_token)?;

    let mut stub = MatchStub::new("inspect", base);
    stub.local_team = local.to_string();
    stub.away_team = away.to_string();
    stub.venue = if home { Venue::Home } else { Venue::Away };

    let page = LoadedPage {
        requested_url: base.to_string(),
        final_url: base.to_string(),
        html,
    };
    let detail = parser.parse(&stub, &page)?;
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}
