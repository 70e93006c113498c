use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchday::app::AppContext;
use matchday::cli::commands::{self, ScrapeOverrides};
use matchday::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::new(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape {
            url,
            club,
            token,
            width,
            out,
        } => {
            let overrides = ScrapeOverrides {
                url,
                club,
                token,
                width,
            };
            commands::scrape(&mut ctx, overrides, out).await?;
        }
        Commands::Config => {
            commands::show_config(&ctx)?;
        }
        Commands::Inspect {
            path,
            local,
            away,
            home,
            base,
        } => {
            commands::inspect(&ctx, &path, &local, &away, home, &base)?;
        }
    }

    Ok(())
}
