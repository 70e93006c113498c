pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Discover a club's fixtures and scrape every match page", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/matchday/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full scrape and write the result as JSON
    Scrape {
        /// Fixture listing URL
        #[arg(short, long)]
        url: Option<String>,

        /// Club name written into the result
        #[arg(long)]
        club: Option<String>,

        /// Token identifying the club in team names and crests
        #[arg(short, long)]
        token: Option<String>,

        /// Detail pages scraped in parallel per chunk
        #[arg(short, long)]
        width: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show the config file path and the effective configuration
    Config,
    /// Run the extractors on a saved match detail page
    Inspect {
        /// Path to the saved HTML file
        path: PathBuf,

        /// Local team name
        #[arg(long, default_value = "")]
        local: String,

        /// Away team name
        #[arg(long, default_value = "")]
        away: String,

        /// The club plays at home
        #[arg(long)]
        home: bool,

        /// URL the page was saved from, for resolving relative links
        #[arg(long, default_value = "https://localhost/")]
        base: String,
    },
}
