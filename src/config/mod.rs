//! Configuration management for matchday.
//!
//! Configuration is read from `~/.config/matchday/config.toml` unless a path
//! is given explicitly. If the default file doesn't exist, a default
//! configuration with comments is created.

use crate::heuristics::CrestConfig;
use crate::scraper::{DetailConfig, ListingConfig, ScraperConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which club is being scraped and where its fixtures live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    /// Display name written into the scrape result
    pub name: String,

    /// Token identifying the club's own team names and crests
    pub identity_token: String,

    /// Fixture listing page
    pub listing_url: String,
}

impl ClubConfig {
    /// Name for the scrape result, falling back to the identity token.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.identity_token
        } else {
            &self.name
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub club: ClubConfig,
    pub scraper: ScraperConfig,
    pub listing: ListingConfig,
    pub detail: DetailConfig,
    pub crest: CrestConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/matchday/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("matchday").join("config.toml"))
    }

    /// Check the values a scrape cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.club.listing_url.trim().is_empty() {
            return Err(ConfigError::Missing("club.listing_url"));
        }
        if self.club.identity_token.trim().is_empty() {
            return Err(ConfigError::Missing("club.identity_token"));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# matchday configuration
#
# CSS selectors are tried in order; the first one that matches wins.
# Command-line flags override the [club] values below.

[club]
# Name written into the scrape result
name = ""

# Token identifying the club in team names and crest labels, e.g. "AFP 18"
identity_token = ""

# Fixture listing page
listing_url = ""

[scraper]
# Run browser in headless mode (no visible window)
headless = true

# Hard navigation timeout per page in seconds
timeout_secs = 30

# How long to wait for a ready selector before reading the page anyway (milliseconds)
ready_fallback_ms = 3000

# Detail pages scraped in parallel per chunk
concurrency = 15

# Abort image, font and media requests
block_resources = true

[listing]
# Selectors that signal the listing has rendered
ready_selectors = ["a[href*=\"/match\"]", "a[href*=\"/rencontre\"]"]

# Fixture list container
container_selectors = [
    "#calendrier",
    "[class*=\"calendrier\"]",
    "[class*=\"calendar\"]",
    "[id*=\"match\"]",
    "main",
]

# Per-match wrapper around a match link
match_container_selectors = ["[class*=\"match-card\"]", "li", "article", "[class*=\"match\"]"]

# Competition label inside a match wrapper
competition_selectors = ["[class*=\"competition\"]", "[class*=\"championnat\"]", "[data-competition]"]

# Crest images inside a match wrapper
crest_selectors = ["img[src*=\"logo\"]", "img[alt]", "img"]

# Regex a link's href must match to count as a match
detail_url_pattern = "/(match|matchs|rencontre|rencontres)/"

# Minutes between meeting time and kickoff
meeting_offset_minutes = 90

[detail]
# Selectors that signal the detail content has rendered
ready_selectors = ["[class*=\"match-detail\"]", "div.border.rounded"]

# Detail block: full-page container, legacy bordered panel, generic fallback
block_selectors = ["[class*=\"match-detail\"]", "div.border.rounded", "[class*=\"detail\"]"]

# Team crest images on the detail page
crest_selectors = ["[class*=\"team\"] img", "[class*=\"equipe\"] img", "img[src*=\"logo\"]"]

[crest]
# Substring every crest URL must contain
logo_path_marker = "logo"

# Filename substrings of generic placeholder images
placeholders = ["placeholder", "default-logo", "logo-default", "no-logo", "nologo", "blason-vide"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to render config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Missing required setting `{0}`")]
    Missing(&'static str),
}
