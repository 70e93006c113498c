//! Groups finished matches into the run artifact handed to persistence.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::{MatchDetail, MatchesByDate, ScrapeRun, UNKNOWN_DATE_KEY};

static RE_DATE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("invalid regex: date key"));

/// Bucket key for a match date; anything not `DD/MM/YYYY` goes to the
/// fallback bucket.
pub fn date_key(date: &str) -> &str {
    let date = date.trim();
    if RE_DATE_KEY.is_match(date) {
        date
    } else {
        UNKNOWN_DATE_KEY
    }
}

/// Build the run artifact. Dates appear in first-seen order and input
/// order is kept within each date; nothing is sorted.
pub fn aggregate(
    details: Vec<MatchDetail>,
    club: &str,
    url: &str,
    scraped_at: DateTime<Utc>,
) -> ScrapeRun {
    let mut matches = MatchesByDate::default();
    for detail in details {
        let key = date_key(&detail.stub.date).to_string();
        matches.push(&key, detail);
    }

    ScrapeRun {
        club: club.to_string(),
        url: url.to_string(),
        scraped_at,
        matches,
    }
}
