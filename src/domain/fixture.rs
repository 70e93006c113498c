use serde::{Deserialize, Serialize};

/// Which side of the fixture the club plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

/// A match discovered on the fixture listing, before detail enrichment.
///
/// Only `id` and `detail_url` are guaranteed; every other field is
/// best-effort and may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStub {
    pub id: String,
    pub date: String,
    pub time: String,
    pub local_team: String,
    pub away_team: String,
    pub competition: String,
    pub venue: Venue,
    pub meeting_time: String,
    pub local_crest_url: String,
    pub away_crest_url: String,
    pub detail_url: String,
}

impl MatchStub {
    pub fn new(id: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: String::new(),
            time: String::new(),
            local_team: String::new(),
            away_team: String::new(),
            competition: String::new(),
            venue: Venue::Away,
            meeting_time: String::new(),
            local_crest_url: String::new(),
            away_crest_url: String::new(),
            detail_url: detail_url.into(),
        }
    }

    pub fn is_home(&self) -> bool {
        self.venue == Venue::Home
    }
}
