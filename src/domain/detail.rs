use serde::{Deserialize, Serialize};

use super::MatchStub;

/// Structured fields recovered from a match's detail block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub stadium: String,
    pub date_time: String,
    pub competition: String,
    pub address: String,
    pub terrain_type: String,
    pub itinerary_link: String,
    pub raw_text: String,
}

/// Officials listed on the detail page. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStaff {
    pub referee: String,
    pub assistant1: String,
    pub assistant2: String,
}

impl MatchStaff {
    pub fn is_empty(&self) -> bool {
        self.referee.is_empty() && self.assistant1.is_empty() && self.assistant2.is_empty()
    }
}

/// Outcome of one detail scrape: the stub it came from plus whatever
/// the detail page yielded.
///
/// A failed scrape still carries the full stub, with `error` set and
/// both `details` and `staff` left as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub stub: MatchStub,
    pub details: Option<MatchInfo>,
    pub staff: Option<MatchStaff>,
    pub resolved_local_crest_url: String,
    pub resolved_away_crest_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchDetail {
    /// A successful scrape; crest URLs start from the stub's listing values.
    pub fn from_stub(stub: MatchStub) -> Self {
        let resolved_local_crest_url = stub.local_crest_url.clone();
        let resolved_away_crest_url = stub.away_crest_url.clone();
        Self {
            stub,
            details: None,
            staff: None,
            resolved_local_crest_url,
            resolved_away_crest_url,
            final_url: None,
            error: None,
        }
    }

    /// A degraded entry: stub fields only, with the failure recorded.
    pub fn failed(stub: MatchStub, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::from_stub(stub)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Override the listing crests with those found on the detail page.
    /// Empty values keep the listing URL.
    pub fn apply_crests(&mut self, local: &str, away: &str) {
        if !local.is_empty() {
            self.resolved_local_crest_url = local.to_string();
        }
        if !away.is_empty() {
            self.resolved_away_crest_url = away.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> MatchStub {
        let mut stub = MatchStub::new("m-1", "https://club.example/match/m-1");
        stub.local_crest_url = "https://club.example/logos/a.png".into();
        stub.away_crest_url = "https://club.example/logos/b.png".into();
        stub
    }

    #[test]
    fn test_failed_keeps_stub_fields() {
        let detail = MatchDetail::failed(stub(), "navigation timed out");
        assert!(detail.is_failed());
        assert!(detail.details.is_none());
        assert!(detail.staff.is_none());
        assert_eq!(detail.stub.id, "m-1");
        assert_eq!(
            detail.resolved_local_crest_url,
            "https://club.example/logos/a.png"
        );
    }

    #[test]
    fn test_apply_crests_ignores_empty() {
        let mut detail = MatchDetail::from_stub(stub());
        detail.apply_crests("", "https://club.example/logos/c.png");
        assert_eq!(
            detail.resolved_local_crest_url,
            "https://club.example/logos/a.png"
        );
        assert_eq!(
            detail.resolved_away_crest_url,
            "https://club.example/logos/c.png"
        );
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let detail = MatchDetail::failed(stub(), "boom");
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], "m-1");
        assert_eq!(value["detailUrl"], "https://club.example/match/m-1");
        assert_eq!(value["venue"], "away");
        assert!(value["details"].is_null());
        assert!(value["staff"].is_null());
        assert_eq!(value["error"], "boom");
    }
}
