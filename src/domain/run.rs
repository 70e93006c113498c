use std::fmt;
use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::MatchDetail;

/// Bucket for matches whose date could not be read.
pub const UNKNOWN_DATE_KEY: &str = "unknown";

/// Matches grouped by date, keeping dates in first-seen order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchesByDate(Vec<(String, Vec<MatchDetail>)>);

impl MatchesByDate {
    /// Append `detail` to the bucket for `date`, opening it if needed.
    pub fn push(&mut self, date: &str, detail: MatchDetail) {
        match self.0.iter_mut().find(|(key, _)| key == date) {
            Some((_, bucket)) => bucket.push(detail),
            None => self.0.push((date.to_string(), vec![detail])),
        }
    }

    pub fn get(&self, date: &str) -> Option<&[MatchDetail]> {
        self.0
            .iter()
            .find(|(key, _)| key == date)
            .map(|(_, bucket)| bucket.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Vec<MatchDetail>> {
        self.0.iter().map(|(_, bucket)| bucket)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatchDetail])> {
        self.0
            .iter()
            .map(|(key, bucket)| (key.as_str(), bucket.as_slice()))
    }
}

impl Index<&str> for MatchesByDate {
    type Output = [MatchDetail];

    fn index(&self, date: &str) -> &Self::Output {
        self.get(date)
            .unwrap_or_else(|| panic!("no matches for date {}", date))
    }
}

impl Serialize for MatchesByDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, bucket) in &self.0 {
            map.serialize_entry(date, bucket)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MatchesByDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DatesVisitor;

        impl<'de> Visitor<'de> for DatesVisitor {
            type Value = MatchesByDate;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of date to matches")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut dates = MatchesByDate::default();
                while let Some((date, bucket)) = access.next_entry::<String, Vec<MatchDetail>>()? {
                    for detail in bucket {
                        dates.push(&date, detail);
                    }
                }
                Ok(dates)
            }
        }

        deserializer.deserialize_map(DatesVisitor)
    }
}

/// The result of one full scrape, keyed by match date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRun {
    pub club: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub matches: MatchesByDate,
}

impl ScrapeRun {
    pub fn match_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.matches
            .values()
            .flatten()
            .filter(|m| m.is_failed())
            .count()
    }
}
