//! Discovers match stubs on a club's fixture listing page.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{NaiveTime, TimeDelta};
use regex::{Match, Regex};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::app::{MatchdayError, Result};
use crate::domain::{MatchStub, Venue};
use crate::heuristics::{mentions, CrestConfig, CrestResolver};
use crate::scraper::config::ListingConfig;
use crate::scraper::dom;

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}/\d{2}/\d{4})\b").expect("invalid regex: date"));

static RE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[:hH](\d{2})\b").expect("invalid regex: time"));

static RE_UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}{2,}").expect("invalid regex: uppercase run"));

/// Compute the meeting time `offset_minutes` before `time` (`HH:MM`),
/// wrapping across midnight. Unreadable times give an empty string.
pub fn meeting_time(time: &str, offset_minutes: i64) -> String {
    let Ok(kickoff) = NaiveTime::parse_from_str(time, "%H:%M") else {
        return String::new();
    };
    match TimeDelta::try_minutes(offset_minutes) {
        Some(offset) => (kickoff - offset).format("%H:%M").to_string(),
        None => String::new(),
    }
}

/// Id from the last path segment of the detail URL, or a short digest of
/// the whole URL when that segment has nothing usable.
pub fn slug_id(detail_url: &str) -> String {
    let segment = Url::parse(detail_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.rfind(|s| !s.is_empty()).map(String::from))
        })
        .unwrap_or_default();

    let slug = segment
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        let digest = Sha256::digest(detail_url.as_bytes());
        hex::encode(digest)[..12].to_string()
    } else {
        slug
    }
}

/// State carried through the document-order walk.
#[derive(Default)]
struct Walk {
    date: String,
    competition: String,
    seen: HashSet<String>,
    ids: HashSet<String>,
}

impl Walk {
    /// `slug`, or `slug-N` with the smallest N >= 2 not issued yet.
    fn unique_id(&mut self, slug: String) -> String {
        let mut id = slug.clone();
        let mut n = 2;
        while self.ids.contains(&id) {
            id = format!("{}-{}", slug, n);
            n += 1;
        }
        self.ids.insert(id.clone());
        id
    }
}

pub struct ListingScraper {
    containers: Vec<Selector>,
    match_containers: Vec<Selector>,
    competitions: Vec<Selector>,
    crests: Vec<Selector>,
    detail_pattern: Regex,
    meeting_offset_minutes: i64,
    identity_token: String,
    resolver: CrestResolver,
}

impl ListingScraper {
    pub fn new(config: &ListingConfig, crest: &CrestConfig, identity_token: &str) -> Result<Self> {
        Ok(Self {
            containers: dom::compile_selectors(&config.container_selectors)?,
            match_containers: dom::compile_selectors(&config.match_container_selectors)?,
            competitions: dom::compile_selectors(&config.competition_selectors)?,
            crests: dom::compile_selectors(&config.crest_selectors)?,
            detail_pattern: Regex::new(&config.detail_url_pattern)?,
            meeting_offset_minutes: config.meeting_offset_minutes,
            identity_token: identity_token.to_string(),
            resolver: CrestResolver::new(crest.clone(), identity_token),
        })
    }

    /// Parse the listing page into stubs, in document order.
    ///
    /// Fails when the fixture container is missing or holds no match links.
    pub fn parse(&self, page_url: &str, html: &str) -> Result<Vec<MatchStub>> {
        let base = Url::parse(page_url)?;
        let doc = Html::parse_document(html);
        let container = dom::select_first(doc.root_element(), &self.containers).ok_or_else(|| {
            MatchdayError::ListingContainerMissing {
                url: page_url.to_string(),
            }
        })?;

        let mut walk = Walk::default();
        let mut stubs = Vec::new();

        for node in container.descendants() {
            if let Some(text) = node.value().as_text() {
                let inside_link = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|el| el.value().name() == "a");
                if !inside_link {
                    self.observe_text(&mut walk, text);
                }
                continue;
            }

            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            if el.value().name() != "a" {
                continue;
            }
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if !self.detail_pattern.is_match(href) {
                continue;
            }
            let text = dom::element_text(el);
            let Some(time) = RE_TIME.find(&text) else {
                continue;
            };
            let detail_url = dom::absolutize(&base, href);
            if !walk.seen.insert(detail_url.clone()) {
                continue;
            }

            let stub = self.build_stub(el, container, &text, time, detail_url, &base, &mut walk);
            debug!(id = %stub.id, date = %stub.date, "found match");
            stubs.push(stub);
        }

        if stubs.is_empty() {
            return Err(MatchdayError::NoMatches {
                url: page_url.to_string(),
            });
        }
        Ok(stubs)
    }

    /// Date headers and loose competition labels between match links.
    fn observe_text(&self, walk: &mut Walk, text: &str) {
        let text = dom::collapse_whitespace(text);
        if text.is_empty() {
            return;
        }
        if let Some(caps) = RE_DATE.captures(&text) {
            walk.date = caps[1].to_string();
            walk.competition.clear();
        } else if !RE_TIME.is_match(&text) && RE_UPPER_RUN.is_match(&text) {
            walk.competition = text;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_stub(
        &self,
        link: ElementRef<'_>,
        container: ElementRef<'_>,
        text: &str,
        time: Match<'_>,
        detail_url: String,
        base: &Url,
        walk: &mut Walk,
    ) -> MatchStub {
        let local_team = clean_team(&text[..time.start()]);
        let away_team = clean_team(&text[time.end()..]);
        let time = normalize_time(time.as_str());

        let scope = self.match_scope(link, container);
        // A loose label only ever applies to the next match link.
        let loose = std::mem::take(&mut walk.competition);
        let competition = dom::select_first(scope, &self.competitions)
            .map(dom::element_text)
            .filter(|c| !c.is_empty())
            .unwrap_or(loose);

        let venue = if mentions(&local_team, &self.identity_token) {
            Venue::Home
        } else {
            Venue::Away
        };

        let images = dom::crest_images(scope, &self.crests, base);
        let crests =
            self.resolver
                .resolve(&local_team, &away_team, venue == Venue::Home, &images);

        MatchStub {
            id: walk.unique_id(slug_id(&detail_url)),
            date: walk.date.clone(),
            meeting_time: meeting_time(&time, self.meeting_offset_minutes),
            time,
            local_team,
            away_team,
            competition,
            venue,
            local_crest_url: crests.local,
            away_crest_url: crests.away,
            detail_url,
        }
    }

    /// Nearest ancestor of the link that looks like a per-match wrapper,
    /// without leaving the listing container.
    fn match_scope<'a>(&self, link: ElementRef<'a>, container: ElementRef<'a>) -> ElementRef<'a> {
        link.ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|el| el.id() != container.id())
            .find(|el| self.match_containers.iter().any(|sel| sel.matches(el)))
            .or_else(|| link.parent().and_then(ElementRef::wrap))
            .unwrap_or(link)
    }
}

fn clean_team(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '-' || c == '–' || c == '|' || c.is_whitespace())
        .to_string()
}

/// `9h30` and `09:30` both become `09:30`.
fn normalize_time(raw: &str) -> String {
    match RE_TIME.captures(raw) {
        Some(caps) => format!("{:0>2}:{}", &caps[1], &caps[2]),
        None => raw.to_string(),
    }
}
