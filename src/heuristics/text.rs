//! Line-oriented field extraction for a match's detail block.
//!
//! Detail pages have no stable schema, so fields are recovered with an
//! ordered rule table applied in a single pass over the block's lines.
//! Each field is filled at most once, by the first line that fits.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Anchor, DetailBlock, MatchInfo};

/// Navigation and chrome labels that show up inside detail blocks.
const MENU_LABELS: &[&str] = &[
    "Accueil",
    "Actualités",
    "Agenda",
    "Calendrier",
    "Classement",
    "Club",
    "Connexion",
    "Contact",
    "Équipes",
    "Equipes",
    "Infos pratiques",
    "Menu",
    "Partager",
    "Partenaires",
    "Résultats",
    "Retour",
    "Voir plus",
];

const MAPS_DOMAINS: &[&str] = &[
    "google.com/maps",
    "google.fr/maps",
    "maps.google.",
    "maps.app.goo.gl",
    "goo.gl/maps",
    "waze.com",
    "openstreetmap.org",
    "maps.apple.com",
    "bing.com/maps",
];

static RE_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{2}/\d{2}/\d{4})\s*-\s*(\d{1,2})[:hH](\d{2})\b")
        .expect("invalid regex: date time")
});

static RE_VENUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(stade|stadium|gymnase|complexe|parc des sports|centre sportif|espace sportif|plaine de jeux|salle|city[- ]stade)\b",
    )
    .expect("invalid regex: venue")
});

static RE_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(rue|avenue|av|boulevard|bd|chemin|all[ée]e|impasse|place|quai|route|square|sentier)\b",
    )
    .expect("invalid regex: street")
});

static RE_POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{5}\b[\s,\-]*\p{Lu}").expect("invalid regex: postal code")
});

static RE_SURFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(synth[ée]tique|herbe|gazon|stabilis[ée]|pelouse|parquet|hybride|terre battue|type de terrain|surface)\b",
    )
    .expect("invalid regex: surface")
});

static RE_SURFACE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(type de )?(terrain|surface|rev[êe]tement)\s*:?$")
        .expect("invalid regex: surface label")
});

static RE_JOURNEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bjourn[ée]e\b").expect("invalid regex: journee"));

static RE_UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}{2,}").expect("invalid regex: uppercase run"));

static RE_STAFF_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(staff du match|arbitre\b|d[ée]l[ée]gu[ée]\b)")
        .expect("invalid regex: staff line")
});

static RE_ITINERARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)itin[ée]raire|itinerary|directions|plan d.acc[èe]s|y aller")
        .expect("invalid regex: itinerary")
});

/// Anchors whose parent text is longer than this are too far from the
/// link to say anything about it.
const MAX_ANCHOR_CONTEXT: usize = 80;

/// Recover stadium, kickoff, competition, address, surface and route link
/// from a detail block. Fields that no rule matches stay empty.
pub fn extract_match_info(block: &DetailBlock) -> MatchInfo {
    let lines: Vec<&str> = block
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !is_menu_label(l))
        .collect();

    let mut info = MatchInfo {
        raw_text: block.raw_text(),
        itinerary_link: find_itinerary_link(&block.anchors),
        ..MatchInfo::default()
    };

    let mut date_seen = false;
    let mut location_seen = false;
    let mut stadium_fallback: Option<&str> = None;
    let mut skip_next = false;

    for (i, line) in lines.iter().copied().enumerate() {
        if std::mem::take(&mut skip_next) {
            continue;
        }
        if line.to_lowercase() == "itinéraire" || RE_STAFF_LINE.is_match(line) {
            continue;
        }

        if let Some(caps) = RE_DATE_TIME.captures(line) {
            if info.date_time.is_empty() {
                info.date_time = format!("{} - {:0>2}:{}", &caps[1], &caps[2], &caps[3]);
            }
            date_seen = true;
            continue;
        }

        // Venue names often carry street or surface words.
        if info.stadium.is_empty() && RE_VENUE.is_match(line) {
            info.stadium = line.to_string();
            continue;
        }

        if info.address.is_empty() && is_address(line) {
            info.address = line.to_string();
            location_seen = true;
            continue;
        }

        if info.terrain_type.is_empty() {
            if RE_SURFACE_LABEL.is_match(line) {
                info.terrain_type = match lines.get(i + 1) {
                    Some(next) => {
                        skip_next = true;
                        format!("{} {}", line.trim_end_matches(':').trim(), next)
                    }
                    None => line.to_string(),
                };
                location_seen = true;
                continue;
            }
            if RE_SURFACE.is_match(line) {
                info.terrain_type = line.to_string();
                location_seen = true;
                continue;
            }
        }

        if info.competition.is_empty()
            && (RE_JOURNEE.is_match(line)
                || (date_seen && !location_seen && RE_UPPER_RUN.is_match(line)))
        {
            info.competition = line.to_string();
            continue;
        }

        if stadium_fallback.is_none() && date_seen && starts_uppercase(line) {
            stadium_fallback = Some(line);
        }
    }

    if info.stadium.is_empty() {
        if let Some(line) = stadium_fallback {
            info.stadium = line.to_string();
        }
    }

    info
}

fn is_menu_label(line: &str) -> bool {
    MENU_LABELS.iter().any(|label| *label == line)
}

fn is_address(line: &str) -> bool {
    RE_STREET.is_match(line) || RE_POSTAL_CODE.is_match(line)
}

fn starts_uppercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_uppercase)
}

/// First anchor that reads like a route link, else the first anchor
/// pointing at a known maps service.
fn find_itinerary_link(anchors: &[Anchor]) -> String {
    let local = anchors.iter().find(|a| {
        !a.href.is_empty()
            && (RE_ITINERARY.is_match(&a.href)
                || RE_ITINERARY.is_match(&a.text)
                || (a.context.len() <= MAX_ANCHOR_CONTEXT && RE_ITINERARY.is_match(&a.context)))
    });

    local
        .or_else(|| {
            anchors.iter().find(|a| {
                let href = a.href.to_lowercase();
                MAPS_DOMAINS.iter().any(|d| href.contains(d))
            })
        })
        .map(|a| a.href.clone())
        .unwrap_or_default()
}
