//! Assigns crest images to the local and away slots of a fixture.
//!
//! Tiers, first hit wins per slot:
//!
//! 1. identity: an image labelled with the club's own token goes to the
//!    club's slot;
//! 2. name: an image whose label matches the opponent's name goes to the
//!    opponent's slot;
//! 3. layout: an image inside a forward layout is local, reversed is away;
//! 4. document order, when at least two valid crests exist.
//!
//! An image is used at most once, so the two slots never share a URL.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{mentions, normalize_name};
use crate::domain::{CrestImage, LayoutOrientation};

/// What counts as a real crest rather than a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrestConfig {
    /// Substring every crest URL must contain (the logo asset path).
    pub logo_path_marker: String,

    /// Filename substrings of generic placeholder images.
    pub placeholders: Vec<String>,
}

impl Default for CrestConfig {
    fn default() -> Self {
        Self {
            logo_path_marker: "logo".to_string(),
            placeholders: vec![
                "placeholder".to_string(),
                "default-logo".to_string(),
                "logo-default".to_string(),
                "no-logo".to_string(),
                "nologo".to_string(),
                "blason-vide".to_string(),
            ],
        }
    }
}

impl CrestConfig {
    pub fn is_valid_crest(&self, src: &str) -> bool {
        let src = src.to_lowercase();
        !src.is_empty()
            && !src.starts_with("data:")
            && src.contains(&self.logo_path_marker.to_lowercase())
            && !self
                .placeholders
                .iter()
                .any(|p| src.contains(&p.to_lowercase()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrestAssignment {
    pub local: String,
    pub away: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Local,
    Away,
}

impl Slot {
    fn other(self) -> Self {
        match self {
            Slot::Local => Slot::Away,
            Slot::Away => Slot::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrestResolver {
    config: CrestConfig,
    identity_token: String,
}

impl CrestResolver {
    pub fn new(config: CrestConfig, identity_token: impl Into<String>) -> Self {
        Self {
            config,
            identity_token: identity_token.into(),
        }
    }

    pub fn is_valid_crest(&self, src: &str) -> bool {
        self.config.is_valid_crest(src)
    }

    /// Decide which of `images` is the local crest and which the away one.
    pub fn resolve(
        &self,
        local_team: &str,
        away_team: &str,
        is_home: bool,
        images: &[CrestImage],
    ) -> CrestAssignment {
        let mut seen = HashSet::new();
        let candidates: Vec<&CrestImage> = images
            .iter()
            .filter(|img| self.is_valid_crest(&img.src))
            .filter(|img| seen.insert(img.src.as_str()))
            .collect();

        let own = if is_home { Slot::Local } else { Slot::Away };
        let opponent = if is_home { away_team } else { local_team };

        let mut picks = Picks::default();
        let is_own = |img: &CrestImage| mentions(&img.alt, &self.identity_token);
        // The club's own crest may only ever land in the club's slot.
        let allowed = |img: &CrestImage, slot: Slot| slot == own || !is_own(img);

        if let Some(i) = candidates.iter().position(|img| is_own(img)) {
            picks.set(own, i);
        }

        if picks.get(own.other()).is_none() {
            let found = candidates.iter().enumerate().find(|(i, img)| {
                !picks.used(*i) && allowed(img, own.other()) && names_match(&img.alt, opponent)
            });
            if let Some((i, _)) = found {
                picks.set(own.other(), i);
            }
        }

        for (i, img) in candidates.iter().enumerate() {
            if picks.used(i) {
                continue;
            }
            let slot = match img.orientation {
                LayoutOrientation::Forward => Slot::Local,
                LayoutOrientation::Reversed => Slot::Away,
                LayoutOrientation::Unknown => continue,
            };
            if picks.get(slot).is_none() && allowed(img, slot) {
                picks.set(slot, i);
            }
        }

        if candidates.len() >= 2 {
            for slot in [Slot::Local, Slot::Away] {
                if picks.get(slot).is_some() {
                    continue;
                }
                let next = (0..candidates.len())
                    .find(|i| !picks.used(*i) && allowed(candidates[*i], slot));
                if let Some(i) = next {
                    picks.set(slot, i);
                }
            }
        }

        let url = |slot| {
            picks
                .get(slot)
                .map(|i| candidates[i].src.clone())
                .unwrap_or_default()
        };
        CrestAssignment {
            local: url(Slot::Local),
            away: url(Slot::Away),
        }
    }
}

#[derive(Default)]
struct Picks {
    local: Option<usize>,
    away: Option<usize>,
}

impl Picks {
    fn get(&self, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Local => self.local,
            Slot::Away => self.away,
        }
    }

    fn set(&mut self, slot: Slot, index: usize) {
        match slot {
            Slot::Local => self.local = Some(index),
            Slot::Away => self.away = Some(index),
        }
    }

    fn used(&self, index: usize) -> bool {
        self.local == Some(index) || self.away == Some(index)
    }
}

/// Loose team-name comparison for crest labels.
///
/// Full containment always matches. Otherwise two multi-word names need
/// two shared tokens; short names get by with one shared token of three
/// or more characters.
pub fn names_match(label: &str, team: &str) -> bool {
    let label = normalize_name(label);
    let team = normalize_name(team);
    if label.is_empty() || team.is_empty() {
        return false;
    }

    let shorter = label.len().min(team.len());
    if shorter >= 3 && (label.contains(&team) || team.contains(&label)) {
        return true;
    }

    let label_tokens: Vec<&str> = label.split(' ').filter(|t| t.chars().count() >= 2).collect();
    let team_tokens: Vec<&str> = team.split(' ').filter(|t| t.chars().count() >= 2).collect();
    let shared: Vec<&&str> = label_tokens
        .iter()
        .filter(|t| team_tokens.contains(t))
        .collect();

    if label_tokens.len() >= 2 && team_tokens.len() >= 2 {
        shared.len() >= 2
    } else {
        shared.iter().any(|t| t.chars().count() >= 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: &str = "https://cdn.example/logos/afp18.png";
    const RIVAL: &str = "https://cdn.example/logos/adversaire.png";
    const THIRD: &str = "https://cdn.example/logos/third.png";

    fn resolver() -> CrestResolver {
        CrestResolver::new(CrestConfig::default(), "AFP 18")
    }

    #[test]
    fn test_placeholder_and_foreign_urls_rejected() {
        let config = CrestConfig::default();
        assert!(config.is_valid_crest(OWN));
        assert!(!config.is_valid_crest("https://cdn.example/logos/placeholder.png"));
        assert!(!config.is_valid_crest("https://cdn.example/img/banner.png"));
        assert!(!config.is_valid_crest(""));
        assert!(!config.is_valid_crest("data:image/png;base64,logo"));
    }

    #[test]
    fn test_identity_wins_for_away_fixture() {
        let images = vec![
            CrestImage::new(RIVAL, "Adversaire FC"),
            CrestImage::new(OWN, "AFP 18"),
        ];
        let got = resolver().resolve("Adversaire FC", "Afp 18 U13", false, &images);
        assert_eq!(got.local, RIVAL);
        assert_eq!(got.away, OWN);
    }

    #[test]
    fn test_name_match_for_opponent() {
        let images = vec![
            CrestImage::new(RIVAL, "Ent. Adversaire Football Club"),
            CrestImage::new(THIRD, "Sponsor"),
        ];
        let got = resolver().resolve("Afp 18 U13", "Adversaire Football", true, &images);
        assert_eq!(got.away, RIVAL);
        assert_eq!(got.local, THIRD);
    }

    #[test]
    fn test_layout_orientation_decides() {
        let images = vec![
            CrestImage::new(RIVAL, "").with_orientation(LayoutOrientation::Reversed),
            CrestImage::new(OWN, "").with_orientation(LayoutOrientation::Forward),
        ];
        let got = resolver().resolve("Home", "Away", true, &images);
        assert_eq!(got.local, OWN);
        assert_eq!(got.away, RIVAL);
    }

    #[test]
    fn test_document_order_fallback() {
        let images = vec![CrestImage::new(OWN, ""), CrestImage::new(RIVAL, "")];
        let got = resolver().resolve("Home", "Away", true, &images);
        assert_eq!(got.local, OWN);
        assert_eq!(got.away, RIVAL);
    }

    #[test]
    fn test_own_crest_never_in_wrong_slot() {
        // Club plays away; its crest comes first in the document and sits
        // in a forward layout, but is labelled with the identity token.
        let images = vec![
            CrestImage::new(OWN, "Afp 18").with_orientation(LayoutOrientation::Forward),
            CrestImage::new(RIVAL, ""),
        ];
        let got = resolver().resolve("Rival", "Afp 18 U13", false, &images);
        assert_eq!(got.away, OWN);
        assert_eq!(got.local, RIVAL);
    }

    #[test]
    fn test_single_crest_fills_one_slot_only() {
        let images = vec![
            CrestImage::new(OWN, "").with_orientation(LayoutOrientation::Forward),
            CrestImage::new(OWN, "dup").with_orientation(LayoutOrientation::Reversed),
        ];
        let got = resolver().resolve("Home", "Away", true, &images);
        assert_eq!(got.local, OWN);
        assert!(got.away.is_empty());
    }

    #[test]
    fn test_total_failure_is_empty() {
        let images = vec![CrestImage::new("https://cdn.example/logos/no-logo.png", "x")];
        assert_eq!(
            resolver().resolve("A", "B", true, &images),
            CrestAssignment::default()
        );
        assert_eq!(resolver().resolve("A", "B", true, &[]), CrestAssignment::default());
    }

    #[test]
    fn test_distinct_slots_and_idempotent() {
        let images = vec![
            CrestImage::new(THIRD, "Adversaire"),
            CrestImage::new(RIVAL, "Adversaire").with_orientation(LayoutOrientation::Reversed),
            CrestImage::new(OWN, "").with_orientation(LayoutOrientation::Reversed),
        ];
        let r = resolver();
        let first = r.resolve("Afp 18 U13", "Adversaire", true, &images);
        let second = r.resolve("Afp 18 U13", "Adversaire", true, &images);
        assert_eq!(first, second);
        assert!(!first.local.is_empty());
        assert!(!first.away.is_empty());
        assert_ne!(first.local, first.away);
    }

    #[test]
    fn test_names_match_rules() {
        assert!(names_match("Paris FC", "PARIS F.C."));
        assert!(names_match("Red Star Saint-Ouen", "Red Star Football Club"));
        assert!(!names_match("Red Star", "Star Wars Club"));
        assert!(names_match("Montrouge", "Montrouge FC 92"));
        assert!(!names_match("FC", "FC Nantes"));
        assert!(!names_match("", "Anything"));
    }
}
