//! Match officials from a detail block's raw text.
//!
//! Most pages carry no staff section, so a cheap marker check runs before
//! any label regex. Names that wrap onto the next line are recovered by a
//! second pass over the whole text.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::MatchStaff;

static RE_STAFF_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)staff du match|arbitre\s+centre").expect("invalid regex: staff marker")
});

/// `Label : Value` or `Label Value`, value running to the next label or
/// the end of the line.
fn labelled(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?mi){label}[ \t]*:?[ \t]*(\S.*?)[ \t]*(?:(?:arbitre[ \t]+(?:centre|assistant)|d[ée]l[ée]gu[ée]|observateur)\b|$)"
    ))
    .expect("invalid regex: staff label")
}

static RE_REFEREE: LazyLock<Regex> = LazyLock::new(|| labelled(r"arbitre[ \t]+centre"));

static RE_ASSISTANT_1: LazyLock<Regex> =
    LazyLock::new(|| labelled(r"arbitre[ \t]+assistant[ \t]*1\b"));

static RE_ASSISTANT_2: LazyLock<Regex> =
    LazyLock::new(|| labelled(r"arbitre[ \t]+assistant[ \t]*2\b"));

/// A capitalized name anywhere after the label, across line breaks.
fn wrapped(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?i:{label})\s*:?\s*(\p{{Lu}}[\p{{L}}'.\-]*(?:[ \t]+\p{{Lu}}[\p{{L}}'.\-]*)*)"
    ))
    .expect("invalid regex: wrapped staff label")
}

static RE_REFEREE_WRAPPED: LazyLock<Regex> = LazyLock::new(|| wrapped(r"arbitre\s+centre"));

static RE_ASSISTANT_2_WRAPPED: LazyLock<Regex> =
    LazyLock::new(|| wrapped(r"arbitre\s+assistant\s*2\b"));

/// Pull referee and assistant names out of a detail block's raw text.
///
/// Returns `None` when the page has no staff section, or when it has one
/// but no name could be recovered.
pub fn extract_staff(raw_text: &str) -> Option<MatchStaff> {
    if !RE_STAFF_MARKER.is_match(raw_text) {
        return None;
    }

    let mut staff = MatchStaff {
        referee: first_value(&RE_REFEREE, raw_text),
        assistant1: first_value(&RE_ASSISTANT_1, raw_text),
        assistant2: first_value(&RE_ASSISTANT_2, raw_text),
    };

    if staff.referee.is_empty() {
        staff.referee = first_value(&RE_REFEREE_WRAPPED, raw_text);
    }
    if staff.assistant2.is_empty() {
        staff.assistant2 = first_value(&RE_ASSISTANT_2_WRAPPED, raw_text);
    }

    if staff.is_empty() {
        None
    } else {
        Some(staff)
    }
}

fn first_value(re: &Regex, text: &str) -> String {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_name(m.as_str()))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

/// Trims separators and rejects values that are really another label.
fn clean_name(value: &str) -> String {
    let value = value.trim().trim_matches(|c: char| c == ':' || c == '-').trim();
    if !value.chars().any(char::is_alphabetic) {
        return String::new();
    }
    let lower = value.to_lowercase();
    if lower.starts_with("arbitre") || lower.starts_with("staff") {
        return String::new();
    }
    let cut = [" Arbitre", " ARBITRE", " arbitre"]
        .iter()
        .filter_map(|label| value.find(label))
        .min();
    match cut {
        Some(idx) => value[..idx].trim().to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referee_only() {
        let staff = extract_staff("Staff du match\nArbitre Centre : DUPONT J.").unwrap();
        assert_eq!(
            staff,
            MatchStaff {
                referee: "DUPONT J.".into(),
                assistant1: String::new(),
                assistant2: String::new(),
            }
        );
    }

    #[test]
    fn test_no_marker_short_circuits() {
        assert_eq!(extract_staff(""), None);
        assert_eq!(extract_staff("Arbitre Assistant 1 : MARTIN P."), None);
    }

    #[test]
    fn test_marker_without_names() {
        assert_eq!(extract_staff("Staff du match\nNon communiqué"), None);
    }

    #[test]
    fn test_all_three_without_colons() {
        let text = "Staff du match\n\
                    Arbitre Centre DUPONT Jean\n\
                    Arbitre Assistant 1 MARTIN Paul\n\
                    Arbitre Assistant 2 BERNARD Luc";
        let staff = extract_staff(text).unwrap();
        assert_eq!(staff.referee, "DUPONT Jean");
        assert_eq!(staff.assistant1, "MARTIN Paul");
        assert_eq!(staff.assistant2, "BERNARD Luc");
    }

    #[test]
    fn test_labels_on_one_line() {
        let text = "Arbitre Centre : DUPONT J. Arbitre Assistant 1 : MARTIN P. Arbitre Assistant 2 : LEROY A.";
        let staff = extract_staff(text).unwrap();
        assert_eq!(staff.referee, "DUPONT J.");
        assert_eq!(staff.assistant1, "MARTIN P.");
        assert_eq!(staff.assistant2, "LEROY A.");
    }

    #[test]
    fn test_wrapped_names_are_repaired() {
        let text = "Staff du match\nArbitre Centre\nDUPONT J.\nArbitre Assistant 2 :\nLEROY A.";
        let staff = extract_staff(text).unwrap();
        assert_eq!(staff.referee, "DUPONT J.");
        assert_eq!(staff.assistant2, "LEROY A.");
        assert!(staff.assistant1.is_empty());
    }

    #[test]
    fn test_empty_label_does_not_swallow_next_label() {
        let text = "Arbitre Centre :\nArbitre Assistant 1 : MARTIN P.";
        let staff = extract_staff(text).unwrap();
        assert!(staff.referee.is_empty());
        assert_eq!(staff.assistant1, "MARTIN P.");
    }
}
