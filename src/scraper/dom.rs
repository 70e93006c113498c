//! Turns an HTML snapshot into the plain values the heuristics work on.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::app::{MatchdayError, Result};
use crate::domain::{Anchor, CrestImage, DetailBlock, LayoutOrientation};

/// Elements that end a line of visible text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "section", "table", "td", "th", "tr", "ul",
];

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

pub fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| MatchdayError::Selector(format!("{}: {:?}", s, e)))
        })
        .collect()
}

/// First element matched by the earliest selector that matches anything.
pub fn select_first<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| scope.select(sel).next())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Visible text of `el`, split into lines at block boundaries.
pub fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    push_lines(el, &mut current, &mut lines);
    flush_line(&mut current, &mut lines);
    lines
}

fn push_lines(el: ElementRef<'_>, current: &mut String, lines: &mut Vec<String>) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
            current.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                flush_line(current, lines);
            }
            push_lines(child_el, current, lines);
            if block {
                flush_line(current, lines);
            }
        }
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = collapse_whitespace(current);
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

/// Nearest flex ancestor's direction: `flex-col`/`flex-row` read forward,
/// their `-reverse` variants read reversed.
pub fn layout_orientation(el: ElementRef<'_>) -> LayoutOrientation {
    for ancestor in el.ancestors().filter_map(ElementRef::wrap) {
        for class in ancestor.value().classes() {
            // Drop responsive prefixes such as `md:`.
            let class = class.rsplit(':').next().unwrap_or(class);
            match class {
                "flex-col-reverse" | "flex-row-reverse" => return LayoutOrientation::Reversed,
                "flex-col" | "flex-row" => return LayoutOrientation::Forward,
                _ => {}
            }
        }
    }
    LayoutOrientation::Unknown
}

pub fn absolutize(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.trim().to_string())
}

/// Crest candidates under `scope`, from the first selector that finds any.
pub fn crest_images(scope: ElementRef<'_>, selectors: &[Selector], base: &Url) -> Vec<CrestImage> {
    for sel in selectors {
        let images: Vec<CrestImage> = scope
            .select(sel)
            .filter_map(|img| {
                let src = img
                    .value()
                    .attr("src")
                    .or_else(|| img.value().attr("data-src"))
                    .filter(|s| !s.trim().is_empty())?;
                let alt = ["alt", "title", "aria-label"]
                    .iter()
                    .find_map(|attr| img.value().attr(attr))
                    .unwrap_or_default();
                Some(CrestImage {
                    src: absolutize(base, src),
                    alt: collapse_whitespace(alt),
                    orientation: layout_orientation(img),
                })
            })
            .collect();
        if !images.is_empty() {
            return images;
        }
    }
    Vec::new()
}

pub fn anchors(scope: ElementRef<'_>, base: &Url) -> Vec<Anchor> {
    let Ok(sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let context = a
                .parent()
                .and_then(ElementRef::wrap)
                .map(element_text)
                .unwrap_or_default();
            Some(Anchor {
                href: absolutize(base, href),
                text: element_text(a),
                context,
            })
        })
        .collect()
}

pub fn detail_block(el: ElementRef<'_>, base: &Url) -> DetailBlock {
    DetailBlock {
        lines: text_lines(el),
        anchors: anchors(el, base),
    }
}
