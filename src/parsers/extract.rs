//! Shared extraction utilities for the loosely-structured planning format.
//!
//! The format has no grammar; documents are mined with regexes and index
//! slicing. Rust's regex crate has no lookaround, so "until the next heading"
//! is implemented by scanning heading positions and slicing between them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Heading;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.+)$").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-\s+(.+)$").unwrap());

/// All markdown headings in the content, in order.
pub fn headings(content: &str) -> Vec<Heading> {
    HEADING_RE
        .captures_iter(content)
        .map(|caps| Heading {
            level: caps[1].len() as u8,
            text: caps[2].trim().to_string(),
        })
        .collect()
}

/// The text of the first section whose heading is at `level` and whose title
/// satisfies `title`. The section runs to the next heading at the same or a
/// higher level, or to the end of the document.
pub fn section<F>(content: &str, level: u8, title: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    section_until(content, level, title, |l, _| l <= level)
}

/// Like [`section`], but with an explicit stop predicate over subsequent
/// headings. The roadmap parser needs sections that skip past phase headings.
pub fn section_until<F, S>(content: &str, level: u8, title: F, stop: S) -> Option<String>
where
    F: Fn(&str) -> bool,
    S: Fn(u8, &str) -> bool,
{
    let mut start = None;

    for caps in HEADING_RE.captures_iter(content) {
        let heading_level = caps[1].len() as u8;
        let text = caps[2].trim();
        let whole = caps.get(0).expect("capture 0 always present");

        match start {
            None => {
                if heading_level == level && title(text) {
                    start = Some(whole.end());
                }
            }
            Some(begin) => {
                if stop(heading_level, text) {
                    return Some(content[begin..whole.start()].trim().to_string());
                }
            }
        }
    }

    start.map(|begin| content[begin..].trim().to_string())
}

/// Bullet-list items (`- item`) in the content.
pub fn bullets(content: &str) -> Vec<String> {
    BULLET_RE
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Markdown table rows as cell lists, skipping everything up to and including
/// the header row (recognized by its first cell) and any separator rows.
/// Rows with the wrong column count are returned as-is; callers skip what
/// they cannot use.
pub fn table_rows(content: &str, header_first_col: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut header_seen = false;

    for line in content.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }
        let cells: Vec<String> = line
            .trim_matches('|')
            .split('|')
            .map(|cell| cell.trim().to_string())
            .collect();
        let Some(first) = cells.first() else {
            continue;
        };
        if first == header_first_col || first.starts_with("---") {
            header_seen = true;
            continue;
        }
        if !header_seen || first.is_empty() {
            continue;
        }
        rows.push(cells);
    }

    rows
}

/// Content between `<tag>` and `</tag>`, case-insensitive, across lines.
/// An unmatched or missing marker yields `None`, never an error.
pub fn tagged_section(content: &str, tag: &str) -> Option<String> {
    let tag = regex::escape(tag);
    let re = Regex::new(&format!(r"(?is)<{tag}>(.*?)</{tag}>")).ok()?;
    re.captures(content)
        .map(|caps| caps[1].trim().to_string())
}

/// The value of the first `key: value` line in the content.
pub fn line_value(content: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?m)^{}:\s*(.+)$", regex::escape(key))).ok()?;
    re.captures(content).map(|caps| caps[1].trim().to_string())
}
