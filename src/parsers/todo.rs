use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Todo, TodoStatus};
use crate::parsers::extract;
use crate::parsers::frontmatter::{as_string, as_string_array, split_frontmatter};

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").unwrap());
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-(.+)\.md$").unwrap());

/// Parse a todo file from `todos/pending/` or `todos/done/`.
///
/// The filename encodes the date and slug ("2026-02-21-mcp-test-hardening.md");
/// status is decided by the containing directory, not the document.
pub fn parse_todo(raw: &str, file_name: &str, status: TodoStatus) -> Todo {
    let fm = split_frontmatter(raw);
    let body = fm.body;
    let data = &fm.data;

    let created = as_string(data.get("created"), "");
    let date = DATE_RE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| created.chars().take(10).collect());

    let slug = SLUG_RE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| file_name.trim_end_matches(".md").to_string());

    Todo {
        date,
        slug,
        file_name: file_name.to_string(),
        title: as_string(data.get("title"), ""),
        area: as_string(data.get("area"), ""),
        files: as_string_array(data.get("files")),
        status,
        problem: extract::section(&body, 2, |t| t == "Problem").unwrap_or_default(),
        solution: extract::section(&body, 2, |t| t == "Solution").unwrap_or_default(),
        body,
    }
}
