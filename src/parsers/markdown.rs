use crate::models::MarkdownDocument;
use crate::parsers::{extract, frontmatter::split_frontmatter};

/// Parse a generic markdown file: frontmatter, headings, body.
pub fn parse_markdown(raw: &str, file_name: &str, file_path: &str) -> MarkdownDocument {
    let fm = split_frontmatter(raw);
    let headings = extract::headings(&fm.body);

    MarkdownDocument {
        file_path: file_path.to_string(),
        file_name: file_name.to_string(),
        frontmatter: fm.data,
        body: fm.body,
        headings,
    }
}
