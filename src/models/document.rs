use serde::{Deserialize, Serialize};

/// A markdown heading with its level (1-6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// A generically parsed markdown file: frontmatter, headings, body.
///
/// Used for PROJECT.md and for phase sidecars (research, context, UAT) that
/// have no dedicated parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownDocument {
    pub file_path: String,
    pub file_name: String,
    pub frontmatter: serde_yaml::Mapping,
    pub body: String,
    pub headings: Vec<Heading>,
}

/// A standalone research document from the `research/` tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchDoc {
    pub file_name: String,
    pub file_path: String,
    pub title: String,
    pub body: String,
    pub headings: Vec<String>,
}

/// One row of a plan summary's decisions table, flattened across all phases.
///
/// Decisions carry no identity of their own; they are a projection of the
/// summaries they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision: String,
    pub rationale: String,
    pub phase: String,
    pub plan: String,
    pub source: String,
}
