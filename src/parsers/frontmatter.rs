use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(?:\r?\n|\z)").unwrap());

/// A document split into its YAML header and remaining body.
#[derive(Debug, Clone)]
pub struct Frontmatter {
    pub data: Mapping,
    pub body: String,
}

/// Split YAML frontmatter off a markdown document.
///
/// A missing header, a header that is not valid YAML, or a header whose root
/// is not a mapping all yield an empty mapping and the full trimmed text as
/// the body. This never fails.
pub fn split_frontmatter(raw: &str) -> Frontmatter {
    if let Some(caps) = FRONTMATTER_RE.captures(raw) {
        let header = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if let Ok(Value::Mapping(data)) = serde_yaml::from_str::<Value>(header) {
            let body = raw[caps.get(0).map(|m| m.end()).unwrap_or(0)..]
                .trim()
                .to_string();
            return Frontmatter { data, body };
        }
    }

    Frontmatter {
        data: Mapping::new(),
        body: raw.trim().to_string(),
    }
}

// ============================================================
// Coercion helpers
// ============================================================
//
// Every parser funnels header fields through these so the fallback policy is
// uniform: wrong types coerce where a sensible reading exists, absence yields
// the caller's fallback. None of them can fail.

/// Coerce a YAML scalar to a string. Mappings and sequences are not strings.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn as_string(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(scalar_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Coerce to a string list. A lone scalar becomes a single-element list.
pub fn as_string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).map(|s| vec![s]).unwrap_or_default(),
        None => Vec::new(),
    }
}

pub fn as_u32(value: Option<&Value>, fallback: u32) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().map(|v| v as u32).unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}

pub fn as_bool(value: Option<&Value>, fallback: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => true,
            "false" | "no" => false,
            _ => fallback,
        },
        _ => fallback,
    }
}
