use serde_yaml::Value;

use crate::models::{Artifact, KeyLink, MustHaves, Plan, PlanStatus};
use crate::parsers::extract::tagged_section;
use crate::parsers::frontmatter::{as_bool, as_string, as_string_array, as_u32, split_frontmatter};

/// Parse a `<phase>-<plan>-PLAN.md` file.
///
/// Header fields come from YAML frontmatter; the objective, context and tasks
/// sections are tagged (`<objective>...</objective>`) in the body. An
/// unmatched tag yields `None` for that section only.
///
/// The returned status is always `Planned`; completion is derived later by
/// the phase assembler from the existence of a matching summary.
pub fn parse_plan(raw: &str, file_name: &str, file_path: &str) -> Plan {
    let fm = split_frontmatter(raw);
    let data = &fm.data;

    let must_haves = match data.get("must_haves") {
        Some(Value::Mapping(map)) => MustHaves {
            truths: as_string_array(map.get("truths")),
            artifacts: parse_artifacts(map.get("artifacts")),
            key_links: parse_key_links(map.get("key_links")),
        },
        _ => MustHaves::default(),
    };

    let objective = tagged_section(&fm.body, "objective");
    let context =
        tagged_section(&fm.body, "context").or_else(|| tagged_section(&fm.body, "execution_context"));
    let tasks = tagged_section(&fm.body, "tasks");

    Plan {
        phase: as_string(data.get("phase"), ""),
        plan_number: as_u32(data.get("plan"), 0),
        file_name: file_name.to_string(),
        file_path: file_path.to_string(),
        plan_type: as_string(data.get("type"), "execute"),
        wave: as_u32(data.get("wave"), 1),
        depends_on: as_string_array(data.get("depends_on")),
        files_modified: as_string_array(data.get("files_modified")),
        autonomous: as_bool(data.get("autonomous"), false),
        requirements: as_string_array(data.get("requirements")),
        must_haves,
        objective,
        context,
        tasks,
        status: PlanStatus::Planned,
        summary: None,
    }
}

fn parse_artifacts(value: Option<&Value>) -> Vec<Artifact> {
    let Some(Value::Sequence(seq)) = value else {
        return Vec::new();
    };
    seq.iter()
        .filter_map(|item| match item {
            Value::Mapping(map) => Some(Artifact {
                path: as_string(map.get("path"), ""),
                provides: as_string(map.get("provides"), ""),
                contains: map
                    .get("contains")
                    .map(|v| as_string(Some(v), ""))
                    .filter(|s| !s.is_empty()),
                exports: as_string_array(map.get("exports")),
            }),
            _ => None,
        })
        .collect()
}

fn parse_key_links(value: Option<&Value>) -> Vec<KeyLink> {
    let Some(Value::Sequence(seq)) = value else {
        return Vec::new();
    };
    seq.iter()
        .filter_map(|item| match item {
            Value::Mapping(map) => Some(KeyLink {
                from: as_string(map.get("from"), ""),
                to: as_string(map.get("to"), ""),
                via: as_string(map.get("via"), ""),
                pattern: as_string(map.get("pattern"), ""),
            }),
            _ => None,
        })
        .collect()
}
