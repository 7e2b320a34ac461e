//! Lookups over an issue's raw `fields` JSON.
//!
//! Epic, sprint and story-point values are found by searching the whole
//! tree for the first non-null value under a key.

use crate::domain::model::Issue;
use serde_json::Value;

pub const EMPTY_EPIC: &str = "Others";

/// First non-null value stored under `key` anywhere in `node`.
///
/// A node's own keys are checked before descending; children are then
/// searched depth-first in key order.
pub fn find_value<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => {
            if let Some(found) = map.get(key).filter(|v| !v.is_null()) {
                return Some(found);
            }
            map.values().find_map(|child| find_value(child, key))
        }
        Value::Array(items) => items.iter().find_map(|child| find_value(child, key)),
        _ => None,
    }
}

fn epic(issue: &Issue) -> Option<&Value> {
    find_value(&issue.fields, "epic").filter(|epic| match epic {
        Value::Object(map) => !map.is_empty(),
        _ => false,
    })
}

fn text(node: &Value, key: &str) -> Option<String> {
    match find_value(node, key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `KEY - summary`, whichever half exists, or [`EMPTY_EPIC`].
pub fn epic_label(issue: &Issue) -> String {
    let Some(epic) = epic(issue) else {
        return EMPTY_EPIC.to_string();
    };
    match (text(epic, "key"), text(epic, "summary")) {
        (Some(key), Some(summary)) => format!("{} - {}", key, summary),
        (None, Some(summary)) => summary,
        (Some(key), None) => key,
        (None, None) => EMPTY_EPIC.to_string(),
    }
}

pub fn epic_key(issue: &Issue) -> Option<String> {
    epic(issue).and_then(|epic| text(epic, "key"))
}

pub fn browse_link(server_url: &str, key: &str) -> String {
    format!("{}/browse/{}", server_url.trim_end_matches('/'), key)
}

/// Numeric story points from the configured field; anything unusable counts as zero.
pub fn story_points(issue: &Issue, field: &str) -> f64 {
    match find_value(&issue.fields, field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn is_done(issue: &Issue) -> bool {
    let Some(category) = find_value(&issue.fields, "status")
        .and_then(|status| find_value(status, "statusCategory"))
    else {
        return false;
    };
    let key = category.get("key").and_then(Value::as_str);
    let name = category.get("name").and_then(Value::as_str);
    key == Some("done") || name == Some("Done")
}

fn sprint_id_of(node: &Value) -> Option<u64> {
    match find_value(node, "id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Done, and finished in `sprint_id`: either as its current sprint or, when it
/// has none, as one of its closed sprints.
pub fn is_closed_in_sprint(issue: &Issue, sprint_id: u64) -> bool {
    if !is_done(issue) {
        return false;
    }

    if let Some(current) = find_value(&issue.fields, "sprint").and_then(sprint_id_of) {
        return current == sprint_id;
    }

    match find_value(&issue.fields, "closedSprints") {
        Some(Value::Array(closed)) => closed
            .iter()
            .filter_map(sprint_id_of)
            .any(|id| id == sprint_id),
        _ => false,
    }
}
