//! Canonical string form of payloads.

use serde_json::{Map, Value};

/// Serialize a payload with object keys sorted at every depth.
///
/// Two payloads that differ only in key order canonicalize to the same
/// string, regardless of whether `serde_json` preserves insertion order.
pub fn canonicalize(payload: &Value) -> String {
    serde_json::to_string(&sorted(payload)).unwrap_or_default()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Group indices of identical canonical strings, in first-seen order.
///
/// Each group lists its member indices in ascending order, so the first
/// element is the group's representative.
pub fn exact_groups(canonicals: &[String]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (index, canonical) in canonicals.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|group| canonicals[group[0]] == *canonical)
        {
            Some(group) => group.push(index),
            None => groups.push(vec![index]),
        }
    }
    groups
}

/// Percentage share of each group, largest first.
pub fn shares(groups: &[Vec<usize>], total: usize) -> Vec<f64> {
    if total == 0 {
        return Vec::new();
    }
    let mut out: Vec<f64> = groups
        .iter()
        .map(|g| g.len() as f64 * 100.0 / total as f64)
        .collect();
    out.sort_by(|a, b| b.total_cmp(a));
    out
}
