//! `$ref` rewriting for JSON Schema documents.
//!
//! Imported schemas point at each other with paths relative to the import
//! tree (`"$ref": "../Address/street.json"`). Once the import knows which page
//! every file becomes, those paths are swapped for the pages' raw-fetch URLs.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key whose string value names another schema document
pub const REF_KEY: &str = "$ref";

const PARENT_DIR_MARKER: &str = "../";

/// Import-relative path -> resolved target (a fetchable URL).
///
/// Keys are stored normalized, so `../foo/bar.json` and `foo/bar.json` hit
/// the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMapping {
    entries: BTreeMap<String, String>,
}

impl ReferenceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning the target it replaced, if any.
    pub fn insert(&mut self, path: &str, target: impl Into<String>) -> Option<String> {
        self.entries.insert(normalize_reference(path), target.into())
    }

    /// Target for a `$ref` value, after normalization. Empty values never match.
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let normalized = normalize_reference(reference);
        if normalized.is_empty() {
            return None;
        }
        self.entries.get(&normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ReferenceMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (path, target) in iter {
            mapping.insert(path.as_ref(), target);
        }
        mapping
    }
}

/// Strip every `../` from a reference.
pub fn normalize_reference(reference: &str) -> String {
    reference.replace(PARENT_DIR_MARKER, "")
}

/// Rewrite every string `$ref` in `tree` found in `mapping`.
///
/// Each level is rebuilt from its children, so replacing a value can never
/// change which nodes get visited. Containers keep their shape and key
/// order; only matched `$ref` strings differ from the input.
pub fn rewrite_references(tree: Value, mapping: &ReferenceMapping) -> Value {
    match tree {
        Value::Object(map) => Value::Object(rewrite_object(map, mapping)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rewrite_references(item, mapping))
                .collect(),
        ),
        scalar => scalar,
    }
}

fn rewrite_object(map: Map<String, Value>, mapping: &ReferenceMapping) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(reference) if key == REF_KEY => match mapping.resolve(&reference) {
                    Some(target) => Value::String(target.to_string()),
                    None => Value::String(reference),
                },
                other => rewrite_references(other, mapping),
            };
            (key, value)
        })
        .collect()
}

/// All string `$ref` values in pre-order (parents before children).
pub fn collect_references(tree: &Value) -> Vec<&str> {
    let mut found = Vec::new();
    collect_into(tree, &mut found);
    found
}

fn collect_into<'a>(node: &'a Value, found: &mut Vec<&'a str>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::String(reference) if key == REF_KEY => found.push(reference),
                    other => collect_into(other, found),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, found);
            }
        }
        _ => {}
    }
}

/// `$ref` values that `mapping` cannot resolve.
pub fn unresolved_references<'a>(tree: &'a Value, mapping: &ReferenceMapping) -> Vec<&'a str> {
    collect_references(tree)
        .into_iter()
        .filter(|reference| mapping.resolve(reference).is_none())
        .collect()
}
