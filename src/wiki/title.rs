//! Page titles and the namespace registry.

use crate::error::{JsonFormsError, JsonFormsResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the main (unprefixed) namespace
pub const NS_MAIN: i32 = 0;

const MAX_TITLE_BYTES: usize = 255;

static ILLEGAL_TITLE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#<>\[\]|{}\x00-\x1f\x7f]").expect("static regex"));

/// Namespace name -> id lookup. Names match case-insensitively and treat
/// spaces and underscores alike.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    by_name: BTreeMap<String, (i32, String)>,
}

impl NamespaceRegistry {
    pub fn new(namespaces: &BTreeMap<String, i32>) -> Self {
        let mut by_name = BTreeMap::new();

        for (name, id) in namespaces {
            let canonical = normalize_key(name);
            if canonical.is_empty() || *id == NS_MAIN {
                continue;
            }
            by_name.insert(canonical.to_lowercase(), (*id, canonical));
        }

        Self { by_name }
    }

    /// Resolve a namespace name to its id and canonical name.
    pub fn lookup(&self, name: &str) -> Option<(i32, &str)> {
        self.by_name
            .get(&normalize_key(name).to_lowercase())
            .map(|(id, canonical)| (*id, canonical.as_str()))
    }
}

impl From<&crate::config::JsonFormsConfig> for NamespaceRegistry {
    fn from(config: &crate::config::JsonFormsConfig) -> Self {
        Self::new(&config.namespaces)
    }
}

/// A validated page title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Title {
    namespace: i32,
    namespace_name: String,
    db_key: String,
}

impl Title {
    /// Parse user-facing title text such as `JsonSchema:Foo bar`.
    ///
    /// An unregistered prefix is not a namespace: `Foo:Bar` lives in the main
    /// namespace with that full text. A leading `:` forces the main namespace.
    pub fn new_from_text(text: &str, namespaces: &NamespaceRegistry) -> JsonFormsResult<Self> {
        let normalized = normalize_key(text);
        let normalized = normalized.strip_prefix(':').unwrap_or(&normalized);

        let (namespace, namespace_name, local) = match normalized.split_once(':') {
            Some((prefix, rest)) => match namespaces.lookup(prefix) {
                Some((id, canonical)) => (id, canonical.to_string(), rest.trim_start_matches('_')),
                None => (NS_MAIN, String::new(), normalized),
            },
            None => (NS_MAIN, String::new(), normalized),
        };

        validate_local_name(text, local)?;

        Ok(Self {
            namespace,
            namespace_name,
            db_key: capitalize_first(local),
        })
    }

    pub fn namespace(&self) -> i32 {
        self.namespace
    }

    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    /// Local name with underscores, e.g. `Foo_bar`
    pub fn db_key(&self) -> &str {
        &self.db_key
    }

    /// Local name with spaces, e.g. `Foo bar`
    pub fn text(&self) -> String {
        self.db_key.replace('_', " ")
    }

    pub fn prefixed_db_key(&self) -> String {
        if self.namespace_name.is_empty() {
            self.db_key.clone()
        } else {
            format!("{}:{}", self.namespace_name, self.db_key)
        }
    }

    pub fn prefixed_text(&self) -> String {
        self.prefixed_db_key().replace('_', " ")
    }

    /// Key used by page stores: `{namespace id}:{db key}`
    pub fn storage_key(&self) -> String {
        format!("{}:{}", self.namespace, self.db_key)
    }

    /// Local URL running `action` on this page, e.g.
    /// `/index.php?title=JsonSchema:Foo&action=raw`.
    pub fn local_url(&self, script_path: &str, action: &str) -> String {
        format!(
            "{}?title={}&action={}",
            script_path,
            wiki_urlencode(&self.prefixed_db_key()),
            wiki_urlencode(action)
        )
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefixed_text())
    }
}

/// Trim, turn spaces into underscores and collapse underscore runs.
pub fn normalize_key(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        let c = if c == ' ' { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

fn validate_local_name(original: &str, local: &str) -> JsonFormsResult<()> {
    if local.is_empty() {
        return Err(JsonFormsError::Title(format!("'{}' has an empty page name", original)));
    }
    if ILLEGAL_TITLE_CHARS.is_match(local) {
        return Err(JsonFormsError::Title(format!(
            "'{}' contains illegal characters",
            original
        )));
    }
    if local.len() > MAX_TITLE_BYTES {
        return Err(JsonFormsError::Title(format!(
            "'{}' is longer than {} bytes",
            original, MAX_TITLE_BYTES
        )));
    }
    if local.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(JsonFormsError::Title(format!(
            "'{}' contains a relative path segment",
            original
        )));
    }
    Ok(())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Form-urlencode, leaving `:` and `/` readable as wiki URLs do.
fn wiki_urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace("%3A", ":")
        .replace("%2F", "/")
}
