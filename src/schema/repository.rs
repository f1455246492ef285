//! Read access to schema pages.

use crate::error::JsonFormsResult;
use crate::wiki::store::PageStore;
use crate::wiki::title::{normalize_key, NamespaceRegistry, Title};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Fetches page text and JSON documents by title.
pub struct SchemaRepository {
    store: Arc<dyn PageStore>,
    namespaces: NamespaceRegistry,
    query_limit: usize,
}

impl SchemaRepository {
    pub fn new(store: Arc<dyn PageStore>, namespaces: NamespaceRegistry, query_limit: usize) -> Self {
        Self {
            store,
            namespaces,
            query_limit,
        }
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Main slot text of a page; `None` for invalid titles, missing pages and
    /// empty content.
    pub fn get_article_content(&self, title_text: &str) -> JsonFormsResult<Option<String>> {
        let title = match Title::new_from_text(title_text, &self.namespaces) {
            Ok(title) => title,
            Err(e) => {
                debug!("Not a valid title '{}': {}", title_text, e);
                return Ok(None);
            }
        };
        self.get_page_content(&title)
    }

    pub fn get_page_content(&self, title: &Title) -> JsonFormsResult<Option<String>> {
        let revision = self.store.latest_revision(title)?;
        Ok(revision
            .as_ref()
            .and_then(|rev| rev.main_text())
            .filter(|text| !text.is_empty())
            .map(str::to_string))
    }

    /// Decoded JSON of a page. `Ok(None)` when there is nothing to decode,
    /// an error when the page holds malformed JSON.
    pub fn get_json_schema(&self, title_text: &str) -> JsonFormsResult<Option<Value>> {
        match self.get_article_content(title_text)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Non-redirect pages of `namespace` whose name starts with `prefix`,
    /// ordered by name and capped at the configured query limit.
    pub fn pages_with_prefix(&self, prefix: Option<&str>, namespace: i32) -> JsonFormsResult<Vec<Title>> {
        let prefix = prefix.map(normalize_key).unwrap_or_default();
        let mut found = Vec::new();

        for title in self.store.list_titles(namespace)? {
            if found.len() >= self.query_limit {
                break;
            }
            if !title.db_key().starts_with(&prefix) {
                continue;
            }
            let is_redirect = self
                .store
                .latest_revision(&title)?
                .map(|rev| rev.is_redirect())
                .unwrap_or(false);
            if !is_redirect {
                found.push(title);
            }
        }

        Ok(found)
    }

    /// Local names of all pages in the namespace called `namespace_name`.
    pub fn page_names_in(&self, namespace_name: &str) -> JsonFormsResult<Vec<String>> {
        let Some((namespace, _)) = self.namespaces.lookup(namespace_name) else {
            return Ok(Vec::new());
        };
        Ok(self
            .pages_with_prefix(None, namespace)?
            .iter()
            .map(Title::text)
            .collect())
    }
}
