//! Page storage: revisions of slot content keyed by title.

use crate::error::{JsonFormsError, JsonFormsResult};
use crate::wiki::slots::MAIN_SLOT;
use crate::wiki::title::Title;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Slot content as stored in a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSlot {
    pub role: String,
    pub model: String,
    pub text: String,
    /// SHA-256 of `text`, hex encoded
    pub sha256: String,
}

impl StoredSlot {
    pub fn new(role: impl Into<String>, model: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let sha256 = hex::encode(Sha256::digest(text.as_bytes()));
        Self {
            role: role.into(),
            model: model.into(),
            text,
            sha256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub slots: Vec<StoredSlot>,
}

impl Revision {
    pub fn slot(&self, role: &str) -> Option<&StoredSlot> {
        self.slots.iter().find(|s| s.role == role)
    }

    pub fn main_text(&self) -> Option<&str> {
        self.slot(MAIN_SLOT).map(|s| s.text.as_str())
    }

    /// Main slot starts with `#REDIRECT`
    pub fn is_redirect(&self) -> bool {
        self.main_text()
            .map(|text| {
                text.trim_start()
                    .get(..9)
                    .map(|head| head.eq_ignore_ascii_case("#redirect"))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }
}

/// A page and its revision history, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPage {
    pub title: Title,
    pub revisions: Vec<Revision>,
}

/// Storage backend for wiki pages.
pub trait PageStore {
    /// Latest revision of a page, `None` if the page does not exist.
    fn latest_revision(&self, title: &Title) -> JsonFormsResult<Option<Revision>>;

    /// Append a revision made of `slots` and return it.
    fn save_revision(&self, title: &Title, slots: Vec<StoredSlot>) -> JsonFormsResult<Revision>;

    /// Titles of all pages in a namespace, ordered by db key.
    fn list_titles(&self, namespace: i32) -> JsonFormsResult<Vec<Title>>;

    /// Remove a page. Returns whether it existed.
    fn delete_page(&self, title: &Title) -> JsonFormsResult<bool>;
}

/// In-memory store used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: Mutex<BTreeMap<String, StoredPage>>,
    next_id: AtomicU64,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> JsonFormsResult<std::sync::MutexGuard<'_, BTreeMap<String, StoredPage>>> {
        self.pages
            .lock()
            .map_err(|_| JsonFormsError::Storage("Failed to acquire page store lock".to_string()))
    }
}

impl PageStore for MemoryPageStore {
    fn latest_revision(&self, title: &Title) -> JsonFormsResult<Option<Revision>> {
        let pages = self.lock()?;
        Ok(pages
            .get(&title.storage_key())
            .and_then(|page| page.revisions.last().cloned()))
    }

    fn save_revision(&self, title: &Title, slots: Vec<StoredSlot>) -> JsonFormsResult<Revision> {
        let revision = Revision {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp: Utc::now(),
            slots,
        };

        let mut pages = self.lock()?;
        pages
            .entry(title.storage_key())
            .or_insert_with(|| StoredPage {
                title: title.clone(),
                revisions: Vec::new(),
            })
            .revisions
            .push(revision.clone());

        Ok(revision)
    }

    fn list_titles(&self, namespace: i32) -> JsonFormsResult<Vec<Title>> {
        let pages = self.lock()?;
        let mut titles: Vec<Title> = pages
            .values()
            .filter(|page| page.title.namespace() == namespace)
            .map(|page| page.title.clone())
            .collect();
        titles.sort_by(|a, b| a.db_key().cmp(b.db_key()));
        Ok(titles)
    }

    fn delete_page(&self, title: &Title) -> JsonFormsResult<bool> {
        let mut pages = self.lock()?;
        Ok(pages.remove(&title.storage_key()).is_some())
    }
}

/// Persistent store backed by a sled tree of JSON-encoded pages.
#[derive(Clone)]
pub struct SledPageStore {
    db: sled::Db,
    pages_tree: sled::Tree,
}

impl SledPageStore {
    pub fn new(db: sled::Db) -> JsonFormsResult<Self> {
        let pages_tree = db.open_tree("pages")?;
        Ok(Self { db, pages_tree })
    }

    /// Open (or create) the database at `path`.
    pub fn open(path: &std::path::Path) -> JsonFormsResult<Self> {
        let db = sled::open(path)?;
        Self::new(db)
    }

    fn get_page(&self, key: &str) -> JsonFormsResult<Option<StoredPage>> {
        match self.pages_tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_page(&self, key: &str, page: &StoredPage) -> JsonFormsResult<()> {
        let bytes = serde_json::to_vec(page)?;
        self.pages_tree.insert(key.as_bytes(), bytes)?;
        // Ensure the data is durably written to disk
        self.pages_tree.flush()?;
        Ok(())
    }
}

impl PageStore for SledPageStore {
    fn latest_revision(&self, title: &Title) -> JsonFormsResult<Option<Revision>> {
        Ok(self
            .get_page(&title.storage_key())?
            .and_then(|mut page| page.revisions.pop()))
    }

    fn save_revision(&self, title: &Title, slots: Vec<StoredSlot>) -> JsonFormsResult<Revision> {
        let key = title.storage_key();
        let mut page = self.get_page(&key)?.unwrap_or_else(|| StoredPage {
            title: title.clone(),
            revisions: Vec::new(),
        });

        let revision = Revision {
            id: self.db.generate_id()? + 1,
            timestamp: Utc::now(),
            slots,
        };
        page.revisions.push(revision.clone());
        self.put_page(&key, &page)?;

        Ok(revision)
    }

    fn list_titles(&self, namespace: i32) -> JsonFormsResult<Vec<Title>> {
        let prefix = format!("{}:", namespace);
        let mut titles = Vec::new();
        for result in self.pages_tree.scan_prefix(prefix.as_bytes()) {
            let (_, value) = result?;
            let page: StoredPage = serde_json::from_slice(&value)?;
            titles.push(page.title);
        }
        titles.sort_by(|a, b| a.db_key().cmp(b.db_key()));
        Ok(titles)
    }

    fn delete_page(&self, title: &Title) -> JsonFormsResult<bool> {
        let existed = self
            .pages_tree
            .remove(title.storage_key().as_bytes())?
            .is_some();
        self.pages_tree.flush()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JsonFormsConfig;
    use crate::wiki::title::NamespaceRegistry;
    use tempfile::TempDir;

    fn title(text: &str) -> Title {
        Title::new_from_text(text, &NamespaceRegistry::from(&JsonFormsConfig::default())).unwrap()
    }

    fn exercise_store(store: &dyn PageStore) {
        let schema = title("JsonSchema:Person");
        assert!(store.latest_revision(&schema).unwrap().is_none());

        let first = store
            .save_revision(&schema, vec![StoredSlot::new("main", "json", "{}")])
            .unwrap();
        let second = store
            .save_revision(&schema, vec![StoredSlot::new("main", "json", "{\"a\":1}")])
            .unwrap();
        assert!(second.id > first.id);

        let latest = store.latest_revision(&schema).unwrap().unwrap();
        assert_eq!(latest.main_text(), Some("{\"a\":1}"));

        store
            .save_revision(&title("JsonSchema:Address"), vec![StoredSlot::new("main", "json", "{}")])
            .unwrap();
        store
            .save_revision(&title("Help:Address"), vec![StoredSlot::new("main", "wikitext", "")])
            .unwrap();

        let names: Vec<String> = store
            .list_titles(2100)
            .unwrap()
            .iter()
            .map(|t| t.db_key().to_string())
            .collect();
        assert_eq!(names, vec!["Address", "Person"]);

        assert!(store.delete_page(&schema).unwrap());
        assert!(!store.delete_page(&schema).unwrap());
        assert!(store.latest_revision(&schema).unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        exercise_store(&MemoryPageStore::new());
    }

    #[test]
    fn test_sled_store() {
        let temp_dir = TempDir::new().unwrap();
        let db = sled::Config::new()
            .path(temp_dir.path())
            .temporary(true)
            .open()
            .unwrap();
        exercise_store(&SledPageStore::new(db).unwrap());
    }

    #[test]
    fn test_slot_digest() {
        let slot = StoredSlot::new("main", "wikitext", "");
        assert_eq!(
            slot.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_redirect_detection() {
        let redirect = Revision {
            id: 1,
            timestamp: Utc::now(),
            slots: vec![StoredSlot::new("main", "wikitext", "#redirect [[Foo]]")],
        };
        assert!(redirect.is_redirect());

        let plain = Revision {
            id: 2,
            timestamp: Utc::now(),
            slots: vec![StoredSlot::new("main", "wikitext", "#RED")],
        };
        assert!(!plain.is_redirect());
    }
}
