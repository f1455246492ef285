//! Shared fixtures for the integration tests
//!
//! Builds a small page-source tree on disk and a temporary sled-backed page
//! store to import it into.

#![allow(dead_code)]

use jsonforms::wiki::SledPageStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Write `contents` to `rel` under `root`, creating directories as needed.
pub fn write_source(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent"))
        .expect("create fixture directory");
    fs::write(path, contents).expect("write fixture file");
}

/// Page sources covering schemas, a form descriptor, a multi-slot page and
/// a Lua module.
pub fn write_fixture_tree(root: &Path) {
    write_source(
        root,
        "JsonSchema/person.json",
        r#"{
    "title": "Person",
    "type": "object",
    "properties": {
        "name": {"type": "string"},
        "address": {"$ref": "../JsonSchema/address.json"}
    }
}"#,
    );
    write_source(
        root,
        "JsonSchema/address.json",
        r#"{"type": "object", "properties": {"street": {"type": "string"}}}"#,
    );
    write_source(root, "JsonSchema/MetaSchema.json", r#"{"$id": "meta"}"#);
    write_source(root, "JsonForm/contact.json", r#"{"schema": "Person"}"#);
    write_source(root, "JsonForm/create-article.json", r#"{"edit_wikitext": true}"#);
    write_source(root, "Template/card.wikitext", "{{{title}}}");
    write_source(
        root,
        "Template/card.slot_data.json",
        r#"{"fields": {"$ref": "../JsonSchema/person.json"}}"#,
    );
    write_source(root, "Module/format.lua", "return {}");
}

/// A sled-backed page store living in its own temporary directory.
pub struct TempStore {
    pub store: Arc<SledPageStore>,
    pub _temp_dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let db = sled::Config::new()
            .path(temp_dir.path())
            .temporary(true)
            .open()
            .expect("open temporary sled database");
        let store = Arc::new(SledPageStore::new(db).expect("create page store"));
        Self {
            store,
            _temp_dir: temp_dir,
        }
    }
}
