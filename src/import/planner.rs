//! Turning a directory tree into page import records.
//!
//! Planning runs in two phases. The scan walks the tree, classifies every
//! file, groups slots by page and fills the [`ReferenceMapping`]. The rewrite
//! phase only starts once the scan is over, so every `$ref` is resolved
//! against the complete mapping.

use crate::config::JsonFormsConfig;
use crate::error::{JsonFormsError, JsonFormsResult};
use crate::import::filename::classify;
use crate::import::page_name::{derive_page_name, mapping_key};
use crate::import::report::{ImportError, ImportErrorKind};
use crate::schema::encoder::SafeJsonEncoder;
use crate::schema::references::{rewrite_references, unresolved_references, ReferenceMapping};
use crate::wiki::content_model::{ContentModelRegistry, CONTENT_MODEL_JSON};
use crate::wiki::slots::SlotRecord;
use crate::wiki::title::{NamespaceRegistry, Title};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::Value;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// A page title with the slots to write to it, main slot first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub title: Title,
    pub slots: Vec<SlotRecord>,
}

impl ImportRecord {
    pub fn slot(&self, role: &str) -> Option<&SlotRecord> {
        self.slots.iter().find(|s| s.role == role)
    }
}

/// Everything the write phase needs.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub records: Vec<ImportRecord>,
    pub mapping: ReferenceMapping,
    pub errors: Vec<ImportError>,
    /// Files turned into slots
    pub files_found: usize,
}

/// A slot together with the file it came from.
struct ScannedSlot {
    source: String,
    slot: SlotRecord,
}

struct PageGroup {
    title: Title,
    slots: Vec<ScannedSlot>,
}

pub struct ImportPlanner {
    namespaces: NamespaceRegistry,
    models: ContentModelRegistry,
    script_path: String,
    encoder: SafeJsonEncoder,
}

impl ImportPlanner {
    pub fn new(config: &JsonFormsConfig) -> Self {
        Self {
            namespaces: NamespaceRegistry::from(config),
            models: ContentModelRegistry::from(config),
            script_path: config.script_path.clone(),
            encoder: config
                .key_orders
                .iter()
                .fold(SafeJsonEncoder::new(), |encoder, (pointer, keys)| {
                    encoder.with_key_order(pointer, keys.iter().cloned())
                }),
        }
    }

    /// Scan `root`, then rewrite the JSON slots against the finished mapping.
    ///
    /// Fails only when `root` is not a readable directory; per-file problems
    /// end up in [`ImportPlan::errors`].
    pub fn plan(&self, root: &Path) -> JsonFormsResult<ImportPlan> {
        if !root.is_dir() {
            return Err(JsonFormsError::NotFound(format!(
                "import directory {}",
                root.display()
            )));
        }

        let mut plan = ImportPlan::default();
        let groups = self.scan(root, &mut plan);

        for (_, group) in groups {
            let mut slots = Vec::with_capacity(group.slots.len() + 1);
            for scanned in group.slots {
                let mut slot = scanned.slot;
                if slot.model == CONTENT_MODEL_JSON {
                    slot.text =
                        self.rewrite_json_slot(&scanned.source, slot.text, &plan.mapping, &mut plan.errors);
                }
                slots.push(slot);
            }
            if !slots.iter().any(SlotRecord::is_main) {
                slots.insert(0, SlotRecord::empty_main());
            }
            plan.records.push(ImportRecord {
                title: group.title,
                slots,
            });
        }

        Ok(plan)
    }

    fn scan(&self, root: &Path, plan: &mut ImportPlan) -> IndexMap<String, PageGroup> {
        let mut groups: IndexMap<String, PageGroup> = IndexMap::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let context = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!("Cannot read {}: {}", context, e);
                    plan.errors
                        .push(ImportError::new(context, ImportErrorKind::Read(e.to_string())));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(scanned) = self.scan_file(root, &entry, plan) {
                plan.files_found += 1;
                let (title, slot) = scanned;
                let group = groups
                    .entry(title.prefixed_db_key())
                    .or_insert_with(|| PageGroup {
                        title,
                        slots: Vec::new(),
                    });
                match group.slots.iter_mut().find(|s| s.slot.role == slot.slot.role) {
                    Some(existing) => {
                        warn!(
                            "{} and {} both fill slot '{}' of {}; keeping {}",
                            existing.source, slot.source, slot.slot.role, group.title, slot.source
                        );
                        *existing = slot;
                    }
                    None => group.slots.push(slot),
                }
            }
        }

        groups
    }

    fn scan_file(
        &self,
        root: &Path,
        entry: &DirEntry,
        plan: &mut ImportPlan,
    ) -> Option<(Title, ScannedSlot)> {
        let path = entry.path();
        let relative_dir = relative_dir(root, path);
        let Some(filename) = entry.file_name().to_str() else {
            plan.errors.push(ImportError::new(
                path.display().to_string(),
                ImportErrorKind::ClassificationSkip("file name is not valid UTF-8".to_string()),
            ));
            return None;
        };
        let source = mapping_key(&relative_dir, filename);

        let page_name = derive_page_name(&relative_dir, filename);
        let title = match Title::new_from_text(&page_name, &self.namespaces) {
            Ok(title) => title,
            Err(e) => {
                warn!("Skipping file: {} (no valid page name: {})", source, e);
                plan.errors.push(ImportError::new(
                    source,
                    ImportErrorKind::UnresolvedTitle(e.to_string()),
                ));
                return None;
            }
        };

        let Some(class) = classify(filename, &self.models) else {
            warn!("Skipping file: {} (name does not match base.slot[.model])", source);
            plan.errors.push(ImportError::new(
                source,
                ImportErrorKind::ClassificationSkip(format!(
                    "'{}' does not match base.slot[.model]",
                    filename
                )),
            ));
            return None;
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping file: {} ({})", source, e);
                plan.errors
                    .push(ImportError::new(source, ImportErrorKind::Read(e.to_string())));
                return None;
            }
        };

        info!(
            "Found file: {} -> Page: {}, Slot: {}",
            source, title, class.role
        );
        plan.mapping
            .insert(&source, title.local_url(&self.script_path, "raw"));

        Some((
            title,
            ScannedSlot {
                source,
                slot: SlotRecord::new(class.role, class.model, text),
            },
        ))
    }

    /// Rewrite the `$ref`s of one JSON slot. On any failure the original text
    /// is returned and the problem recorded.
    fn rewrite_json_slot(
        &self,
        source: &str,
        text: String,
        mapping: &ReferenceMapping,
        errors: &mut Vec<ImportError>,
    ) -> String {
        let schema: Value = match serde_json::from_str(&text) {
            Ok(schema) => schema,
            Err(e) => {
                warn!("Cannot decode {}: {}", source, e);
                errors.push(ImportError::new(source, ImportErrorKind::Decode(e.to_string())));
                return text;
            }
        };

        for reference in unresolved_references(&schema, mapping) {
            debug!("{}: $ref '{}' does not point into the import", source, reference);
        }

        let rewritten = rewrite_references(schema, mapping);
        match self.encoder.encode(&rewritten) {
            Ok(encoded) => {
                for warning in encoded.warnings {
                    warn!("(SafeJsonEncoder) {}: {}", source, warning);
                    errors.push(ImportError::new(source, ImportErrorKind::Ordering(warning)));
                }
                encoded.text
            }
            Err(e) => {
                errors.push(ImportError::new(source, ImportErrorKind::Encode(e.to_string())));
                text
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Directory of `path` relative to `root`, segments joined with `/`.
fn relative_dir(root: &Path, path: &Path) -> String {
    path.parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}
