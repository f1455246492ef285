//! File name grammar: `base.slotSpec[.contentModel]`.

use crate::wiki::content_model::ContentModelRegistry;
use crate::wiki::slots::MAIN_SLOT;
use std::path::Path;

const SLOT_PREFIX: &str = "slot_";

/// What a file name says about the slot it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassification {
    pub role: String,
    /// May be empty: the page writer picks a model then
    pub model: String,
}

/// Map file extensions onto the content model they stand for.
pub fn alias_content_model(model: &str) -> &str {
    match model {
        "lua" => "Scribunto",
        other => other,
    }
}

/// Slot role named by a slot spec: `slot_infobox` is `infobox`, anything
/// else (including `schema`) is the main slot.
pub fn slot_role(slot_spec: &str) -> Option<&str> {
    match slot_spec.strip_prefix(SLOT_PREFIX) {
        Some("") => None,
        Some(role) => Some(role),
        None => Some(MAIN_SLOT),
    }
}

/// Classify a file name. `None` when the name has no slot spec (a single
/// dot-part) or names an empty slot role.
pub fn classify(filename: &str, models: &ContentModelRegistry) -> Option<FileClassification> {
    let parts: Vec<&str> = filename.splitn(3, '.').collect();
    if parts.len() < 2 {
        return None;
    }

    let slot_spec = parts[1];
    let mut model = alias_content_model(parts.get(2).copied().unwrap_or("")).to_string();

    if model.is_empty() {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let ext = alias_content_model(&ext);
        if models.is_known(ext) {
            model = ext.to_string();
        }
    }

    let role = slot_role(slot_spec)?;

    Some(FileClassification {
        role: role.to_string(),
        model,
    })
}
