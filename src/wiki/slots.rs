//! Slot records and the slot-role registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role of the primary slot every page owns
pub const MAIN_SLOT: &str = "main";

/// One content slot to be written to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Slot name, unique within a page
    pub role: String,
    /// Content model id; empty means "let the writer decide"
    pub model: String,
    /// Raw content
    pub text: String,
}

impl SlotRecord {
    pub fn new(role: impl Into<String>, model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            model: model.into(),
            text: text.into(),
        }
    }

    /// Empty wikitext main slot
    pub fn empty_main() -> Self {
        Self::new(MAIN_SLOT, crate::wiki::content_model::CONTENT_MODEL_WIKITEXT, "")
    }

    pub fn is_main(&self) -> bool {
        self.role == MAIN_SLOT
    }
}

/// Registered slot roles and the model each defaults to.
#[derive(Debug, Clone, Default)]
pub struct SlotRoleRegistry {
    roles: BTreeMap<String, String>,
}

impl SlotRoleRegistry {
    pub fn new<I, R, M>(roles: I) -> Self
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        Self {
            roles: roles
                .into_iter()
                .map(|(role, model)| (role.into(), model.into()))
                .collect(),
        }
    }

    pub fn default_model(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(String::as_str)
    }
}

impl From<&crate::config::JsonFormsConfig> for SlotRoleRegistry {
    fn from(config: &crate::config::JsonFormsConfig) -> Self {
        Self::new(config.slot_roles.clone())
    }
}
