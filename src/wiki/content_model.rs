//! Content models and the rule chain that picks one for a slot.
//!
//! A slot written to a page gets its model from the first rule in
//! [`ModelResolver::rules`] that yields one. The default chain is
//! explicit model -> role default -> prior revision -> wikitext.

use crate::wiki::slots::SlotRoleRegistry;
use crate::wiki::store::Revision;
use std::collections::BTreeSet;

pub const CONTENT_MODEL_WIKITEXT: &str = "wikitext";
pub const CONTENT_MODEL_JSON: &str = "json";

/// Set of recognized content model ids.
#[derive(Debug, Clone, Default)]
pub struct ContentModelRegistry {
    models: BTreeSet<String>,
}

impl ContentModelRegistry {
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_known(&self, model: &str) -> bool {
        self.models.contains(model)
    }
}

impl From<&crate::config::JsonFormsConfig> for ContentModelRegistry {
    fn from(config: &crate::config::JsonFormsConfig) -> Self {
        Self::new(config.content_models.iter().cloned())
    }
}

/// What is known about a slot when its model is chosen.
#[derive(Debug, Clone, Copy)]
pub struct ModelContext<'a> {
    pub role: &'a str,
    /// Model named by the caller, possibly empty
    pub explicit: &'a str,
    /// Latest stored revision of the page, if any
    pub prior: Option<&'a Revision>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRule {
    /// The caller's model, if it is recognized
    Explicit,
    /// The default model registered for the slot role
    RoleDefault,
    /// The model the same role had in the prior revision
    PriorRevision,
    /// Plain wikitext
    Fallback,
}

impl ModelRule {
    fn apply(
        &self,
        ctx: &ModelContext<'_>,
        models: &ContentModelRegistry,
        roles: &SlotRoleRegistry,
    ) -> Option<String> {
        match self {
            ModelRule::Explicit => {
                (!ctx.explicit.is_empty() && models.is_known(ctx.explicit))
                    .then(|| ctx.explicit.to_string())
            }
            ModelRule::RoleDefault => roles.default_model(ctx.role).map(str::to_string),
            ModelRule::PriorRevision => ctx
                .prior
                .and_then(|rev| rev.slot(ctx.role))
                .map(|slot| slot.model.clone()),
            ModelRule::Fallback => Some(CONTENT_MODEL_WIKITEXT.to_string()),
        }
    }
}

/// Ordered rule list resolving a slot's content model.
#[derive(Debug, Clone)]
pub struct ModelResolver {
    rules: Vec<ModelRule>,
    models: ContentModelRegistry,
    roles: SlotRoleRegistry,
}

impl ModelResolver {
    pub fn new(models: ContentModelRegistry, roles: SlotRoleRegistry) -> Self {
        Self::with_rules(
            vec![
                ModelRule::Explicit,
                ModelRule::RoleDefault,
                ModelRule::PriorRevision,
                ModelRule::Fallback,
            ],
            models,
            roles,
        )
    }

    pub fn with_rules(
        rules: Vec<ModelRule>,
        models: ContentModelRegistry,
        roles: SlotRoleRegistry,
    ) -> Self {
        Self {
            rules,
            models,
            roles,
        }
    }

    /// First model produced by the rule chain, or `None` when no rule applies.
    pub fn resolve(&self, ctx: &ModelContext<'_>) -> Option<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(ctx, &self.models, &self.roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::store::StoredSlot;
    use chrono::Utc;

    fn resolver() -> ModelResolver {
        let models = ContentModelRegistry::new(["wikitext", "json", "Scribunto"]);
        let roles = SlotRoleRegistry::new([("main", "wikitext"), ("jsonschema", "json")]);
        ModelResolver::new(models, roles)
    }

    fn prior_with(role: &str, model: &str) -> Revision {
        Revision {
            id: 1,
            timestamp: Utc::now(),
            slots: vec![StoredSlot::new(role, model, "x")],
        }
    }

    #[test]
    fn test_explicit_recognized_model_wins() {
        let ctx = ModelContext {
            role: "main",
            explicit: "json",
            prior: None,
        };
        assert_eq!(resolver().resolve(&ctx).as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_explicit_falls_to_role_default() {
        let ctx = ModelContext {
            role: "jsonschema",
            explicit: "yaml",
            prior: None,
        };
        assert_eq!(resolver().resolve(&ctx).as_deref(), Some("json"));
    }

    #[test]
    fn test_prior_revision_before_fallback() {
        let prior = prior_with("infobox", "Scribunto");
        let ctx = ModelContext {
            role: "infobox",
            explicit: "",
            prior: Some(&prior),
        };
        assert_eq!(resolver().resolve(&ctx).as_deref(), Some("Scribunto"));
    }

    #[test]
    fn test_fallback_is_wikitext() {
        let ctx = ModelContext {
            role: "infobox",
            explicit: "",
            prior: None,
        };
        assert_eq!(resolver().resolve(&ctx).as_deref(), Some("wikitext"));
    }

    #[test]
    fn test_chain_without_fallback_can_fail() {
        let strict = ModelResolver::with_rules(
            vec![ModelRule::Explicit, ModelRule::RoleDefault],
            ContentModelRegistry::new(["wikitext", "json", "Scribunto"]),
            SlotRoleRegistry::new([("main", "wikitext")]),
        );
        let ctx = ModelContext {
            role: "infobox",
            explicit: "",
            prior: None,
        };
        assert_eq!(strict.resolve(&ctx), None);
    }
}
