//! Writing a set of slots to a page as one revision.

use crate::error::JsonFormsResult;
use crate::wiki::content_model::{ModelContext, ModelResolver};
use crate::wiki::slots::{SlotRecord, MAIN_SLOT};
use crate::wiki::store::{PageStore, Revision, StoredSlot};
use crate::wiki::title::Title;
use indexmap::IndexMap;
use log::{debug, warn};
use std::sync::Arc;

/// Result of a successful page write.
#[derive(Debug, Clone)]
pub struct RevisionOutcome {
    pub revision: Revision,
    /// Slots that were dropped, with the reason
    pub warnings: Vec<String>,
}

/// Creates or updates pages from [`SlotRecord`]s.
pub struct RevisionImporter {
    store: Arc<dyn PageStore>,
    resolver: ModelResolver,
}

impl RevisionImporter {
    pub fn new(store: Arc<dyn PageStore>, resolver: ModelResolver) -> Self {
        Self { store, resolver }
    }

    /// Save `slots` as a single new revision of `title`.
    ///
    /// A role given twice keeps its first position and its last content. A
    /// page without a main slot gets an empty wikitext one, placed first.
    /// Secondary slots with empty text are not written.
    pub fn import_revision(
        &self,
        title: &Title,
        slots: &[SlotRecord],
    ) -> JsonFormsResult<RevisionOutcome> {
        let synthesized_main = SlotRecord::empty_main();
        let mut by_role: IndexMap<&str, &SlotRecord> = IndexMap::new();
        for slot in slots {
            by_role.insert(slot.role.as_str(), slot);
        }

        if !by_role.contains_key(MAIN_SLOT) {
            by_role.shift_insert(0, MAIN_SLOT, &synthesized_main);
        }

        let prior = self.store.latest_revision(title)?;
        let mut warnings = Vec::new();
        let mut stored = Vec::with_capacity(by_role.len());

        for (role, slot) in by_role {
            if slot.text.is_empty() && role != MAIN_SLOT {
                debug!("Skipping empty slot '{}' of {}", role, title);
                continue;
            }

            let ctx = ModelContext {
                role,
                explicit: &slot.model,
                prior: prior.as_ref(),
            };
            match self.resolver.resolve(&ctx) {
                Some(model) => stored.push(StoredSlot::new(role, model, slot.text.clone())),
                None => {
                    let msg = format!("cannot determine content model for role {}", role);
                    warn!("{} ({})", msg, title);
                    warnings.push(msg);
                }
            }
        }

        let revision = self.store.save_revision(title, stored)?;
        Ok(RevisionOutcome { revision, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JsonFormsConfig;
    use crate::wiki::content_model::{ContentModelRegistry, ModelRule};
    use crate::wiki::slots::SlotRoleRegistry;
    use crate::wiki::store::MemoryPageStore;
    use crate::wiki::title::NamespaceRegistry;

    fn setup() -> (Arc<MemoryPageStore>, RevisionImporter, NamespaceRegistry) {
        let config = JsonFormsConfig::default();
        let store = Arc::new(MemoryPageStore::new());
        let resolver = ModelResolver::new(
            ContentModelRegistry::from(&config),
            SlotRoleRegistry::from(&config),
        );
        let importer = RevisionImporter::new(store.clone(), resolver);
        (store, importer, NamespaceRegistry::from(&config))
    }

    #[test]
    fn test_main_slot_synthesized_first() {
        let (_, importer, ns) = setup();
        let title = Title::new_from_text("Category:Foo/Intro", &ns).unwrap();

        let outcome = importer
            .import_revision(&title, &[SlotRecord::new("infobox", "json", "{}")])
            .unwrap();

        let roles: Vec<&str> = outcome.revision.slots.iter().map(|s| s.role.as_str()).collect();
        assert_eq!(roles, vec!["main", "infobox"]);
        assert_eq!(outcome.revision.slots[0].model, "wikitext");
        assert_eq!(outcome.revision.slots[1].model, "json");
    }

    #[test]
    fn test_empty_secondary_slots_are_skipped() {
        let (_, importer, ns) = setup();
        let title = Title::new_from_text("Template:Box", &ns).unwrap();

        let outcome = importer
            .import_revision(
                &title,
                &[
                    SlotRecord::new("main", "", ""),
                    SlotRecord::new("notes", "wikitext", ""),
                ],
            )
            .unwrap();

        assert_eq!(outcome.revision.slots.len(), 1);
        assert!(outcome.revision.slot("notes").is_none());
    }

    #[test]
    fn test_duplicate_role_keeps_last_content() {
        let (_, importer, ns) = setup();
        let title = Title::new_from_text("JsonSchema:Person", &ns).unwrap();

        let outcome = importer
            .import_revision(
                &title,
                &[
                    SlotRecord::new("main", "json", "{\"v\":1}"),
                    SlotRecord::new("main", "json", "{\"v\":2}"),
                ],
            )
            .unwrap();

        assert_eq!(outcome.revision.main_text(), Some("{\"v\":2}"));
    }

    #[test]
    fn test_prior_revision_model_is_reused() {
        let (store, importer, ns) = setup();
        let title = Title::new_from_text("Module:Data", &ns).unwrap();
        store
            .save_revision(
                &title,
                vec![
                    StoredSlot::new("main", "wikitext", ""),
                    StoredSlot::new("code", "Scribunto", "return {}"),
                ],
            )
            .unwrap();

        let outcome = importer
            .import_revision(&title, &[SlotRecord::new("code", "", "return { 1 }")])
            .unwrap();

        assert_eq!(outcome.revision.slot("code").unwrap().model, "Scribunto");
    }

    #[test]
    fn test_unresolvable_model_is_reported() {
        let config = JsonFormsConfig::default();
        let store = Arc::new(MemoryPageStore::new());
        let resolver = ModelResolver::with_rules(
            vec![ModelRule::Explicit, ModelRule::RoleDefault],
            ContentModelRegistry::from(&config),
            SlotRoleRegistry::from(&config),
        );
        let importer = RevisionImporter::new(store, resolver);
        let title = Title::new_from_text("Help:Page", &NamespaceRegistry::from(&config)).unwrap();

        let outcome = importer
            .import_revision(&title, &[SlotRecord::new("extra", "", "text")])
            .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.revision.slot("extra").is_none());
    }
}
