//! Wiki-side collaborators: titles, slots, content models, page storage and
//! the revision writer.

pub mod content_model;
pub mod revision;
pub mod slots;
pub mod store;
pub mod title;

pub use content_model::{ContentModelRegistry, ModelContext, ModelResolver, ModelRule};
pub use revision::{RevisionImporter, RevisionOutcome};
pub use slots::{SlotRecord, SlotRoleRegistry, MAIN_SLOT};
pub use store::{MemoryPageStore, PageStore, Revision, SledPageStore, StoredPage, StoredSlot};
pub use title::{NamespaceRegistry, Title, NS_MAIN};
