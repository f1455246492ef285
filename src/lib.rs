//! # JsonForms
//!
//! Schema-driven forms for a wiki. JSON schemas and form descriptors are
//! stored as wiki pages; a directory tree of page sources can be imported in
//! bulk, with `$ref` paths between schema files rewritten to the raw URLs of
//! the pages they become.
//!
//! ## Core Components
//!
//! * `wiki` - Titles, content models, slots and page storage
//! * `schema` - `$ref` rewriting, JSON encoding and schema lookup
//! * `import` - Directory scan, reference mapping and revision import
//! * `editor` - Payload handed to the browser-side form editor
//! * `config` - TOML configuration
//! * `logging` - Console logger behind the `log` facade
//! * `error` - Error types and handling

pub mod config;
pub mod editor;
pub mod error;
pub mod import;
pub mod logging;
pub mod schema;
pub mod wiki;

// Re-export main types for convenience
pub use config::JsonFormsConfig;
pub use editor::{EditorBootstrap, EditorPayload};
pub use error::{JsonFormsError, JsonFormsResult};
pub use import::{import_directory, ImportOptions, ImportPlanner, ImportReport};
pub use schema::{rewrite_references, ReferenceMapping, SafeJsonEncoder, SchemaRepository};
pub use wiki::{MemoryPageStore, PageStore, SledPageStore, Title};
