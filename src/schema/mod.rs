//! JSON Schema documents: `$ref` rewriting, ordered encoding and lookup of
//! schema pages.

pub mod encoder;
pub mod references;
pub mod repository;

pub use encoder::{EncodedJson, SafeJsonEncoder};
pub use references::{
    collect_references, normalize_reference, rewrite_references, unresolved_references,
    ReferenceMapping, REF_KEY,
};
pub use repository::SchemaRepository;
