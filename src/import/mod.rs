//! Bulk import of a directory tree into wiki pages.
//!
//! Files are laid out as `Namespace/[Prefix/][sub/dirs/]base.slot[.model]`.
//! Every file becomes one slot of one page; JSON slots have their `$ref`
//! paths rewritten to the raw URLs of the pages those files become.

pub mod filename;
pub mod page_name;
pub mod planner;
pub mod report;
pub mod runner;

pub use filename::{classify, FileClassification};
pub use page_name::{camel_case, derive_page_name, mapping_key};
pub use planner::{ImportPlan, ImportPlanner, ImportRecord};
pub use report::{ImportError, ImportErrorKind, ImportReport};
pub use runner::{ImportOptions, ImportRunner};

use crate::config::JsonFormsConfig;
use crate::error::JsonFormsResult;
use crate::wiki::content_model::{ContentModelRegistry, ModelResolver};
use crate::wiki::revision::RevisionImporter;
use crate::wiki::slots::SlotRoleRegistry;
use crate::wiki::store::PageStore;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Plan and write the whole tree under `root` into `store`.
pub fn import_directory(
    config: &JsonFormsConfig,
    store: Arc<dyn PageStore>,
    root: &Path,
    options: ImportOptions,
) -> JsonFormsResult<ImportReport> {
    info!("Importing pages from {}", root.display());
    let plan = ImportPlanner::new(config).plan(root)?;
    info!(
        "Found {} files for {} pages ({} references mapped)",
        plan.files_found,
        plan.records.len(),
        plan.mapping.len()
    );

    let resolver = ModelResolver::new(
        ContentModelRegistry::from(config),
        SlotRoleRegistry::from(config),
    );
    let runner = ImportRunner::new(RevisionImporter::new(store, resolver), options);
    Ok(runner.run(plan))
}
