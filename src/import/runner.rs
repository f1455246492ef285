//! Write phase of an import: one revision per planned page.

use crate::import::planner::{ImportPlan, ImportRecord};
use crate::import::report::{ImportError, ImportErrorKind, ImportReport};
use crate::wiki::revision::RevisionImporter;
use log::{debug, error, info};

/// Flags of the `import` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Accepted for compatibility; does not change what gets written
    pub delete: bool,
}

pub struct ImportRunner {
    importer: RevisionImporter,
    options: ImportOptions,
}

impl ImportRunner {
    pub fn new(importer: RevisionImporter, options: ImportOptions) -> Self {
        Self { importer, options }
    }

    /// Write every record of `plan`. A failing title is recorded and the run
    /// moves on to the next one.
    pub fn run(&self, plan: ImportPlan) -> ImportReport {
        if self.options.delete {
            debug!("delete flag set; existing pages are updated in place");
        }

        let mut report = ImportReport {
            files_found: plan.files_found,
            errors: plan.errors,
            ..Default::default()
        };

        for record in plan.records {
            self.import_record(record, &mut report);
        }

        report
    }

    fn import_record(&self, record: ImportRecord, report: &mut ImportReport) {
        let title_text = record.title.prefixed_text();
        info!("importing {}", title_text);

        match self.importer.import_revision(&record.title, &record.slots) {
            Ok(outcome) => {
                info!("{} (success, revision {})", title_text, outcome.revision.id);
                for warning in outcome.warnings {
                    report.errors.push(ImportError::new(
                        title_text.clone(),
                        ImportErrorKind::ModelUnresolved(warning),
                    ));
                }
                report.imported.push(title_text);
            }
            Err(e) => {
                error!("***error importing {}: {}", title_text, e);
                report.errors.push(ImportError::new(
                    title_text.clone(),
                    ImportErrorKind::Write(e.to_string()),
                ));
                report.failed.insert(title_text, e.to_string());
            }
        }
    }
}
