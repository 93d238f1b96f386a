//! Batch auto-assignment
//!
//! Pairs the pure [`AutoDetector`] with the registry's transactional attach.
//! Files are applied one at a time: each attach, including its
//! create-if-absent step, commits before the next file is looked at, so files
//! sharing a new identifier end up grouped in one exhibit.

use docket_ident::{AutoDetector, Identifier};
use docket_registry::{CaseId, ExhibitId, ExhibitRegistry, FileId, RegistryError};
use serde::{Deserialize, Serialize};

/// File record as provided by the file-management collaborator
///
/// Only names and ids are read; file bytes never reach this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File id
    pub id: FileId,
    /// Original filename
    pub name: String,
    /// Owning project (case)
    pub project_id: CaseId,
}

impl FileRecord {
    /// Create a file record
    #[must_use]
    pub fn new(id: impl Into<FileId>, name: impl Into<String>, project_id: CaseId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id,
        }
    }
}

/// One file placed into an exhibit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Assigned file
    pub file_id: FileId,
    /// Its filename
    pub file_name: String,
    /// Detected identifier
    pub identifier: Identifier,
    /// Exhibit the file joined
    pub exhibit_id: ExhibitId,
    /// Exhibit was created for this file
    pub created: bool,
}

/// Structured result of a batch pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoAssignReport {
    /// Exhibits created during the pass
    pub exhibits_created: usize,
    /// Files newly attached
    pub files_attached: usize,
    /// Files skipped because they already belong to an exhibit
    pub already_assigned: Vec<FileId>,
    /// Files whose names carry no identifier
    pub undetected: Vec<FileId>,
    /// Files belonging to another case
    pub foreign: Vec<FileId>,
    /// Successful placements, in input order
    pub assignments: Vec<Assignment>,
}

impl AutoAssignReport {
    /// Whether the pass changed nothing
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.files_attached == 0 && self.exhibits_created == 0
    }
}

/// Detect identifiers for unassigned files and attach them
///
/// # Errors
/// Propagates registry failures; files processed before the failure stay attached.
pub fn auto_assign(
    registry: &ExhibitRegistry,
    detector: &AutoDetector,
    files: &[FileRecord],
) -> Result<AutoAssignReport, RegistryError> {
    let mut report = AutoAssignReport::default();

    for file in files {
        if &file.project_id != registry.case_id() {
            report.foreign.push(file.id.clone());
            continue;
        }
        if registry.is_file_assigned(&file.id) {
            report.already_assigned.push(file.id.clone());
            continue;
        }
        let Some(identifier) = detector.detect(&file.name) else {
            report.undetected.push(file.id.clone());
            continue;
        };

        let outcome = registry.attach_file(file.id.clone(), identifier, false)?;
        if outcome.created {
            report.exhibits_created += 1;
        }
        if outcome.attached {
            report.files_attached += 1;
        }
        report.assignments.push(Assignment {
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            identifier,
            exhibit_id: outcome.exhibit_id,
            created: outcome.created,
        });
    }

    tracing::info!(
        "Auto-assignment for case {}: {} exhibits created, {} files attached, {} undetected, {} already assigned",
        registry.case_id(),
        report.exhibits_created,
        report.files_attached,
        report.undetected.len(),
        report.already_assigned.len()
    );

    Ok(report)
}
