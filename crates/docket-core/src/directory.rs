//! Case directory
//!
//! Hands out one [`CaseExhibits`] per case. Each case has its own registry
//! lock, so cases never contend with each other.

use crate::assign::{AutoAssignReport, FileRecord};
use crate::case::CaseExhibits;
use crate::config::DocketConfig;
use crate::error::DocketError;
use dashmap::DashMap;
use docket_citation::CitationSink;
use docket_registry::CaseId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Open cases keyed by case id
pub struct CaseDirectory {
    config: DocketConfig,
    cases: DashMap<CaseId, Arc<CaseExhibits>>,
    sink: Option<Arc<dyn CitationSink>>,
}

impl std::fmt::Debug for CaseDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseDirectory")
            .field("config", &self.config)
            .field("open_cases", &self.cases.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl CaseDirectory {
    /// Empty directory
    #[must_use]
    pub fn new(config: DocketConfig) -> Self {
        Self {
            config,
            cases: DashMap::new(),
            sink: None,
        }
    }

    /// Editor sink given to every case opened afterwards
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn CitationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DocketConfig {
        &self.config
    }

    /// Services for `case_id`, opening the case on first use
    #[must_use]
    pub fn open(&self, case_id: &CaseId) -> Arc<CaseExhibits> {
        let entry = self.cases.entry(case_id.clone()).or_insert_with(|| {
            tracing::debug!("Opening case {}", case_id);
            Arc::new(match &self.sink {
                Some(sink) => CaseExhibits::with_sink(case_id.clone(), &self.config, Arc::clone(sink)),
                None => CaseExhibits::new(case_id.clone(), &self.config),
            })
        });
        Arc::clone(entry.value())
    }

    /// Services for an already open case
    ///
    /// # Errors
    /// Returns [`DocketError::CaseNotFound`] if the case was never opened or was closed.
    pub fn get(&self, case_id: &CaseId) -> Result<Arc<CaseExhibits>, DocketError> {
        self.cases
            .get(case_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DocketError::CaseNotFound(case_id.clone()))
    }

    /// Drop a case's in-memory state; returns whether it was open
    pub fn close(&self, case_id: &CaseId) -> bool {
        self.cases.remove(case_id).is_some()
    }

    /// Open case ids, sorted
    #[must_use]
    pub fn case_ids(&self) -> Vec<CaseId> {
        let mut ids: Vec<CaseId> = self.cases.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Route files to their cases and auto-assign each group
    ///
    /// Cases are processed one after another, files within a case in input order.
    ///
    /// # Errors
    /// Stops at the first registry failure.
    pub fn auto_assign(
        &self,
        files: &[FileRecord],
    ) -> Result<BTreeMap<CaseId, AutoAssignReport>, DocketError> {
        let mut grouped: BTreeMap<CaseId, Vec<FileRecord>> = BTreeMap::new();
        for file in files {
            grouped
                .entry(file.project_id.clone())
                .or_default()
                .push(file.clone());
        }

        let mut reports = BTreeMap::new();
        for (case_id, files) in grouped {
            let report = self.open(&case_id).auto_assign(&files)?;
            reports.insert(case_id, report);
        }
        Ok(reports)
    }
}

impl Default for CaseDirectory {
    fn default() -> Self {
        Self::new(DocketConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_returns_same_services() {
        let dir = CaseDirectory::default();
        let a = dir.open(&CaseId::new("c1"));
        let b = dir.open(&CaseId::new("c1"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(dir.case_ids(), vec![CaseId::new("c1")]);
    }

    #[test]
    fn cases_are_isolated() {
        let dir = CaseDirectory::default();
        dir.open(&CaseId::new("c1"))
            .registry()
            .attach_file("f1", "1A", false)
            .unwrap();

        assert!(dir.open(&CaseId::new("c2")).registry().is_empty());
        assert_eq!(dir.get(&CaseId::new("c1")).unwrap().registry().len(), 1);
    }

    #[test]
    fn open_survives_oversized_event_capacity() {
        let config = DocketConfig::new().with_registry(
            docket_registry::RegistryConfig::new().with_event_capacity(usize::MAX),
        );
        let dir = CaseDirectory::new(config);
        let services = dir.open(&CaseId::new("c1"));
        assert!(services.registry().attach_file("f1", "1A", false).is_ok());
    }

    #[test]
    fn get_and_close() {
        let dir = CaseDirectory::default();
        assert!(matches!(
            dir.get(&CaseId::new("nope")),
            Err(DocketError::CaseNotFound(_))
        ));

        dir.open(&CaseId::new("c1"));
        assert!(dir.close(&CaseId::new("c1")));
        assert!(!dir.close(&CaseId::new("c1")));
        assert!(dir.case_ids().is_empty());
    }

    #[test]
    fn auto_assign_routes_by_project() {
        let dir = CaseDirectory::default();
        let files = vec![
            FileRecord::new("f1", "1A.pdf", CaseId::new("c1")),
            FileRecord::new("f2", "1A.pdf", CaseId::new("c2")),
            FileRecord::new("f3", "Exhibit 1-a scan.pdf", CaseId::new("c1")),
        ];

        let reports = dir.auto_assign(&files).unwrap();

        assert_eq!(reports[&CaseId::new("c1")].files_attached, 2);
        assert_eq!(reports[&CaseId::new("c1")].exhibits_created, 1);
        assert_eq!(reports[&CaseId::new("c2")].files_attached, 1);
    }
}
