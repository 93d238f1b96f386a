//! Testing utilities for the Docket workspace
//!
//! Shared fixtures and a recording editor sink.

#![allow(missing_docs)]

use docket_citation::{CitationSink, CitationTarget};
use docket_core::{CaseDirectory, DocketConfig, FileRecord};
use docket_registry::{CaseId, ExhibitRegistry, RegistryConfig};
use parking_lot::Mutex;
use std::sync::Arc;

pub const TEST_CASE: &str = "smith-v-jones";

pub fn case_id() -> CaseId {
    CaseId::new(TEST_CASE)
}

pub fn file_record(id: &str, name: &str) -> FileRecord {
    FileRecord::new(id, name, case_id())
}

pub fn empty_registry() -> Arc<ExhibitRegistry> {
    Arc::new(ExhibitRegistry::new(case_id(), RegistryConfig::default()))
}

/// Registry holding one draft exhibit per number
pub fn registry_with(numbers: &[&str]) -> Arc<ExhibitRegistry> {
    let registry = empty_registry();
    for number in numbers {
        registry
            .create_from_input(number, docket_registry::ExhibitDraft::new())
            .unwrap();
    }
    registry
}

/// Registry where each `(file, number)` pair is attached in order
pub fn registry_with_files(pairs: &[(&str, &str)]) -> Arc<ExhibitRegistry> {
    let registry = empty_registry();
    for (file, number) in pairs {
        registry.attach_file(*file, *number, false).unwrap();
    }
    registry
}

pub fn directory() -> CaseDirectory {
    CaseDirectory::new(DocketConfig::default())
}

/// Sink that remembers every placed reference
#[derive(Debug, Default)]
pub struct RecordingSink {
    placed: Mutex<Vec<(String, CitationTarget)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn placed(&self) -> Vec<(String, CitationTarget)> {
        self.placed.lock().clone()
    }
}

impl CitationSink for RecordingSink {
    fn place_reference(&self, reference: &str, target: &CitationTarget) {
        self.placed.lock().push((reference.to_string(), target.clone()));
    }
}
