//! Per-case service bundle
//!
//! [`CaseExhibits`] wires one case's registry, resolver and detector
//! together. This is the injection boundary UI and editor layers talk to.

use crate::assign::{self, AutoAssignReport, FileRecord};
use crate::config::DocketConfig;
use crate::error::DocketError;
use docket_citation::{CitationResolver, CitationSink};
use docket_ident::AutoDetector;
use docket_registry::{CaseId, ExhibitRegistry};
use std::sync::Arc;

/// Exhibit services for one case
#[derive(Debug)]
pub struct CaseExhibits {
    registry: Arc<ExhibitRegistry>,
    resolver: CitationResolver,
    detector: AutoDetector,
}

impl CaseExhibits {
    /// Build services for `case_id`
    #[must_use]
    pub fn new(case_id: CaseId, config: &DocketConfig) -> Self {
        let registry = Arc::new(ExhibitRegistry::new(case_id, config.registry));
        Self {
            resolver: CitationResolver::new(Arc::clone(&registry)),
            registry,
            detector: AutoDetector::with_config(config.detector),
        }
    }

    /// Build services whose resolver notifies `sink` on insert
    #[must_use]
    pub fn with_sink(case_id: CaseId, config: &DocketConfig, sink: Arc<dyn CitationSink>) -> Self {
        let mut services = Self::new(case_id, config);
        services.resolver = CitationResolver::new(Arc::clone(&services.registry)).with_sink(sink);
        services
    }

    /// Owning case
    #[inline]
    #[must_use]
    pub fn case_id(&self) -> &CaseId {
        self.registry.case_id()
    }

    /// Exhibit registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ExhibitRegistry> {
        &self.registry
    }

    /// Citation resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &CitationResolver {
        &self.resolver
    }

    /// Filename detector
    #[inline]
    #[must_use]
    pub fn detector(&self) -> &AutoDetector {
        &self.detector
    }

    /// Auto-assign unassigned files of this case
    ///
    /// # Errors
    /// Propagates registry failures as [`DocketError::Registry`].
    pub fn auto_assign(&self, files: &[FileRecord]) -> Result<AutoAssignReport, DocketError> {
        Ok(assign::auto_assign(&self.registry, &self.detector, files)?)
    }
}
