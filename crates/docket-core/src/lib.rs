//! Docket Core - exhibit services for cases
//!
//! The service layer above the registry and resolver:
//! - One [`CaseExhibits`] bundle per case, handed out by [`CaseDirectory`]
//! - Batch auto-assignment of unassigned files from their filenames
//! - TOML configuration and `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust
//! use docket_core::{CaseDirectory, DocketConfig, FileRecord};
//! use docket_registry::CaseId;
//!
//! let directory = CaseDirectory::new(DocketConfig::default());
//! let case = CaseId::new("smith-v-jones");
//!
//! let files = vec![
//!     FileRecord::new("f1", "Exhibit 12-B_contract.pdf", case.clone()),
//!     FileRecord::new("f2", "notes.txt", case.clone()),
//! ];
//! let reports = directory.auto_assign(&files).unwrap();
//! assert_eq!(reports[&case].files_attached, 1);
//!
//! let services = directory.get(&case).unwrap();
//! assert!(services.resolver().resolve("12B:3").is_found());
//! ```

#![warn(missing_docs)]

pub mod assign;
pub mod case;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;

// Re-exports
pub use assign::{auto_assign, Assignment, AutoAssignReport, FileRecord};
pub use case::CaseExhibits;
pub use config::{DocketConfig, LogConfig};
pub use directory::CaseDirectory;
pub use error::DocketError;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Docket
    pub use crate::{AutoAssignReport, CaseDirectory, CaseExhibits, DocketConfig, FileRecord};
    pub use docket_citation::{CitationResolver, Resolution};
    pub use docket_ident::{AutoDetector, ExhibitNumber, Identifier};
    pub use docket_registry::{CaseId, ExhibitRegistry, FileId};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
