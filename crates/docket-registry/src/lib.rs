//! Docket Registry
//!
//! Per-case exhibit registry: creation, file membership, deletion and
//! derived ordering, with change notifications for UI layers.
//!
//! # Example
//!
//! ```rust
//! use docket_registry::{CaseId, ExhibitDraft, ExhibitRegistry, RegistryConfig};
//!
//! let registry = ExhibitRegistry::new(CaseId::new("case-42"), RegistryConfig::default());
//!
//! registry.create("1A".parse::<docket_ident::Identifier>().unwrap(), ExhibitDraft::new()).unwrap();
//! let outcome = registry.attach_file("file-1", "2b", true).unwrap();
//! assert!(outcome.created && outcome.is_primary);
//!
//! // Malformed numbers are kept verbatim and sort last
//! registry.create("legacy-7", ExhibitDraft::new()).unwrap();
//! let numbers: Vec<String> = registry.identifiers().iter().map(ToString::to_string).collect();
//! assert_eq!(numbers, vec!["1A", "2B", "legacy-7"]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod model;
pub mod registry;

// Re-exports
pub use error::RegistryError;
pub use event::RegistryEvent;
pub use model::{
    AttachOutcome, CaseId, Exhibit, ExhibitDraft, ExhibitFile, ExhibitId, ExhibitState,
    ExhibitType, ExhibitUpdate, FileAttachment, FileId,
};
pub use registry::{ExhibitRegistry, RegistryConfig, MAX_EVENT_CAPACITY};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for registry operations
    pub use crate::{
        CaseId, Exhibit, ExhibitDraft, ExhibitId, ExhibitRegistry, FileId, RegistryConfig,
        RegistryError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
