//! Docket Citations
//!
//! Resolution of citation references (`12B`, `12B:4`) typed into case
//! documents, with per-reference usage history.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use docket_citation::CitationResolver;
//! use docket_registry::{CaseId, ExhibitRegistry, RegistryConfig};
//!
//! let registry = Arc::new(ExhibitRegistry::new(CaseId::new("c1"), RegistryConfig::default()));
//! registry.attach_file("f1", "12B", true).unwrap();
//!
//! let resolver = CitationResolver::new(Arc::clone(&registry));
//! let target = resolver.resolve("12B:4");
//! assert_eq!(target.target().unwrap().page, Some(4));
//! assert_eq!(resolver.history("12B:4").unwrap().access_count, 1);
//! ```

#![warn(missing_docs)]

pub mod history;
pub mod reference;
pub mod resolver;

// Re-exports
pub use history::{CitationHistory, HistoryLog};
pub use reference::{CitationReference, ReferenceError};
pub use resolver::{
    CitationResolver, CitationSink, CitationTarget, NotFoundReason, Resolution, Suggestion,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
