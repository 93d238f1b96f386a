//! Docket Identifiers
//!
//! Exhibit identifier grammar, sequencing and filename detection.
//!
//! # Overview
//!
//! - **Identifier / ExhibitNumber**: the `<number><letter>` grammar (`12B`) and
//!   its opaque fallback for malformed legacy numbers
//! - **Sequencer**: proposes the next unused identifier for a case
//! - **AutoDetector**: finds an identifier embedded in a filename
//!
//! # Example
//!
//! ```rust
//! use docket_ident::{AutoDetector, Identifier, Sequencer};
//!
//! let existing: Vec<Identifier> = ["1A", "1B", "2A"]
//!     .iter()
//!     .map(|raw| raw.parse().unwrap())
//!     .collect();
//! assert_eq!(Sequencer::new().next(&existing).unwrap().to_string(), "2B");
//!
//! let detected = AutoDetector::new().detect("Exhibit 12-B_contract.pdf");
//! assert_eq!(detected.map(|id| id.to_string()).as_deref(), Some("12B"));
//! ```

#![warn(missing_docs)]

pub mod detector;
pub mod grammar;
pub mod sequencer;

// Re-exports
pub use detector::{AutoDetector, Detection, DetectorConfig};
pub use grammar::{format, parse, ExhibitNumber, Identifier, IdentifierError};
pub use sequencer::{SequenceError, Sequencer};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for identifier handling
    pub use crate::{AutoDetector, ExhibitNumber, Identifier, IdentifierError, Sequencer};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
