//! Registry error types
//!
//! All registry failures are returned as typed results to the immediate
//! caller (usually a form layer). Resolution misses are not errors and live in
//! the citation crate.

use crate::model::{ExhibitId, FileId};
use docket_ident::{ExhibitNumber, IdentifierError, SequenceError};

/// Registry operation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Exhibit number already used in this case
    #[error("exhibit {number} already exists in this case")]
    DuplicateIdentifier {
        /// Colliding number
        number: ExhibitNumber,
        /// Exhibit currently holding the number
        existing: ExhibitId,
    },

    /// User input does not follow the identifier grammar
    #[error(transparent)]
    InvalidIdentifierFormat(#[from] IdentifierError),

    /// Sequencer ran past the configured ceiling
    #[error("exhibit numbering exhausted (ceiling {ceiling})")]
    SequencerExhausted {
        /// Configured ceiling
        ceiling: u32,
    },

    /// No live exhibit with this id (never created, or deleted)
    #[error("exhibit not found: {0}")]
    ExhibitNotFound(ExhibitId),

    /// File is not a member of the exhibit
    #[error("file {file_id} is not attached to exhibit {exhibit_id}")]
    FileNotAttached {
        /// Exhibit searched
        exhibit_id: ExhibitId,
        /// Missing file
        file_id: FileId,
    },
}

impl RegistryError {
    /// Whether the error stems from user input and should be shown as a
    /// validation message
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier { .. } | Self::InvalidIdentifierFormat(_)
        )
    }
}

impl From<SequenceError> for RegistryError {
    fn from(value: SequenceError) -> Self {
        match value {
            SequenceError::Exhausted { ceiling } => Self::SequencerExhausted { ceiling },
        }
    }
}
