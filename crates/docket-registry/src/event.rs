//! Change notifications
//!
//! The registry publishes a [`RegistryEvent`] after every committed mutation.
//! UI layers subscribe instead of polling shared state.

use crate::model::{ExhibitId, FileId};
use docket_ident::ExhibitNumber;

/// Committed registry change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Exhibit created (explicitly or by an attach)
    ExhibitCreated {
        /// New exhibit
        exhibit_id: ExhibitId,
        /// Its number
        number: ExhibitNumber,
    },

    /// File joined an exhibit
    FileAttached {
        /// Target exhibit
        exhibit_id: ExhibitId,
        /// Attached file
        file_id: FileId,
        /// File is primary
        primary: bool,
    },

    /// File left an exhibit
    FileDetached {
        /// Source exhibit
        exhibit_id: ExhibitId,
        /// Detached file
        file_id: FileId,
    },

    /// Primary file changed
    PrimaryChanged {
        /// Exhibit
        exhibit_id: ExhibitId,
        /// New primary file
        file_id: FileId,
    },

    /// Title, description, type or key-evidence flag changed
    ExhibitUpdated {
        /// Exhibit
        exhibit_id: ExhibitId,
    },

    /// Exhibit number changed
    ExhibitRenumbered {
        /// Exhibit
        exhibit_id: ExhibitId,
        /// Previous number
        from: ExhibitNumber,
        /// New number
        to: ExhibitNumber,
    },

    /// Exhibit and its file links removed
    ExhibitDeleted {
        /// Removed exhibit
        exhibit_id: ExhibitId,
        /// Number it held
        number: ExhibitNumber,
        /// File links dropped with it
        files_removed: usize,
    },
}

impl RegistryEvent {
    /// Exhibit the event concerns
    #[must_use]
    pub fn exhibit_id(&self) -> ExhibitId {
        match self {
            Self::ExhibitCreated { exhibit_id, .. }
            | Self::FileAttached { exhibit_id, .. }
            | Self::FileDetached { exhibit_id, .. }
            | Self::PrimaryChanged { exhibit_id, .. }
            | Self::ExhibitUpdated { exhibit_id }
            | Self::ExhibitRenumbered { exhibit_id, .. }
            | Self::ExhibitDeleted { exhibit_id, .. } => *exhibit_id,
        }
    }
}
