//! Exhibit data model
//!
//! Defines the records owned by the registry:
//! - identifiers for exhibits, files and cases
//! - [`Exhibit`] and its [`ExhibitFile`] memberships
//! - input shapes for creating, updating and attaching

use chrono::{DateTime, Utc};
use docket_ident::ExhibitNumber;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Internal exhibit identifier (ULID for sortability, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExhibitId(pub Ulid);

impl ExhibitId {
    /// Generate new exhibit ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ExhibitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExhibitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a file record owned by the file-management collaborator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    /// Wrap an external file id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Owning case (the collaborator's project id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub String);

impl CaseId {
    /// Wrap a project id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of evidence an exhibit holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhibitType {
    /// Paper or electronic document
    #[default]
    Document,
    /// Photograph
    Photo,
    /// Video recording
    Video,
    /// Audio recording
    Audio,
    /// Physical object
    Physical,
    /// Other digital evidence
    Digital,
    /// Anything else
    Other,
}

/// Lifecycle state, derived from file membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExhibitState {
    /// No files attached yet
    Draft,
    /// At least one file attached
    Populated,
}

/// A file's membership in an exhibit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitFile {
    /// External file record
    pub file_id: FileId,
    /// Owning exhibit
    pub exhibit_id: ExhibitId,
    /// Default page within the file
    pub page_number: Option<u32>,
    /// Free-form section label
    pub section: Option<String>,
    /// Canonical representative of the exhibit (at most one per exhibit)
    pub is_primary: bool,
    /// When the file was attached
    pub attached_at: DateTime<Utc>,
}

/// An evidentiary grouping within one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhibit {
    /// Stable storage key
    pub id: ExhibitId,
    /// Owning case
    pub case_id: CaseId,
    /// Human-facing number, unique within the case
    pub exhibit_number: ExhibitNumber,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Evidence kind
    pub exhibit_type: ExhibitType,
    /// Key evidence flag
    pub is_key_evidence: bool,
    /// Attached files, in attachment order
    pub files: Vec<ExhibitFile>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Exhibit {
    /// Draft or populated
    #[inline]
    #[must_use]
    pub fn state(&self) -> ExhibitState {
        if self.files.is_empty() {
            ExhibitState::Draft
        } else {
            ExhibitState::Populated
        }
    }

    /// File marked primary, if any
    #[must_use]
    pub fn primary_file(&self) -> Option<&ExhibitFile> {
        self.files.iter().find(|f| f.is_primary)
    }

    /// File used when citing the exhibit without naming a file
    ///
    /// Primary file first, otherwise the earliest attached file.
    #[must_use]
    pub fn citation_file(&self) -> Option<&ExhibitFile> {
        self.primary_file().or_else(|| self.files.first())
    }

    /// Page used when a citation names no page
    #[must_use]
    pub fn default_page(&self) -> Option<u32> {
        self.citation_file().and_then(|f| f.page_number)
    }

    /// Membership record for `file_id`
    #[must_use]
    pub fn file(&self, file_id: &FileId) -> Option<&ExhibitFile> {
        self.files.iter().find(|f| &f.file_id == file_id)
    }

    /// Whether `file_id` is attached
    #[inline]
    #[must_use]
    pub fn contains_file(&self, file_id: &FileId) -> bool {
        self.file(file_id).is_some()
    }
}

/// User-supplied fields for a new exhibit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhibitDraft {
    /// Title; defaults to `"Exhibit <number>"` when absent
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Evidence kind
    pub exhibit_type: ExhibitType,
    /// Key evidence flag
    pub is_key_evidence: bool,
}

impl ExhibitDraft {
    /// Empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With evidence kind
    #[inline]
    #[must_use]
    pub fn with_type(mut self, exhibit_type: ExhibitType) -> Self {
        self.exhibit_type = exhibit_type;
        self
    }

    /// Mark as key evidence
    #[inline]
    #[must_use]
    pub fn key_evidence(mut self, flag: bool) -> Self {
        self.is_key_evidence = flag;
        self
    }
}

/// Partial update of descriptive fields
///
/// `None` leaves a field untouched. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExhibitUpdate {
    /// New title
    pub title: Option<String>,
    /// New description (or clear)
    pub description: Option<Option<String>>,
    /// New evidence kind
    pub exhibit_type: Option<ExhibitType>,
}

impl ExhibitUpdate {
    /// Whether the update changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.exhibit_type.is_none()
    }
}

/// Request to attach a file to the exhibit numbered `exhibit_number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// File to attach
    pub file_id: FileId,
    /// Target exhibit number (created if absent)
    pub exhibit_number: ExhibitNumber,
    /// Make this file the exhibit's primary file
    pub as_primary: bool,
    /// Default page within the file
    pub page_number: Option<u32>,
    /// Section label
    pub section: Option<String>,
}

impl FileAttachment {
    /// Plain attachment without page or section
    #[must_use]
    pub fn new(file_id: FileId, exhibit_number: impl Into<ExhibitNumber>) -> Self {
        Self {
            file_id,
            exhibit_number: exhibit_number.into(),
            as_primary: false,
            page_number: None,
            section: None,
        }
    }

    /// As primary
    #[inline]
    #[must_use]
    pub fn primary(mut self, as_primary: bool) -> Self {
        self.as_primary = as_primary;
        self
    }

    /// With default page
    #[inline]
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    /// With section label
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// Result of an attach call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachOutcome {
    /// Exhibit the file now belongs to
    pub exhibit_id: ExhibitId,
    /// Exhibit was created by this call
    pub created: bool,
    /// A new membership row was added (false when the file was already attached)
    pub attached: bool,
    /// File is primary after the call
    pub is_primary: bool,
}
