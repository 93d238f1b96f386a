//! Per-case exhibit registry
//!
//! Provides [`ExhibitRegistry`], the single owner of a case's exhibits and
//! their file memberships.
//!
//! All state sits behind one lock, so each operation (including the compound
//! create-if-absent-then-append of [`ExhibitRegistry::attach`]) commits as a
//! unit even when the host shares the registry across threads.

use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::model::{
    AttachOutcome, CaseId, Exhibit, ExhibitDraft, ExhibitFile, ExhibitId, ExhibitUpdate,
    FileAttachment, FileId,
};
use chrono::Utc;
use docket_ident::{parse, ExhibitNumber, Identifier, Sequencer};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::broadcast;

/// Largest accepted change-notification buffer
pub const MAX_EVENT_CAPACITY: usize = 65_536;

/// Registry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Highest exhibit number the sequencer may propose
    pub number_ceiling: Option<u32>,

    /// Buffered change notifications per subscriber, at most [`MAX_EVENT_CAPACITY`]
    pub event_capacity: usize,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With number ceiling
    #[inline]
    #[must_use]
    pub fn with_number_ceiling(mut self, ceiling: u32) -> Self {
        self.number_ceiling = Some(ceiling);
        self
    }

    /// With event buffer size
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    fn sequencer(&self) -> Sequencer {
        self.number_ceiling
            .map_or_else(Sequencer::new, Sequencer::with_ceiling)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            number_ceiling: None,
            event_capacity: 256,
        }
    }
}

/// Exhibits of one case
///
/// # Invariants
/// - exhibit numbers are unique within the case
/// - at most one file per exhibit is primary
/// - display order is derived from the numbers, never stored
#[derive(Debug)]
pub struct ExhibitRegistry {
    case_id: CaseId,
    sequencer: Sequencer,
    state: RwLock<RegistryState>,
    events: broadcast::Sender<RegistryEvent>,
}

#[derive(Debug, Default)]
struct RegistryState {
    exhibits: HashMap<ExhibitId, Exhibit>,

    /// Number -> exhibit; iteration order is display order
    by_number: BTreeMap<ExhibitNumber, ExhibitId>,
}

impl RegistryState {
    fn insert_new(
        &mut self,
        case_id: &CaseId,
        number: ExhibitNumber,
        draft: ExhibitDraft,
    ) -> Result<Exhibit, RegistryError> {
        if let Some(existing) = self.by_number.get(&number) {
            return Err(RegistryError::DuplicateIdentifier {
                number,
                existing: *existing,
            });
        }

        let now = Utc::now();
        let exhibit = Exhibit {
            id: ExhibitId::new(),
            case_id: case_id.clone(),
            title: draft.title.unwrap_or_else(|| default_title(&number)),
            exhibit_number: number.clone(),
            description: draft.description,
            exhibit_type: draft.exhibit_type,
            is_key_evidence: draft.is_key_evidence,
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.by_number.insert(number, exhibit.id);
        self.exhibits.insert(exhibit.id, exhibit.clone());
        Ok(exhibit)
    }

    fn exhibit_mut(&mut self, id: ExhibitId) -> Result<&mut Exhibit, RegistryError> {
        self.exhibits
            .get_mut(&id)
            .ok_or(RegistryError::ExhibitNotFound(id))
    }

    fn sorted(&self) -> impl Iterator<Item = &Exhibit> {
        self.by_number
            .values()
            .filter_map(|id| self.exhibits.get(id))
    }
}

fn default_title(number: &ExhibitNumber) -> String {
    format!("Exhibit {number}")
}

/// Make `file_id` the only primary file; returns whether anything changed
fn promote(exhibit: &mut Exhibit, file_id: &FileId) -> bool {
    let mut changed = false;
    for file in &mut exhibit.files {
        let should = &file.file_id == file_id;
        if file.is_primary != should {
            file.is_primary = should;
            changed = true;
        }
    }
    changed
}

impl ExhibitRegistry {
    /// Create empty registry for `case_id`
    #[must_use]
    pub fn new(case_id: CaseId, config: RegistryConfig) -> Self {
        // The channel allocates its whole buffer up front.
        let capacity = config.event_capacity.clamp(1, MAX_EVENT_CAPACITY);
        let (events, _) = broadcast::channel(capacity);
        Self {
            case_id,
            sequencer: config.sequencer(),
            state: RwLock::new(RegistryState::default()),
            events,
        }
    }

    /// Owning case
    #[inline]
    #[must_use]
    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    /// Subscribe to change notifications
    ///
    /// Events are published after the mutation has committed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    fn publish(&self, events: Vec<RegistryEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    /// Create an exhibit with an explicit number
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateIdentifier`] if the number is taken.
    pub fn create(
        &self,
        number: impl Into<ExhibitNumber>,
        draft: ExhibitDraft,
    ) -> Result<Exhibit, RegistryError> {
        let number = number.into();
        let result = self.state.write().insert_new(&self.case_id, number, draft);

        match result {
            Ok(exhibit) => {
                tracing::info!(
                    "Created exhibit {} ({}) in case {}",
                    exhibit.exhibit_number,
                    exhibit.id,
                    self.case_id
                );
                self.publish(vec![RegistryEvent::ExhibitCreated {
                    exhibit_id: exhibit.id,
                    number: exhibit.exhibit_number.clone(),
                }]);
                Ok(exhibit)
            }
            Err(e) => {
                tracing::warn!("Rejected exhibit create in case {}: {}", self.case_id, e);
                Err(e)
            }
        }
    }

    /// Create from user-typed input, enforcing the grammar
    ///
    /// # Errors
    /// - [`RegistryError::InvalidIdentifierFormat`] for malformed input
    /// - [`RegistryError::DuplicateIdentifier`] if the number is taken
    pub fn create_from_input(
        &self,
        raw: &str,
        draft: ExhibitDraft,
    ) -> Result<Exhibit, RegistryError> {
        let identifier = parse(raw)?;
        self.create(identifier, draft)
    }

    /// Attach a file to the exhibit with `number`, creating it if absent
    ///
    /// Shorthand for [`ExhibitRegistry::attach`] without page or section.
    ///
    /// # Errors
    /// See [`ExhibitRegistry::attach`].
    pub fn attach_file(
        &self,
        file_id: impl Into<FileId>,
        number: impl Into<ExhibitNumber>,
        as_primary: bool,
    ) -> Result<AttachOutcome, RegistryError> {
        self.attach(FileAttachment::new(file_id.into(), number).primary(as_primary))
    }

    /// Attach a file to an exhibit
    ///
    /// - creates the exhibit (title `"Exhibit <number>"`) when the number is unused
    /// - adds the membership unless the file is already attached
    /// - with `as_primary`, demotes any previous primary
    ///
    /// Re-attaching an existing member only updates its page/section when
    /// the request supplies them.
    ///
    /// # Errors
    /// Only internal inconsistencies surface here; a missing exhibit is
    /// created rather than reported.
    pub fn attach(&self, request: FileAttachment) -> Result<AttachOutcome, RegistryError> {
        let FileAttachment {
            file_id,
            exhibit_number,
            as_primary,
            page_number,
            section,
        } = request;

        let mut events = Vec::new();
        let outcome = {
            let mut state = self.state.write();

            let existing = state.by_number.get(&exhibit_number).copied();
            let (exhibit_id, created) = match existing {
                Some(id) => (id, false),
                None => {
                    let exhibit =
                        state.insert_new(&self.case_id, exhibit_number, ExhibitDraft::new())?;
                    events.push(RegistryEvent::ExhibitCreated {
                        exhibit_id: exhibit.id,
                        number: exhibit.exhibit_number.clone(),
                    });
                    (exhibit.id, true)
                }
            };

            let exhibit = state.exhibit_mut(exhibit_id)?;
            let now = Utc::now();

            let attached = match exhibit.files.iter_mut().find(|f| f.file_id == file_id) {
                Some(member) => {
                    if page_number.is_some() {
                        member.page_number = page_number;
                    }
                    if section.is_some() {
                        member.section = section;
                    }
                    false
                }
                None => {
                    exhibit.files.push(ExhibitFile {
                        file_id: file_id.clone(),
                        exhibit_id,
                        page_number,
                        section,
                        is_primary: false,
                        attached_at: now,
                    });
                    true
                }
            };

            let promoted = as_primary && promote(exhibit, &file_id);
            let is_primary = exhibit.file(&file_id).is_some_and(|f| f.is_primary);

            if attached || promoted {
                exhibit.updated_at = now;
            }
            if attached {
                events.push(RegistryEvent::FileAttached {
                    exhibit_id,
                    file_id: file_id.clone(),
                    primary: is_primary,
                });
            } else if promoted {
                events.push(RegistryEvent::PrimaryChanged {
                    exhibit_id,
                    file_id: file_id.clone(),
                });
            }

            tracing::debug!(
                "Attach {} -> {} (created: {}, attached: {}, primary: {})",
                file_id,
                exhibit.exhibit_number,
                created,
                attached,
                is_primary
            );

            AttachOutcome {
                exhibit_id,
                created,
                attached,
                is_primary,
            }
        };

        self.publish(events);
        Ok(outcome)
    }

    /// Remove a file from an exhibit
    ///
    /// Returns `false` if the file was not attached. Removing the last file
    /// puts the exhibit back into draft state.
    ///
    /// # Errors
    /// Returns [`RegistryError::ExhibitNotFound`] for unknown or deleted exhibits.
    pub fn detach_file(&self, exhibit_id: ExhibitId, file_id: &FileId) -> Result<bool, RegistryError> {
        let removed = {
            let mut state = self.state.write();
            let exhibit = state.exhibit_mut(exhibit_id)?;
            let before = exhibit.files.len();
            exhibit.files.retain(|f| &f.file_id != file_id);
            let removed = exhibit.files.len() != before;
            if removed {
                exhibit.updated_at = Utc::now();
            }
            removed
        };

        if removed {
            self.publish(vec![RegistryEvent::FileDetached {
                exhibit_id,
                file_id: file_id.clone(),
            }]);
        }
        Ok(removed)
    }

    /// Make an attached file the exhibit's primary file
    ///
    /// # Errors
    /// - [`RegistryError::ExhibitNotFound`] for unknown or deleted exhibits
    /// - [`RegistryError::FileNotAttached`] if the file is not a member
    pub fn set_primary(&self, exhibit_id: ExhibitId, file_id: &FileId) -> Result<(), RegistryError> {
        let changed = {
            let mut state = self.state.write();
            let exhibit = state.exhibit_mut(exhibit_id)?;
            if !exhibit.contains_file(file_id) {
                return Err(RegistryError::FileNotAttached {
                    exhibit_id,
                    file_id: file_id.clone(),
                });
            }
            let changed = promote(exhibit, file_id);
            if changed {
                exhibit.updated_at = Utc::now();
            }
            changed
        };

        if changed {
            self.publish(vec![RegistryEvent::PrimaryChanged {
                exhibit_id,
                file_id: file_id.clone(),
            }]);
        }
        Ok(())
    }

    /// Delete an exhibit and its file links
    ///
    /// Idempotent: deleting an unknown id is a no-op returning `None`.
    /// Citation history is not touched.
    pub fn delete(&self, exhibit_id: ExhibitId) -> Option<Exhibit> {
        let removed = {
            let mut state = self.state.write();
            let exhibit = state.exhibits.remove(&exhibit_id)?;
            state.by_number.remove(&exhibit.exhibit_number);
            exhibit
        };

        tracing::info!(
            "Deleted exhibit {} ({} file links) from case {}",
            removed.exhibit_number,
            removed.files.len(),
            self.case_id
        );
        self.publish(vec![RegistryEvent::ExhibitDeleted {
            exhibit_id,
            number: removed.exhibit_number.clone(),
            files_removed: removed.files.len(),
        }]);
        Some(removed)
    }

    /// Set or clear the key-evidence flag
    ///
    /// # Errors
    /// Returns [`RegistryError::ExhibitNotFound`] for unknown or deleted exhibits.
    pub fn set_key_evidence(&self, exhibit_id: ExhibitId, flag: bool) -> Result<(), RegistryError> {
        let changed = {
            let mut state = self.state.write();
            let exhibit = state.exhibit_mut(exhibit_id)?;
            let changed = exhibit.is_key_evidence != flag;
            if changed {
                exhibit.is_key_evidence = flag;
                exhibit.updated_at = Utc::now();
            }
            changed
        };

        if changed {
            self.publish(vec![RegistryEvent::ExhibitUpdated { exhibit_id }]);
        }
        Ok(())
    }

    /// Update title, description or type
    ///
    /// # Errors
    /// Returns [`RegistryError::ExhibitNotFound`] for unknown or deleted exhibits.
    pub fn update_details(
        &self,
        exhibit_id: ExhibitId,
        update: ExhibitUpdate,
    ) -> Result<Exhibit, RegistryError> {
        let (exhibit, changed) = {
            let mut state = self.state.write();
            let exhibit = state.exhibit_mut(exhibit_id)?;
            let changed = !update.is_empty();

            if let Some(title) = update.title {
                exhibit.title = title;
            }
            if let Some(description) = update.description {
                exhibit.description = description;
            }
            if let Some(exhibit_type) = update.exhibit_type {
                exhibit.exhibit_type = exhibit_type;
            }
            if changed {
                exhibit.updated_at = Utc::now();
            }
            (exhibit.clone(), changed)
        };

        if changed {
            self.publish(vec![RegistryEvent::ExhibitUpdated { exhibit_id }]);
        }
        Ok(exhibit)
    }

    /// Explicitly give an exhibit a new number
    ///
    /// A title still equal to the default `"Exhibit <old>"` follows the new number.
    ///
    /// # Errors
    /// - [`RegistryError::ExhibitNotFound`] for unknown or deleted exhibits
    /// - [`RegistryError::DuplicateIdentifier`] if another exhibit holds the number
    pub fn renumber(
        &self,
        exhibit_id: ExhibitId,
        number: impl Into<ExhibitNumber>,
    ) -> Result<Exhibit, RegistryError> {
        let number = number.into();

        let (exhibit, previous) = {
            let mut state = self.state.write();
            let current = state
                .exhibits
                .get(&exhibit_id)
                .map(|e| e.exhibit_number.clone())
                .ok_or(RegistryError::ExhibitNotFound(exhibit_id))?;

            if current == number {
                let unchanged = state.exhibit_mut(exhibit_id)?.clone();
                return Ok(unchanged);
            }
            if let Some(existing) = state.by_number.get(&number) {
                tracing::warn!("Rejected renumber of {} to {}: taken", current, number);
                return Err(RegistryError::DuplicateIdentifier {
                    number,
                    existing: *existing,
                });
            }

            state.by_number.remove(&current);
            state.by_number.insert(number.clone(), exhibit_id);

            let exhibit = state.exhibit_mut(exhibit_id)?;
            if exhibit.title == default_title(&current) {
                exhibit.title = default_title(&number);
            }
            exhibit.exhibit_number = number.clone();
            exhibit.updated_at = Utc::now();
            (exhibit.clone(), current)
        };

        tracing::info!(
            "Renumbered exhibit {} from {} to {}",
            exhibit_id,
            previous,
            number
        );
        self.publish(vec![RegistryEvent::ExhibitRenumbered {
            exhibit_id,
            from: previous,
            to: number,
        }]);
        Ok(exhibit)
    }

    /// Propose the next unused identifier
    ///
    /// Opaque (malformed) numbers are ignored for the numeric maximum; they
    /// cannot collide with a valid proposal anyway.
    ///
    /// # Errors
    /// Returns [`RegistryError::SequencerExhausted`] when a configured ceiling is reached.
    pub fn next_identifier(&self) -> Result<Identifier, RegistryError> {
        let state = self.state.read();
        let valid: Vec<Identifier> = state
            .by_number
            .keys()
            .filter_map(ExhibitNumber::identifier)
            .collect();
        Ok(self.sequencer.next(&valid)?)
    }

    /// All exhibits in display order: valid numbers by `(number, letter)`,
    /// then opaque numbers lexicographically
    ///
    /// Returns a fresh snapshot on every call.
    #[must_use]
    pub fn list_sorted(&self) -> Vec<Exhibit> {
        self.state.read().sorted().cloned().collect()
    }

    /// Exhibit numbers in display order
    #[must_use]
    pub fn identifiers(&self) -> Vec<ExhibitNumber> {
        self.state.read().by_number.keys().cloned().collect()
    }

    /// Key-evidence exhibits in display order
    #[must_use]
    pub fn key_evidence(&self) -> Vec<Exhibit> {
        self.state
            .read()
            .sorted()
            .filter(|e| e.is_key_evidence)
            .cloned()
            .collect()
    }

    /// Exhibits containing `file_id`, in display order
    #[must_use]
    pub fn exhibits_for_file(&self, file_id: &FileId) -> Vec<Exhibit> {
        self.state
            .read()
            .sorted()
            .filter(|e| e.contains_file(file_id))
            .cloned()
            .collect()
    }

    /// Whether `file_id` belongs to any exhibit
    #[must_use]
    pub fn is_file_assigned(&self, file_id: &FileId) -> bool {
        self.state
            .read()
            .exhibits
            .values()
            .any(|e| e.contains_file(file_id))
    }

    /// Lookup by internal id
    #[must_use]
    pub fn get(&self, exhibit_id: ExhibitId) -> Option<Exhibit> {
        self.state.read().exhibits.get(&exhibit_id).cloned()
    }

    /// Lookup by exhibit number
    #[must_use]
    pub fn find_by_number(&self, number: &ExhibitNumber) -> Option<Exhibit> {
        let state = self.state.read();
        state
            .by_number
            .get(number)
            .and_then(|id| state.exhibits.get(id))
            .cloned()
    }

    /// Number of live exhibits
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().exhibits.len()
    }

    /// Whether the case has no exhibits
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExhibitState, ExhibitType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn registry() -> ExhibitRegistry {
        ExhibitRegistry::new(CaseId::new("case-1"), RegistryConfig::default())
    }

    fn num(raw: &str) -> ExhibitNumber {
        ExhibitNumber::from_raw(raw)
    }

    fn shown(exhibits: &[Exhibit]) -> Vec<String> {
        exhibits.iter().map(|e| e.exhibit_number.to_string()).collect()
    }

    #[test]
    fn create_and_lookup() {
        let reg = registry();
        let ex = reg
            .create(num("3A"), ExhibitDraft::new().with_title("Lease"))
            .unwrap();

        assert_eq!(ex.title, "Lease");
        assert_eq!(ex.state(), ExhibitState::Draft);
        assert_eq!(reg.get(ex.id).unwrap(), ex);
        assert_eq!(reg.find_by_number(&num("3a")).unwrap().id, ex.id);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn create_rejects_duplicate_after_normalization() {
        let reg = registry();
        let first = reg.create(num("12B"), ExhibitDraft::new()).unwrap();
        let result = reg.create(num("012b"), ExhibitDraft::new());

        assert_eq!(
            result,
            Err(RegistryError::DuplicateIdentifier {
                number: num("12B"),
                existing: first.id,
            })
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn create_from_input_validates() {
        let reg = registry();
        let result = reg.create_from_input("B12", ExhibitDraft::new());
        assert!(matches!(result, Err(RegistryError::InvalidIdentifierFormat(_))));
        assert!(reg.is_empty());

        let ok = reg.create_from_input(" 4c ", ExhibitDraft::new()).unwrap();
        assert_eq!(ok.exhibit_number.to_string(), "4C");
        assert_eq!(ok.title, "Exhibit 4C");
    }

    #[test]
    fn opaque_numbers_hold_their_own_slot() {
        let reg = registry();
        reg.create(num("Appendix"), ExhibitDraft::new()).unwrap();
        assert!(reg.create(num("Appendix"), ExhibitDraft::new()).is_err());
        assert!(reg.create(num("appendix"), ExhibitDraft::new()).is_ok());
    }

    #[test]
    fn attach_creates_missing_exhibit() {
        let reg = registry();
        let outcome = reg.attach_file("f1", num("12B"), false).unwrap();

        assert!(outcome.created);
        assert!(outcome.attached);
        assert!(!outcome.is_primary);

        let ex = reg.get(outcome.exhibit_id).unwrap();
        assert_eq!(ex.title, "Exhibit 12B");
        assert_eq!(ex.state(), ExhibitState::Populated);
        assert_eq!(ex.files[0].exhibit_id, ex.id);
    }

    #[test]
    fn attach_reuses_existing_exhibit() {
        let reg = registry();
        let created = reg.create(num("1A"), ExhibitDraft::new()).unwrap();
        let outcome = reg.attach_file("f1", num("1a"), false).unwrap();

        assert_eq!(outcome.exhibit_id, created.id);
        assert!(!outcome.created);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn attach_is_idempotent() {
        let reg = registry();
        let first = reg.attach_file("f1", num("2A"), false).unwrap();
        let second = reg.attach_file("f1", num("2A"), false).unwrap();

        assert!(first.attached);
        assert!(!second.attached);
        assert!(!second.created);
        assert_eq!(reg.get(first.exhibit_id).unwrap().files.len(), 1);
    }

    #[test]
    fn reattach_updates_page_and_section() {
        let reg = registry();
        let out = reg.attach_file("f1", num("2A"), false).unwrap();
        reg.attach(
            FileAttachment::new(FileId::new("f1"), num("2A"))
                .with_page(7)
                .with_section("Schedule 1"),
        )
        .unwrap();

        let ex = reg.get(out.exhibit_id).unwrap();
        assert_eq!(ex.files.len(), 1);
        assert_eq!(ex.files[0].page_number, Some(7));
        assert_eq!(ex.files[0].section.as_deref(), Some("Schedule 1"));
    }

    #[test]
    fn primary_is_demoted_on_new_primary() {
        let reg = registry();
        let out = reg.attach_file("f1", num("5A"), true).unwrap();
        reg.attach_file("f2", num("5A"), true).unwrap();
        reg.attach_file("f3", num("5A"), false).unwrap();

        let ex = reg.get(out.exhibit_id).unwrap();
        let primaries: Vec<&str> = ex
            .files
            .iter()
            .filter(|f| f.is_primary)
            .map(|f| f.file_id.as_str())
            .collect();
        assert_eq!(primaries, vec!["f2"]);
    }

    #[test]
    fn set_primary_requires_membership() {
        let reg = registry();
        let out = reg.attach_file("f1", num("5A"), true).unwrap();
        reg.attach_file("f2", num("5A"), false).unwrap();

        reg.set_primary(out.exhibit_id, &FileId::new("f2")).unwrap();
        assert_eq!(
            reg.get(out.exhibit_id).unwrap().primary_file().unwrap().file_id,
            FileId::new("f2")
        );

        let missing = reg.set_primary(out.exhibit_id, &FileId::new("nope"));
        assert!(matches!(missing, Err(RegistryError::FileNotAttached { .. })));
    }

    #[test]
    fn detach_returns_to_draft() {
        let reg = registry();
        let out = reg.attach_file("f1", num("6A"), true).unwrap();

        assert!(reg.detach_file(out.exhibit_id, &FileId::new("f1")).unwrap());
        assert!(!reg.detach_file(out.exhibit_id, &FileId::new("f1")).unwrap());
        assert_eq!(reg.get(out.exhibit_id).unwrap().state(), ExhibitState::Draft);
    }

    #[test]
    fn delete_is_idempotent_and_frees_number() {
        let reg = registry();
        let out = reg.attach_file("f1", num("7A"), false).unwrap();

        let removed = reg.delete(out.exhibit_id).unwrap();
        assert_eq!(removed.files.len(), 1);
        assert!(reg.delete(out.exhibit_id).is_none());
        assert!(reg.find_by_number(&num("7A")).is_none());
        assert!(!reg.is_file_assigned(&FileId::new("f1")));

        // Number can be reused by a new exhibit with a fresh id.
        let again = reg.create(num("7A"), ExhibitDraft::new()).unwrap();
        assert_ne!(again.id, out.exhibit_id);
    }

    #[test]
    fn removed_exhibit_rejects_mutation() {
        let reg = registry();
        let ex = reg.create(num("1A"), ExhibitDraft::new()).unwrap();
        reg.delete(ex.id);

        assert_eq!(
            reg.set_key_evidence(ex.id, true),
            Err(RegistryError::ExhibitNotFound(ex.id))
        );
        assert!(reg.renumber(ex.id, num("2A")).is_err());
        assert!(reg.update_details(ex.id, ExhibitUpdate::default()).is_err());
    }

    #[test]
    fn key_evidence_flag() {
        let reg = registry();
        let a = reg.create(num("1A"), ExhibitDraft::new()).unwrap();
        reg.create(num("1B"), ExhibitDraft::new()).unwrap();

        reg.set_key_evidence(a.id, true).unwrap();
        assert_eq!(shown(&reg.key_evidence()), vec!["1A"]);

        reg.set_key_evidence(a.id, false).unwrap();
        assert!(reg.key_evidence().is_empty());
    }

    #[test]
    fn update_details_applies_fields() {
        let reg = registry();
        let ex = reg
            .create(num("1A"), ExhibitDraft::new().with_description("old"))
            .unwrap();

        let updated = reg
            .update_details(
                ex.id,
                ExhibitUpdate {
                    title: Some("Photos of site".into()),
                    description: Some(None),
                    exhibit_type: Some(ExhibitType::Photo),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Photos of site");
        assert_eq!(updated.description, None);
        assert_eq!(updated.exhibit_type, ExhibitType::Photo);
    }

    #[test]
    fn renumber_moves_slot_and_default_title() {
        let reg = registry();
        let out = reg.attach_file("f1", num("3A"), false).unwrap();
        reg.create(num("4A"), ExhibitDraft::new()).unwrap();

        assert!(matches!(
            reg.renumber(out.exhibit_id, num("4A")),
            Err(RegistryError::DuplicateIdentifier { .. })
        ));

        let moved = reg.renumber(out.exhibit_id, num("9C")).unwrap();
        assert_eq!(moved.title, "Exhibit 9C");
        assert!(reg.find_by_number(&num("3A")).is_none());
        assert_eq!(reg.find_by_number(&num("9C")).unwrap().files.len(), 1);
    }

    #[test]
    fn list_sorted_orders_valid_then_opaque() {
        let reg = registry();
        for raw in ["10A", "legacy", "2B", "2A", "Appendix", "1Z"] {
            reg.create(num(raw), ExhibitDraft::new()).unwrap();
        }
        assert_eq!(
            shown(&reg.list_sorted()),
            vec!["1Z", "2A", "2B", "10A", "Appendix", "legacy"]
        );
    }

    #[test]
    fn next_identifier_scenario() {
        let reg = registry();
        for raw in ["1A", "1B", "2A"] {
            reg.create(num(raw), ExhibitDraft::new()).unwrap();
        }
        assert_eq!(reg.next_identifier().unwrap().to_string(), "2B");
    }

    #[test]
    fn next_identifier_ignores_opaque() {
        let reg = registry();
        assert_eq!(reg.next_identifier().unwrap().to_string(), "1A");
        reg.create(num("999 misc"), ExhibitDraft::new()).unwrap();
        assert_eq!(reg.next_identifier().unwrap().to_string(), "1A");
    }

    #[test]
    fn next_identifier_respects_ceiling() {
        let reg = ExhibitRegistry::new(
            CaseId::new("case-1"),
            RegistryConfig::new().with_number_ceiling(1),
        );
        reg.create(num("1Z"), ExhibitDraft::new()).unwrap();
        assert_eq!(
            reg.next_identifier(),
            Err(RegistryError::SequencerExhausted { ceiling: 1 })
        );
    }

    #[test]
    fn oversized_event_capacity_is_clamped() {
        let reg = ExhibitRegistry::new(
            CaseId::new("case-1"),
            RegistryConfig::new().with_event_capacity(usize::MAX),
        );
        let mut rx = reg.subscribe();
        reg.create(num("1A"), ExhibitDraft::new()).unwrap();
        assert!(rx.try_recv().is_ok());

        let zero = ExhibitRegistry::new(
            CaseId::new("case-1"),
            RegistryConfig::new().with_event_capacity(0),
        );
        assert!(zero.create(num("1A"), ExhibitDraft::new()).is_ok());
    }

    #[test]
    fn events_follow_mutations() {
        let reg = registry();
        let mut rx = reg.subscribe();

        let out = reg.attach_file("f1", num("1A"), true).unwrap();
        reg.set_key_evidence(out.exhibit_id, true).unwrap();
        reg.delete(out.exhibit_id);

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }

        assert_eq!(
            seen,
            vec![
                RegistryEvent::ExhibitCreated {
                    exhibit_id: out.exhibit_id,
                    number: num("1A"),
                },
                RegistryEvent::FileAttached {
                    exhibit_id: out.exhibit_id,
                    file_id: FileId::new("f1"),
                    primary: true,
                },
                RegistryEvent::ExhibitUpdated {
                    exhibit_id: out.exhibit_id,
                },
                RegistryEvent::ExhibitDeleted {
                    exhibit_id: out.exhibit_id,
                    number: num("1A"),
                    files_removed: 1,
                },
            ]
        );
    }

    #[test]
    fn concurrent_attach_creates_one_exhibit() {
        let reg = Arc::new(registry());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let reg = Arc::clone(&reg);
                scope.spawn(move || {
                    reg.attach_file(format!("file-{i}").as_str(), num("12B"), false)
                        .unwrap();
                });
            }
        });

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.find_by_number(&num("12B")).unwrap().files.len(), 8);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(String),
        Attach(u8, String, bool),
        Delete(usize),
    }

    fn number_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (1u32..6, 0u8..3).prop_map(|(n, l)| format!("{}{}", n, char::from(b'a' + l))),
            Just("legacy".to_string()),
            Just("Appendix".to_string()),
        ]
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            number_strategy().prop_map(Op::Create),
            (0u8..6, number_strategy(), any::<bool>()).prop_map(|(f, n, p)| Op::Attach(f, n, p)),
            (0usize..10).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn prop_numbers_stay_unique_and_primary_at_most_one(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let reg = registry();
            for op in ops {
                match op {
                    Op::Create(raw) => { let _ = reg.create(num(&raw), ExhibitDraft::new()); }
                    Op::Attach(f, raw, primary) => {
                        reg.attach_file(format!("f{f}").as_str(), num(&raw), primary).unwrap();
                    }
                    Op::Delete(i) => {
                        if let Some(ex) = reg.list_sorted().get(i) {
                            reg.delete(ex.id);
                        }
                    }
                }
            }

            let listed = reg.list_sorted();
            let mut seen = HashSet::new();
            for ex in &listed {
                prop_assert!(seen.insert(ex.exhibit_number.clone()));
                prop_assert!(ex.files.iter().filter(|f| f.is_primary).count() <= 1);
            }
            for pair in listed.windows(2) {
                prop_assert!(pair[0].exhibit_number < pair[1].exhibit_number);
            }
            let next = reg.next_identifier().unwrap();
            prop_assert!(!seen.contains(&ExhibitNumber::Valid(next)));
        }

        #[test]
        fn prop_latest_primary_wins(flags in proptest::collection::vec(any::<bool>(), 1..12)) {
            let reg = registry();
            let mut latest = None;
            for (i, primary) in flags.iter().enumerate() {
                let file = format!("f{i}");
                reg.attach_file(file.as_str(), num("1A"), *primary).unwrap();
                if *primary {
                    latest = Some(file);
                }
            }
            let ex = reg.find_by_number(&num("1A")).unwrap();
            let primaries: Vec<String> = ex
                .files
                .iter()
                .filter(|f| f.is_primary)
                .map(|f| f.file_id.to_string())
                .collect();
            prop_assert_eq!(primaries, latest.into_iter().collect::<Vec<_>>());
        }
    }
}
