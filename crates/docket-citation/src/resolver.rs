//! Citation resolution
//!
//! Provides [`CitationResolver`], the editor-facing side of the exhibit
//! service: it turns a typed reference into a file/page pair against the
//! registry's current state and keeps per-reference usage history.

use crate::history::{CitationHistory, HistoryLog};
use crate::reference::CitationReference;
use chrono::Utc;
use docket_ident::ExhibitNumber;
use docket_registry::{ExhibitId, ExhibitRegistry, FileId};
use std::sync::Arc;

/// Where a reference lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationTarget {
    /// Cited exhibit
    pub exhibit_id: ExhibitId,
    /// File to open
    pub file_id: FileId,
    /// Page to open, if known
    pub page: Option<u32>,
}

/// Why a reference did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Text is not `NUMBER LETTER[:PAGE]`
    MalformedReference(String),
    /// No live exhibit carries the number (never created, or deleted)
    UnknownExhibit(ExhibitNumber),
    /// Exhibit exists but has no files yet
    NoFiles(ExhibitNumber),
}

/// Outcome of resolving a reference
///
/// A miss is an ordinary value; editors decline to navigate rather than fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Reference points at a file
    Found(CitationTarget),
    /// Reference points nowhere
    NotFound(NotFoundReason),
}

impl Resolution {
    /// Whether the reference resolved
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Target, if resolved
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&CitationTarget> {
        match self {
            Self::Found(target) => Some(target),
            Self::NotFound(_) => None,
        }
    }
}

/// Editor collaborator seam
///
/// Receives the reference text to place at the current cursor. The resolver
/// never edits document content itself.
#[cfg_attr(test, mockall::automock)]
pub trait CitationSink: Send + Sync {
    /// Place `reference` at the cursor; `target` is where it resolves
    fn place_reference(&self, reference: &str, target: &CitationTarget);
}

/// Autocomplete entry for citation pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Exhibit
    pub exhibit_id: ExhibitId,
    /// Its number
    pub number: ExhibitNumber,
    /// Its title
    pub title: String,
    /// Attached file count
    pub file_count: usize,
}

/// Resolves citation references against a case registry
pub struct CitationResolver {
    registry: Arc<ExhibitRegistry>,
    history: HistoryLog,
    sink: Option<Arc<dyn CitationSink>>,
}

impl std::fmt::Debug for CitationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationResolver")
            .field("case", self.registry.case_id())
            .field("history_rows", &self.history.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl CitationResolver {
    /// Resolver over `registry` with no editor attached
    #[must_use]
    pub fn new(registry: Arc<ExhibitRegistry>) -> Self {
        Self {
            registry,
            history: HistoryLog::new(),
            sink: None,
        }
    }

    /// Attach the editor collaborator used by [`CitationResolver::insert`]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn CitationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Registry being resolved against
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ExhibitRegistry> {
        &self.registry
    }

    /// Resolve `reference` to a file and page
    ///
    /// File choice: the primary file, else the sole file, else the earliest
    /// attached one. Page: the explicit page, else that file's default page.
    /// Successful resolutions upsert the history row keyed by the literal
    /// (trimmed) reference.
    pub fn resolve(&self, reference: &str) -> Resolution {
        let literal = reference.trim();
        let parsed = match CitationReference::parse(literal) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Unresolvable reference '{}': {}", literal, e);
                return Resolution::NotFound(NotFoundReason::MalformedReference(
                    literal.to_string(),
                ));
            }
        };

        let number = ExhibitNumber::Valid(parsed.identifier);
        let Some(exhibit) = self.registry.find_by_number(&number) else {
            tracing::debug!("Reference '{}' names no live exhibit", literal);
            return Resolution::NotFound(NotFoundReason::UnknownExhibit(number));
        };
        let Some(file) = exhibit.citation_file() else {
            return Resolution::NotFound(NotFoundReason::NoFiles(number));
        };

        let target = CitationTarget {
            exhibit_id: exhibit.id,
            file_id: file.file_id.clone(),
            page: parsed.page.or(file.page_number),
        };

        let row = self
            .history
            .record(literal, &target.file_id, target.page, Utc::now());
        tracing::debug!(
            "Resolved '{}' to {} page {:?} (count {})",
            literal,
            target.file_id,
            target.page,
            row.access_count
        );

        Resolution::Found(target)
    }

    /// Validate `reference` and ask the editor to place it
    ///
    /// The sink is only notified when the reference resolves.
    pub fn insert(&self, reference: &str) -> Resolution {
        let resolution = self.resolve(reference);
        if let (Resolution::Found(target), Some(sink)) = (&resolution, &self.sink) {
            sink.place_reference(reference.trim(), target);
        }
        resolution
    }

    /// History row for a literal reference
    #[must_use]
    pub fn history(&self, reference: &str) -> Option<CitationHistory> {
        self.history.get(reference.trim())
    }

    /// Most recently used references first
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<CitationHistory> {
        self.history.recent(limit)
    }

    /// Exhibits whose number starts with `prefix` (case-insensitive), in display order
    #[must_use]
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let wanted = prefix.trim().to_ascii_uppercase();
        self.registry
            .list_sorted()
            .into_iter()
            .filter(|e| {
                e.exhibit_number
                    .to_string()
                    .to_ascii_uppercase()
                    .starts_with(&wanted)
            })
            .take(limit)
            .map(|e| Suggestion {
                exhibit_id: e.id,
                number: e.exhibit_number,
                title: e.title,
                file_count: e.files.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_registry::{CaseId, ExhibitDraft, FileAttachment, RegistryConfig};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn setup() -> (Arc<ExhibitRegistry>, CitationResolver) {
        let registry = Arc::new(ExhibitRegistry::new(
            CaseId::new("case-1"),
            RegistryConfig::default(),
        ));
        let resolver = CitationResolver::new(Arc::clone(&registry));
        (registry, resolver)
    }

    fn num(raw: &str) -> ExhibitNumber {
        ExhibitNumber::from_raw(raw)
    }

    #[test]
    fn resolves_primary_with_explicit_page() {
        let (registry, resolver) = setup();
        registry.attach_file("f0", num("12B"), false).unwrap();
        registry.attach_file("f1", num("12B"), true).unwrap();

        let resolution = resolver.resolve("12B:4");
        let target = resolution.target().unwrap();
        assert_eq!(target.file_id, FileId::new("f1"));
        assert_eq!(target.page, Some(4));
        assert_eq!(resolver.history("12B:4").unwrap().access_count, 1);
    }

    #[test]
    fn sole_file_without_primary() {
        let (registry, resolver) = setup();
        registry.attach_file("only", num("3A"), false).unwrap();

        let target = resolver.resolve("3a").target().cloned().unwrap();
        assert_eq!(target.file_id, FileId::new("only"));
        assert_eq!(target.page, None);
    }

    #[test]
    fn falls_back_to_default_page() {
        let (registry, resolver) = setup();
        registry
            .attach(
                FileAttachment::new(FileId::new("f1"), num("4A"))
                    .primary(true)
                    .with_page(17),
            )
            .unwrap();

        assert_eq!(resolver.resolve("4A").target().unwrap().page, Some(17));
        assert_eq!(resolver.resolve("4A:2").target().unwrap().page, Some(2));
    }

    #[test]
    fn not_found_reasons() {
        let (registry, resolver) = setup();
        registry.create(num("1A"), ExhibitDraft::new()).unwrap();

        assert_eq!(
            resolver.resolve("1A"),
            Resolution::NotFound(NotFoundReason::NoFiles(num("1A")))
        );
        assert_eq!(
            resolver.resolve("9Z"),
            Resolution::NotFound(NotFoundReason::UnknownExhibit(num("9Z")))
        );
        assert_eq!(
            resolver.resolve("nonsense"),
            Resolution::NotFound(NotFoundReason::MalformedReference("nonsense".into()))
        );
        assert!(resolver.recent(10).is_empty());
    }

    #[test]
    fn misses_do_not_touch_history() {
        let (registry, resolver) = setup();
        let out = registry.attach_file("f1", num("12B"), true).unwrap();

        assert!(resolver.resolve("12B").is_found());
        registry.delete(out.exhibit_id);

        assert!(!resolver.resolve("12B").is_found());
        assert_eq!(resolver.history("12B").unwrap().access_count, 1);
    }

    #[test]
    fn history_is_per_literal() {
        let (registry, resolver) = setup();
        registry.attach_file("f1", num("2A"), true).unwrap();

        resolver.resolve("2A");
        resolver.resolve("2A");
        resolver.resolve("2A:3");

        assert_eq!(resolver.history("2A").unwrap().access_count, 2);
        assert_eq!(resolver.history("2A:3").unwrap().access_count, 1);
        assert_eq!(resolver.recent(10).len(), 2);
    }

    #[test]
    fn insert_notifies_sink_on_success_only() {
        let (registry, _) = setup();
        let out = registry.attach_file("f1", num("5C"), true).unwrap();

        let expected = CitationTarget {
            exhibit_id: out.exhibit_id,
            file_id: FileId::new("f1"),
            page: Some(2),
        };
        let mut sink = MockCitationSink::new();
        sink.expect_place_reference()
            .with(eq("5C:2"), eq(expected))
            .times(1)
            .return_const(());

        let resolver = CitationResolver::new(Arc::clone(&registry)).with_sink(Arc::new(sink));

        assert!(resolver.insert(" 5C:2 ").is_found());
        assert!(!resolver.insert("6C").is_found());
    }

    #[test]
    fn suggest_filters_by_prefix() {
        let (registry, resolver) = setup();
        for raw in ["1A", "1B", "12A", "2A"] {
            registry.create(num(raw), ExhibitDraft::new()).unwrap();
        }

        let numbers: Vec<String> = resolver
            .suggest("1", 10)
            .into_iter()
            .map(|s| s.number.to_string())
            .collect();
        assert_eq!(numbers, vec!["1A", "1B", "12A"]);

        assert_eq!(resolver.suggest("1b", 10).len(), 1);
        assert_eq!(resolver.suggest("", 2).len(), 2);
    }
}
