//! Citation usage history
//!
//! One row per literal reference string. Rows outlive the exhibits they
//! point at: deleting an exhibit never touches its history.

use chrono::{DateTime, Utc};
use docket_registry::FileId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Usage record for a resolved reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationHistory {
    /// Literal reference as cited, e.g. `12B:4`
    pub exhibit_reference: String,
    /// File the last resolution landed on
    pub target_file_id: FileId,
    /// Page the last resolution landed on
    pub target_page: Option<u32>,
    /// Time of the last resolution
    pub last_accessed_at: DateTime<Utc>,
    /// Number of successful resolutions
    pub access_count: u64,
}

/// History rows keyed by literal reference
#[derive(Debug, Default)]
pub struct HistoryLog {
    rows: Mutex<HashMap<String, CitationHistory>>,
}

impl HistoryLog {
    /// Empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the row for `reference` and bump its counter
    pub fn record(
        &self,
        reference: &str,
        file_id: &FileId,
        page: Option<u32>,
        at: DateTime<Utc>,
    ) -> CitationHistory {
        let mut rows = self.rows.lock();
        let row = rows
            .entry(reference.to_string())
            .or_insert_with(|| CitationHistory {
                exhibit_reference: reference.to_string(),
                target_file_id: file_id.clone(),
                target_page: page,
                last_accessed_at: at,
                access_count: 0,
            });

        row.target_file_id = file_id.clone();
        row.target_page = page;
        row.last_accessed_at = at;
        row.access_count = row.access_count.saturating_add(1);
        row.clone()
    }

    /// Row for a literal reference
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<CitationHistory> {
        self.rows.lock().get(reference).cloned()
    }

    /// Most recently accessed rows first, at most `limit`
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<CitationHistory> {
        let mut rows: Vec<CitationHistory> = self.rows.lock().values().cloned().collect();
        rows.sort_by(|a, b| {
            b.last_accessed_at
                .cmp(&a.last_accessed_at)
                .then_with(|| a.exhibit_reference.cmp(&b.exhibit_reference))
        });
        rows.truncate(limit);
        rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Whether no reference was ever resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
