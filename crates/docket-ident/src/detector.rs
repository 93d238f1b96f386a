//! Filename-based identifier detection
//!
//! Provides [`AutoDetector`], a purely syntactic scan of filenames for an
//! embedded exhibit identifier. File content is never inspected.

use crate::grammar::{self, Identifier};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;

/// Optional `Exhibit` token, digits, separators, one letter not followed by another letter.
static CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:(exhibit)[ _-]*)?([0-9]+)[ _-]*([A-Za-z])(?:[^A-Za-z]|$)")
        .expect("candidate regex is valid")
});

/// Same shape with the `Exhibit` token mandatory.
static PREFIXED_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:(exhibit)[ _-]*)([0-9]+)[ _-]*([A-Za-z])(?:[^A-Za-z]|$)")
        .expect("prefixed candidate regex is valid")
});

/// Detector settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Only accept identifiers introduced by an `Exhibit` token
    pub require_prefix: bool,
}

impl DetectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With prefix requirement
    #[inline]
    #[must_use]
    pub fn with_require_prefix(mut self, require: bool) -> Self {
        self.require_prefix = require;
        self
    }
}

/// A detected identifier together with where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Normalized identifier
    pub identifier: Identifier,

    /// Text of the filename stem that produced the match (without trailing context)
    pub matched: String,

    /// Byte offset of the match within the stem
    pub offset: usize,

    /// Whether the match was introduced by an `Exhibit` token
    pub prefixed: bool,
}

/// Scans filenames for an exhibit identifier
///
/// # Rules
/// - only the stem is scanned (the extension is dropped)
/// - an optional, case-insensitive `Exhibit` token may precede the number
/// - spaces, hyphens and underscores may separate number and letter
/// - the letter must not be followed by another letter (`2023final` is not `2023F`)
/// - first match by position wins; candidates that fail the grammar (`0A`) are skipped
///
/// # Example
/// ```
/// use docket_ident::AutoDetector;
///
/// let detector = AutoDetector::new();
/// let found = detector.detect("Exhibit 12-B_contract.pdf").unwrap();
/// assert_eq!(found.to_string(), "12B");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDetector {
    config: DetectorConfig,
}

impl AutoDetector {
    /// Detector with default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector with explicit settings
    #[inline]
    #[must_use]
    pub fn with_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Active settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the first identifier embedded in `filename`
    #[inline]
    #[must_use]
    pub fn detect(&self, filename: &str) -> Option<Identifier> {
        self.detect_match(filename).map(|d| d.identifier)
    }

    /// Detect with match details
    #[must_use]
    pub fn detect_match(&self, filename: &str) -> Option<Detection> {
        let stem = stem(filename);
        let pattern: &Regex = if self.config.require_prefix {
            &PREFIXED_CANDIDATE
        } else {
            &CANDIDATE
        };

        let mut start = 0;
        while start <= stem.len() {
            let caps = pattern.captures_at(stem, start)?;
            let (Some(digits), Some(letter)) = (caps.get(2), caps.get(3)) else {
                return None;
            };

            let raw = format!("{}{}", digits.as_str(), letter.as_str());
            if let Ok(identifier) = grammar::parse(&raw) {
                let begin = caps.get(1).map_or(digits.start(), |m| m.start());
                return Some(Detection {
                    identifier,
                    matched: stem[begin..letter.end()].to_string(),
                    offset: begin,
                    prefixed: caps.get(1).is_some(),
                });
            }

            // Resume right after the rejected letter so adjacent candidates are not lost.
            start = letter.end();
        }

        None
    }

    /// Run detection over a batch of filenames, preserving order
    #[must_use]
    pub fn detect_all<'a, I>(&self, filenames: I) -> Vec<(&'a str, Option<Identifier>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        filenames
            .into_iter()
            .map(|name| (name, self.detect(name)))
            .collect()
    }
}

/// Longest suffix after the last dot still treated as an extension
const MAX_EXTENSION_LEN: usize = 5;

/// Filename without directory and extension
///
/// Only a short alphanumeric suffix counts as an extension, so a dotted
/// name such as `Dr. Smith Exhibit 7C` keeps its full text.
fn stem(filename: &str) -> &str {
    let name = Path::new(filename)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(filename);

    match name.rsplit_once('.') {
        Some((base, ext))
            if !base.is_empty()
                && (1..=MAX_EXTENSION_LEN).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            base
        }
        _ => name,
    }
}
