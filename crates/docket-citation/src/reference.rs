//! Citation reference grammar
//!
//! A reference is `<identifier>` or `<identifier>:<page>` where the page is a
//! positive integer, e.g. `12B` or `12B:4`.

use docket_ident::{Identifier, IdentifierError};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Parsed citation reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CitationReference {
    /// Cited exhibit
    pub identifier: Identifier,

    /// Explicit page, if given
    pub page: Option<u32>,
}

impl CitationReference {
    /// Reference to an exhibit without a page
    #[inline]
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            page: None,
        }
    }

    /// Reference to a specific page
    #[inline]
    #[must_use]
    pub fn with_page(identifier: Identifier, page: u32) -> Self {
        Self {
            identifier,
            page: Some(page),
        }
    }

    /// Parse `NUMBER LETTER[:PAGE]`
    ///
    /// # Errors
    /// - [`ReferenceError::InvalidIdentifier`] when the exhibit part is malformed
    /// - [`ReferenceError::InvalidPage`] when the page is not a positive integer
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let trimmed = raw.trim();
        let (exhibit, page) = match trimmed.split_once(':') {
            Some((exhibit, page)) => (exhibit, Some(page.trim())),
            None => (trimmed, None),
        };

        let identifier = docket_ident::parse(exhibit)?;
        let page = page.map(parse_page).transpose()?;

        Ok(Self { identifier, page })
    }
}

fn parse_page(raw: &str) -> Result<u32, ReferenceError> {
    let invalid = || ReferenceError::InvalidPage {
        input: raw.to_string(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(page) => Ok(page),
    }
}

impl Display for CitationReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "{}:{}", self.identifier, page),
            None => write!(f, "{}", self.identifier),
        }
    }
}

impl FromStr for CitationReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Reference parse failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// Exhibit part is not a valid identifier
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// Page part is not a positive integer
    #[error("invalid page '{input}': expected a positive integer")]
    InvalidPage {
        /// Offending page text
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_page() {
        let r = CitationReference::parse("12b").unwrap();
        assert_eq!(r.identifier.to_string(), "12B");
        assert_eq!(r.page, None);
    }

    #[test]
    fn parse_with_page() {
        let r: CitationReference = " 12B:4 ".parse().unwrap();
        assert_eq!(r.page, Some(4));
        assert_eq!(r.to_string(), "12B:4");
    }

    #[test]
    fn rejects_bad_pages() {
        for raw in ["12B:", "12B:0", "12B:-1", "12B:four", "12B:4:5", "12B:99999999999"] {
            assert!(
                matches!(CitationReference::parse(raw), Err(ReferenceError::InvalidPage { .. })),
                "expected page error for '{raw}'"
            );
        }
    }

    #[test]
    fn rejects_bad_identifiers() {
        for raw in ["", ":4", "B12", "12:4", "12BC:1"] {
            assert!(
                matches!(CitationReference::parse(raw), Err(ReferenceError::InvalidIdentifier(_))),
                "expected identifier error for '{raw}'"
            );
        }
    }
}
