//! Exhibit identifier grammar
//!
//! Provides [`Identifier`] (the canonical `<number><letter>` form, e.g. `12B`)
//! and [`ExhibitNumber`], which additionally preserves malformed numbers
//! verbatim so legacy data can still be displayed and ordered.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical exhibit identifier: a positive number followed by one letter
///
/// The letter is always stored uppercase. Ordering is `(number, letter)`
/// ascending, which is the display order of exhibits within a case.
///
/// # Example
/// ```
/// use docket_ident::Identifier;
///
/// let id: Identifier = "012b".parse().unwrap();
/// assert_eq!(id.number(), 12);
/// assert_eq!(id.letter(), 'B');
/// assert_eq!(id.to_string(), "12B");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    number: u32,
    letter: char,
}

impl Identifier {
    /// Create identifier from parts
    ///
    /// # Errors
    /// Returns [`IdentifierError::InvalidFormat`] if `number` is zero or
    /// `letter` is not an ASCII letter.
    pub fn new(number: u32, letter: char) -> Result<Self, IdentifierError> {
        if number == 0 || !letter.is_ascii_alphabetic() {
            return Err(IdentifierError::InvalidFormat {
                input: format(number, letter),
            });
        }
        Ok(Self {
            number,
            letter: letter.to_ascii_uppercase(),
        })
    }

    /// First identifier of a fresh case (`1A`)
    #[inline]
    #[must_use]
    pub const fn first() -> Self {
        Self {
            number: 1,
            letter: 'A',
        }
    }

    /// Numeric part
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Letter part (uppercase)
    #[inline]
    #[must_use]
    pub const fn letter(&self) -> char {
        self.letter
    }

    /// Next letter under the same number, `None` after `Z`
    #[must_use]
    pub fn next_letter(&self) -> Option<Self> {
        if self.letter >= 'Z' {
            return None;
        }
        let next = char::from(self.letter as u8 + 1);
        Some(Self {
            number: self.number,
            letter: next,
        })
    }
}

/// Parse a raw identifier string
///
/// Surrounding whitespace is ignored, the letter is case-insensitive and
/// leading zeros are dropped. The number must be at least 1 and fit in `u32`.
///
/// # Errors
/// Returns [`IdentifierError::InvalidFormat`] for anything else: missing
/// letter, several letters, a non-numeric prefix, an empty string.
pub fn parse(raw: &str) -> Result<Identifier, IdentifierError> {
    let invalid = || IdentifierError::InvalidFormat {
        input: raw.to_string(),
    };

    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next_back().ok_or_else(invalid)?;
    let digits = chars.as_str();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !letter.is_ascii_alphabetic() {
        return Err(invalid());
    }

    let number: u32 = digits.parse().map_err(|_| invalid())?;
    if number == 0 {
        return Err(invalid());
    }

    Ok(Identifier {
        number,
        letter: letter.to_ascii_uppercase(),
    })
}

/// Format identifier parts as `<number><LETTER>`
#[inline]
#[must_use]
pub fn format(number: u32, letter: char) -> String {
    format!("{}{}", number, letter.to_ascii_uppercase())
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}

/// Exhibit number as stored on an exhibit
///
/// Valid numbers carry a parsed [`Identifier`]; anything else is kept as an
/// opaque string. Opaque numbers still occupy a uniqueness slot and always sort
/// after every valid number, lexicographically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExhibitNumber {
    /// Well-formed `<number><letter>` identifier
    Valid(Identifier),

    /// Malformed input preserved verbatim
    Opaque(String),
}

impl ExhibitNumber {
    /// Classify a raw string; never fails
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match parse(raw) {
            Ok(id) => Self::Valid(id),
            Err(_) => Self::Opaque(raw.to_string()),
        }
    }

    /// Parsed identifier, if well-formed
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> Option<Identifier> {
        match self {
            Self::Valid(id) => Some(*id),
            Self::Opaque(_) => None,
        }
    }

    /// Whether this number follows the grammar
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl Ord for ExhibitNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Valid(a), Self::Valid(b)) => a.cmp(b),
            (Self::Valid(_), Self::Opaque(_)) => Ordering::Less,
            (Self::Opaque(_), Self::Valid(_)) => Ordering::Greater,
            (Self::Opaque(a), Self::Opaque(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ExhibitNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ExhibitNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(id) => write!(f, "{id}"),
            Self::Opaque(raw) => f.write_str(raw),
        }
    }
}

impl From<Identifier> for ExhibitNumber {
    fn from(value: Identifier) -> Self {
        Self::Valid(value)
    }
}

impl From<&str> for ExhibitNumber {
    fn from(value: &str) -> Self {
        Self::from_raw(value)
    }
}

impl From<String> for ExhibitNumber {
    fn from(value: String) -> Self {
        match parse(&value) {
            Ok(id) => Self::Valid(id),
            Err(_) => Self::Opaque(value),
        }
    }
}

impl From<ExhibitNumber> for String {
    fn from(value: ExhibitNumber) -> Self {
        match value {
            ExhibitNumber::Valid(id) => id.to_string(),
            ExhibitNumber::Opaque(raw) => raw,
        }
    }
}

/// Errors for identifier parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Input does not follow `<digits><letter>`
    #[error("invalid exhibit identifier '{input}': expected a number followed by one letter, e.g. 12B")]
    InvalidFormat {
        /// Offending input
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: &str) -> Identifier {
        parse(raw).unwrap()
    }

    #[test]
    fn parse_simple() {
        let parsed = id("12B");
        assert_eq!(parsed.number(), 12);
        assert_eq!(parsed.letter(), 'B');
    }

    #[test]
    fn parse_normalizes_case_and_zeros() {
        assert_eq!(id("007c"), Identifier::new(7, 'C').unwrap());
        assert_eq!(id("  3a "), Identifier::new(3, 'A').unwrap());
    }

    #[test]
    fn parse_rejects_malformed() {
        for raw in ["", "12", "B", "12BC", "B12", "1 2B", "12-B", "0A", "000A", "12é", "-1A"] {
            assert!(
                matches!(parse(raw), Err(IdentifierError::InvalidFormat { .. })),
                "expected '{raw}' to be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!(parse("99999999999A").is_err());
    }

    #[test]
    fn new_rejects_zero_and_non_letters() {
        assert!(Identifier::new(0, 'A').is_err());
        assert!(Identifier::new(1, '1').is_err());
        assert_eq!(Identifier::new(4, 'd').unwrap().letter(), 'D');
    }

    #[test]
    fn next_letter_stops_at_z() {
        assert_eq!(id("2A").next_letter(), Some(id("2B")));
        assert_eq!(id("2Z").next_letter(), None);
    }

    #[test]
    fn identifier_order_is_number_then_letter() {
        let mut ids = vec![id("10A"), id("2B"), id("2A"), id("1Z")];
        ids.sort();
        assert_eq!(ids, vec![id("1Z"), id("2A"), id("2B"), id("10A")]);
    }

    #[test]
    fn exhibit_number_classifies() {
        assert!(ExhibitNumber::from_raw("5C").is_valid());
        assert_eq!(
            ExhibitNumber::from_raw("Appendix"),
            ExhibitNumber::Opaque("Appendix".to_string())
        );
    }

    #[test]
    fn opaque_sorts_after_valid() {
        let mut numbers = vec![
            ExhibitNumber::from_raw("zz"),
            ExhibitNumber::from_raw("900Z"),
            ExhibitNumber::from_raw("A-1"),
            ExhibitNumber::from_raw("1A"),
        ];
        numbers.sort();
        let shown: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["1A", "900Z", "A-1", "zz"]);
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&id("12b")).unwrap();
        assert_eq!(json, "\"12B\"");

        let back: ExhibitNumber = serde_json::from_str("\"legacy-7\"").unwrap();
        assert_eq!(back, ExhibitNumber::Opaque("legacy-7".to_string()));

        assert!(serde_json::from_str::<Identifier>("\"12\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(number in 1u32..=u32::MAX, offset in 0u8..26) {
            let letter = char::from(b'A' + offset);
            let parsed = parse(&format(number, letter)).unwrap();
            prop_assert_eq!(parsed.number(), number);
            prop_assert_eq!(parsed.letter(), letter);
        }

        #[test]
        fn prop_from_raw_never_panics(raw in ".{0,24}") {
            let number = ExhibitNumber::from_raw(&raw);
            if let ExhibitNumber::Opaque(kept) = &number {
                prop_assert_eq!(kept, &raw);
            }
        }
    }
}
