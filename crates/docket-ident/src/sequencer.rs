//! Next-identifier proposal
//!
//! Provides [`Sequencer`], which picks the next unused identifier for a case
//! from the set of identifiers already assigned.

use crate::grammar::Identifier;
use std::collections::BTreeSet;

/// Proposes the next unused exhibit identifier
///
/// # Policy
/// - empty case → `1A`
/// - otherwise take the highest number `N` and propose the letter after the
///   highest letter already used under `N`
/// - once `Z` is used under `N`, move on to `(N + 1, A)`
///
/// The candidate is checked against the full existing set before it is
/// returned, so the result is never already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequencer {
    ceiling: Option<u32>,
}

impl Sequencer {
    /// Unbounded sequencer
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { ceiling: None }
    }

    /// Sequencer that never proposes a number above `max_number`
    #[inline]
    #[must_use]
    pub const fn with_ceiling(max_number: u32) -> Self {
        Self {
            ceiling: Some(max_number),
        }
    }

    /// Configured ceiling, if any
    #[inline]
    #[must_use]
    pub const fn ceiling(&self) -> Option<u32> {
        self.ceiling
    }

    /// Compute the next unused identifier
    ///
    /// # Errors
    /// Returns [`SequenceError::Exhausted`] when the proposal would exceed the
    /// ceiling (or `u32::MAX` without one).
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a, I>(&self, existing: I) -> Result<Identifier, SequenceError>
    where
        I: IntoIterator<Item = &'a Identifier>,
    {
        let taken: BTreeSet<Identifier> = existing.into_iter().copied().collect();

        let mut candidate = match taken.last() {
            None => Identifier::first(),
            Some(highest) => self.advance(*highest)?,
        };

        while taken.contains(&candidate) {
            candidate = self.advance(candidate)?;
        }

        self.check_ceiling(candidate)?;
        Ok(candidate)
    }

    fn advance(&self, from: Identifier) -> Result<Identifier, SequenceError> {
        if let Some(next) = from.next_letter() {
            return Ok(next);
        }

        let number = from
            .number()
            .checked_add(1)
            .ok_or(SequenceError::Exhausted {
                ceiling: self.ceiling.unwrap_or(u32::MAX),
            })?;
        let next = Identifier::new(number, 'A').map_err(|_| SequenceError::Exhausted {
            ceiling: self.ceiling.unwrap_or(u32::MAX),
        })?;
        self.check_ceiling(next)?;
        Ok(next)
    }

    fn check_ceiling(&self, candidate: Identifier) -> Result<(), SequenceError> {
        match self.ceiling {
            Some(ceiling) if candidate.number() > ceiling => {
                Err(SequenceError::Exhausted { ceiling })
            }
            _ => Ok(()),
        }
    }
}

/// Sequencer failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// Every identifier up to the ceiling is taken
    #[error("no exhibit identifier available at or below number {ceiling}")]
    Exhausted {
        /// Highest number the sequencer may use
        ceiling: u32,
    },
}
