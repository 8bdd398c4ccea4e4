//! Single-best-match strategy.

use super::{Engine, Outcome, RevertibleStream, Scan};
use crate::error::{LexError, LexErrorKind};
use crate::kind::TokenKind;

impl<T: TokenKind, S: RevertibleStream> Engine<'_, T, S> {
    /// Resolves the scan using only its longest, highest-priority candidate.
    pub(super) fn resolve_basic(&mut self, scan: Scan) -> Result<Outcome<T>, LexError> {
        let Some(candidate) = self.candidates.pop() else {
            return Err(self.no_match(scan));
        };
        match self.apply(candidate, &scan)? {
            Outcome::Rejected => {
                self.stream.revert(scan.start);
                Err(LexError::new(
                    scan.start,
                    LexErrorKind::Unsupported("the basic engine cannot reject a match"),
                ))
            }
            outcome => Ok(outcome),
        }
    }
}
