//! Full-candidate-stack strategy.

use super::{Engine, Outcome, RevertibleStream, Scan};
use crate::error::LexError;
use crate::kind::TokenKind;

impl<T: TokenKind, S: RevertibleStream> Engine<'_, T, S> {
    /// Tries candidates longest first, and by ascending token id within one
    /// length, until one is not rejected.
    pub(super) fn resolve_stacked(&mut self, scan: Scan) -> Result<Outcome<T>, LexError> {
        while let Some(candidate) = self.candidates.pop() {
            match self.apply(candidate, &scan)? {
                Outcome::Rejected => {
                    log::trace!("candidate {} of length {} rejected", candidate.token, candidate.len);
                }
                outcome => return Ok(outcome),
            }
        }
        Err(self.no_match(scan))
    }
}
