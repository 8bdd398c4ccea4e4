//! # Error Types
//!
//! Error types for grammar definition and tokenization.
//!
//! ## Overview
//!
//! Two families of errors exist:
//!
//! - [`GrammarError`]: raised while defining or looking up tokens and contexts
//!   (undefined token type, undefined context, nested sub-context).
//! - [`LexError`]: raised while tokenizing. It always carries the [`Position`]
//!   where the failure happened and renders as `[line:column]: message`.
//!
//! Grammar errors triggered from inside a running action (for example pushing a
//! context that was never defined) are wrapped into [`LexErrorKind::Grammar`], so
//! callers of the engine see a single position-tagged error type.
//!
//! ## Usage
//!
//! ```rust
//! use lexcraft::error::{LexError, LexErrorKind};
//! use lexcraft::engine::Position;
//!
//! let err = LexError::new(Position::START, LexErrorKind::UnexpectedChar('$'));
//! assert_eq!(err.to_string(), "[1:0]: Unexpected character '$'");
//! ```

use crate::engine::Position;
use compact_str::CompactString;
use thiserror::Error;

/// Errors raised while building a grammar or resolving names in it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Undefined token: {0}")]
    UndefinedToken(String),

    #[error("Undefined context: {0}")]
    UndefinedContext(CompactString),

    #[error("Context '{0}' cannot define sub-contexts, only the default context can")]
    NestedContext(CompactString),

    #[error("Context '{0}' is already defined")]
    DuplicateContext(CompactString),
}

impl GrammarError {
    /// Builds an [`GrammarError::UndefinedToken`] from any debuggable token kind.
    #[must_use]
    pub fn undefined_token(kind: &impl std::fmt::Debug) -> Self {
        Self::UndefinedToken(format!("{kind:?}"))
    }
}

/// Reasons a table assembled from stored parts is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Transition matrix has {found} entries, expected {expected}")]
    Dimensions { expected: usize, found: usize },

    #[error("State {0} is out of range")]
    StateOutOfRange(u32),

    #[error("Alphabet is not strictly ascending at '{}'", .0.escape_debug())]
    UnsortedAlphabet(char),
}

/// Tokenizer error with location information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{}:{}]: {kind}", .position.line, .position.column)]
pub struct LexError {
    pub position: Position,
    #[source]
    pub kind: LexErrorKind,
}

/// Types of tokenizer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("Unexpected character '{}'", .0.escape_debug())]
    UnexpectedChar(char),

    #[error("Unexpected end of file")]
    UnexpectedEof,

    /// Input ended while a sub-context (named here) was still active.
    #[error("Unexpected end of file inside context '{0}'")]
    ContextStackNonEmpty(CompactString),

    #[error("Cannot pop the base context")]
    EmptyContextStack,

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// Failure reported by a token action.
    #[error("{0}")]
    Custom(String),
}

impl LexError {
    #[must_use]
    pub const fn new(position: Position, kind: LexErrorKind) -> Self {
        Self { position, kind }
    }

    #[must_use]
    pub const fn unexpected_char(position: Position, c: char) -> Self {
        Self::new(position, LexErrorKind::UnexpectedChar(c))
    }

    #[must_use]
    pub const fn unexpected_eof(position: Position) -> Self {
        Self::new(position, LexErrorKind::UnexpectedEof)
    }

    /// The 1-based line of the failure.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.position.line
    }

    /// The 0-based column of the failure.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.position.column
    }
}

impl LexErrorKind {
    /// Convenience constructor for action-supplied failures.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let position = Position {
            offset: 12,
            line: 3,
            column: 4,
        };
        let err = LexError::new(position, LexErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "[3:4]: Unexpected end of file");
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 4);
    }

    #[test]
    fn test_escaped_char_in_message() {
        let err = LexError::unexpected_char(Position::START, '\n');
        assert_eq!(err.to_string(), "[1:0]: Unexpected character '\\n'");
    }

    #[test]
    fn test_grammar_error_is_transparent() {
        let kind: LexErrorKind = GrammarError::UndefinedContext("string".into()).into();
        let err = LexError::new(Position::START, kind);
        assert_eq!(err.to_string(), "[1:0]: Undefined context: string");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = LexError::new(Position::START, LexErrorKind::EmptyContextStack);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Cannot pop the base context"));
    }
}
