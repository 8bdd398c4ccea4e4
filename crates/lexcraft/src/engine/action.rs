//! # Token actions
//!
//! An action runs when the engine settles on a candidate match for a token.
//! It inspects the match through a [`MatchContext`] and answers with an
//! [`Action`] telling the engine what to do next. Actions never unwind: rejecting
//! a match, switching lexical contexts and failing are all ordinary return
//! values.
//!
//! ```rust
//! use lexcraft::engine::{Action, MatchContext};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Number,
//! }
//!
//! // Reject numbers with leading zeros so a shorter match can be tried.
//! let action = |ctx: &mut MatchContext<'_, Kind>| -> Action<Kind> {
//!     if ctx.text().len() > 1 && ctx.text().starts_with('0') {
//!         Action::Reject
//!     } else {
//!         Action::Continue
//!     }
//! };
//! # let _ = action;
//! ```

use super::stream::Position;
use super::ContextStack;
use crate::error::{GrammarError, LexErrorKind};
use crate::kind::TokenKind;
use crate::lexer::Lexer;
use compact_str::CompactString;
use std::sync::Arc;

/// What the engine does with a match after running its token's action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<T> {
    /// Produce a token of `kind` with `text`.
    Accept { kind: T, text: CompactString },
    /// Produce the matched token with its default text.
    Continue,
    /// Consume the match and produce nothing.
    Skip,
    /// Discard this candidate; the stacked engine tries the next one.
    Reject,
    /// Consume the match and enter the named context.
    PushContext(CompactString),
    /// Consume the match and return to the enclosing context.
    PopContext,
    /// Abort the current read with an error at the start of the match.
    Fail(LexErrorKind),
}

impl<T> Action<T> {
    #[must_use]
    pub fn accept(kind: T, text: impl Into<CompactString>) -> Self {
        Self::Accept {
            kind,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn push(context: impl Into<CompactString>) -> Self {
        Self::PushContext(context.into())
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(LexErrorKind::custom(message))
    }
}

impl<T> From<LexErrorKind> for Action<T> {
    fn from(kind: LexErrorKind) -> Self {
        Self::Fail(kind)
    }
}

/// Callback attached to a token definition.
pub type ActionFn<T> = Arc<dyn Fn(&mut MatchContext<'_, T>) -> Action<T> + Send + Sync>;

/// View of the current match handed to an action.
pub struct MatchContext<'a, T> {
    pub(crate) lexer: &'a Lexer<T>,
    pub(crate) stack: &'a mut ContextStack,
    pub(crate) buffer: &'a mut String,
    pub(crate) kind: Option<T>,
    pub(crate) text: &'a str,
    pub(crate) position: Position,
}

impl<'a, T: TokenKind> MatchContext<'a, T> {
    /// Type of the matched token; `None` for unnamed tokens.
    #[must_use]
    pub const fn kind(&self) -> Option<T> {
        self.kind
    }

    /// The matched input.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Where the match starts.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Name of the active context.
    #[must_use]
    pub fn current_context(&self) -> &str {
        self.lexer.context_name(self.stack.current())
    }

    /// Number of active contexts, the default one included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Scratch text owned by the session and shared by every action, e.g. to
    /// assemble a string literal across several matches.
    #[must_use]
    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        &mut *self.buffer
    }

    /// Empties the scratch buffer, returning its previous content.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut *self.buffer)
    }

    /// Enters the named context; the next token is read from its table.
    ///
    /// # Errors
    ///
    /// [`GrammarError::UndefinedContext`] if no context has that name.
    pub fn push_context(&mut self, name: &str) -> Result<(), LexErrorKind> {
        let index = self
            .lexer
            .context_index(name)
            .ok_or_else(|| GrammarError::UndefinedContext(name.into()))?;
        self.stack.push(index);
        Ok(())
    }

    /// Returns to the enclosing context.
    ///
    /// # Errors
    ///
    /// [`LexErrorKind::EmptyContextStack`] if only the default context is active.
    pub fn pop_context(&mut self) -> Result<(), LexErrorKind> {
        self.stack.pop().map(|_| ())
    }
}
