//! # Tokenizing engine
//!
//! An [`Engine`] runs a compiled [`Lexer`] over a [`RevertibleStream`], one
//! token per [`Engine::read_token`] call.
//!
//! ## Scanning
//!
//! Each read starts in the start state of the active context's table and
//! consumes characters while the table has a transition for them. Whenever the
//! current state recognises tokens, the position and token ids are recorded as
//! *candidates*. The scan stops at the first character without a transition or
//! at the end of input. Only non-empty matches become candidates.
//!
//! ## Strategies
//!
//! - [`EngineKind::Basic`] keeps only the longest candidate and its
//!   highest-priority token. An action rejecting it is an
//!   [`LexErrorKind::Unsupported`] error.
//! - [`EngineKind::Stacked`] keeps every candidate and tries them longest first,
//!   lowest token id first within one length, until one is not rejected.
//!
//! ## Contexts
//!
//! The engine keeps a stack of active contexts with the default context at the
//! bottom. Actions push and pop it. When the input ends while a sub-context is
//! still active the read fails with [`LexErrorKind::ContextStackNonEmpty`].

mod action;
mod basic;
mod stacked;
pub mod stream;

pub use action::{Action, ActionFn, MatchContext};
pub use stream::{Position, RevertibleStream, StringStream};

use crate::error::{GrammarError, LexError, LexErrorKind};
use crate::grammar::{EngineKind, TokenInfo};
use crate::id::TokenId;
use crate::kind::TokenKind;
use crate::lexer::Lexer;
use crate::table::CompiledTable;
use compact_str::CompactString;
use smallvec::SmallVec;

/// A token produced by the engine.
///
/// Equality compares `kind` and `text` only, not the position.
#[derive(Debug, Clone)]
pub struct Token<T> {
    pub kind: T,
    pub text: CompactString,
    /// Where the match starts.
    pub position: Position,
}

impl<T: PartialEq> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl<T: Eq> Eq for Token<T> {}

impl<T> Token<T> {
    #[must_use]
    pub fn new(kind: T, text: impl Into<CompactString>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Stack of active context indices. The default context (index 0) is always
/// at the bottom and cannot be popped.
#[derive(Debug, Clone)]
pub struct ContextStack {
    frames: SmallVec<[usize; 4]>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    #[must_use]
    pub fn new() -> Self {
        let mut frames = SmallVec::new();
        frames.push(0);
        Self { frames }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.frames.last().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, context: usize) {
        self.frames.push(context);
    }

    /// Pops the active context and returns it.
    ///
    /// # Errors
    ///
    /// [`LexErrorKind::EmptyContextStack`] when only the default context is left.
    pub fn pop(&mut self) -> Result<usize, LexErrorKind> {
        if self.frames.len() <= 1 {
            return Err(LexErrorKind::EmptyContextStack);
        }
        self.frames.pop().ok_or(LexErrorKind::EmptyContextStack)
    }
}

/// A recorded accepting point of the current scan.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    end: Position,
    /// Byte length of the match within the scanned text.
    len: usize,
    token: TokenId,
}

#[derive(Debug, Clone, Copy)]
enum ScanEnd {
    /// `c` at `at` has no transition.
    Dead { c: char, at: Position },
    Eof,
}

#[derive(Debug, Clone, Copy)]
struct Scan {
    /// Context whose table produced the candidates.
    context: usize,
    start: Position,
    end: ScanEnd,
}

/// What resolving one candidate produced.
enum Outcome<T> {
    Token(Token<T>),
    /// The match was consumed without producing a token.
    Skipped,
    Rejected,
}

/// Tokenizing session over one stream.
///
/// Owns everything that changes while tokenizing (the stream cursor, the
/// context stack, the candidate list and the action scratch buffer); the
/// [`Lexer`] itself is only borrowed and may serve many sessions at once.
pub struct Engine<'l, T: TokenKind, S: RevertibleStream> {
    lexer: &'l Lexer<T>,
    stream: S,
    strategy: EngineKind,
    stack: ContextStack,
    buffer: String,
    candidates: Vec<Candidate>,
    scanned: String,
    finished: bool,
}

impl<'l, T: TokenKind, S: RevertibleStream> Engine<'l, T, S> {
    pub(crate) fn new(lexer: &'l Lexer<T>, stream: S, strategy: EngineKind) -> Self {
        Self {
            lexer,
            stream,
            strategy,
            stack: ContextStack::new(),
            buffer: String::new(),
            candidates: Vec::new(),
            scanned: String::new(),
            finished: false,
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> EngineKind {
        self.strategy
    }

    #[must_use]
    pub const fn stream(&self) -> &S {
        &self.stream
    }

    #[must_use]
    pub fn into_stream(self) -> S {
        self.stream
    }

    /// Name of the active context.
    #[must_use]
    pub fn current_context(&self) -> &'l str {
        self.lexer.context_name(self.stack.current())
    }

    #[must_use]
    pub fn context_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Reads the next token.
    ///
    /// Returns `Ok(None)` once the input is exhausted with only the default
    /// context active. Matches that produce no token (skipped, or used to switch
    /// contexts) are consumed without returning.
    ///
    /// # Errors
    ///
    /// Any [`LexError`]: no token matches, the input ends mid-token or inside a
    /// sub-context, or an action fails.
    pub fn read_token(&mut self) -> Result<Option<Token<T>>, LexError> {
        loop {
            if self.stream.is_eof() {
                return self.finish();
            }
            let lexer = self.lexer;
            let scan = match lexer.context(self.stack.current()).table() {
                Some(table) => self.scan(table),
                None => self.scan_without_table(),
            };
            let outcome = match self.strategy {
                EngineKind::Basic => self.resolve_basic(scan)?,
                EngineKind::Stacked => self.resolve_stacked(scan)?,
            };
            if let Outcome::Token(token) = outcome {
                log::trace!("token {:?} {:?} at {}", token.kind, token.text, token.position);
                return Ok(Some(token));
            }
        }
    }

    /// Reads tokens until the input is exhausted.
    ///
    /// # Errors
    ///
    /// The first error [`Engine::read_token`] reports.
    pub fn read_all_tokens(&mut self) -> Result<Vec<Token<T>>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.read_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn finish(&self) -> Result<Option<Token<T>>, LexError> {
        if self.stack.depth() > 1 {
            return Err(LexError::new(
                self.stream.position(),
                LexErrorKind::ContextStackNonEmpty(self.current_context().into()),
            ));
        }
        Ok(None)
    }

    /// Consumes the longest run the table allows, recording candidates.
    /// Leaves the stream just past the last consumed character.
    fn scan(&mut self, table: &CompiledTable) -> Scan {
        let keep_all = matches!(self.strategy, EngineKind::Stacked);
        self.candidates.clear();
        self.scanned.clear();
        let context = self.stack.current();
        let start = self.stream.position();
        let mut state = table.start();
        loop {
            let before = self.stream.position();
            let Some(c) = self.stream.read() else {
                return Scan {
                    context,
                    start,
                    end: ScanEnd::Eof,
                };
            };
            let Some(next) = table.next_state(state, c) else {
                self.stream.revert(before);
                return Scan {
                    context,
                    start,
                    end: ScanEnd::Dead { c, at: before },
                };
            };
            state = next;
            self.scanned.push(c);

            let matched = table.matched(state);
            if matched.is_empty() {
                continue;
            }
            let end = self.stream.position();
            let len = self.scanned.len();
            if keep_all {
                // Reversed so that popping yields the lowest id first.
                self.candidates.extend(
                    matched
                        .iter()
                        .rev()
                        .map(|&token| Candidate { end, len, token }),
                );
            } else {
                self.candidates.clear();
                self.candidates.push(Candidate {
                    end,
                    len,
                    token: matched[0],
                });
            }
        }
    }

    /// A context without tokens matches nothing.
    fn scan_without_table(&mut self) -> Scan {
        self.candidates.clear();
        self.scanned.clear();
        let start = self.stream.position();
        let end = match self.stream.read() {
            Some(c) => {
                self.stream.revert(start);
                ScanEnd::Dead { c, at: start }
            }
            None => ScanEnd::Eof,
        };
        Scan {
            context: self.stack.current(),
            start,
            end,
        }
    }

    fn no_match(&mut self, scan: Scan) -> LexError {
        let error = match scan.end {
            ScanEnd::Dead { c, at } => LexError::unexpected_char(at, c),
            ScanEnd::Eof => LexError::unexpected_eof(self.stream.position()),
        };
        self.stream.revert(scan.start);
        error
    }

    /// Rewinds to the candidate's boundary and runs its token's action.
    ///
    /// Commits the stream unless the candidate was rejected. A rejected
    /// candidate also leaves the context stack as it was, and the scratch
    /// buffer too when other candidates remain to be tried.
    fn apply(&mut self, candidate: Candidate, scan: &Scan) -> Result<Outcome<T>, LexError> {
        self.stream.revert(candidate.end);
        let lexer = self.lexer;
        let start = scan.start;
        let token = lexer.context(scan.context).token(candidate.token);
        let text = &self.scanned[..candidate.len];

        let outcome = match token.action() {
            None => default_outcome(token, text, start),
            Some(action) => {
                let saved_stack = self.stack.clone();
                let saved_buffer = (!self.candidates.is_empty()).then(|| self.buffer.clone());
                let mut ctx = MatchContext {
                    lexer,
                    stack: &mut self.stack,
                    buffer: &mut self.buffer,
                    kind: token.kind(),
                    text,
                    position: start,
                };
                let outcome = match action(&mut ctx) {
                    Action::Accept { kind, text } => {
                        if !lexer.knows_kind(scan.context, kind) {
                            return Err(LexError::new(
                                start,
                                GrammarError::undefined_token(&kind).into(),
                            ));
                        }
                        Outcome::Token(Token::new(kind, text, start))
                    }
                    Action::Continue => default_outcome(token, text, start),
                    Action::Skip => Outcome::Skipped,
                    Action::Reject => Outcome::Rejected,
                    Action::PushContext(name) => {
                        ctx.push_context(&name)
                            .map_err(|kind| LexError::new(start, kind))?;
                        Outcome::Skipped
                    }
                    Action::PopContext => {
                        ctx.pop_context()
                            .map_err(|kind| LexError::new(start, kind))?;
                        Outcome::Skipped
                    }
                    Action::Fail(kind) => return Err(LexError::new(start, kind)),
                };
                if matches!(outcome, Outcome::Rejected) {
                    self.stack = saved_stack;
                    if let Some(buffer) = saved_buffer {
                        self.buffer = buffer;
                    }
                }
                outcome
            }
        };
        if !matches!(outcome, Outcome::Rejected) {
            self.stream.commit(candidate.end);
        }
        Ok(outcome)
    }
}

/// Accepts the matched token with its literal text, or the consumed text for
/// pattern tokens. Unnamed tokens produce nothing.
fn default_outcome<T: TokenKind>(token: &TokenInfo<T>, text: &str, start: Position) -> Outcome<T> {
    match token.kind() {
        Some(kind) => {
            let text = token.literal().unwrap_or(text);
            Outcome::Token(Token::new(kind, text, start))
        }
        None => Outcome::Skipped,
    }
}

impl<T: TokenKind, S: RevertibleStream> Iterator for Engine<'_, T, S> {
    type Item = Result<Token<T>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_stack_discipline() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.current(), 0);
        assert_eq!(stack.pop(), Err(LexErrorKind::EmptyContextStack));
        stack.push(2);
        stack.push(1);
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.current(), 2);
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Err(LexErrorKind::EmptyContextStack));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_token_equality_ignores_position() {
        let a = Token::new('x', "ab", Position::START);
        let b = Token::new('x', "ab", Position::START.advance('\n'));
        assert_eq!(a, b);
        assert_ne!(a, Token::new('y', "ab", Position::START));
    }
}
