//! # Grammar definition
//!
//! A [`LexGrammar`] holds the token definitions of every lexical context and
//! compiles them into a [`Lexer`].
//!
//! ## Contexts
//!
//! The context named [`DEFAULT_CONTEXT`] always exists and is where tokenizing
//! starts. Further contexts (for example the inside of a string literal) are
//! defined with [`LexGrammar::define_context`]; each is compiled into its own
//! table covering only its own tokens. Actions switch between them at run time.
//! Only the default context can define sub-contexts.
//!
//! ## Priorities
//!
//! Tokens are numbered in definition order within their context. When several
//! tokens match input of the same length, the one defined first wins.
//!
//! ## Example
//!
//! ```rust
//! use lexcraft::{LexGrammar, Regex};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     If,
//!     Ident,
//!     Space,
//! }
//!
//! let mut grammar = LexGrammar::new();
//! grammar.define_token(Kind::If, "if");
//! grammar.define_token(Kind::Ident, Regex::range('a', 'z').one_or_many());
//! grammar.define_token(Kind::Space, Regex::single(' ')).ignore();
//!
//! let lexer = grammar.compile();
//! let kinds: Vec<Kind> = lexer
//!     .process_str("if iffy")
//!     .map(|token| token.map(|t| t.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(kinds, vec![Kind::If, Kind::Ident]);
//! ```

mod config;
mod context;
mod token;

pub use config::{Construction, EngineKind, LexerConfig};
pub use context::{ContextBuilder, LexContext};
pub use token::{TokenInfo, TokenPattern};

use crate::error::GrammarError;
use crate::kind::TokenKind;
use crate::lexer::Lexer;
use compact_str::CompactString;
use hashbrown::HashMap;

/// Name of the context tokenizing starts in.
pub const DEFAULT_CONTEXT: &str = "DEFAULT";

/// Token definitions of the default context and every sub-context.
#[derive(Debug, Clone)]
pub struct LexGrammar<T> {
    pub(crate) contexts: Vec<LexContext<T>>,
    names: HashMap<CompactString, usize, ahash::RandomState>,
}

impl<T: TokenKind> Default for LexGrammar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenKind> LexGrammar<T> {
    #[must_use]
    pub fn new() -> Self {
        let mut names = HashMap::with_hasher(ahash::RandomState::new());
        names.insert(CompactString::const_new(DEFAULT_CONTEXT), 0);
        Self {
            contexts: vec![LexContext::new(DEFAULT_CONTEXT)],
            names,
        }
    }

    /// Defines a token in the default context.
    pub fn define_token(&mut self, kind: T, pattern: impl Into<TokenPattern>) -> &mut TokenInfo<T> {
        self.contexts[0].define(kind, pattern.into())
    }

    /// Defines a token without a type in the default context. It only produces
    /// output through its action; by default its matches are skipped.
    pub fn define_unnamed(&mut self, pattern: impl Into<TokenPattern>) -> &mut TokenInfo<T> {
        self.contexts[0].define_unnamed(pattern.into())
    }

    /// Declares a token type without a pattern, so actions can produce it and
    /// [`LexGrammar::token`] can find it.
    pub fn declare_token(&mut self, kind: T) -> &mut TokenInfo<T> {
        self.contexts[0].declare(kind)
    }

    /// Token of the default context with type `kind`.
    ///
    /// # Errors
    ///
    /// [`GrammarError::UndefinedToken`] if the type was neither defined nor declared.
    pub fn token(&self, kind: T) -> Result<&TokenInfo<T>, GrammarError> {
        self.contexts[0].token_by_kind(kind)
    }

    /// # Errors
    ///
    /// [`GrammarError::UndefinedToken`] if the type was neither defined nor declared.
    pub fn token_mut(&mut self, kind: T) -> Result<&mut TokenInfo<T>, GrammarError> {
        self.contexts[0].token_mut(kind)
    }

    /// Creates a sub-context.
    ///
    /// # Errors
    ///
    /// [`GrammarError::DuplicateContext`] if a context with that name exists,
    /// including the default one.
    pub fn define_context(&mut self, name: &str) -> Result<ContextBuilder<'_, T>, GrammarError> {
        if self.names.contains_key(name) {
            return Err(GrammarError::DuplicateContext(name.into()));
        }
        let index = self.contexts.len();
        self.contexts.push(LexContext::new(name));
        self.names.insert(name.into(), index);
        Ok(ContextBuilder::new(self, index))
    }

    /// Reopens a sub-context defined earlier.
    ///
    /// # Errors
    ///
    /// [`GrammarError::UndefinedContext`] if no sub-context has that name.
    pub fn context(&mut self, name: &str) -> Result<ContextBuilder<'_, T>, GrammarError> {
        match self.names.get(name).copied() {
            Some(index) if index != 0 => Ok(ContextBuilder::new(self, index)),
            _ => Err(GrammarError::UndefinedContext(name.into())),
        }
    }

    #[must_use]
    pub fn contexts(&self) -> &[LexContext<T>] {
        &self.contexts
    }

    /// Compiles every context with the default [`LexerConfig`].
    #[must_use]
    pub fn compile(self) -> Lexer<T> {
        self.compile_with(LexerConfig::default())
    }

    #[must_use]
    pub fn compile_with(self, config: LexerConfig) -> Lexer<T> {
        Lexer::compile(self.contexts, self.names, config)
    }
}
