//! # Lexcraft
//!
//! A lexical-analyzer generator: token definitions in, finite-state tokenizer out.
//!
//! ## Overview
//!
//! Lexcraft compiles named token definitions (literal strings or regular
//! expressions, in priority order) into a dense transition table per lexical
//! context, and runs that table over an input stream:
//!
//! - **Regular expressions**: an immutable six-variant expression tree ([`Regex`])
//! - **Automaton construction**: structural ([`nfa::thompson`]) or position-based
//!   ([`nfa::glushkov`]) NFAs, determinized by subset construction
//! - **Minimization**: partition refinement over the serialized automaton
//! - **Tokenizing**: longest match with priority tie-break, token actions that
//!   accept, reject, skip or fail, and a stack of nested lexical contexts
//!
//! ## Quick Start
//!
//! ```rust
//! use lexcraft::{LexGrammar, Regex};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Digit,
//!     If,
//!     Alphabet,
//!     As,
//!     Whitespace,
//! }
//!
//! let mut grammar = LexGrammar::new();
//! grammar.define_token(Kind::Digit, Regex::range('0', '1').one_or_many());
//! grammar.define_token(Kind::If, "if");
//! grammar.define_token(
//!     Kind::Alphabet,
//!     Regex::charset(('a'..='z').chain('A'..='Z')).one_or_many(),
//! );
//! grammar.define_token(Kind::As, "as");
//! grammar.define_token(Kind::Whitespace, Regex::charset([' ', '\n']));
//!
//! let lexer = grammar.compile();
//! let tokens = lexer.tokenize("if as").unwrap();
//! let pairs: Vec<(Kind, &str)> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
//! assert_eq!(
//!     pairs,
//!     vec![(Kind::If, "if"), (Kind::Whitespace, " "), (Kind::Alphabet, "as")]
//! );
//! ```
//!
//! `"if"` beats `Alphabet` because both match two characters and `If` was
//! defined first; `"as"` is an `Alphabet` for the same reason.
//!
//! ## Actions and contexts
//!
//! A token can carry an action that decides what a match becomes; see
//! [`engine::Action`]. Actions may also switch the active lexical context, which
//! is how string literals with escapes are usually handled: the opening quote
//! pushes a `string` context whose tokens assemble the literal in a scratch
//! buffer until the closing quote pops back.
//!
//! ## Feature Flags
//!
//! - **`serialize`**: serde support for [`table::CompiledTable`]

pub mod dfa;
pub mod dot;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod id;
mod kind;
pub mod lexer;
pub mod nfa;
pub mod regex;
pub mod table;

pub use engine::{Action, Engine, MatchContext, Position, RevertibleStream, StringStream, Token};
pub use error::{GrammarError, LexError, LexErrorKind, TableError};
pub use grammar::{
    Construction, EngineKind, LexGrammar, LexerConfig, TokenInfo, TokenPattern, DEFAULT_CONTEXT,
};
pub use kind::TokenKind;
pub use lexer::Lexer;
pub use regex::Regex;
