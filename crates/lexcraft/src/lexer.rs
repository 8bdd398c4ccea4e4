//! # Compiled lexers
//!
//! [`Lexer`] is the result of [`LexGrammar::compile`](crate::LexGrammar::compile).
//! For every context the token patterns go through
//!
//! ```text
//! patterns -> NFA (Glushkov or Thompson) -> DFA (subset construction)
//!          -> minimized DFA -> CompiledTable
//! ```
//!
//! A context without matchable tokens gets no table and matches nothing. The
//! lexer is immutable and `Send + Sync`; call [`Lexer::process`] once per input
//! to get an [`Engine`] owning that session's state.

use crate::dfa::{minimize::minimize, serialize::serialize, subset, Dfa};
use crate::engine::{Engine, RevertibleStream, StringStream, Token};
use crate::error::LexError;
use crate::grammar::{Construction, EngineKind, LexContext, LexerConfig, TokenInfo};
use crate::id::TokenId;
use crate::kind::TokenKind;
use crate::nfa::{glushkov, thompson};
use crate::table::CompiledTable;
use compact_str::CompactString;
use hashbrown::HashMap;

/// A context together with its compiled table.
#[derive(Debug, Clone)]
pub struct CompiledContext<T> {
    context: LexContext<T>,
    table: Option<CompiledTable>,
    automaton: Option<Dfa>,
}

impl<T: TokenKind> CompiledContext<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        self.context.name()
    }

    #[must_use]
    pub fn tokens(&self) -> &[TokenInfo<T>] {
        self.context.tokens()
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> &TokenInfo<T> {
        self.context.token(id)
    }

    /// `None` when the context has no matchable tokens.
    #[must_use]
    pub const fn table(&self) -> Option<&CompiledTable> {
        self.table.as_ref()
    }

    /// The DFA the table was serialized from, if
    /// [`LexerConfig::retain_automaton`] was set.
    #[must_use]
    pub const fn automaton(&self) -> Option<&Dfa> {
        self.automaton.as_ref()
    }
}

fn compile_context<T: TokenKind>(
    context: &LexContext<T>,
    config: &LexerConfig,
) -> (Option<CompiledTable>, Option<Dfa>) {
    let patterns = context.patterns();
    if patterns.is_empty() {
        log::debug!("context '{}' has no tokens, skipping", context.name());
        return (None, None);
    }

    let nfa = match config.construction {
        Construction::Glushkov => glushkov::translate_all(&patterns),
        Construction::Thompson => thompson::translate_all(&patterns),
    };
    let mut dfa = subset::construct(&nfa);
    let determinized = dfa.len();
    if config.minimize {
        dfa = minimize(&dfa);
    }
    let table = serialize(&dfa);
    log::debug!(
        "compiled context '{}': {} tokens, {:?} NFA {} states, DFA {} states ({} after minimization), {} symbols",
        context.name(),
        patterns.len(),
        config.construction,
        nfa.len(),
        determinized,
        table.state_count(),
        table.alphabet().len()
    );
    let automaton = config.retain_automaton.then_some(dfa);
    (Some(table), automaton)
}

/// Compiled grammar, ready to tokenize.
#[derive(Debug, Clone)]
pub struct Lexer<T> {
    contexts: Vec<CompiledContext<T>>,
    names: HashMap<CompactString, usize, ahash::RandomState>,
    config: LexerConfig,
}

impl<T: TokenKind> Lexer<T> {
    pub(crate) fn compile(
        contexts: Vec<LexContext<T>>,
        names: HashMap<CompactString, usize, ahash::RandomState>,
        config: LexerConfig,
    ) -> Self {
        let contexts = contexts
            .into_iter()
            .map(|context| {
                let (table, automaton) = compile_context(&context, &config);
                CompiledContext {
                    context,
                    table,
                    automaton,
                }
            })
            .collect();
        Self {
            contexts,
            names,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LexerConfig {
        &self.config
    }

    #[must_use]
    pub fn contexts(&self) -> &[CompiledContext<T>] {
        &self.contexts
    }

    #[must_use]
    pub fn context(&self, index: usize) -> &CompiledContext<T> {
        &self.contexts[index]
    }

    #[must_use]
    pub fn context_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    #[must_use]
    pub fn context_name(&self, index: usize) -> &str {
        self.contexts[index].name()
    }

    /// Whether `kind` is defined or declared in context `index` or in the
    /// default context, i.e. whether an action there may produce it.
    #[must_use]
    pub fn knows_kind(&self, index: usize, kind: T) -> bool {
        [index, 0]
            .iter()
            .any(|&i| self.contexts[i].context.token_by_kind(kind).is_ok())
    }

    /// Compiled context by name.
    #[must_use]
    pub fn context_by_name(&self, name: &str) -> Option<&CompiledContext<T>> {
        self.context_index(name).map(|index| &self.contexts[index])
    }

    /// Starts a session over `stream` with the configured engine strategy.
    pub fn process<S: RevertibleStream>(&self, stream: S) -> Engine<'_, T, S> {
        Engine::new(self, stream, self.config.engine)
    }

    pub fn process_with<S: RevertibleStream>(&self, stream: S, engine: EngineKind) -> Engine<'_, T, S> {
        Engine::new(self, stream, engine)
    }

    pub fn process_str(&self, input: &str) -> Engine<'_, T, StringStream> {
        self.process(StringStream::new(input))
    }

    /// Tokenizes all of `input`.
    ///
    /// # Errors
    ///
    /// The first tokenizing error.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token<T>>, LexError> {
        self.process_str(input).read_all_tokens()
    }
}
