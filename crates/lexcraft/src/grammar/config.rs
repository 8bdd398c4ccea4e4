/// Automaton construction used when compiling a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Construction {
    /// Position automaton over all tokens at once; no epsilon edges.
    #[default]
    Glushkov,
    /// One structural fragment per expression node, joined by epsilon edges.
    Thompson,
}

/// How an engine resolves the candidates of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineKind {
    /// Longest, highest-priority match only; actions cannot reject.
    Basic,
    /// Every candidate, tried until one is not rejected.
    #[default]
    Stacked,
}

/// Configuration for grammar compilation
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// NFA construction algorithm
    pub construction: Construction,

    /// Merge equivalent DFA states before serializing
    pub minimize: bool,

    /// Engine strategy used by `Lexer::process`
    pub engine: EngineKind,

    /// Keep each context's DFA next to its table for inspection
    pub retain_automaton: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            construction: Construction::Glushkov,
            minimize: true,
            engine: EngineKind::Stacked,
            retain_automaton: false,
        }
    }
}
