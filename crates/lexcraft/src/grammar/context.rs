use super::token::{TokenInfo, TokenPattern};
use super::LexGrammar;
use crate::error::GrammarError;
use crate::id::TokenId;
use crate::kind::TokenKind;
use crate::regex::Regex;
use compact_str::CompactString;
use hashbrown::HashMap;

/// Token registry of one lexical mode.
///
/// Tokens are kept in definition order and their [`TokenId`] is their index,
/// so earlier definitions win ties between matches of equal length.
#[derive(Debug, Clone)]
pub struct LexContext<T> {
    name: CompactString,
    tokens: Vec<TokenInfo<T>>,
    by_kind: HashMap<T, usize, ahash::RandomState>,
}

impl<T: TokenKind> LexContext<T> {
    pub(crate) fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
            by_kind: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tokens(&self) -> &[TokenInfo<T>] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> &TokenInfo<T> {
        &self.tokens[id.index()]
    }

    /// Looks a token up by type.
    ///
    /// # Errors
    ///
    /// [`GrammarError::UndefinedToken`] if the type was neither defined nor declared here.
    pub fn token_by_kind(&self, kind: T) -> Result<&TokenInfo<T>, GrammarError> {
        self.by_kind
            .get(&kind)
            .map(|&index| &self.tokens[index])
            .ok_or_else(|| GrammarError::undefined_token(&kind))
    }

    fn push(&mut self, kind: Option<T>, pattern: Option<TokenPattern>) -> &mut TokenInfo<T> {
        let index = self.tokens.len();
        self.tokens
            .push(TokenInfo::new(TokenId::from_index(index), kind, pattern));
        if let Some(kind) = kind {
            self.by_kind.insert(kind, index);
        }
        &mut self.tokens[index]
    }

    /// Defines a token. Redefining a type makes lookups by type see the newer
    /// token; the older one keeps matching with its own priority.
    pub(crate) fn define(&mut self, kind: T, pattern: TokenPattern) -> &mut TokenInfo<T> {
        self.push(Some(kind), Some(pattern))
    }

    pub(crate) fn define_unnamed(&mut self, pattern: TokenPattern) -> &mut TokenInfo<T> {
        self.push(None, Some(pattern))
    }

    pub(crate) fn declare(&mut self, kind: T) -> &mut TokenInfo<T> {
        let existing = self.by_kind.get(&kind).copied();
        match existing {
            Some(index) => &mut self.tokens[index],
            None => self.push(Some(kind), None),
        }
    }

    pub(crate) fn token_mut(&mut self, kind: T) -> Result<&mut TokenInfo<T>, GrammarError> {
        let index = self
            .by_kind
            .get(&kind)
            .copied()
            .ok_or_else(|| GrammarError::undefined_token(&kind))?;
        Ok(&mut self.tokens[index])
    }

    /// Pattern of every matchable token, tagged with its id.
    #[must_use]
    pub fn patterns(&self) -> Vec<Regex> {
        self.tokens
            .iter()
            .filter_map(|token| token.pattern().map(|p| p.to_regex().group(token.id())))
            .collect()
    }
}

/// Defines tokens in a named sub-context.
///
/// Obtained from [`LexGrammar::define_context`] or [`LexGrammar::context`].
pub struct ContextBuilder<'g, T> {
    grammar: &'g mut LexGrammar<T>,
    index: usize,
}

impl<'g, T: TokenKind> ContextBuilder<'g, T> {
    pub(crate) fn new(grammar: &'g mut LexGrammar<T>, index: usize) -> Self {
        Self { grammar, index }
    }

    fn context(&mut self) -> &mut LexContext<T> {
        &mut self.grammar.contexts[self.index]
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.grammar.contexts[self.index].name()
    }

    pub fn define_token(&mut self, kind: T, pattern: impl Into<TokenPattern>) -> &mut TokenInfo<T> {
        self.context().define(kind, pattern.into())
    }

    pub fn define_unnamed(&mut self, pattern: impl Into<TokenPattern>) -> &mut TokenInfo<T> {
        self.context().define_unnamed(pattern.into())
    }

    pub fn declare_token(&mut self, kind: T) -> &mut TokenInfo<T> {
        self.context().declare(kind)
    }

    /// # Errors
    ///
    /// [`GrammarError::UndefinedToken`] if the type is unknown in this context.
    pub fn token(&self, kind: T) -> Result<&TokenInfo<T>, GrammarError> {
        self.grammar.contexts[self.index].token_by_kind(kind)
    }

    /// # Errors
    ///
    /// [`GrammarError::UndefinedToken`] if the type is unknown in this context.
    pub fn token_mut(&mut self, kind: T) -> Result<&mut TokenInfo<T>, GrammarError> {
        self.context().token_mut(kind)
    }

    /// Sub-contexts cannot be nested.
    ///
    /// # Errors
    ///
    /// Always [`GrammarError::NestedContext`].
    pub fn define_context(&mut self, _name: &str) -> Result<ContextBuilder<'_, T>, GrammarError> {
        Err(GrammarError::NestedContext(self.name().into()))
    }
}
