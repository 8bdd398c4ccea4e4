use crate::engine::{Action, ActionFn, MatchContext};
use crate::id::TokenId;
use crate::kind::TokenKind;
use crate::regex::Regex;
use compact_str::CompactString;
use std::sync::Arc;

/// What a token matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPattern {
    /// Exact text; also the default text of produced tokens.
    Literal(CompactString),
    Regex(Regex),
}

impl TokenPattern {
    #[must_use]
    pub fn to_regex(&self) -> Regex {
        match self {
            Self::Literal(text) => Regex::string(text.clone()),
            Self::Regex(regex) => regex.clone(),
        }
    }

    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Regex(_) => None,
        }
    }
}

impl From<&str> for TokenPattern {
    fn from(text: &str) -> Self {
        Self::Literal(text.into())
    }
}

impl From<String> for TokenPattern {
    fn from(text: String) -> Self {
        Self::Literal(text.into())
    }
}

impl From<CompactString> for TokenPattern {
    fn from(text: CompactString) -> Self {
        Self::Literal(text)
    }
}

impl From<Regex> for TokenPattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

impl From<&Regex> for TokenPattern {
    fn from(regex: &Regex) -> Self {
        Self::Regex(regex.clone())
    }
}

/// A token of a lexical context.
///
/// Returned by the `define_*` methods so an action can be attached:
///
/// ```rust
/// use lexcraft::{LexGrammar, Regex};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind {
///     Space,
/// }
///
/// let mut grammar = LexGrammar::new();
/// grammar.define_token(Kind::Space, Regex::charset([' ', '\t']).one_or_many()).ignore();
/// ```
pub struct TokenInfo<T> {
    id: TokenId,
    kind: Option<T>,
    pattern: Option<TokenPattern>,
    action: Option<ActionFn<T>>,
}

impl<T: Clone> Clone for TokenInfo<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind.clone(),
            pattern: self.pattern.clone(),
            action: self.action.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TokenInfo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfo")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<T: TokenKind> TokenInfo<T> {
    pub(crate) const fn new(id: TokenId, kind: Option<T>, pattern: Option<TokenPattern>) -> Self {
        Self {
            id,
            kind,
            pattern,
            action: None,
        }
    }

    /// Position in definition order; lower ids win ties.
    #[must_use]
    pub const fn id(&self) -> TokenId {
        self.id
    }

    /// Type tag; `None` for unnamed tokens.
    #[must_use]
    pub const fn kind(&self) -> Option<T> {
        self.kind
    }

    #[must_use]
    pub const fn pattern(&self) -> Option<&TokenPattern> {
        self.pattern.as_ref()
    }

    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        self.pattern.as_ref().and_then(TokenPattern::literal)
    }

    /// Declared by type only; takes no part in matching.
    #[must_use]
    pub const fn is_declaration(&self) -> bool {
        self.pattern.is_none()
    }

    #[must_use]
    pub fn action(&self) -> Option<&ActionFn<T>> {
        self.action.as_ref()
    }

    /// Runs `action` whenever this token is matched, replacing any previous one.
    pub fn set_action<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut MatchContext<'_, T>) -> Action<T> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Consumes matches of this token without producing tokens.
    pub fn ignore(&mut self) -> &mut Self {
        self.set_action(|_| Action::Skip)
    }
}
