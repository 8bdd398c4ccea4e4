//! # Regular expressions
//!
//! Immutable regular-expression trees used as token patterns.
//!
//! The node set is closed: [`RegexNode`] has exactly six variants and every
//! transformation (automaton construction, rendering) is an exhaustive `match`
//! over them. Derived operators such as [`Regex::one_or_many`] or
//! [`Regex::range`] are compositions of those six variants.
//!
//! Nodes are shared through [`Arc`], so cloning a [`Regex`] or reusing a
//! sub-expression in several places is cheap. Automaton construction treats each
//! *occurrence* of a shared node as a distinct position, so
//! `x.concat(&x)` always means "x twice".
//!
//! ```rust
//! use lexcraft::Regex;
//!
//! let letter = Regex::charset(('a'..='z').chain('A'..='Z'));
//! let word = Regex::charset(('a'..='z').chain('A'..='Z').chain('0'..='9'));
//! let ident = letter.concat(&word.many());
//! assert_eq!(ident.to_string(), "Regex[ [A-Za-z]([0-9A-Za-z])* ]");
//! ```

use crate::id::TokenId;
use compact_str::CompactString;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegexNode {
    /// Matches the empty string.
    Empty,
    /// Matches one character out of the set.
    CharSet(BTreeSet<char>),
    /// Matches the text exactly.
    Literal(CompactString),
    Concat(Arc<RegexNode>, Arc<RegexNode>),
    Alt(Arc<RegexNode>, Arc<RegexNode>),
    /// Kleene star.
    Star(Arc<RegexNode>),
}

/// A regular expression, optionally tagged with the token it belongs to.
///
/// Equality is structural and is meant for tests and deduplication only;
/// automaton construction never relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    node: Arc<RegexNode>,
    group: Option<TokenId>,
}

impl Regex {
    fn from_node(node: RegexNode) -> Self {
        Self {
            node: Arc::new(node),
            group: None,
        }
    }

    /// Matches the empty string.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_node(RegexNode::Empty)
    }

    #[must_use]
    pub fn single(c: char) -> Self {
        Self::from_node(RegexNode::CharSet(BTreeSet::from([c])))
    }

    /// Matches any character between `from` and `to`, both inclusive.
    #[must_use]
    pub fn range(from: char, to: char) -> Self {
        Self::from_node(RegexNode::CharSet((from..=to).collect()))
    }

    #[must_use]
    pub fn charset(chars: impl IntoIterator<Item = char>) -> Self {
        Self::from_node(RegexNode::CharSet(chars.into_iter().collect()))
    }

    /// Matches any ASCII character, `'\0'` through `'\x7F'`.
    #[must_use]
    pub fn any_char() -> Self {
        Self::range('\0', '\x7F')
    }

    #[must_use]
    pub fn string(text: impl Into<CompactString>) -> Self {
        Self::from_node(RegexNode::Literal(text.into()))
    }

    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self::from_node(RegexNode::Concat(
            Arc::clone(&self.node),
            Arc::clone(&other.node),
        ))
    }

    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        Self::from_node(RegexNode::Alt(
            Arc::clone(&self.node),
            Arc::clone(&other.node),
        ))
    }

    /// Zero or more repetitions.
    #[must_use]
    pub fn many(&self) -> Self {
        Self::from_node(RegexNode::Star(Arc::clone(&self.node)))
    }

    /// One or more repetitions, `e e*`.
    #[must_use]
    pub fn one_or_many(&self) -> Self {
        self.concat(&self.many())
    }

    /// `e | ε`
    #[must_use]
    pub fn zero_or_one(&self) -> Self {
        self.or(&Self::empty())
    }

    /// Left-nested concatenation of every item; empty input gives [`Regex::empty`].
    #[must_use]
    pub fn sequence<'a>(items: impl IntoIterator<Item = &'a Self>) -> Self {
        items
            .into_iter()
            .fold(None, |acc: Option<Self>, item| match acc {
                None => Some(item.ungrouped()),
                Some(acc) => Some(acc.concat(item)),
            })
            .unwrap_or_else(Self::empty)
    }

    /// Left-nested alternation of every item; empty input gives [`Regex::empty`].
    #[must_use]
    pub fn alternatives<'a>(items: impl IntoIterator<Item = &'a Self>) -> Self {
        items
            .into_iter()
            .fold(None, |acc: Option<Self>, item| match acc {
                None => Some(item.ungrouped()),
                Some(acc) => Some(acc.or(item)),
            })
            .unwrap_or_else(Self::empty)
    }

    /// Tags this root with the token that owns it. Does not affect matching.
    #[must_use]
    pub fn group(&self, id: TokenId) -> Self {
        Self {
            node: Arc::clone(&self.node),
            group: Some(id),
        }
    }

    #[must_use]
    pub const fn group_id(&self) -> Option<TokenId> {
        self.group
    }

    #[must_use]
    pub fn node(&self) -> &Arc<RegexNode> {
        &self.node
    }

    fn ungrouped(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            group: None,
        }
    }

    /// Whether the expression accepts the empty string.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.node.is_nullable()
    }
}

impl RegexNode {
    /// Number of nodes reachable from this one, counting shared nodes once per occurrence.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Empty | Self::CharSet(_) | Self::Literal(_) => 1,
            Self::Concat(l, r) | Self::Alt(l, r) => 1 + l.size() + r.size(),
            Self::Star(inner) => 1 + inner.size(),
        }
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Empty | Self::Star(_) => true,
            Self::Literal(text) => text.is_empty(),
            Self::CharSet(_) => false,
            Self::Concat(l, r) => l.is_nullable() && r.is_nullable(),
            Self::Alt(l, r) => l.is_nullable() || r.is_nullable(),
        }
    }
}

impl From<RegexNode> for Regex {
    fn from(node: RegexNode) -> Self {
        Self::from_node(node)
    }
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if c.is_ascii_graphic() && !"[]()|*\\-^".contains(c) {
        write!(f, "{c}")
    } else {
        write!(f, "{}", c.escape_debug())
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, set: &BTreeSet<char>) -> fmt::Result {
    if set.len() == 1 {
        if let Some(&c) = set.first() {
            return write_char(f, c);
        }
    }
    f.write_str("[")?;
    let mut chars = set.iter().copied().peekable();
    while let Some(start) = chars.next() {
        let mut end = start;
        while let Some(&next) = chars.peek() {
            if u32::from(next) == u32::from(end) + 1 {
                end = next;
                chars.next();
            } else {
                break;
            }
        }
        write_char(f, start)?;
        if end != start {
            if u32::from(end) > u32::from(start) + 1 {
                f.write_str("-")?;
            }
            write_char(f, end)?;
        }
    }
    f.write_str("]")
}

impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("ε"),
            Self::CharSet(set) => write_set(f, set),
            Self::Literal(text) => write!(f, "\"{}\"", text.escape_debug()),
            Self::Concat(l, r) => write!(f, "{l}{r}"),
            Self::Alt(l, r) => write!(f, "({l}|{r})"),
            Self::Star(inner) => write!(f, "({inner})*"),
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Regex[ {} ]", self.node)
    }
}
