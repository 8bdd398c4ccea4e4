use std::fmt::Debug;
use std::hash::Hash;

/// Type tag attached to produced tokens.
///
/// Any small copyable enum works; the trait is implemented for every type
/// meeting the bounds.
///
/// ```rust
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind {
///     Ident,
///     Number,
/// }
///
/// fn assert_kind<T: lexcraft::TokenKind>() {}
/// assert_kind::<Kind>();
/// ```
pub trait TokenKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> TokenKind for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}
