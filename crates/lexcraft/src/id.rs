//! Integer handles used by the automaton arenas and compiled tables.

/// State ID in an NFA, DFA or compiled table.
///
/// Uses u32 which is sufficient for all practical automaton sizes.
/// Conversions to usize for indexing are safe on all platforms (usize >= 32 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub u32);

impl StateId {
    /// Sentinel stored in a transition matrix for "no transition".
    pub const DEAD: Self = Self(u32::MAX);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    // State counts are bounded by the alphabet and the token set; they never reach u32::MAX
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[must_use]
    pub const fn is_dead(self) -> bool {
        self.0 == u32::MAX
    }
}

/// Identifier of a token within its lexical context.
///
/// Ids follow definition order, so a lower id means a higher priority when two
/// tokens match input of the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenId(pub u32);

impl TokenId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    // Token counts are extremely unlikely to exceed u32::MAX
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
