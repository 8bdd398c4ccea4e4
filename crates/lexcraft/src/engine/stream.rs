//! # Revertible character streams
//!
//! The tokenizer reads ahead while scanning for the longest match and then
//! rewinds to the boundary of the match it picks. [`RevertibleStream`] is the
//! contract it needs from its input:
//!
//! - [`position`](RevertibleStream::position) hands out a [`Position`] handle,
//! - [`revert`](RevertibleStream::revert) rewinds to a handle,
//! - [`commit`](RevertibleStream::commit) declares everything before a handle
//!   consumed for good, so the stream may release it,
//! - [`read`](RevertibleStream::read) yields the next character or `None` at
//!   the end.
//!
//! [`StringStream`] implements it over an in-memory string.

/// A location in the input.
///
/// `line` is 1-based and `column` 0-based; the column resets after every `'\n'`.
/// Positions are ordered by `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Characters read since the start of the input.
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 0,
    };

    /// The position after reading `c` from here.
    #[must_use]
    pub const fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 0,
            }
        } else {
            Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Character input that can be rewound to any uncommitted position.
pub trait RevertibleStream {
    /// Handle to the current position.
    fn position(&self) -> Position;

    /// Rewinds to `position`, which must not precede the last committed position.
    fn revert(&mut self, position: Position);

    /// Marks everything before `position` as consumed.
    fn commit(&mut self, position: Position);

    /// Next character, or `None` at the end of input.
    fn read(&mut self) -> Option<char>;

    fn is_eof(&self) -> bool;

    /// Reads up to `end`, returning the characters read.
    fn read_until(&mut self, end: Position) -> String {
        let mut text = String::new();
        while self.position() < end {
            match self.read() {
                Some(c) => text.push(c),
                None => break,
            }
        }
        text
    }
}

/// In-memory stream over a string.
#[derive(Debug, Clone)]
pub struct StringStream {
    chars: Vec<char>,
    position: Position,
    committed: usize,
}

impl StringStream {
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: Position::START,
            committed: 0,
        }
    }

    /// Offset of the last committed position.
    #[must_use]
    pub const fn committed(&self) -> usize {
        self.committed
    }

    /// Characters not yet read.
    #[must_use]
    pub fn remaining(&self) -> String {
        self.chars[self.position.offset..].iter().collect()
    }
}

impl From<&str> for StringStream {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl RevertibleStream for StringStream {
    fn position(&self) -> Position {
        self.position
    }

    fn revert(&mut self, position: Position) {
        debug_assert!(
            position.offset >= self.committed,
            "revert to {position} before committed offset {}",
            self.committed
        );
        self.position = position;
    }

    fn commit(&mut self, position: Position) {
        self.committed = self.committed.max(position.offset);
    }

    fn read(&mut self) -> Option<char> {
        let c = *self.chars.get(self.position.offset)?;
        self.position = self.position.advance(c);
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.position.offset >= self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_bookkeeping() {
        let mut stream = StringStream::new("ab\ncd");
        for _ in 0..3 {
            stream.read();
        }
        let p = stream.position();
        assert_eq!((p.offset, p.line, p.column), (3, 2, 0));
        stream.read();
        assert_eq!(stream.position().column, 1);
    }

    #[test]
    fn test_revert_restores_line_info() {
        let mut stream = StringStream::new("x\ny");
        let start = stream.position();
        assert_eq!(stream.read_until(Position { offset: 3, line: 2, column: 1 }), "x\ny");
        assert!(stream.is_eof());
        assert_eq!(stream.read(), None);
        stream.revert(start);
        assert_eq!(stream.position(), Position::START);
        assert_eq!(stream.read(), Some('x'));
    }

    #[test]
    fn test_commit_is_monotonic() {
        let mut stream = StringStream::new("hello");
        stream.read();
        stream.read();
        stream.commit(stream.position());
        stream.commit(Position::START);
        assert_eq!(stream.committed(), 2);
        assert_eq!(stream.remaining(), "llo");
    }

    #[test]
    fn test_positions_order_by_offset() {
        let a = Position::START;
        let b = a.advance('\n');
        assert!(a < b);
        assert_eq!(b.to_string(), "2:0");
    }
}
