//! Byte positions and source ranges.
//!
//! Tokens and AST nodes never store line/column information -- only byte
//! offsets into the original source buffer. Consumers that need line/column
//! pairs derive them from [`ByteRange`] and the source text themselves; see
//! the "Grammar bookkeeping" contract in the parser crate's documentation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A byte offset into a source buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BytePos(pub u32);

impl BytePos {
    pub const fn from_usize(x: usize) -> Self {
        Self(x as u32)
    }

    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl Add<u32> for BytePos {
    type Output = BytePos;

    fn add(self, rhs: u32) -> BytePos {
        BytePos(self.0 + rhs)
    }
}

impl AddAssign<u32> for BytePos {
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

/// A half-open `[start, end)` byte range within a source buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: BytePos,
    pub end: BytePos,
}

impl ByteRange {
    pub const fn new(start: BytePos, end: BytePos) -> Self {
        Self { start, end }
    }

    /// The union of two ranges; the gap between them (if any) is absorbed.
    pub fn merge(self, other: ByteRange) -> ByteRange {
        ByteRange { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    pub fn len(self) -> usize {
        self.end.to_usize() - self.start.to_usize()
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl Add for ByteRange {
    type Output = ByteRange;

    fn add(self, rhs: ByteRange) -> ByteRange {
        self.merge(rhs)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.to_usize(), self.end.to_usize())
    }
}

/// The index of a token within a parsed [`Tree`](../corec_ast/struct.Tree.html)'s token arrays.
///
/// Tokens are referenced by index everywhere in the AST; they are never copied
/// out of the arrays produced by the tokenizer.
pub type TokenIndex = u32;
