//! The token cursor: the single place that understands trivia.
//!
//! `advance` always lands on a non-comment token (skipping `LineComment`s
//! forward); `push_back` always restores to a non-comment token (skipping
//! them backward), so the two are exact inverses of each other. Doc comments
//! are *not* skipped by either -- they are meaningful trivia, consumed
//! explicitly by `parser::doc_comments`.

use corec_ast::TokenKind;
use corec_diagnostics::{Diagnostics, DiagnosticKind};
use corec_span::TokenIndex;

pub struct Cursor<'a> {
    kinds: &'a [TokenKind],
    pos: TokenIndex,
}

impl<'a> Cursor<'a> {
    pub fn new(kinds: &'a [TokenKind]) -> Self {
        let mut cursor = Self { kinds, pos: 0 };
        while cursor.pos < cursor.last_index() && cursor.kind_at(cursor.pos).is_line_comment() {
            cursor.pos += 1;
        }
        cursor
    }

    fn kind_at(&self, i: TokenIndex) -> &TokenKind {
        &self.kinds[i as usize]
    }

    fn last_index(&self) -> TokenIndex {
        (self.kinds.len() - 1) as TokenIndex
    }

    /// The index of the current (non-trivia) token.
    pub fn peek(&self) -> TokenIndex {
        self.pos
    }

    pub fn peek_kind(&self) -> &TokenKind {
        self.kind_at(self.pos)
    }

    /// Look `dist` non-comment tokens ahead of the current one, without consuming.
    pub fn look_ahead_kind(&self, dist: u32) -> &TokenKind {
        let mut i = self.pos;
        let mut left = dist;
        while left > 0 && i < self.last_index() {
            i += 1;
            if !self.kind_at(i).is_line_comment() {
                left -= 1;
            }
        }
        self.kind_at(i)
    }

    /// Consumes the current token and returns its index, then skips forward
    /// over any line comments so the cursor lands on the next real token.
    pub fn advance(&mut self) -> TokenIndex {
        let produced = self.pos;
        self.step_forward_over_comments();
        produced
    }

    fn step_forward_over_comments(&mut self) {
        while self.pos < self.last_index() {
            self.pos += 1;
            if !self.kind_at(self.pos).is_line_comment() {
                break;
            }
        }
    }

    /// Restores the cursor to `index`, which must be the token most recently
    /// produced by `advance` (walking backward over any line comments in
    /// between). Misuse -- pushing back to anything else -- is a parser bug,
    /// caught here rather than silently corrupting the cursor.
    pub fn push_back(&mut self, index: TokenIndex) {
        assert!(index <= self.pos, "push_back must move the cursor backward");
        assert!(!self.kind_at(index).is_line_comment(), "push_back target must not be a comment token");
        self.pos = index;
    }

    /// Advances and returns `Some(index)` if the current token is `kind`; no-op otherwise.
    pub fn eat(&mut self, kind: &TokenKind) -> Option<TokenIndex> {
        if self.peek_kind() == kind { Some(self.advance()) } else { None }
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Advances and returns `Some(index)` if the current token matches any of `kinds`.
    pub fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<TokenIndex> {
        if kinds.contains(self.peek_kind()) { Some(self.advance()) } else { None }
    }

    /// Advances past `kind`, or records `ExpectedToken` and returns `None` --
    /// a recoverable miss; the cursor does not move on failure.
    pub fn expect(&mut self, kind: TokenKind, diags: &mut Diagnostics) -> Option<TokenIndex> {
        if self.check(&kind) {
            Some(self.advance())
        } else {
            diags.push(DiagnosticKind::ExpectedToken { expected: kind }, self.peek());
            None
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }
}
