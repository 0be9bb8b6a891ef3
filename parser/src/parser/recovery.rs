//! Synchronisation routines: the two places a failed production's caller
//! resumes parsing from after a `ParseError`.

use super::*;
use corec_ast::TokenKind;

/// Stop set for [`Parser::find_next_container_member`]: any of these
/// starting at depth 0 begins a new, plausible container member.
const CONTAINER_MEMBER_STARTS: &[TokenKind] = &[
    TokenKind::KeywordTest,
    TokenKind::KeywordComptime,
    TokenKind::KeywordPub,
    TokenKind::KeywordExport,
    TokenKind::KeywordExtern,
    TokenKind::KeywordInline,
    TokenKind::KeywordNoinline,
    TokenKind::KeywordUsingnamespace,
    TokenKind::KeywordThreadlocal,
    TokenKind::KeywordConst,
    TokenKind::KeywordVar,
    TokenKind::KeywordFn,
    TokenKind::Identifier,
];

impl Parser<'_> {
    /// Scans forward from the cursor, tracking `( [ {` depth, looking for the
    /// next plausible start of a container member (or a stray separator) at
    /// depth 0. Used at container/top level after a `ParseError`.
    pub(crate) fn find_next_container_member(&mut self) {
        let mut depth: i32 = 0;
        loop {
            if depth == 0 {
                if self.is_eof() {
                    return;
                }
                if CONTAINER_MEMBER_STARTS.contains(self.peek()) {
                    return;
                }
                if matches!(self.peek(), TokenKind::Comma | TokenKind::Semicolon) {
                    self.advance();
                    return;
                }
            }
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    depth -= 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        // Belongs to the enclosing container; leave it for our caller.
                        return;
                    }
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scans forward from the cursor tracking only `{}` depth, stopping at
    /// the next `;` at depth 0 (consumed) or the matching `}` (left alone).
    /// Used inside block statement loops after a `ParseError`.
    pub(crate) fn find_next_stmt(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
