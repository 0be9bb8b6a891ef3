//! Doc comment harvesting.
//!
//! `///` doc comments are peeled off explicitly in front of the declaration
//! they document (parse_doc_comments is always called before dispatching on
//! the next container member or statement). `//!` container doc comments are
//! only meaningful as a block at the very top of a file.

use super::*;
use corec_ast::TokenKind;

impl Parser<'_> {
    /// Collects a run of `///` doc comments starting at the cursor, leaving
    /// the cursor on the first non-doc-comment token.
    pub(crate) fn parse_doc_comments(&mut self) -> Vec<TokenIndex> {
        let mut lines = Vec::new();
        while self.check(&TokenKind::DocComment) {
            lines.push(self.advance());
        }
        lines
    }

    /// Collects a leading run of `//!` container doc comments.
    pub(crate) fn parse_container_doc_comments(&mut self) -> Vec<TokenIndex> {
        let mut lines = Vec::new();
        while self.check(&TokenKind::ContainerDocComment) {
            lines.push(self.advance());
        }
        lines
    }

    /// Call at each iteration of a container-member or statement loop:
    /// refreshes `pending_doc_comments` with any doc comments now at the
    /// cursor, on top of whatever leading doc comments haven't yet been
    /// claimed by a declaration.
    pub(crate) fn refresh_pending_doc_comments(&mut self) {
        let mut fresh = self.parse_doc_comments();
        self.pending_doc_comments.append(&mut fresh);
    }

    /// Claims whatever doc comments are pending for the declaration about to
    /// be built.
    pub(crate) fn take_pending_doc_comments(&mut self) -> Vec<TokenIndex> {
        std::mem::take(&mut self.pending_doc_comments)
    }

    /// If doc comments were collected but nothing claimed them (the next
    /// token wasn't a declaration), report `UnattachedDocComment` once for
    /// the run and drop it.
    pub(crate) fn report_unattached_doc_comments(&mut self) {
        if let Some(&first) = self.pending_doc_comments.first() {
            self.emit(DiagnosticKind::UnattachedDocComment, first);
            self.pending_doc_comments.clear();
        }
    }

    /// A trailing doc comment appended on the same source line as `after`'s
    /// terminating token is attached to the node rather than left pending;
    /// detected by there being no `\n` between the two tokens' byte ranges.
    pub(crate) fn trailing_doc_comment_after(&mut self, after: TokenIndex) -> Option<TokenIndex> {
        if !self.check(&TokenKind::DocComment) {
            return None;
        }
        let gap_start = self.locs[after as usize].end.to_usize();
        let gap_end = self.locs[self.peek_index() as usize].start.to_usize();
        let gap = self.source.get(gap_start..gap_end).unwrap_or("");
        if gap.contains('\n') { None } else { Some(self.advance()) }
    }
}
