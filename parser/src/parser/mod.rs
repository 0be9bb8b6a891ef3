//! The parser core: a cursor over the token arrays, an arena for AST nodes,
//! a diagnostics list, and the small amount of state recovery needs.
//!
//! Grammar productions live in the sibling files of this module and are all
//! implemented as `impl Parser<'_>` blocks, following the staircase-of-
//! free-functions-turned-methods shape of a precedence-climbing parser.

mod asm;
mod container;
mod doc_comments;
mod expression;
mod recovery;
mod statement;
mod switch;

use crate::cursor::Cursor;
use corec_ast::{Arena, Node, NodeId, NodeKind, TokenKind};
use corec_diagnostics::{Diagnostics, DiagnosticKind};
use corec_span::{ByteRange, TokenIndex};

/// The result of parsing one buffer: the arena, token arrays, diagnostics,
/// and the root node. An immutable value once returned by [`crate::parse`];
/// dropping it drops the arena (every node), the token arrays, and the
/// diagnostics together.
pub struct Tree {
    pub source: String,
    pub token_kinds: Vec<TokenKind>,
    pub token_locs: Vec<ByteRange>,
    pub errors: Vec<corec_diagnostics::Diagnostic>,
    pub arena: Arena,
    pub root: NodeId,
}

impl Tree {
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// The source span a node covers: `(start_of(first_token), end_of(last_token))`.
    pub fn span_of(&self, id: NodeId) -> ByteRange {
        let node = self.node(id);
        self.token_locs[node.first_token as usize].merge(self.token_locs[node.last_token as usize])
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }
}

/// What a grammar production returns: a node, nothing (cursor untouched), or
/// a recorded diagnostic (cursor may be arbitrarily advanced; no node built).
pub type PResult<T> = Result<T, ParseError>;

/// Marker for "a diagnostic was already recorded; give up on this production".
/// Carries no data -- the diagnostic itself is the payload, already pushed.
#[derive(Debug, Clone, Copy)]
pub struct ParseError;

pub(crate) struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) kinds: &'a [TokenKind],
    pub(crate) locs: &'a [ByteRange],
    pub(crate) source: &'a str,
    pub(crate) arena: Arena,
    pub(crate) diags: Diagnostics,
    /// Doc comment tokens collected since the last declaration consumed them.
    pub(crate) pending_doc_comments: Vec<TokenIndex>,
    /// Guards `DeclBetweenFields`: fires once per container, on the first
    /// declaration seen after a field (not the reverse -- see DESIGN.md).
    pub(crate) field_state: FieldState,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldState {
    None,
    SeenFields,
    ReportedDeclBetweenFields,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(kinds: &'a [TokenKind], locs: &'a [ByteRange], source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(kinds),
            kinds,
            locs,
            source,
            arena: Arena::with_capacity(kinds.len()),
            diags: Diagnostics::new(),
            pending_doc_comments: Vec::new(),
            field_state: FieldState::None,
        }
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        self.cursor.peek_kind()
    }

    pub(crate) fn peek_index(&self) -> TokenIndex {
        self.cursor.peek()
    }

    pub(crate) fn look_ahead(&self, dist: u32) -> &TokenKind {
        self.cursor.look_ahead_kind(dist)
    }

    pub(crate) fn advance(&mut self) -> TokenIndex {
        self.cursor.advance()
    }

    pub(crate) fn push_back(&mut self, index: TokenIndex) {
        self.cursor.push_back(index);
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Option<TokenIndex> {
        self.cursor.eat(kind)
    }

    pub(crate) fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<TokenIndex> {
        self.cursor.eat_any(kinds)
    }

    /// Eats the expected token, or emits `ExpectedToken` and returns `ParseError`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<TokenIndex> {
        self.cursor.expect(kind.clone(), &mut self.diags).ok_or(ParseError)
    }

    pub(crate) fn emit(&mut self, kind: DiagnosticKind, token: TokenIndex) {
        self.diags.push(kind, token);
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, first: TokenIndex, last: TokenIndex) -> NodeId {
        self.arena.alloc(kind, first, last)
    }

    pub(crate) fn node_span(&self, id: NodeId) -> (TokenIndex, TokenIndex) {
        let n = self.arena.get(id);
        (n.first_token, n.last_token)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }
}

/// Parses `source` into a [`Tree`]. Never fails for syntactic reasons: every
/// issue becomes a diagnostic in `Tree.errors` and the best-effort AST is
/// still returned.
pub fn parse(source: &str) -> Tree {
    let span = tracing::debug_span!("parse", bytes = source.len());
    let _enter = span.enter();

    let tokenized = crate::tokenizer::tokenize(source);
    tracing::trace!(tokens = tokenized.kinds.len(), "tokenized");
    let mut parser = Parser::new(&tokenized.kinds, &tokenized.locs, source);
    let root = parser.parse_root();

    if !parser.diags.is_empty() {
        tracing::debug!(count = parser.diags.len(), "parse completed with diagnostics");
    }

    let errors = parser.diags.into_vec();
    let arena = parser.arena;

    Tree {
        source: source.to_string(),
        token_kinds: tokenized.kinds,
        token_locs: tokenized.locs,
        errors,
        arena,
        root,
    }
}
