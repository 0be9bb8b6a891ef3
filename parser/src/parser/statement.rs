//! Statements: the contents of a `Block`. Each dispatches to either a
//! declaration, a control-flow construct shared with the expression grammar
//! (`if`/`while`/`for`/`switch`, built with [`BodyForm::Statement`] so a
//! non-block body demands a terminator), or a plain assign-expression.

use super::expression::BodyForm;
use super::*;
use corec_ast::NodeKind;
use corec_ast::TokenKind::*;

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> PResult<NodeId> {
        let doc_comments = self.take_pending_doc_comments();
        match self.peek().clone() {
            KeywordConst | KeywordVar => {
                let decl = self.parse_var_decl(doc_comments)?;
                self.expect(Semicolon)?;
                Ok(decl)
            }
            KeywordComptime if *self.look_ahead(1) == KeywordConst || *self.look_ahead(1) == KeywordVar => {
                let start = self.advance();
                let decl = self.parse_var_decl(doc_comments)?;
                self.expect(Semicolon)?;
                let (_, last) = self.node_span(decl);
                Ok(self.alloc(NodeKind::Comptime { body: decl }, start, last))
            }
            KeywordComptime => {
                let start = self.advance();
                let body = self.parse_block_expr(None)?;
                Ok(self.alloc(NodeKind::Comptime { body }, start, self.node_span(body).1))
            }
            KeywordNosuspend => {
                let start = self.advance();
                let body = self.parse_block_stmt_or_assign()?;
                Ok(self.alloc(NodeKind::Nosuspend { body }, start, self.node_span(body).1))
            }
            KeywordSuspend => {
                let start = self.advance();
                if self.check(&Semicolon) {
                    self.advance();
                    return Ok(self.alloc(NodeKind::Suspend { body: None }, start, start));
                }
                let body = self.parse_block_stmt_or_assign()?;
                Ok(self.alloc(NodeKind::Suspend { body: Some(body) }, start, self.node_span(body).1))
            }
            KeywordDefer => self.parse_defer(false),
            KeywordErrdefer => self.parse_defer(true),
            KeywordIf => self.parse_if(BodyForm::Statement),
            KeywordWhile => self.parse_while(BodyForm::Statement),
            KeywordFor => self.parse_for(BodyForm::Statement),
            KeywordSwitch => self.parse_switch_expr(),
            LBrace => self.parse_block_expr(None),
            Identifier if *self.look_ahead(1) == Colon && self.starts_labeled_loop_at(2) => {
                self.parse_labeled_statement()
            }
            _ => {
                let expr = self.parse_expression()?;
                if matches!(self.arena_kind(expr), NodeKind::Block { .. } | NodeKind::If { .. } | NodeKind::While { .. } | NodeKind::For { .. } | NodeKind::Switch { .. }) {
                    return Ok(expr);
                }
                self.expect(Semicolon)?;
                Ok(expr)
            }
        }
    }

    fn arena_kind(&self, id: NodeId) -> &NodeKind {
        &self.arena.get(id).kind
    }

    /// A statement-form body needs a terminator only when it wasn't a
    /// `BlockExpr` -- `{ ... }` bodies need neither `;` nor `else`.
    fn needs_stmt_terminator(&self, form: BodyForm, body: NodeId) -> bool {
        form == BodyForm::Statement && !matches!(self.arena_kind(body), NodeKind::Block { .. })
    }

    /// Consumes the `;` that must follow a non-block statement-form body when
    /// no `else` followed it; records `ExpectedSemiOrElse` otherwise.
    fn require_stmt_terminator(&mut self, last: &mut TokenIndex) {
        if let Some(semi) = self.eat(&Semicolon) {
            *last = semi;
        } else {
            self.emit(DiagnosticKind::ExpectedSemiOrElse, self.peek_index());
        }
    }

    fn starts_labeled_loop_at(&self, dist: u32) -> bool {
        matches!(self.look_ahead(dist), KeywordWhile | KeywordFor | LBrace)
    }

    fn parse_labeled_statement(&mut self) -> PResult<NodeId> {
        let label = self.advance();
        self.expect(Colon)?;
        match self.peek().clone() {
            LBrace => self.parse_block_expr(Some(label)),
            KeywordWhile => self.parse_while_labeled(label, BodyForm::Statement),
            KeywordFor => self.parse_for_labeled(label, BodyForm::Statement),
            _ => {
                self.emit(DiagnosticKind::ExpectedLabelable, self.peek_index());
                Err(ParseError)
            }
        }
    }

    fn parse_block_stmt_or_assign(&mut self) -> PResult<NodeId> {
        if self.check(&LBrace) {
            return self.parse_block_expr(None);
        }
        let expr = self.parse_expression()?;
        self.expect(Semicolon)?;
        Ok(expr)
    }

    fn parse_defer(&mut self, is_err_defer: bool) -> PResult<NodeId> {
        let start = self.advance();
        let payload = if is_err_defer { self.try_parse_payload()? } else { None };
        let body = self.parse_block_stmt_or_assign()?;
        let (_, last) = self.node_span(body);
        Ok(self.alloc(NodeKind::Defer { is_err_defer, payload, body }, start, last))
    }

    pub(crate) fn parse_var_decl(&mut self, doc_comments: Vec<TokenIndex>) -> PResult<NodeId> {
        let is_const = self.check(&KeywordConst);
        let start = self.advance(); // `const` or `var`
        let name_token = self.expect(Identifier)?;
        let type_expr = if self.eat(&Colon).is_some() { Some(self.parse_prefix_expr()?) } else { None };
        let align_expr = if self.eat(&KeywordAlign).is_some() {
            self.expect(LParen)?;
            let e = self.parse_expression()?;
            self.expect(RParen)?;
            Some(e)
        } else {
            None
        };
        let linksection_expr = if self.eat(&KeywordLinksection).is_some() {
            self.expect(LParen)?;
            let e = self.parse_expression()?;
            self.expect(RParen)?;
            Some(e)
        } else {
            None
        };
        let value = if self.eat(&Equal).is_some() { Some(self.parse_expression()?) } else { None };
        let last = value
            .map(|v| self.node_span(v).1)
            .or(linksection_expr.map(|v| self.node_span(v).1))
            .or(align_expr.map(|v| self.node_span(v).1))
            .or(type_expr.map(|v| self.node_span(v).1))
            .unwrap_or(name_token);
        Ok(self.alloc(
            NodeKind::VarDecl {
                is_pub: false,
                is_export: false,
                is_extern: false,
                is_threadlocal: false,
                extern_lib: None,
                is_const,
                name_token,
                type_expr,
                align_expr,
                linksection_expr,
                value,
                doc_comments,
            },
            start,
            last,
        ))
    }

    pub(crate) fn parse_if(&mut self, form: BodyForm) -> PResult<NodeId> {
        let start = self.advance();
        self.expect(LParen)?;
        let condition = self.parse_expression()?;
        self.expect(RParen)?;
        let payload = self.try_parse_payload()?;
        let then_branch = self.parse_body(form)?;
        let mut last = self.node_span(then_branch).1;
        let then_needs_terminator = self.needs_stmt_terminator(form, then_branch);
        let (else_payload, else_branch) = if self.check(&KeywordElse) {
            self.advance();
            let p = if self.check(&Pipe) { self.try_parse_payload()? } else { None };
            let b = self.parse_body(form)?;
            last = self.node_span(b).1;
            if self.needs_stmt_terminator(form, b) {
                self.require_stmt_terminator(&mut last);
            }
            (p, Some(b))
        } else {
            if then_needs_terminator {
                self.require_stmt_terminator(&mut last);
            }
            (None, None)
        };
        Ok(self.alloc(NodeKind::If { condition, payload, then_branch, else_payload, else_branch }, start, last))
    }

    pub(crate) fn parse_while(&mut self, form: BodyForm) -> PResult<NodeId> {
        let start = self.peek_index();
        self.parse_while_inner(None, start, form)
    }

    pub(crate) fn parse_while_labeled(&mut self, label: TokenIndex, form: BodyForm) -> PResult<NodeId> {
        self.parse_while_inner(Some(label), label, form)
    }

    fn parse_while_inner(&mut self, label: Option<TokenIndex>, start: TokenIndex, form: BodyForm) -> PResult<NodeId> {
        self.expect(KeywordWhile)?;
        self.expect(LParen)?;
        let condition = self.parse_expression()?;
        self.expect(RParen)?;
        let payload = self.try_parse_payload()?;
        let continue_expr = if self.eat(&Colon).is_some() {
            self.expect(LParen)?;
            let e = self.parse_expression()?;
            self.expect(RParen)?;
            Some(e)
        } else {
            None
        };
        let body = self.parse_body(form)?;
        let mut last = self.node_span(body).1;
        let body_needs_terminator = self.needs_stmt_terminator(form, body);
        let (else_payload, else_branch) = if self.check(&KeywordElse) {
            self.advance();
            let p = if self.check(&Pipe) { self.try_parse_payload()? } else { None };
            let b = self.parse_body(form)?;
            last = self.node_span(b).1;
            if self.needs_stmt_terminator(form, b) {
                self.require_stmt_terminator(&mut last);
            }
            (p, Some(b))
        } else {
            if body_needs_terminator {
                self.require_stmt_terminator(&mut last);
            }
            (None, None)
        };
        Ok(self.alloc(NodeKind::While { label, condition, payload, continue_expr, body, else_payload, else_branch }, start, last))
    }

    pub(crate) fn parse_for(&mut self, form: BodyForm) -> PResult<NodeId> {
        let start = self.peek_index();
        self.parse_for_inner(None, start, form)
    }

    pub(crate) fn parse_for_labeled(&mut self, label: TokenIndex, form: BodyForm) -> PResult<NodeId> {
        self.parse_for_inner(Some(label), label, form)
    }

    fn parse_for_inner(&mut self, label: Option<TokenIndex>, start: TokenIndex, form: BodyForm) -> PResult<NodeId> {
        self.expect(KeywordFor)?;
        self.expect(LParen)?;
        let mut inputs = Vec::new();
        loop {
            let seq_start = self.peek_index();
            let sequence = self.parse_expression()?;
            let (capture_token, capture_is_ptr) = if self.eat(&Pipe).is_some() {
                let is_ptr = self.eat(&Star).is_some();
                let name = self.expect(Identifier)?;
                self.expect(Pipe)?;
                (Some(name), is_ptr)
            } else {
                (None, false)
            };
            let last = self.node_span(sequence).1;
            inputs.push(self.alloc(NodeKind::ForInput { sequence, capture_token, capture_is_ptr }, seq_start, last));
            if self.eat(&Comma).is_none() {
                break;
            }
            if self.check(&RParen) {
                break;
            }
        }
        self.expect(RParen)?;
        let body = self.parse_body(form)?;
        let mut last = self.node_span(body).1;
        let body_needs_terminator = self.needs_stmt_terminator(form, body);
        let else_branch = if self.check(&KeywordElse) {
            self.advance();
            let b = self.parse_body(form)?;
            last = self.node_span(b).1;
            if self.needs_stmt_terminator(form, b) {
                self.require_stmt_terminator(&mut last);
            }
            Some(b)
        } else {
            if body_needs_terminator {
                self.require_stmt_terminator(&mut last);
            }
            None
        };
        Ok(self.alloc(NodeKind::For { label, inputs, index_capture: None, body, else_branch }, start, last))
    }

    /// A construct's body: always a `BlockExpr` in [`BodyForm::Expr`]
    /// position; in [`BodyForm::Statement`] position it may instead be a
    /// single `AssignExpr`, which the caller is responsible for terminating.
    fn parse_body(&mut self, form: BodyForm) -> PResult<NodeId> {
        if self.check(&LBrace) {
            return self.parse_block_expr(None);
        }
        match form {
            BodyForm::Expr => {
                self.emit(DiagnosticKind::ExpectedLBrace, self.peek_index());
                Err(ParseError)
            }
            BodyForm::Statement => self.parse_expression(),
        }
    }
}
