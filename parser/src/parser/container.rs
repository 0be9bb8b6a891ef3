//! Container members: the file root and the body of `struct`/`enum`/`union`
//! declarations share this grammar (the root is simply a container with no
//! enclosing braces). Dispatch order mirrors the grammar: doc comments,
//! `test`, `comptime`, `usingnamespace`, optional `pub` + declaration, then
//! falling through to a container field.

use super::*;
use corec_ast::NodeKind;
use corec_ast::TokenKind::*;

impl Parser<'_> {
    pub(crate) fn parse_root(&mut self) -> NodeId {
        self.parse_container_doc_comments();
        let decls = self.parse_container_members().unwrap_or_default();
        let eof_token = self.expect(Eof).unwrap_or_else(|_| self.peek_index());
        self.alloc(NodeKind::Root { decls, eof_token }, 0, eof_token)
    }

    /// Parses members until `}` or EOF, resynchronising on each failed
    /// member via [`Parser::find_next_container_member`]. Field-state
    /// tracking is scoped per call so nested containers start clean.
    pub(crate) fn parse_container_members(&mut self) -> PResult<Vec<NodeId>> {
        let saved_field_state = std::mem::replace(&mut self.field_state, FieldState::None);
        let mut members = Vec::new();
        loop {
            self.refresh_pending_doc_comments();
            if self.is_eof() || self.check(&RBrace) {
                break;
            }
            match self.parse_container_member() {
                Ok(Some(node)) => members.push(node),
                Ok(None) => {}
                Err(ParseError) => self.find_next_container_member(),
            }
        }
        self.report_unattached_doc_comments();
        self.field_state = saved_field_state;
        Ok(members)
    }

    fn parse_container_member(&mut self) -> PResult<Option<NodeId>> {
        if matches!(self.peek(), Comma | Semicolon) {
            self.advance();
            return Ok(None);
        }
        match self.peek().clone() {
            KeywordTest => self.parse_test_decl().map(Some),
            KeywordComptime if *self.look_ahead(1) == LBrace => self.parse_top_level_comptime().map(Some),
            KeywordUsingnamespace => self.parse_use_decl().map(Some),
            KeywordPub => {
                let pub_tok = self.advance();
                self.parse_top_level_decl(Some(pub_tok)).map(Some)
            }
            KeywordExport | KeywordExtern | KeywordInline | KeywordNoinline | KeywordThreadlocal | KeywordConst
            | KeywordVar | KeywordFn | KeywordComptime => self.parse_top_level_decl(None).map(Some),
            _ => self.parse_container_field().map(Some),
        }
    }

    fn parse_test_decl(&mut self) -> PResult<NodeId> {
        let mut doc_comments = self.take_pending_doc_comments();
        let start = self.advance();
        let name_token = if self.check(&StringLiteral) || self.check(&Identifier) { Some(self.advance()) } else { None };
        let body = self.parse_block_expr(None)?;
        let mut last = self.node_span(body).1;
        if let Some(trailing) = self.trailing_doc_comment_after(last) {
            doc_comments.push(trailing);
            last = trailing;
        }
        Ok(self.alloc(NodeKind::TestDecl { name_token, doc_comments, body }, start, last))
    }

    fn parse_top_level_comptime(&mut self) -> PResult<NodeId> {
        let start = self.advance();
        let body = self.parse_block_expr(None)?;
        let last = self.node_span(body).1;
        Ok(self.alloc(NodeKind::TopLevelComptime { body }, start, last))
    }

    fn parse_use_decl(&mut self) -> PResult<NodeId> {
        let start = self.advance();
        let expr = self.parse_expression()?;
        self.expect(Semicolon)?;
        let last = self.node_span(expr).1;
        Ok(self.alloc(NodeKind::UseDecl { expr }, start, last))
    }

    /// `[pub]? ... (fn | const | var) ...`. `pub_tok`, when present, is the
    /// already-consumed `pub` and also the declaration's `first_token`.
    fn parse_top_level_decl(&mut self, pub_tok: Option<TokenIndex>) -> PResult<NodeId> {
        self.note_decl_seen();
        let doc_comments = self.take_pending_doc_comments();
        let start = pub_tok.unwrap_or_else(|| self.peek_index());
        let is_pub = pub_tok.is_some();

        let is_export = self.check(&KeywordExport);
        let is_extern = self.check(&KeywordExtern);
        let mut extern_lib = None;
        if is_export || is_extern {
            self.advance();
            if is_extern && self.check(&StringLiteral) {
                extern_lib = Some(self.advance());
            }
        }
        let fn_only_qualifier = if self.check(&KeywordInline) || self.check(&KeywordNoinline) { Some(self.peek_index()) } else { None };
        let is_inline = self.eat(&KeywordInline).is_some();
        let is_noinline = if !is_inline { self.eat(&KeywordNoinline).is_some() } else { false };
        let is_threadlocal = self.eat(&KeywordThreadlocal).is_some();

        if self.check(&KeywordFn) {
            return self.parse_fn_proto(start, is_pub, is_export, is_extern, is_inline, is_noinline, false, extern_lib, doc_comments);
        }

        if self.check(&KeywordConst) || self.check(&KeywordVar) {
            if let Some(tok) = fn_only_qualifier {
                self.emit(DiagnosticKind::ExpectedFn, tok);
            }
            return self.parse_top_level_var_decl(start, is_pub, is_export, is_extern, is_threadlocal, extern_lib, doc_comments);
        }

        if self.check(&KeywordComptime) && (*self.look_ahead(1) == KeywordConst || *self.look_ahead(1) == KeywordVar) {
            if let Some(tok) = fn_only_qualifier {
                self.emit(DiagnosticKind::ExpectedFn, tok);
            }
            self.advance();
            let inner = self.parse_top_level_var_decl(self.peek_index(), is_pub, is_export, is_extern, is_threadlocal, extern_lib, doc_comments)?;
            let last = self.node_span(inner).1;
            return Ok(self.alloc(NodeKind::Comptime { body: inner }, start, last));
        }

        self.emit(DiagnosticKind::ExpectedVarDeclOrFn, self.peek_index());
        Err(ParseError)
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_top_level_var_decl(
        &mut self,
        start: TokenIndex,
        is_pub: bool,
        is_export: bool,
        is_extern: bool,
        is_threadlocal: bool,
        extern_lib: Option<TokenIndex>,
        doc_comments: Vec<TokenIndex>,
    ) -> PResult<NodeId> {
        let is_const = self.check(&KeywordConst);
        self.advance(); // `const` or `var`
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
        let semi = self.expect(Semicolon)?;
        let mut doc_comments = doc_comments;
        let mut last = semi;
        if let Some(trailing) = self.trailing_doc_comment_after(semi) {
            doc_comments.push(trailing);
            last = trailing;
        }
        Ok(self.alloc(
            NodeKind::VarDecl {
                is_pub,
                is_export,
                is_extern,
                is_threadlocal,
                extern_lib,
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

    #[allow(clippy::too_many_arguments)]
    fn parse_fn_proto(
        &mut self,
        start: TokenIndex,
        is_pub: bool,
        is_export: bool,
        is_extern: bool,
        is_inline: bool,
        is_noinline: bool,
        is_async: bool,
        extern_lib: Option<TokenIndex>,
        doc_comments: Vec<TokenIndex>,
    ) -> PResult<NodeId> {
        self.expect(KeywordFn)?;
        let name_token = if self.check(&Identifier) { Some(self.advance()) } else { None };
        self.expect(LParen)?;
        let mut params = Vec::new();
        let mut is_variadic = false;
        while !self.check(&RParen) && !self.is_eof() {
            if self.check(&DotDotDot) {
                self.advance();
                is_variadic = true;
                break;
            }
            params.push(self.parse_param()?);
            if self.eat(&Comma).is_none() {
                break;
            }
        }
        self.expect(RParen)?;

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
        let callconv_expr = if self.eat(&KeywordCallconv).is_some() {
            self.expect(LParen)?;
            let e = self.parse_expression()?;
            self.expect(RParen)?;
            Some(e)
        } else {
            None
        };

        let has_error_union = self.eat(&Bang).is_some();
        let return_type = if self.check(&LBrace) || self.check(&Semicolon) {
            let tok = self.peek_index();
            self.emit(DiagnosticKind::ExpectedReturnType, tok);
            self.alloc(NodeKind::InvalidType, tok, tok)
        } else {
            match self.parse_prefix_expr() {
                Ok(t) => t,
                Err(ParseError) => {
                    let tok = self.peek_index();
                    self.alloc(NodeKind::InvalidType, tok, tok)
                }
            }
        };

        let (body, proto_end) = if self.check(&LBrace) {
            let b = self.parse_block_expr(None)?;
            let end = self.node_span(b).1;
            (Some(b), end)
        } else {
            let semi = self.expect(Semicolon)?;
            (None, semi)
        };

        let mut doc_comments = doc_comments;
        let mut last = proto_end;
        if let Some(trailing) = self.trailing_doc_comment_after(last) {
            doc_comments.push(trailing);
            last = trailing;
        }
        Ok(self.alloc(
            NodeKind::FnProto {
                is_pub,
                is_export,
                is_extern,
                is_inline,
                is_noinline,
                is_async,
                extern_lib,
                name_token,
                params,
                is_variadic,
                align_expr,
                linksection_expr,
                callconv_expr,
                has_error_union,
                return_type,
                body,
                doc_comments,
            },
            start,
            last,
        ))
    }

    fn parse_param(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let is_comptime = self.eat(&KeywordComptime).is_some();
        let is_noalias = !is_comptime && self.check(&Identifier) && self.look_ahead_is_noalias();
        if is_noalias {
            self.advance();
        }
        let name_token = if self.check(&Identifier) && *self.look_ahead(1) == Colon {
            let t = self.advance();
            self.advance(); // `:`
            Some(t)
        } else {
            None
        };
        let is_anytype = self.eat(&KeywordAnytype).is_some();
        let type_expr = if is_anytype {
            None
        } else if self.check(&Comma) || self.check(&RParen) {
            let tok = self.peek_index();
            self.emit(DiagnosticKind::ExpectedParamType, tok);
            Some(self.alloc(NodeKind::InvalidType, tok, tok))
        } else {
            match self.parse_prefix_expr() {
                Ok(t) => Some(t),
                Err(ParseError) => {
                    // `parse_prefix_expr` already recorded a diagnostic at the
                    // failure site; build a placeholder rather than losing the
                    // rest of the parameter list to one bad type.
                    let tok = self.peek_index();
                    Some(self.alloc(NodeKind::InvalidType, tok, tok))
                }
            }
        };
        let last = type_expr.map(|t| self.node_span(t).1).unwrap_or(name_token.unwrap_or(start));
        Ok(self.alloc(NodeKind::Param { is_comptime, is_noalias, name_token, is_anytype, type_expr }, start, last))
    }

    fn look_ahead_is_noalias(&self) -> bool {
        // `noalias` is a contextual keyword, lexed as a plain identifier;
        // only meaningful directly before a parameter name.
        matches!(self.look_ahead(1), Identifier) && self.token_text(self.peek_index()) == "noalias"
    }

    fn token_text(&self, token: TokenIndex) -> &str {
        let range = &self.locs[token as usize];
        &self.source[range.start.to_usize()..range.end.to_usize()]
    }

    /// Struct/enum/union field: `[comptime]? name [: TypeExpr]? [align(..)]? [= Expr]?`.
    /// `field_state` drives the asymmetric `DeclBetweenFields` diagnostic:
    /// it fires the first time a declaration follows a field, never the
    /// reverse, and only once per container.
    fn parse_container_field(&mut self) -> PResult<NodeId> {
        let doc_comments = self.take_pending_doc_comments();
        let start = self.peek_index();
        let is_comptime = self.eat(&KeywordComptime).is_some();
        let name_token = self.expect_loose_identifier()?;

        let mut is_var_type = false;
        let type_expr = if self.eat(&Colon).is_some() {
            if self.eat(&KeywordVar).is_some() {
                is_var_type = true;
                None
            } else {
                Some(self.parse_prefix_expr()?)
            }
        } else {
            None
        };

        let align_expr = if self.eat(&KeywordAlign).is_some() {
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
            .or(align_expr.map(|v| self.node_span(v).1))
            .or(type_expr.map(|v| self.node_span(v).1))
            .unwrap_or(name_token);

        self.field_state = match self.field_state {
            FieldState::None | FieldState::SeenFields => FieldState::SeenFields,
            FieldState::ReportedDeclBetweenFields => FieldState::ReportedDeclBetweenFields,
        };

        Ok(self.alloc(
            NodeKind::ContainerField { is_comptime, name_token, type_expr, is_var_type, align_expr, value, doc_comments },
            start,
            last,
        ))
    }

    /// Called at the start of every top-level declaration (fn/const/var);
    /// if a field was already seen in this container, reports
    /// `DeclBetweenFields` exactly once.
    fn note_decl_seen(&mut self) {
        if self.field_state == FieldState::SeenFields {
            self.emit(DiagnosticKind::DeclBetweenFields, self.peek_index());
            self.field_state = FieldState::ReportedDeclBetweenFields;
        }
    }
}
