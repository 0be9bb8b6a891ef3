//! Expression grammar: a staircase of precedence-climbing functions, lowest
//! precedence first, matching §4.6 of the grammar exactly level-for-level.
//!
//! Two precedence rows are declared `Once` in the grammar (assign, compare):
//! their functions simply don't loop, so `a == b == c` or `a = b = c` cannot
//! build a left-associated chain (property **P8**) -- the second operator is
//! left for whatever follows to choke on, typically an `ExpectedToken(';')`.

use super::*;
use corec_ast::{ContainerKind, ControlFlowKind, NodeKind};
use corec_ast::TokenKind::*;

const ASSIGN_OPS: &[corec_ast::TokenKind] = &[
    Equal, PlusEqual, MinusEqual, StarEqual, SlashEqual, PercentEqual, ShiftLeftEqual, ShiftRightEqual, AmpEqual,
    CaretEqual, PipeEqual, StarPercentEqual, PlusPercentEqual, MinusPercentEqual,
];
const COMPARE_OPS: &[corec_ast::TokenKind] = &[EqualEqual, BangEqual, Less, Greater, LessEqual, GreaterEqual];
const BITWISE_OPS: &[corec_ast::TokenKind] = &[Amp, Caret, Pipe, KeywordOrelse];
const BITSHIFT_OPS: &[corec_ast::TokenKind] = &[ShiftLeft, ShiftRight];
const ADDITION_OPS: &[corec_ast::TokenKind] = &[Plus, Minus, PlusPlus, PlusPercent, MinusPercent];
const MULTIPLY_OPS: &[corec_ast::TokenKind] = &[PipePipe, Star, Slash, Percent, StarStar, StarPercent];
const PREFIX_OPS: &[corec_ast::TokenKind] = &[Bang, Minus, Tilde, MinusPercent, Amp, KeywordAwait];

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> PResult<NodeId> {
        self.parse_assign_expr()
    }

    fn infix(&mut self, op_token: TokenIndex, lhs: NodeId, rhs: NodeId) -> NodeId {
        let (first, _) = self.node_span(lhs);
        let (_, last) = self.node_span(rhs);
        self.alloc(NodeKind::InfixOp { op_token, lhs, rhs }, first, last)
    }

    /// assign: once, non-chained.
    fn parse_assign_expr(&mut self) -> PResult<NodeId> {
        let lhs = self.parse_try_expr()?;
        if let Some(op) = self.eat_any(ASSIGN_OPS) {
            let rhs = self.parse_try_expr()?;
            return Ok(self.infix(op, lhs, rhs));
        }
        Ok(lhs)
    }

    /// try: right, repeatable prefix.
    fn parse_try_expr(&mut self) -> PResult<NodeId> {
        if let Some(tok) = self.eat(&KeywordTry) {
            let operand = self.parse_try_expr()?;
            let (_, last) = self.node_span(operand);
            return Ok(self.alloc(NodeKind::PrefixOp { op_token: tok, operand }, tok, last));
        }
        self.parse_bool_or_expr()
    }

    /// boolOr: left, infinite.
    fn parse_bool_or_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_bool_and_expr()?;
        while let Some(op) = self.eat(&KeywordOr) {
            let rhs = self.parse_bool_and_expr()?;
            expr = self.infix(op, expr, rhs);
        }
        Ok(expr)
    }

    /// boolAnd: left, infinite. `&&` is accepted as a friendly alias for
    /// `and`, emitting `InvalidAnd` instead of rejecting the token outright.
    fn parse_bool_and_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_compare_expr()?;
        loop {
            if let Some(op) = self.eat(&KeywordAnd) {
                let rhs = self.parse_compare_expr()?;
                expr = self.infix(op, expr, rhs);
            } else if self.check(&AmpAmp) {
                let op = self.advance();
                self.emit(DiagnosticKind::InvalidAnd, op);
                let rhs = self.parse_compare_expr()?;
                expr = self.infix(op, expr, rhs);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// compare: once, non-chained.
    fn parse_compare_expr(&mut self) -> PResult<NodeId> {
        let lhs = self.parse_bitwise_expr()?;
        if let Some(op) = self.eat_any(COMPARE_OPS) {
            let rhs = self.parse_bitwise_expr()?;
            return Ok(self.infix(op, lhs, rhs));
        }
        Ok(lhs)
    }

    /// bitwise: left, infinite; folds in `orelse` and `catch |payload|`.
    fn parse_bitwise_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_bitshift_expr()?;
        loop {
            if let Some(op) = self.eat_any(BITWISE_OPS) {
                let rhs = self.parse_bitshift_expr()?;
                expr = self.infix(op, expr, rhs);
            } else if self.eat(&KeywordCatch).is_some() {
                let payload = self.try_parse_payload()?;
                let rhs = self.parse_bitshift_expr()?;
                let (first, _) = self.node_span(expr);
                let (_, last) = self.node_span(rhs);
                expr = self.alloc(NodeKind::Catch { lhs: expr, payload, rhs }, first, last);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// bitshift: left, infinite.
    fn parse_bitshift_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_addition_expr()?;
        while let Some(op) = self.eat_any(BITSHIFT_OPS) {
            let rhs = self.parse_addition_expr()?;
            expr = self.infix(op, expr, rhs);
        }
        Ok(expr)
    }

    /// addition: left, infinite.
    fn parse_addition_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_multiply_expr()?;
        while let Some(op) = self.eat_any(ADDITION_OPS) {
            let rhs = self.parse_multiply_expr()?;
            expr = self.infix(op, expr, rhs);
        }
        Ok(expr)
    }

    /// multiply: left, infinite.
    fn parse_multiply_expr(&mut self) -> PResult<NodeId> {
        let mut expr = self.parse_prefix_expr()?;
        while let Some(op) = self.eat_any(MULTIPLY_OPS) {
            let rhs = self.parse_prefix_expr()?;
            expr = self.infix(op, expr, rhs);
        }
        Ok(expr)
    }

    /// prefix: right, repeatable (`try` already peeled off higher up).
    /// Folds straight into the prefix-type row: a leading `?`, `anyframe->`,
    /// or pointer/array/slice qualifier list is itself a right-recursive
    /// prefix, so one function handles both rows without losing either's
    /// shape in the resulting tree.
    pub(crate) fn parse_prefix_expr(&mut self) -> PResult<NodeId> {
        if let Some(op) = self.eat_any(PREFIX_OPS) {
            let operand = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(operand);
            return Ok(self.alloc(NodeKind::PrefixOp { op_token: op, operand }, op, last));
        }
        if let Some(node) = self.try_parse_prefix_type_expr()? {
            return Ok(node);
        }
        let primary = self.parse_primary_expr()?;
        self.parse_suffix_expr(primary)
    }

    /// suffix: left, infinite postfix chain applied to a primary expression.
    fn parse_suffix_expr(&mut self, mut expr: NodeId) -> PResult<NodeId> {
        loop {
            match self.peek().clone() {
                Dot => {
                    self.advance();
                    match self.peek().clone() {
                        Star => {
                            let star = self.advance();
                            let (first, _) = self.node_span(expr);
                            expr = self.alloc(NodeKind::DerefAccess { lhs: expr }, first, star);
                        }
                        Question => {
                            let q = self.advance();
                            let (first, _) = self.node_span(expr);
                            expr = self.alloc(NodeKind::OptionalUnwrap { lhs: expr }, first, q);
                        }
                        _ => {
                            let name = self.expect_loose_identifier()?;
                            let (first, _) = self.node_span(expr);
                            expr = self.alloc(NodeKind::FieldAccess { lhs: expr, name_token: name }, first, name);
                        }
                    }
                }
                DotStar => {
                    let tok = self.advance();
                    let (first, _) = self.node_span(expr);
                    expr = self.alloc(NodeKind::DerefAccess { lhs: expr }, first, tok);
                }
                DotQuestion => {
                    let tok = self.advance();
                    let (first, _) = self.node_span(expr);
                    expr = self.alloc(NodeKind::OptionalUnwrap { lhs: expr }, first, tok);
                }
                LBracket => {
                    expr = self.parse_index_or_slice(expr)?;
                }
                LParen => {
                    expr = self.parse_call_args(expr, false)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_index_or_slice(&mut self, lhs: NodeId) -> PResult<NodeId> {
        self.advance(); // `[`
        let start = self.parse_expression()?;
        if self.eat(&DotDot).is_some() {
            let end = if self.check(&RBracket) || self.check(&Colon) { None } else { Some(self.parse_expression()?) };
            let sentinel = if self.eat(&Colon).is_some() { Some(self.parse_expression()?) } else { None };
            let close = self.expect(RBracket)?;
            let (first, _) = self.node_span(lhs);
            return Ok(self.alloc(NodeKind::SliceAccess { lhs, start, end, sentinel }, first, close));
        }
        let close = self.expect(RBracket)?;
        let (first, _) = self.node_span(lhs);
        Ok(self.alloc(NodeKind::IndexAccess { lhs, index: start }, first, close))
    }

    /// Eats `( args )`. `is_async` flags calls reached through the `async`
    /// call hack (see `try_parse_async_prefix`).
    pub(crate) fn parse_call_args(&mut self, callee: NodeId, is_async: bool) -> PResult<NodeId> {
        self.advance(); // `(`
        let mut args = Vec::new();
        while !self.check(&RParen) && !self.is_eof() {
            args.push(self.parse_expression()?);
            if self.eat(&Comma).is_none() {
                break;
            }
        }
        let close = self.expect(RParen)?;
        let (first, _) = self.node_span(callee);
        Ok(self.alloc(NodeKind::Call { callee, args, is_async }, first, close))
    }

    /// Prefix-type row: pointer/array/slice constructors and their qualifier
    /// lists, `?Child`, and `anyframe->Child`. Returns `Ok(None)` (no
    /// diagnostic, cursor unchanged) when the current token doesn't start one.
    fn try_parse_prefix_type_expr(&mut self) -> PResult<Option<NodeId>> {
        if let Some(q) = self.eat(&Question) {
            let child = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(child);
            return Ok(Some(self.alloc(NodeKind::OptionalType { child }, q, last)));
        }
        if self.check(&KeywordAnyframe) && *self.look_ahead(1) == Arrow {
            let tok = self.advance();
            self.advance(); // `->`
            let child = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(child);
            return Ok(Some(self.alloc(NodeKind::AnyframeType { child: Some(child) }, tok, last)));
        }
        if self.check(&Star) {
            return Ok(Some(self.parse_ptr_type(PtrSizeGuess::One)?));
        }
        if self.check(&StarStar) {
            return Ok(Some(self.parse_double_ptr_type()?));
        }
        // `[` never starts an index expression in prefix/primary position --
        // indexing only applies as a suffix on an already-built expression --
        // so any `[` reaching here begins an array/slice/many-pointer type.
        if self.check(&LBracket) {
            return Ok(Some(self.parse_bracketed_type()?));
        }
        Ok(None)
    }

    fn parse_ptr_type(&mut self, _guess: PtrSizeGuess) -> PResult<NodeId> {
        let star = self.advance();
        let (is_const, is_volatile, is_allowzero, align_expr, bit_range) = self.parse_ptr_qualifiers()?;
        let sentinel = None;
        let child = self.parse_prefix_expr()?;
        let (_, last) = self.node_span(child);
        Ok(self.alloc(
            NodeKind::PtrType {
                size: corec_ast::PtrSize::One,
                is_const,
                is_volatile,
                is_allowzero,
                align_expr,
                bit_range,
                sentinel,
                child,
            },
            star,
            last,
        ))
    }

    /// `**T` lexes as one token but means two nested single-item pointers;
    /// qualifiers collected after it bind to the *inner* pointer, and the
    /// two synthetic nodes share the `**` token as their first token.
    fn parse_double_ptr_type(&mut self) -> PResult<NodeId> {
        let tok = self.advance();
        let (is_const, is_volatile, is_allowzero, align_expr, bit_range) = self.parse_ptr_qualifiers()?;
        let child = self.parse_prefix_expr()?;
        let (_, last) = self.node_span(child);
        let inner = self.alloc(
            NodeKind::PtrType {
                size: corec_ast::PtrSize::One,
                is_const,
                is_volatile,
                is_allowzero,
                align_expr,
                bit_range,
                sentinel: None,
                child,
            },
            tok,
            last,
        );
        Ok(self.alloc(
            NodeKind::PtrType {
                size: corec_ast::PtrSize::One,
                is_const: false,
                is_volatile: false,
                is_allowzero: false,
                align_expr: None,
                bit_range: None,
                sentinel: None,
                child: inner,
            },
            tok,
            last,
        ))
    }

    /// `[*]T`, `[*c]T`, `[N]T`, `[N:s]T`, `[]T`, `[:s]T`.
    fn parse_bracketed_type(&mut self) -> PResult<NodeId> {
        let open = self.advance(); // `[`
        if self.eat(&Star).is_some() {
            let size = if self.check(&Identifier) && self.peek_is_c_sentinel() {
                self.advance();
                corec_ast::PtrSize::C
            } else {
                corec_ast::PtrSize::Many
            };
            let sentinel = if self.eat(&Colon).is_some() { Some(self.parse_expression()?) } else { None };
            self.expect(RBracket)?;
            let (is_const, is_volatile, is_allowzero, align_expr, bit_range) = self.parse_ptr_qualifiers()?;
            let child = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(child);
            return Ok(self.alloc(
                NodeKind::PtrType { size, is_const, is_volatile, is_allowzero, align_expr, bit_range, sentinel, child },
                open,
                last,
            ));
        }
        if self.check(&RBracket) {
            self.advance();
            let (is_const, is_volatile, is_allowzero, align_expr, bit_range) = self.parse_ptr_qualifiers()?;
            let child = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(child);
            return Ok(self.alloc(
                NodeKind::PtrType {
                    size: corec_ast::PtrSize::Slice,
                    is_const,
                    is_volatile,
                    is_allowzero,
                    align_expr,
                    bit_range,
                    sentinel: None,
                    child,
                },
                open,
                last,
            ));
        }
        if self.check(&Colon) {
            self.advance();
            let sentinel = self.parse_expression()?;
            self.expect(RBracket)?;
            let (is_const, is_volatile, is_allowzero, align_expr, bit_range) = self.parse_ptr_qualifiers()?;
            let child = self.parse_prefix_expr()?;
            let (_, last) = self.node_span(child);
            return Ok(self.alloc(
                NodeKind::PtrType {
                    size: corec_ast::PtrSize::Slice,
                    is_const,
                    is_volatile,
                    is_allowzero,
                    align_expr,
                    bit_range,
                    sentinel: Some(sentinel),
                    child,
                },
                open,
                last,
            ));
        }
        // Otherwise: an array type `[N]T` or `[N:s]T`.
        let len = self.parse_expression()?;
        let sentinel = if self.eat(&Colon).is_some() { Some(self.parse_expression()?) } else { None };
        self.expect(RBracket)?;
        let child = self.parse_prefix_expr()?;
        let (_, last) = self.node_span(child);
        Ok(self.alloc(NodeKind::ArrayType { len: Some(len), sentinel, child }, open, last))
    }

    fn peek_is_c_sentinel(&self) -> bool {
        // `[*c]` is lexed as `[`, `*`, ident("c"), `]`; a real one-letter
        // identifier type named `c` would be ambiguous, but that never
        // appears directly after `[*` in valid source.
        *self.look_ahead(1) == RBracket
    }

    /// Collects `align(expr[:start:end])`, `const`, `volatile`, `allowzero`
    /// in any order; duplicates are reported (one diagnostic kind per
    /// qualifier) but parsing continues with the later occurrence winning.
    fn parse_ptr_qualifiers(
        &mut self,
    ) -> PResult<(bool, bool, bool, Option<NodeId>, Option<(NodeId, NodeId)>)> {
        let mut is_const = false;
        let mut is_volatile = false;
        let mut is_allowzero = false;
        let mut align_expr = None;
        let mut bit_range = None;
        loop {
            if let Some(tok) = self.eat(&KeywordAlign) {
                if align_expr.is_some() {
                    self.emit(DiagnosticKind::ExtraAlignQualifier, tok);
                }
                self.expect(LParen)?;
                let expr = self.parse_expression()?;
                let mut range = None;
                if self.eat(&Colon).is_some() {
                    let start = self.parse_expression()?;
                    self.expect(Colon)?;
                    let end = self.parse_expression()?;
                    range = Some((start, end));
                }
                self.expect(RParen)?;
                align_expr = Some(expr);
                bit_range = range;
            } else if let Some(tok) = self.eat(&KeywordConst) {
                if is_const {
                    self.emit(DiagnosticKind::ExtraConstQualifier, tok);
                }
                is_const = true;
            } else if let Some(tok) = self.eat(&KeywordVolatile) {
                if is_volatile {
                    self.emit(DiagnosticKind::ExtraVolatileQualifier, tok);
                }
                is_volatile = true;
            } else if let Some(tok) = self.eat(&KeywordAllowzero) {
                if is_allowzero {
                    self.emit(DiagnosticKind::ExtraAllowZeroQualifier, tok);
                }
                is_allowzero = true;
            } else {
                break;
            }
        }
        Ok((is_const, is_volatile, is_allowzero, align_expr, bit_range))
    }

    // ---- primary -----------------------------------------------------

    fn parse_primary_expr(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        match self.peek().clone() {
            IntegerLiteral => { let end = self.advance(); Ok(self.alloc(NodeKind::IntLiteral { token: start }, start, end)) }
            FloatLiteral => { let end = self.advance(); Ok(self.alloc(NodeKind::FloatLiteral { token: start }, start, end)) }
            CharLiteral => { let end = self.advance(); Ok(self.alloc(NodeKind::CharLiteral { token: start }, start, end)) }
            StringLiteral => { let end = self.advance(); Ok(self.alloc(NodeKind::StringLiteral { token: start }, start, end)) }
            MultilineStringLiteralLine => self.parse_multiline_string(),
            KeywordTrue => { let end = self.advance(); Ok(self.alloc(NodeKind::BoolLiteral { token: start, value: true }, start, end)) }
            KeywordFalse => { let end = self.advance(); Ok(self.alloc(NodeKind::BoolLiteral { token: start, value: false }, start, end)) }
            KeywordNull => { let end = self.advance(); Ok(self.alloc(NodeKind::NullLiteral { token: start }, start, end)) }
            KeywordUndefined => { let end = self.advance(); Ok(self.alloc(NodeKind::UndefinedLiteral { token: start }, start, end)) }
            KeywordUnreachable => { let end = self.advance(); Ok(self.alloc(NodeKind::UnreachableLiteral { token: start }, start, end)) }
            Identifier if self.looks_like_labeled_block_or_loop() => self.parse_labeled(),
            Identifier => {
                self.advance();
                Ok(self.alloc(NodeKind::Identifier { token: start }, start, start))
            }
            Builtin => self.parse_builtin_call(),
            LParen => self.parse_grouped_expr(),
            Dot => self.parse_dot_primary(),
            KeywordError => self.parse_error_primary(),
            KeywordStruct | KeywordEnum | KeywordUnion => self.parse_container_decl(),
            KeywordIf => self.parse_if(BodyForm::Expr),
            KeywordWhile => self.parse_while(BodyForm::Expr),
            KeywordFor => self.parse_for(BodyForm::Expr),
            KeywordSwitch => self.parse_switch_expr(),
            KeywordAsm => self.parse_asm_expr(),
            KeywordAsync => self.parse_async_prefixed(),
            KeywordBreak | KeywordContinue | KeywordReturn => self.parse_control_flow_expr(),
            LBrace => self.parse_block_expr(None),
            KeywordComptime => {
                self.advance();
                let body = self.parse_expression()?;
                let (_, last) = self.node_span(body);
                Ok(self.alloc(NodeKind::Comptime { body }, start, last))
            }
            KeywordNosuspend => {
                self.advance();
                let body = self.parse_expression()?;
                let (_, last) = self.node_span(body);
                Ok(self.alloc(NodeKind::Nosuspend { body }, start, last))
            }
            KeywordResume => {
                self.advance();
                let operand = self.parse_prefix_expr()?;
                let (_, last) = self.node_span(operand);
                Ok(self.alloc(NodeKind::PrefixOp { op_token: start, operand }, start, last))
            }
            KeywordSuspend => {
                self.advance();
                Ok(self.alloc(NodeKind::Suspend { body: None }, start, start))
            }
            _ => {
                self.emit(DiagnosticKind::ExpectedExpr, start);
                Err(ParseError)
            }
        }
    }

    fn looks_like_labeled_block_or_loop(&self) -> bool {
        self.check(&Identifier) && *self.look_ahead(1) == Colon
    }

    fn parse_labeled(&mut self) -> PResult<NodeId> {
        let label = self.advance();
        self.expect(Colon)?;
        match self.peek().clone() {
            LBrace => self.parse_block_expr(Some(label)),
            KeywordWhile => self.parse_while_labeled(label, BodyForm::Expr),
            KeywordFor => self.parse_for_labeled(label, BodyForm::Expr),
            _ => {
                self.emit(DiagnosticKind::ExpectedLabelOrLBrace, self.peek_index());
                Err(ParseError)
            }
        }
    }

    fn parse_multiline_string(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let mut lines = Vec::new();
        while self.check(&MultilineStringLiteralLine) {
            lines.push(self.advance());
        }
        let last = *lines.last().unwrap();
        Ok(self.alloc(NodeKind::MultilineStringLiteral { lines }, start, last))
    }

    fn parse_grouped_expr(&mut self) -> PResult<NodeId> {
        let open = self.advance();
        let inner = self.parse_expression()?;
        let close = self.expect(RParen)?;
        Ok(self.alloc(NodeKind::GroupedExpression { inner }, open, close))
    }

    fn parse_builtin_call(&mut self) -> PResult<NodeId> {
        let name = self.advance();
        self.expect(LParen)?;
        let mut args = Vec::new();
        while !self.check(&RParen) && !self.is_eof() {
            args.push(self.parse_expression()?);
            if self.eat(&Comma).is_none() {
                break;
            }
        }
        let close = self.expect(RParen)?;
        Ok(self.alloc(NodeKind::BuiltinCall { name_token: name, args }, name, close))
    }

    fn parse_error_primary(&mut self) -> PResult<NodeId> {
        let start = self.advance();
        if self.eat(&Dot).is_some() {
            let name = self.expect_loose_identifier()?;
            return Ok(self.alloc(NodeKind::ErrorValue { name_token: name }, start, name));
        }
        self.parse_error_set_decl(start)
    }

    fn parse_dot_primary(&mut self) -> PResult<NodeId> {
        let dot = self.advance();
        match self.peek().clone() {
            LBrace => self.parse_initializer_list(dot, None),
            _ => {
                let name = self.expect_loose_identifier()?;
                Ok(self.alloc(NodeKind::EnumLiteral { name_token: name }, dot, name))
            }
        }
    }

    fn parse_async_prefixed(&mut self) -> PResult<NodeId> {
        let async_tok = self.advance();
        // The async/fn-proto ambiguity: look one token ahead past the
        // `async` we just consumed. If `fn` follows, this isn't a call at
        // all -- push both tokens back and let the declaration parser see
        // a plain (async) fn prototype.
        if self.check(&KeywordFn) {
            self.push_back(async_tok);
            self.emit(DiagnosticKind::ExpectedExpr, async_tok);
            return Err(ParseError);
        }
        let callee = self.parse_prefix_expr()?;
        if !self.check(&LParen) {
            self.emit(DiagnosticKind::ExpectedParamList, self.peek_index());
            return Ok(callee);
        }
        self.parse_call_args(callee, true)
    }

    fn parse_control_flow_expr(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let kind = match self.peek() {
            KeywordBreak => ControlFlowKind::Break,
            KeywordContinue => ControlFlowKind::Continue,
            _ => ControlFlowKind::Return,
        };
        self.advance();
        let label = if kind != ControlFlowKind::Return && self.check(&Colon) {
            self.advance();
            Some(self.expect(Identifier)?)
        } else {
            None
        };
        let value = if self.starts_expression() { Some(self.parse_expression()?) } else { None };
        let last = value.map(|v| self.node_span(v).1).unwrap_or(label.unwrap_or(start));
        Ok(self.alloc(NodeKind::ControlFlowExpression { kind, label, value }, start, last))
    }

    /// A conservative "can an expression start here" check, used where a
    /// trailing operand is optional (`return`, `break`) and we must not
    /// swallow the statement terminator.
    pub(crate) fn starts_expression(&self) -> bool {
        !matches!(self.peek(), Semicolon | RBrace | RParen | RBracket | Comma | Colon | Eof | KeywordElse)
    }

    pub(crate) fn parse_block_expr(&mut self, label: Option<TokenIndex>) -> PResult<NodeId> {
        let open = self.expect(LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&RBrace) && !self.is_eof() {
            self.refresh_pending_doc_comments();
            if self.check(&RBrace) {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(ParseError) => {
                    self.find_next_stmt();
                }
            }
        }
        self.report_unattached_doc_comments();
        let close = self.expect(RBrace)?;
        Ok(self.alloc(NodeKind::Block { label, statements }, label.unwrap_or(open), close))
    }

    /// `.{ ... }` / `Type{ ... }`: empty, field-initializer, or positional
    /// shape, decided by the first element. Trailing comma optional.
    pub(crate) fn parse_initializer_list(&mut self, open: TokenIndex, type_expr: Option<NodeId>) -> PResult<NodeId> {
        self.expect(LBrace)?;
        if let Some(close) = self.eat(&RBrace) {
            return Ok(self.alloc(NodeKind::StructInitializer { type_expr, fields: Vec::new() }, open, close));
        }
        if self.check(&Dot) && *self.look_ahead(1) != LBrace {
            let mut fields = Vec::new();
            loop {
                let dot = self.expect(Dot)?;
                let name = self.expect(Identifier)?;
                self.expect(Equal)?;
                let value = self.parse_expression()?;
                let (_, last) = self.node_span(value);
                fields.push(self.alloc(NodeKind::FieldInitializer { name_token: name, value }, dot, last));
                if self.eat(&Comma).is_none() {
                    break;
                }
                if self.check(&RBrace) {
                    break;
                }
            }
            let close = self.expect(RBrace)?;
            return Ok(self.alloc(NodeKind::StructInitializer { type_expr, fields }, open, close));
        }
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_expression()?);
            if self.eat(&Comma).is_none() {
                break;
            }
            if self.check(&RBrace) {
                break;
            }
        }
        let close = self.expect(RBrace)?;
        Ok(self.alloc(NodeKind::ArrayInitializer { type_expr, elements }, open, close))
    }

    fn parse_container_decl(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let kind = match self.advance_matching_container_kind() {
            Some(k) => k,
            None => unreachable!("caller only dispatches here on struct/enum/union"),
        };
        let backing = if self.eat(&LParen).is_some() {
            let expr = self.parse_expression()?;
            self.expect(RParen)?;
            Some(expr)
        } else {
            None
        };
        self.expect(LBrace)?;
        let fields_and_decls = self.parse_container_members()?;
        let close = self.expect(RBrace)?;
        Ok(self.alloc(
            NodeKind::ContainerDecl { kind, is_packed: false, is_extern: false, backing, fields_and_decls },
            start,
            close,
        ))
    }

    fn advance_matching_container_kind(&mut self) -> Option<ContainerKind> {
        if self.eat(&KeywordStruct).is_some() {
            Some(ContainerKind::Struct)
        } else if self.eat(&KeywordEnum).is_some() {
            Some(ContainerKind::Enum)
        } else if self.eat(&KeywordUnion).is_some() {
            Some(ContainerKind::Union)
        } else {
            None
        }
    }

    fn parse_error_set_decl(&mut self, start: TokenIndex) -> PResult<NodeId> {
        self.expect(LBrace)?;
        let mut members = Vec::new();
        while !self.check(&RBrace) && !self.is_eof() {
            if let Some(id) = self.eat(&Identifier) {
                members.push(id);
            }
            if self.eat(&Comma).is_none() {
                break;
            }
        }
        let close = self.expect(RBrace)?;
        Ok(self.alloc(NodeKind::ErrorSetDecl { members }, start, close))
    }

    /// Parses `|x|` or `|*x|` if present; `Ok(None)` (no diagnostic) if not.
    pub(crate) fn try_parse_payload(&mut self) -> PResult<Option<NodeId>> {
        let Some(open) = self.eat(&Pipe) else { return Ok(None) };
        let is_ptr = self.eat(&Star).is_some();
        let name = self.expect(Identifier)?;
        let close = self.expect(Pipe)?;
        let _ = open;
        Ok(Some(self.alloc(NodeKind::PointerPayload { is_ptr, name_token: name }, name, close)))
    }

    /// Parses `|x, i|` / `|*x, i|` (pointer-index payload), used by `for`/`while`.
    pub(crate) fn try_parse_pointer_index_payload(&mut self) -> PResult<Option<NodeId>> {
        let Some(open) = self.eat(&Pipe) else { return Ok(None) };
        let is_ptr = self.eat(&Star).is_some();
        let name = self.expect(Identifier)?;
        let index_token = if self.eat(&Comma).is_some() { Some(self.expect(Identifier)?) } else { None };
        let close = self.expect(Pipe)?;
        let _ = open;
        Ok(Some(self.alloc(NodeKind::PointerIndexPayload { is_ptr, name_token: name, index_token }, name, close)))
    }

    pub(crate) fn expect_loose_identifier(&mut self) -> PResult<TokenIndex> {
        if let Some(tok) = self.eat(&Identifier) {
            return Ok(tok);
        }
        if let Some(tok) = self.eat(&IntegerLiteral) {
            return Ok(tok);
        }
        self.emit(DiagnosticKind::ExpectedIdentifier, self.peek_index());
        Err(ParseError)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyForm {
    /// Body must be a `BlockExpr`; no `;` needed afterward.
    Expr,
    /// Body may be an `AssignExpr`, in which case a terminating `;` or
    /// trailing `else` is required.
    Statement,
}

enum PtrSizeGuess {
    One,
}
