//! `switch (cond) { cases }`, used identically whether it appears in
//! expression or statement position -- unlike `if`/`while`/`for`, a switch's
//! body is always the brace-delimited case list, so there's no [`BodyForm`]
//! to thread through here.

use super::*;
use corec_ast::NodeKind;
use corec_ast::TokenKind::*;

impl Parser<'_> {
    pub(crate) fn parse_switch_expr(&mut self) -> PResult<NodeId> {
        let start = self.advance();
        self.expect(LParen)?;
        let condition = self.parse_expression()?;
        self.expect(RParen)?;
        self.expect(LBrace)?;
        let mut cases = Vec::new();
        while !self.check(&RBrace) && !self.is_eof() {
            match self.parse_switch_case() {
                Ok(case) => cases.push(case),
                Err(ParseError) => self.find_next_container_member(),
            }
            if self.eat(&Comma).is_none() {
                break;
            }
        }
        let close = self.expect(RBrace)?;
        Ok(self.alloc(NodeKind::Switch { condition, cases }, start, close))
    }

    fn parse_switch_case(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let (items, is_else) = if self.eat(&KeywordElse).is_some() {
            (Vec::new(), true)
        } else {
            let mut items = vec![self.parse_switch_item()?];
            while self.check(&Comma) && !matches!(self.look_ahead(1), FatArrow) {
                self.advance();
                if self.check(&FatArrow) {
                    break;
                }
                items.push(self.parse_switch_item()?);
            }
            (items, false)
        };
        self.expect(FatArrow)?;
        let payload = self.try_parse_payload()?;
        let value = self.parse_expression()?;
        let last = self.node_span(value).1;
        Ok(self.alloc(NodeKind::SwitchCase { items, is_else, payload, value }, start, last))
    }

    fn parse_switch_item(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let lhs = self.parse_expression()?;
        if self.eat(&DotDotDot).is_some() {
            let rhs = self.parse_expression()?;
            let last = self.node_span(rhs).1;
            return Ok(self.alloc(NodeKind::Range { lhs: Some(lhs), rhs: Some(rhs) }, start, last));
        }
        Ok(lhs)
    }
}
