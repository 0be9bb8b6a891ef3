//! Inline assembly blocks: `asm volatile? ( "template" : outputs : inputs : clobbers )`.
//! Each of the three colon-separated sections is optional; once a shorter
//! block is found, remaining sections default to empty rather than erroring.

use super::*;
use corec_ast::{AsmOutputKind, NodeKind};
use corec_ast::TokenKind::*;

impl Parser<'_> {
    pub(crate) fn parse_asm_expr(&mut self) -> PResult<NodeId> {
        let start = self.advance();
        let is_volatile = self.eat(&KeywordVolatile).is_some();
        self.expect(LParen)?;
        let template = self.parse_expression()?;

        let mut outputs = Vec::new();
        let mut inputs = Vec::new();
        let mut clobbers = Vec::new();

        if self.eat(&Colon).is_some() && !self.check(&Colon) && !self.check(&RParen) {
            loop {
                outputs.push(self.parse_asm_output()?);
                if self.eat(&Comma).is_none() {
                    break;
                }
            }
        }
        if self.eat(&Colon).is_some() && !self.check(&Colon) && !self.check(&RParen) {
            loop {
                inputs.push(self.parse_asm_input()?);
                if self.eat(&Comma).is_none() {
                    break;
                }
            }
        }
        if self.eat(&Colon).is_some() && !self.check(&RParen) {
            loop {
                clobbers.push(self.expect(StringLiteral)?);
                if self.eat(&Comma).is_none() {
                    break;
                }
            }
        }

        let close = self.expect(RParen)?;
        Ok(self.alloc(NodeKind::Asm { is_volatile, template, outputs, inputs, clobbers }, start, close))
    }

    fn parse_asm_output(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let name_token = self.parse_optional_asm_name()?;
        let constraint_token = self.expect(StringLiteral)?;
        self.expect(LParen)?;
        let kind = if self.eat(&Arrow).is_some() {
            AsmOutputKind::ReturnType(self.parse_prefix_expr()?)
        } else {
            AsmOutputKind::Variable(self.expect(Identifier)?)
        };
        let close = self.expect(RParen)?;
        Ok(self.alloc(NodeKind::AsmOutput { name_token, constraint_token, kind }, start, close))
    }

    fn parse_asm_input(&mut self) -> PResult<NodeId> {
        let start = self.peek_index();
        let name_token = self.parse_optional_asm_name()?;
        let constraint_token = self.expect(StringLiteral)?;
        self.expect(LParen)?;
        let expr = self.parse_expression()?;
        let close = self.expect(RParen)?;
        Ok(self.alloc(NodeKind::AsmInput { name_token, constraint_token, expr }, start, close))
    }

    /// `[name]` ahead of a constraint string, if present.
    fn parse_optional_asm_name(&mut self) -> PResult<Option<TokenIndex>> {
        if self.eat(&LBracket).is_some() {
            let name = self.expect(Identifier)?;
            self.expect(RBracket)?;
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }
}
