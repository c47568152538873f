//! Expression parsing.
//!
//! ```text
//! expr    := unary { binop unary }          (precedence climbing)
//! unary   := "-" unary | primary
//! primary := STRING | INT | FLOAT | "true" | "false"
//!          | IDENT [ "(" [ expr { "," expr } ] ")" ]
//!          | "(" expr ")"
//! ```
//!
//! Precedence (lowest → highest):
//! 1. `+`, `-`
//! 2. `*`, `/`, `%`
//! 3. unary `-`
//!
//! Every operator, call and parenthesis counts one level towards
//! [`MAX_EXPR_DEPTH`]; `1 + 1 + ... + 1` nests as deep as it is long.
//!
//! New binary operators only need a [`BinOp`] variant with a precedence and
//! an entry in `match_binary_op`.

use hilt_lexer::token::TokenKind;
use hilt_types::ast::*;
use hilt_types::{Result, TemplateError, Value};

use crate::parser::Parser;

/// Maximum nesting of calls, parentheses, unary operators and chained
/// binary operators.
pub(crate) const MAX_EXPR_DEPTH: u32 = 64;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(|p| p.parse_binary(1))
    }

    /// Run `f` one nesting level deeper, failing past [`MAX_EXPR_DEPTH`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.expr_depth -= 1;
            return Err(self.depth_error());
        }
        let result = f(self);
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Operators
    // ══════════════════════════════════════════════════════════════════════════

    fn depth_error(&self) -> TemplateError {
        self.error_at_current(format!(
            "maximum expression nesting depth is {MAX_EXPR_DEPTH}"
        ))
    }

    /// Precedence climbing: parse operators binding at least as tightly as
    /// `min_prec`. Every operator is left associative.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr> {
        let outer = self.expr_depth;
        let result = self.parse_binary_chain(min_prec);
        self.expr_depth = outer;
        result
    }

    /// Each operator in a chain nests the tree built so far one level
    /// deeper, so it counts against [`MAX_EXPR_DEPTH`] like a parenthesis.
    fn parse_binary_chain(&mut self, min_prec: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary_op() {
            if op.precedence() < min_prec {
                break;
            }
            self.expr_depth += 1;
            if self.expr_depth > MAX_EXPR_DEPTH {
                return Err(self.depth_error());
            }
            self.advance(); // consume operator
            let right = self.parse_binary(op.precedence() + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// Check if current token is a binary operator, return corresponding BinOp.
    fn match_binary_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            _ => None,
        }
    }

    /// `UnaryExpr = [ "-" ] UnaryExpr | PrimaryExpr`
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check_exact(&TokenKind::Minus) {
            let start = self.advance().span;
            let operand = self.nested(|p| p.parse_unary())?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.advance();
        let span = token.span;

        match token.kind {
            TokenKind::StringLiteral(s) => Ok(Expr::new(ExprKind::Literal(Value::String(s)), span)),
            TokenKind::IntLiteral(n) => Ok(Expr::new(ExprKind::Literal(Value::Int(n)), span)),
            TokenKind::FloatLiteral(n) => Ok(Expr::new(ExprKind::Literal(Value::Float(n)), span)),
            TokenKind::True => Ok(Expr::new(ExprKind::Literal(Value::Bool(true)), span)),
            TokenKind::False => Ok(Expr::new(ExprKind::Literal(Value::Bool(false)), span)),

            TokenKind::Identifier(name) => {
                let name = Ident::new(name, span);
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_arg_list()?;
                    let close = self.expect(&TokenKind::RParen)?;
                    Ok(Expr::new(
                        ExprKind::Call { name, args },
                        span.merge(close.span),
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Variable(name), span))
                }
            }

            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                let close = self.expect(&TokenKind::RParen)?;
                Ok(Expr::new(inner.kind, span.merge(close.span)))
            }

            other => Err(TemplateError::syntax(
                format!("expected expression, got '{other}'"),
                span,
            )),
        }
    }

    /// `ArgList = [ Expr { "," Expr } ]`, stopping before the `)`.
    fn parse_arg_list(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }
}
