// Copyright 2025 The Zwcalc Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hand-written recursive descent parser for block expressions.
//!
//! The grammar is deliberately closed: four precedence levels, calls,
//! and tuple/list literals.  Anything else never makes it into an AST,
//! which is the first half of the sandbox (resolution is the second).

use crate::ast::{BinaryOp, Expr0, UnaryOp};
use crate::builtins::{Loc, UntypedCall};
use crate::common::{ErrorCode, ExprError};
use crate::token::{Lexer, Spanned, Token};

#[cfg(test)]
mod tests;

/// TokenKind discriminant for efficient peek comparisons without payload matching
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Plus,
    Minus,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Ident,
    Num,
}

impl<'a> From<&Token<'a>> for TokenKind {
    fn from(token: &Token<'a>) -> Self {
        match token {
            Token::Plus => TokenKind::Plus,
            Token::Minus => TokenKind::Minus,
            Token::Mul => TokenKind::Mul,
            Token::Div => TokenKind::Div,
            Token::FloorDiv => TokenKind::FloorDiv,
            Token::Mod => TokenKind::Mod,
            Token::Pow => TokenKind::Pow,
            Token::LParen => TokenKind::LParen,
            Token::RParen => TokenKind::RParen,
            Token::LBracket => TokenKind::LBracket,
            Token::RBracket => TokenKind::RBracket,
            Token::Comma => TokenKind::Comma,
            Token::Ident(_) => TokenKind::Ident,
            Token::Num(_) => TokenKind::Num,
        }
    }
}

/// Parser state holding tokenized input
struct Parser<'input> {
    tokens: Vec<Spanned<Token<'input>>>,
    pos: usize,
}

impl<'input> Parser<'input> {
    /// Create a new parser from a lexer, collecting all tokens up front.
    /// Returns an error if the lexer produces any errors.
    fn new(lexer: Lexer<'input>) -> Result<Self, ExprError> {
        let mut tokens = Vec::new();
        for result in lexer {
            match result {
                Ok(tok) => tokens.push(tok),
                Err(e) => return Err(e),
            }
        }
        Ok(Parser { tokens, pos: 0 })
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.get(self.pos)
    }

    /// Peek at the kind of the current token
    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|(_, tok, _)| TokenKind::from(tok))
    }

    /// Advance to the next token and return the consumed token
    fn advance(&mut self) -> Option<&Spanned<Token<'input>>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    /// Expect the current token to match the expected kind, returning an error if not
    fn expect(&mut self, expected: TokenKind) -> Result<&Spanned<Token<'input>>, ExprError> {
        if self.peek_kind() == Some(expected) {
            Ok(self.advance().unwrap())
        } else if let Some((start, _, end)) = self.peek() {
            Err(ExprError {
                start: *start as u16,
                end: *end as u16,
                code: ErrorCode::UnrecognizedToken,
            })
        } else {
            let pos = self.eof_position();
            Err(ExprError {
                start: pos as u16,
                end: (pos + 1) as u16,
                code: ErrorCode::UnrecognizedEof,
            })
        }
    }

    /// Get the position for EOF errors
    fn eof_position(&self) -> usize {
        if let Some((_, _, end)) = self.tokens.last() {
            *end
        } else {
            0
        }
    }

    /// Check if we've consumed all tokens
    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Parse an expression from the token stream.
    /// Returns Ok(None) for empty input.
    fn parse_expression(&mut self) -> Result<Option<Expr0>, ExprError> {
        if self.is_at_end() {
            return Ok(None);
        }

        let expr = self.parse_expr()?;

        // Check for extra tokens after the expression
        if let Some((start, _, end)) = self.peek() {
            return Err(ExprError {
                start: *start as u16,
                end: *end as u16,
                code: ErrorCode::ExtraToken,
            });
        }

        Ok(Some(expr))
    }

    /// Parse a full expression - additive is the loosest precedence level
    fn parse_expr(&mut self) -> Result<Expr0, ExprError> {
        self.parse_additive()
    }

    /// Parse additive operators (+, -)
    fn parse_additive(&mut self) -> Result<Expr0, ExprError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let loc = Loc::new(left.get_loc().start as usize, right.get_loc().end as usize);
            left = Expr0::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse multiplicative operators (*, /, //, %)
    fn parse_multiplicative(&mut self) -> Result<Expr0, ExprError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Mul) => BinaryOp::Mul,
                Some(TokenKind::Div) => BinaryOp::Div,
                Some(TokenKind::FloorDiv) => BinaryOp::FloorDiv,
                Some(TokenKind::Mod) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let loc = Loc::new(left.get_loc().start as usize, right.get_loc().end as usize);
            left = Expr0::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse unary sign operators (+, -).  Signs chain, so --2 is 2.
    fn parse_unary(&mut self) -> Result<Expr0, ExprError> {
        match self.peek_kind() {
            Some(TokenKind::Plus) => {
                let (lpos, _, _) = *self.advance().unwrap();
                let operand = self.parse_unary()?;
                let rpos = operand.get_loc().end as usize;
                Ok(Expr0::Op1(
                    UnaryOp::Positive,
                    Box::new(operand),
                    Loc::new(lpos, rpos),
                ))
            }
            Some(TokenKind::Minus) => {
                let (lpos, _, _) = *self.advance().unwrap();
                let operand = self.parse_unary()?;
                let rpos = operand.get_loc().end as usize;
                Ok(Expr0::Op1(
                    UnaryOp::Negative,
                    Box::new(operand),
                    Loc::new(lpos, rpos),
                ))
            }
            _ => self.parse_exponentiation(),
        }
    }

    /// Parse the exponentiation operator (**).  It is right-associative,
    /// binds tighter than the sign on its left, and its right operand may
    /// carry its own sign: -2 ** 2 is -4 and 2 ** -2 is 0.25.
    fn parse_exponentiation(&mut self) -> Result<Expr0, ExprError> {
        let left = self.parse_call()?;

        if self.peek_kind() == Some(TokenKind::Pow) {
            self.advance();
            let right = self.parse_unary()?;
            let loc = Loc::new(left.get_loc().start as usize, right.get_loc().end as usize);
            return Ok(Expr0::Op2(
                BinaryOp::Pow,
                Box::new(left),
                Box::new(right),
                loc,
            ));
        }

        Ok(left)
    }

    /// Parse function application: id(args)
    fn parse_call(&mut self) -> Result<Expr0, ExprError> {
        // Check if we have an identifier followed by '('
        if self.peek_kind() == Some(TokenKind::Ident)
            && self.pos + 1 < self.tokens.len()
            && TokenKind::from(&self.tokens[self.pos + 1].1) == TokenKind::LParen
        {
            // This is a function call.  The name is kept verbatim: the
            // whitelist is case sensitive and resolution owns that check.
            let (lpos, tok, _) = *self.advance().unwrap();
            let name = if let Token::Ident(s) = tok {
                s.to_string()
            } else {
                unreachable!()
            };

            self.advance(); // consume '('
            let args = self.parse_comma_separated_exprs(TokenKind::RParen)?;
            let (_, _, rpos) = *self.expect(TokenKind::RParen)?;

            return Ok(Expr0::App(UntypedCall(name, args), Loc::new(lpos, rpos)));
        }

        self.parse_atom()
    }

    /// Parse an atomic expression (number, identifier, parens, list literal)
    fn parse_atom(&mut self) -> Result<Expr0, ExprError> {
        match self.peek_kind() {
            Some(TokenKind::Num) => {
                let (lpos, tok, rpos) = *self.advance().unwrap();
                if let Token::Num(s) = tok {
                    match s.parse::<f64>() {
                        Ok(n) => Ok(Expr0::Const(s.to_string(), n, Loc::new(lpos, rpos))),
                        Err(_) => Err(ExprError {
                            start: lpos as u16,
                            end: rpos as u16,
                            code: ErrorCode::ExpectedNumber,
                        }),
                    }
                } else {
                    unreachable!()
                }
            }
            Some(TokenKind::Ident) => {
                let (lpos, tok, rpos) = *self.advance().unwrap();
                if let Token::Ident(s) = tok {
                    Ok(Expr0::Var(s.to_string(), Loc::new(lpos, rpos)))
                } else {
                    unreachable!()
                }
            }
            Some(TokenKind::LParen) => {
                let (lpos, _, _) = *self.advance().unwrap();

                // () is an empty tuple
                if self.peek_kind() == Some(TokenKind::RParen) {
                    let (_, _, rpos) = *self.advance().unwrap();
                    return Ok(Expr0::Seq(vec![], Loc::new(lpos, rpos)));
                }

                let first = self.parse_expr()?;

                // a comma promotes the parens from grouping to a tuple
                if self.peek_kind() == Some(TokenKind::Comma) {
                    let mut elements = vec![first];
                    while self.peek_kind() == Some(TokenKind::Comma) {
                        self.advance(); // consume ','

                        // Handle trailing comma
                        if self.peek_kind() == Some(TokenKind::RParen) {
                            break;
                        }

                        elements.push(self.parse_expr()?);
                    }
                    let (_, _, rpos) = *self.expect(TokenKind::RParen)?;
                    return Ok(Expr0::Seq(elements, Loc::new(lpos, rpos)));
                }

                self.expect(TokenKind::RParen)?;
                Ok(first)
            }
            Some(TokenKind::LBracket) => {
                let (lpos, _, _) = *self.advance().unwrap();
                let elements = self.parse_comma_separated_exprs(TokenKind::RBracket)?;
                let (_, _, rpos) = *self.expect(TokenKind::RBracket)?;
                Ok(Expr0::Seq(elements, Loc::new(lpos, rpos)))
            }
            Some(_) => {
                let (start, _, end) = self.peek().unwrap();
                Err(ExprError {
                    start: *start as u16,
                    end: *end as u16,
                    code: ErrorCode::UnrecognizedToken,
                })
            }
            None => {
                let pos = self.eof_position();
                Err(ExprError {
                    start: pos as u16,
                    end: (pos + 1) as u16,
                    code: ErrorCode::UnrecognizedEof,
                })
            }
        }
    }

    /// Parse comma-separated expressions up to (without consuming) the
    /// closing terminator
    fn parse_comma_separated_exprs(
        &mut self,
        terminator: TokenKind,
    ) -> Result<Vec<Expr0>, ExprError> {
        let mut exprs = Vec::new();

        // Handle empty list
        if self.peek_kind() == Some(terminator) {
            return Ok(exprs);
        }

        // Parse first expression
        exprs.push(self.parse_expr()?);

        // Parse remaining expressions
        while self.peek_kind() == Some(TokenKind::Comma) {
            self.advance(); // consume ','

            // Handle trailing comma
            if self.peek_kind() == Some(terminator) {
                break;
            }

            exprs.push(self.parse_expr()?);
        }

        Ok(exprs)
    }
}

/// Parse an expression string into an AST.
///
/// Returns:
/// - `Ok(Some(expr))` for valid expressions
/// - `Ok(None)` for empty input
/// - `Err(errors)` for lex or parse errors
pub fn parse(input: &str) -> Result<Option<Expr0>, Vec<ExprError>> {
    let lexer = Lexer::new(input);
    let mut parser = match Parser::new(lexer) {
        Ok(p) => p,
        Err(e) => return Err(vec![e]),
    };

    parser.parse_expression().map_err(|e| vec![e])
}
