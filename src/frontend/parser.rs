//! Parser for SOL25
//!
//! Recursive descent over the token vector with a single current token.
//!
//! ```text
//! program    := { 'class' classDecl } EOF
//! classDecl  := ClassId ':' ClassId '{' { method } '}'
//! method     := ( ident | selector+ ) block
//! block      := '[' { ':' ident } '|' { statement } ']'
//! statement  := ident ':=' expr '.'
//! expr       := exprBase ( ident | { selector exprBase }+ )?
//! exprBase   := literal | variable | '(' expr ')' | block
//! ```

use log::debug;

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// Deepest allowed nesting of parentheses and blocks inside a method body
pub const MAX_NESTING: usize = 128;

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    description: Option<String>,
}

impl Parser {
    /// Create a new parser by running the lexer to completion
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let tokens = lexer.tokenize()?;
        let mut parser = Self::from_tokens(tokens);
        parser.description = lexer.take_description();
        Ok(parser)
    }

    /// Create a parser from pre-tokenized input
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::eof(Span::new(end, end)));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            description: None,
        }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        // the trailing Eof is never advanced past
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::UnexpectedToken {
            expected: expected.to_string(),
            got: self.current_kind().to_string(),
            span: self.current().span,
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    /// Run `parse` one nesting level deeper, failing past `MAX_NESTING`
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(Error::NestingTooDeep {
                limit: MAX_NESTING,
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut classes = Vec::new();

        while !self.is_at_end() {
            classes.push(self.parse_class()?);
        }

        debug!("parsed {} classes", classes.len());
        Ok(Program {
            classes,
            description: self.description.take(),
        })
    }

    /// Parse a class definition
    fn parse_class(&mut self) -> Result<ClassDef> {
        self.expect(TokenKind::Class)?;

        let name = match self.current_kind() {
            TokenKind::ClassIdent(name) => Ident {
                name: name.clone(),
                span: self.current().span,
            },
            _ => return Err(self.unexpected("class identifier")),
        };
        self.advance();

        self.expect(TokenKind::Colon)?;

        let parent = match self.current_kind().class_name() {
            Some(name) => Ident {
                name: name.to_string(),
                span: self.current().span,
            },
            None => return Err(self.unexpected("parent class name")),
        };
        self.advance();

        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            methods.push(self.parse_method()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(ClassDef {
            name,
            parent,
            methods,
        })
    }

    /// Parse a method: selector followed by its block
    fn parse_method(&mut self) -> Result<Method> {
        let start = self.current().span;

        let (selector, arity) = match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                (name, 0)
            }
            TokenKind::Selector(_) => {
                let mut selector = String::new();
                let mut arity = 0;
                while let TokenKind::Selector(part) = self.current_kind().clone() {
                    self.advance();
                    selector.push_str(&part);
                    arity += 1;
                }
                (selector, arity)
            }
            _ => return Err(self.unexpected("method selector")),
        };

        let body = self.parse_block()?;

        Ok(Method {
            selector,
            arity,
            body,
            span: start.merge(&self.previous_span()),
        })
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Ident {
                    name,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse a block: `[ :a :b | stmts ]`
    fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(TokenKind::LBracket)?.span;

        let mut params = Vec::new();
        while self.consume(&TokenKind::Colon) {
            params.push(self.parse_ident()?);
        }
        self.expect(TokenKind::Pipe)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBracket)?;

        Ok(Block {
            params,
            stmts,
            span: start.merge(&self.previous_span()),
        })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let target = self.parse_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Dot)?;

        Ok(Stmt { target, value })
    }

    /// Parse an expression base and its optional trailing selector.
    /// Without a trailer the base itself is returned, never a 0-argument send.
    fn parse_expr(&mut self) -> Result<Expr> {
        let receiver = self.parse_expr_base()?;

        match self.current_kind().clone() {
            TokenKind::Ident(selector) => {
                self.advance();
                Ok(Expr::Send {
                    span: receiver.span().merge(&self.previous_span()),
                    receiver: Box::new(receiver),
                    selector,
                    args: Vec::new(),
                })
            }
            TokenKind::Selector(_) => {
                let mut selector = String::new();
                let mut args = Vec::new();
                while let TokenKind::Selector(part) = self.current_kind().clone() {
                    self.advance();
                    selector.push_str(&part);
                    // arguments are bases; nested sends need parentheses
                    args.push(self.parse_expr_base()?);
                }
                Ok(Expr::Send {
                    span: receiver.span().merge(&self.previous_span()),
                    receiver: Box::new(receiver),
                    selector,
                    args,
                })
            }
            _ => Ok(receiver),
        }
    }

    fn parse_expr_base(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        let span = token.span;

        let literal = |kind: LiteralKind, value: &str| Expr::Literal {
            kind,
            value: value.to_string(),
            span,
        };
        let variable = |name: &str| Expr::Variable {
            name: name.to_string(),
            span,
        };

        let expr = match &token.kind {
            TokenKind::IntLit(value) => literal(LiteralKind::Integer, value.as_str()),
            TokenKind::StringLit(value) => literal(LiteralKind::String, value.as_str()),
            TokenKind::Nil => literal(LiteralKind::Nil, "nil"),
            TokenKind::True => literal(LiteralKind::True, "true"),
            TokenKind::False => literal(LiteralKind::False, "false"),
            TokenKind::SelfKw => variable("self"),
            TokenKind::Super => variable("super"),
            TokenKind::Ident(name) => variable(name.as_str()),
            TokenKind::LParen => {
                return self.nested(|parser| {
                    parser.advance();
                    let inner = parser.parse_expr()?;
                    parser.expect(TokenKind::RParen)?;
                    Ok(inner)
                });
            }
            TokenKind::LBracket => {
                return self.nested(|parser| Ok(Expr::Block(parser.parse_block()?)));
            }
            kind => match kind.class_name() {
                Some(name) => literal(LiteralKind::Class, name),
                None => return Err(self.unexpected("expression")),
            },
        };

        self.advance();
        Ok(expr)
    }
}
