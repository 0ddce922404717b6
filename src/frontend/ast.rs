//! Abstract Syntax Tree definitions for SOL25

use crate::utils::Span;

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDef>,
    /// Text of the first comment in the source, if any
    pub description: Option<String>,
}

/// Identifier with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Class definition
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: Ident,
    pub parent: Ident,
    pub methods: Vec<Method>,
}

/// Method definition
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Full selector, e.g. `run` or `from:to:`
    pub selector: String,
    /// Number of keyword parts in the selector
    pub arity: usize,
    pub body: Block,
    pub span: Span,
}

/// Block: `[ :a :b | stmt. stmt. ]`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub params: Vec<Ident>,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Assignment statement: `target := expr.`
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub target: Ident,
    pub value: Expr,
}

/// Kind of a literal value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    String,
    Nil,
    True,
    False,
    /// A class name used as a value, e.g. `Integer` in `Integer from: 1`
    Class,
}

impl LiteralKind {
    /// Class tag written for this literal kind
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralKind::Integer => "Integer",
            LiteralKind::String => "String",
            LiteralKind::Nil => "Nil",
            LiteralKind::True => "True",
            LiteralKind::False => "False",
            LiteralKind::Class => "class",
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal {
        kind: LiteralKind,
        value: String,
        span: Span,
    },
    /// Variable, parameter or pseudo-variable (`self`, `super`)
    Variable { name: String, span: Span },
    /// Message send
    Send {
        receiver: Box<Expr>,
        selector: String,
        args: Vec<Expr>,
        span: Span,
    },
    /// Block used as a value
    Block(Block),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. } => *span,
            Expr::Variable { span, .. } => *span,
            Expr::Send { span, .. } => *span,
            Expr::Block(block) => block.span,
        }
    }

    /// Class name if this expression is a class-name literal
    pub fn as_class_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal {
                kind: LiteralKind::Class,
                value,
                ..
            } => Some(value),
            _ => None,
        }
    }
}
