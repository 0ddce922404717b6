//! Token definitions for SOL25

use std::fmt;

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// class
    Class,
    /// self
    SelfKw,
    /// super
    Super,
    /// nil
    Nil,
    /// true
    True,
    /// false
    False,

    // ============ Built-in Classes ============
    /// Object
    ObjectClass,
    /// Nil
    NilClass,
    /// True
    TrueClass,
    /// False
    FalseClass,
    /// Integer
    IntegerClass,
    /// String
    StringClass,
    /// Block
    BlockClass,

    // ============ Identifiers and Literals ============
    /// Lowercase-led identifier (variable, parameter, unary selector)
    Ident(String),
    /// Uppercase-led identifier (user class name)
    ClassIdent(String),
    /// Keyword selector part including its colon, e.g. `plus:`
    Selector(String),
    /// String literal, quotes stripped, escapes kept verbatim
    StringLit(String),
    /// Integer literal as written, optional sign included
    IntLit(String),

    // ============ Punctuation ============
    /// :=
    Assign,
    /// .
    Dot,
    /// :
    Colon,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// (
    LParen,
    /// )
    RParen,
    /// |
    Pipe,

    // ============ Special ============
    /// End of input
    Eof,
}

impl TokenKind {
    /// Try to convert a whole word to a keyword or built-in class name
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "class" => Some(TokenKind::Class),
            "self" => Some(TokenKind::SelfKw),
            "super" => Some(TokenKind::Super),
            "nil" => Some(TokenKind::Nil),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "Object" => Some(TokenKind::ObjectClass),
            "Nil" => Some(TokenKind::NilClass),
            "True" => Some(TokenKind::TrueClass),
            "False" => Some(TokenKind::FalseClass),
            "Integer" => Some(TokenKind::IntegerClass),
            "String" => Some(TokenKind::StringClass),
            "Block" => Some(TokenKind::BlockClass),
            _ => None,
        }
    }

    /// Name of the built-in class this token denotes, if any
    pub fn builtin_class_name(&self) -> Option<&'static str> {
        match self {
            TokenKind::ObjectClass => Some("Object"),
            TokenKind::NilClass => Some("Nil"),
            TokenKind::TrueClass => Some("True"),
            TokenKind::FalseClass => Some("False"),
            TokenKind::IntegerClass => Some("Integer"),
            TokenKind::StringClass => Some("String"),
            TokenKind::BlockClass => Some("Block"),
            _ => None,
        }
    }

    /// Class name carried by a built-in or user class token
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TokenKind::ClassIdent(name) => Some(name),
            other => other.builtin_class_name(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Class => write!(f, "'class'"),
            TokenKind::SelfKw => write!(f, "'self'"),
            TokenKind::Super => write!(f, "'super'"),
            TokenKind::Nil => write!(f, "'nil'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::ClassIdent(name) => write!(f, "class identifier '{}'", name),
            TokenKind::Selector(name) => write!(f, "selector '{}'", name),
            TokenKind::StringLit(value) => write!(f, "string '{}'", value),
            TokenKind::IntLit(value) => write!(f, "integer {}", value),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Eof => write!(f, "end of input"),
            builtin => match builtin.builtin_class_name() {
                Some(name) => write!(f, "class '{}'", name),
                None => write!(f, "{:?}", builtin),
            },
        }
    }
}
