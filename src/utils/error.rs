//! Error handling for the SOL25 front end

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const MISSING_PARAM: i32 = 10;
    pub const INPUT: i32 = 11;
    pub const OUTPUT: i32 = 12;
    pub const LEXICAL: i32 = 21;
    pub const SYNTAX: i32 = 22;
    pub const MISSING_MAIN: i32 = 31;
    pub const UNDEFINED_USE: i32 = 32;
    pub const ARITY_MISMATCH: i32 = 33;
    pub const VAR_COLLISION: i32 = 34;
    pub const SEMANTIC_OTHER: i32 = 35;
    pub const INTERNAL: i32 = 99;
}

/// Front end error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Driver Errors ====================

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Output error: {0}")]
    Output(String),

    // ==================== Lexical Errors ====================

    #[error("Unexpected character {ch:?}")]
    UnexpectedChar { ch: char, span: Span },

    #[error("Unterminated comment")]
    UnterminatedComment { span: Span },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Invalid escape sequence \\{ch}")]
    InvalidEscape { ch: char, span: Span },

    // ==================== Parser Errors ====================

    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("Expressions nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },

    // ==================== Semantic Errors ====================

    #[error("Missing class Main")]
    MissingMainClass,

    #[error("Class Main has no parameterless run method")]
    MissingRunMethod { span: Span },

    #[error("Undefined class: {name}")]
    UndefinedClass { name: String, span: Span },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String, span: Span },

    #[error("Class {class} does not understand {selector}")]
    UndefinedMethod {
        class: String,
        selector: String,
        span: Span,
    },

    #[error("Arity mismatch in {selector}: selector takes {expected}, block takes {got}")]
    ArityMismatch {
        selector: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("Assignment to parameter {name}")]
    VariableCollision { name: String, span: Span },

    #[error("Duplicate class: {name}")]
    DuplicateClass { name: String, span: Span },

    #[error("Duplicate method {selector} in class {class}")]
    DuplicateMethod {
        class: String,
        selector: String,
        span: Span,
    },

    #[error("Duplicate parameter: {name}")]
    DuplicateParameter { name: String, span: Span },

    #[error("Circular inheritance involving class {class}")]
    CircularInheritance { class: String, span: Span },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedChar { span, .. } => Some(*span),
            Self::UnterminatedComment { span } => Some(*span),
            Self::UnterminatedString { span } => Some(*span),
            Self::InvalidEscape { span, .. } => Some(*span),
            Self::UnexpectedToken { span, .. } => Some(*span),
            Self::NestingTooDeep { span, .. } => Some(*span),
            Self::MissingRunMethod { span } => Some(*span),
            Self::UndefinedClass { span, .. } => Some(*span),
            Self::UndefinedVariable { span, .. } => Some(*span),
            Self::UndefinedMethod { span, .. } => Some(*span),
            Self::ArityMismatch { span, .. } => Some(*span),
            Self::VariableCollision { span, .. } => Some(*span),
            Self::DuplicateClass { span, .. } => Some(*span),
            Self::DuplicateMethod { span, .. } => Some(*span),
            Self::DuplicateParameter { span, .. } => Some(*span),
            Self::CircularInheritance { span, .. } => Some(*span),
            Self::InvalidArguments(_)
            | Self::Input(_)
            | Self::Output(_)
            | Self::MissingMainClass
            | Self::Internal(_) => None,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArguments(_) => exit_code::MISSING_PARAM,
            Self::Input(_) => exit_code::INPUT,
            Self::Output(_) => exit_code::OUTPUT,
            Self::UnexpectedChar { .. }
            | Self::UnterminatedComment { .. }
            | Self::UnterminatedString { .. }
            | Self::InvalidEscape { .. } => exit_code::LEXICAL,
            Self::UnexpectedToken { .. } | Self::NestingTooDeep { .. } => exit_code::SYNTAX,
            Self::MissingMainClass | Self::MissingRunMethod { .. } => exit_code::MISSING_MAIN,
            Self::UndefinedClass { .. }
            | Self::UndefinedVariable { .. }
            | Self::UndefinedMethod { .. } => exit_code::UNDEFINED_USE,
            Self::ArityMismatch { .. } => exit_code::ARITY_MISMATCH,
            Self::VariableCollision { .. } => exit_code::VAR_COLLISION,
            Self::DuplicateClass { .. }
            | Self::DuplicateMethod { .. }
            | Self::DuplicateParameter { .. }
            | Self::CircularInheritance { .. } => exit_code::SEMANTIC_OTHER,
            Self::Internal(_) => exit_code::INTERNAL,
        }
    }

    /// Short stable name of the error category
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_code::MISSING_PARAM => "arguments",
            exit_code::INPUT => "input",
            exit_code::OUTPUT => "output",
            exit_code::LEXICAL => "lexical",
            exit_code::SYNTAX => "syntax",
            exit_code::MISSING_MAIN => "missing-main",
            exit_code::UNDEFINED_USE => "undefined",
            exit_code::ARITY_MISMATCH => "arity",
            exit_code::VAR_COLLISION => "collision",
            exit_code::SEMANTIC_OTHER => "semantic",
            _ => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_other_codes() {
        let span = Span::dummy();
        let errors = [
            Error::DuplicateClass { name: "A".into(), span },
            Error::DuplicateMethod { class: "A".into(), selector: "run".into(), span },
            Error::DuplicateParameter { name: "x".into(), span },
            Error::CircularInheritance { class: "A".into(), span },
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 35);
            assert_eq!(err.kind(), "semantic");
        }
    }

    #[test]
    fn test_dedicated_codes() {
        let span = Span::dummy();
        assert_eq!(Error::MissingMainClass.exit_code(), 31);
        assert_eq!(Error::MissingRunMethod { span }.exit_code(), 31);
        assert_eq!(Error::UndefinedVariable { name: "y".into(), span }.exit_code(), 32);
        assert_eq!(
            Error::ArityMismatch { selector: "run".into(), expected: 0, got: 1, span }.exit_code(),
            33
        );
        assert_eq!(Error::VariableCollision { name: "x".into(), span }.exit_code(), 34);
        assert_eq!(Error::UnterminatedComment { span }.exit_code(), 21);
        assert_eq!(Error::Internal("boom".into()).exit_code(), 99);
    }

    #[test]
    fn test_span_absent_for_driver_errors() {
        assert_eq!(Error::Input("closed".into()).span(), None);
        assert_eq!(Error::MissingMainClass.span(), None);
    }
}
