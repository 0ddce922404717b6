//! Structured Feedback Module
//!
//! Turns a front end error into a report for stderr, either as a one-line
//! human message or as JSON for tooling.

use serde::Serialize;

use crate::utils::Error;

/// Environment variable selecting the error report format
pub const ERROR_FORMAT_ENV: &str = "SOL25_ERROR_FORMAT";

/// How errors are reported on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    #[default]
    Human,
    Json,
}

impl ErrorFormat {
    /// Read the format from the environment; unknown values mean `Human`
    pub fn from_env() -> Self {
        Self::parse(std::env::var(ERROR_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => ErrorFormat::Json,
            _ => ErrorFormat::Human,
        }
    }
}

/// A structured error report
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Process exit code
    pub code: i32,

    /// Error category, e.g. "syntax" or "undefined"
    pub kind: String,

    /// Human-readable message
    pub message: String,

    /// Location in the source, when the error has one
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl ErrorReport {
    /// Create a report; `source` resolves the span into a line and column
    pub fn from_error(error: &Error, source: Option<&str>) -> Self {
        let location = match (error.span(), source) {
            (Some(span), Some(source)) => {
                let (line, column) = span.line_col(source);
                Some(Location { line, column })
            }
            _ => None,
        };

        Self {
            code: error.exit_code(),
            kind: error.kind().to_string(),
            message: error.to_string(),
            location,
        }
    }

    /// One-line message, e.g. `error[32]: Undefined variable: y at 3:9`
    pub fn to_human(&self) -> String {
        match self.location {
            Some(loc) => format!(
                "error[{}]: {} at {}:{}",
                self.code, self.message, loc.line, loc.column
            ),
            None => format!("error[{}]: {}", self.code, self.message),
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn render(&self, format: ErrorFormat) -> String {
        match format {
            ErrorFormat::Human => self.to_human(),
            ErrorFormat::Json => self.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ErrorFormat::parse(None), ErrorFormat::Human);
        assert_eq!(ErrorFormat::parse(Some("JSON")), ErrorFormat::Json);
        assert_eq!(ErrorFormat::parse(Some(" json ")), ErrorFormat::Json);
        assert_eq!(ErrorFormat::parse(Some("yaml")), ErrorFormat::Human);
    }

    #[test]
    fn test_human_report_with_location() {
        let source = "class Main : Object {\n  run [ | x := y. ]\n}";
        let error = Error::UndefinedVariable {
            name: "y".to_string(),
            span: Span::new(37, 38),
        };
        let report = ErrorReport::from_error(&error, Some(source));

        assert_eq!(report.location, Some(Location { line: 2, column: 16 }));
        assert_eq!(report.to_human(), "error[32]: Undefined variable: y at 2:16");
    }

    #[test]
    fn test_human_report_without_location() {
        let report = ErrorReport::from_error(&Error::MissingMainClass, Some(""));
        assert_eq!(report.to_human(), "error[31]: Missing class Main");
    }

    #[test]
    fn test_json_report() {
        let error = Error::UnexpectedChar {
            ch: '#',
            span: Span::new(0, 1),
        };
        let report = ErrorReport::from_error(&error, Some("#"));
        let json: serde_json::Value = serde_json::from_str(&report.render(ErrorFormat::Json)).unwrap();

        assert_eq!(json["code"], 21);
        assert_eq!(json["kind"], "lexical");
        assert_eq!(json["location"]["line"], 1);
        assert_eq!(json["location"]["column"], 1);
    }
}
