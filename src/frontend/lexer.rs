//! Lexer for SOL25
//!
//! Converts source code into a stream of tokens. Words are read whole and then
//! classified, so a keyword or built-in class name is only recognized when it
//! spans the entire word, and a lowercase word directly followed by `:` (but
//! not `:=`) becomes a single selector token.

use log::{debug, trace};

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
    /// Text of the first comment, quotes stripped
    description: Option<String>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            description: None,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Create a token with the current span
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn text(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    /// Skip whitespace, newlines and comments
    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            match c {
                // CR counts as whitespace so CRLF sources lex like LF ones
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '"' => self.skip_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip a double-quoted comment; the first one becomes the description
    fn skip_comment(&mut self) -> Result<()> {
        let start = self.pos;
        self.advance(); // opening quote

        let body_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '"' {
                if self.description.is_none() {
                    let body: String = self.source[body_start..self.pos].iter().collect();
                    trace!("captured program description ({} chars)", body.chars().count());
                    self.description = Some(body);
                }
                self.advance(); // closing quote
                return Ok(());
            }
            self.advance();
        }

        Err(Error::UnterminatedComment {
            span: Span::new(start, self.pos),
        })
    }

    /// Read a word: keyword, built-in class, identifier or selector part
    fn read_word(&mut self) -> Token {
        let first = self.peek().unwrap_or_default();
        let lowercase_led = first == '_' || first.is_ascii_lowercase();

        while let Some(c) = self.peek() {
            // class identifiers do not admit underscores
            if c.is_ascii_alphanumeric() || (c == '_' && lowercase_led) {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.text();

        if lowercase_led {
            if self.peek() == Some(':') && self.peek_next() != Some('=') {
                self.advance();
                return self.make_token(TokenKind::Selector(format!("{}:", text)));
            }
            let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Ident(text));
            return self.make_token(kind);
        }

        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::ClassIdent(text));
        self.make_token(kind)
    }

    /// Read an integer literal with an optional sign
    fn read_integer(&mut self) -> Token {
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.advance();
        }
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = self.text();
        self.make_token(TokenKind::IntLit(text))
    }

    /// Read a single-quoted string literal
    fn read_string(&mut self) -> Result<Token> {
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(Error::UnterminatedString {
                        span: self.make_span(),
                    });
                }
                Some('\'') => {
                    self.advance();
                    return Ok(self.make_token(TokenKind::StringLit(value)));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c @ ('\'' | 'n' | '\\')) => {
                            value.push('\\');
                            value.push(c);
                            self.advance();
                        }
                        Some(c) => {
                            self.advance();
                            return Err(Error::InvalidEscape {
                                ch: c,
                                span: self.make_span(),
                            });
                        }
                        None => {
                            return Err(Error::UnterminatedString {
                                span: self.make_span(),
                            });
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        self.start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::eof(self.make_span())),
        };

        // Identifiers, keywords and selector parts
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_word());
        }

        // Integers, possibly signed
        if c.is_ascii_digit()
            || (matches!(c, '+' | '-') && self.peek_next().map_or(false, |n| n.is_ascii_digit()))
        {
            return Ok(self.read_integer());
        }

        if c == '\'' {
            return self.read_string();
        }

        self.advance();
        let kind = match c {
            ':' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '.' => TokenKind::Dot,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            _ => {
                return Err(Error::UnexpectedChar {
                    ch: c,
                    span: self.make_span(),
                })
            }
        };

        Ok(self.make_token(kind))
    }

    /// Tokenize the entire source; the last token is always `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        debug!("tokenized {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Take the program description captured from the first comment
    pub fn take_description(&mut self) -> Option<String> {
        self.description.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("class Main : Object { }");

        assert!(matches!(tokens[0], TokenKind::Class));
        assert!(matches!(tokens[1], TokenKind::ClassIdent(ref s) if s == "Main"));
        assert!(matches!(tokens[2], TokenKind::Colon));
        assert!(matches!(tokens[3], TokenKind::ObjectClass));
        assert!(matches!(tokens[4], TokenKind::LBrace));
        assert!(matches!(tokens[5], TokenKind::RBrace));
        assert!(matches!(tokens[6], TokenKind::Eof));
    }

    #[test]
    fn test_keywords_need_whole_words() {
        let tokens = kinds("classes selfish nil Nil Nilly");

        assert!(matches!(tokens[0], TokenKind::Ident(ref s) if s == "classes"));
        assert!(matches!(tokens[1], TokenKind::Ident(ref s) if s == "selfish"));
        assert!(matches!(tokens[2], TokenKind::Nil));
        assert!(matches!(tokens[3], TokenKind::NilClass));
        assert!(matches!(tokens[4], TokenKind::ClassIdent(ref s) if s == "Nilly"));
    }

    #[test]
    fn test_selector_parts() {
        let tokens = kinds("obj startsWith: 1 endsBefore: 3");

        assert!(matches!(tokens[0], TokenKind::Ident(ref s) if s == "obj"));
        assert!(matches!(tokens[1], TokenKind::Selector(ref s) if s == "startsWith:"));
        assert!(matches!(tokens[2], TokenKind::IntLit(ref s) if s == "1"));
        assert!(matches!(tokens[3], TokenKind::Selector(ref s) if s == "endsBefore:"));
    }

    #[test]
    fn test_assign_is_not_a_selector() {
        let tokens = kinds("x:=1. y := -2.");

        assert!(matches!(tokens[0], TokenKind::Ident(ref s) if s == "x"));
        assert!(matches!(tokens[1], TokenKind::Assign));
        assert!(matches!(tokens[2], TokenKind::IntLit(ref s) if s == "1"));
        assert!(matches!(tokens[3], TokenKind::Dot));
        assert!(matches!(tokens[6], TokenKind::IntLit(ref s) if s == "-2"));
    }

    #[test]
    fn test_block_parameters() {
        let tokens = kinds("[ :x :y | ]");

        assert!(matches!(tokens[1], TokenKind::Colon));
        assert!(matches!(tokens[2], TokenKind::Ident(ref s) if s == "x"));
        assert!(matches!(tokens[5], TokenKind::Pipe));
        assert!(matches!(tokens[6], TokenKind::RBracket));
    }

    #[test]
    fn test_class_identifier_stops_at_underscore() {
        let tokens = kinds("Foo_bar");

        assert!(matches!(tokens[0], TokenKind::ClassIdent(ref s) if s == "Foo"));
        assert!(matches!(tokens[1], TokenKind::Ident(ref s) if s == "_bar"));
    }

    #[test]
    fn test_strings_keep_escapes() {
        let tokens = kinds(r"'it\'s\na \\ test'");

        assert!(matches!(tokens[0], TokenKind::StringLit(ref s) if s == r"it\'s\na \\ test"));
    }

    #[test]
    fn test_invalid_escape() {
        let err = Lexer::new(r"'bad \t'").tokenize().unwrap_err();
        assert!(matches!(err, Error::InvalidEscape { ch: 't', .. }));
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn test_string_with_newline() {
        let err = Lexer::new("'line\nbreak'").tokenize().unwrap_err();
        assert!(matches!(err, Error::UnterminatedString { .. }));
    }

    #[test]
    fn test_first_comment_is_description() {
        let mut lexer = Lexer::new("\"first\nline\" class \"second\" Main");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(lexer.take_description().as_deref(), Some("first\nline"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("class \"never closed").tokenize().unwrap_err();
        assert!(matches!(err, Error::UnterminatedComment { span } if span.start == 6));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("x := 1 + 2.").tokenize().unwrap_err();
        assert!(matches!(err, Error::UnexpectedChar { ch: '+', .. }));

        let err = Lexer::new("x := @").tokenize().unwrap_err();
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn test_crlf_line_endings() {
        let crlf = kinds("class Main : Object {\r\n  run [ | ]\r\n}\r\n");
        let lf = kinds("class Main : Object {\n  run [ | ]\n}\n");
        assert_eq!(crlf, lf);
    }

    #[test]
    fn test_spans() {
        let mut lexer = Lexer::new("  run [ | ]");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].span, Span::new(2, 5));
        assert_eq!(tokens[1].span, Span::new(6, 7));
    }
}
