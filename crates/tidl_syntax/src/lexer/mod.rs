//! Lexer for the tidl schema language.
//!
//! Produces one token per request with a single token of lookahead ([`Lexer::peek_token`] /
//! [`Lexer::next_token`]). Input is raw bytes; UTF-8 is decoded one character at a time while the
//! lexer tracks line and column.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String literal and comment scanning
//! - `numbers` - Numeric literal scanning
//!
//! ## Notes
//! - Whitespace is `\t`, `\n`, `\r` and space; `\n` starts a new line.
//! - Every lexical error is fatal and carries the position where the offending token started.

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::ast::Position;
use crate::diagnostics::{CompileError, errors};
use std::sync::Arc;

// ============================================================================
// LEXER STATE
// ============================================================================

/// Streaming lexer over a UTF-8 byte buffer.
pub struct Lexer<'a> {
    source: &'a [u8],
    offset: usize,
    file: Arc<str>,
    line: u32,
    column: u32,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for `source`, reporting positions against `file`.
    pub fn new(source: &'a [u8], file: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            offset: 0,
            file: file.into(),
            line: 1,
            column: 1,
            lookahead: None,
        }
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, CompileError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Consume and return the next token; keeps returning `Eof` at end of input.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    /// Tokenize the remaining input, including comments; the result ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn here(&self) -> Position {
        Position::new(self.file.clone(), self.line, self.column)
    }

    /// Decode the character at the cursor without consuming it.
    fn decode(&self) -> Result<Option<(char, usize)>, CompileError> {
        let Some(&lead) = self.source.get(self.offset) else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7F => return Ok(Some((lead as char, 1))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(errors::illegal_utf8(self.here())),
        };
        self.source
            .get(self.offset..self.offset + width)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|s| s.chars().next())
            .map(|c| Some((c, width)))
            .ok_or_else(|| errors::illegal_utf8(self.here()))
    }

    fn peek(&self) -> Result<Option<char>, CompileError> {
        Ok(self.decode()?.map(|(c, _)| c))
    }

    fn advance(&mut self) -> Result<Option<char>, CompileError> {
        let Some((c, width)) = self.decode()? else {
            return Ok(None);
        };
        self.offset += width;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Ok(Some(c))
    }

    fn skip_whitespace(&mut self) -> Result<(), CompileError> {
        while let Some(c) = self.peek()? {
            if !matches!(c, '\t' | '\n' | '\r' | ' ') {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    fn scan_token(&mut self) -> Result<Token, CompileError> {
        self.skip_whitespace()?;
        let start = self.here();
        let Some(c) = self.peek()? else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        let kind = match c {
            c if c.is_alphabetic() || c == '_' => self.scan_word()?,
            '0'..='9' => self.scan_number(&start)?,
            '"' | '\'' => self.scan_string(&start)?,
            '/' => {
                self.advance()?;
                match self.peek()? {
                    Some('/') => self.scan_line_comment()?,
                    Some('*') => self.scan_block_comment(&start)?,
                    _ => TokenKind::Char('/'),
                }
            }
            '-' => {
                self.advance()?;
                if self.peek()? == Some('>') {
                    self.advance()?;
                    TokenKind::Arrow
                } else {
                    TokenKind::Char('-')
                }
            }
            c => {
                self.advance()?;
                TokenKind::Char(c)
            }
        };
        Ok(Token::new(kind, start))
    }

    fn scan_word(&mut self) -> Result<TokenKind, CompileError> {
        let mut word = String::new();
        while let Some(c) = self.peek()? {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            word.push(c);
            self.advance()?;
        }
        let kind = tokens::classify_word(word);
        if let TokenKind::Ident(name) = kind {
            if self.peek()? == Some(':') {
                self.advance()?;
                return Ok(TokenKind::Label(name));
            }
            return Ok(TokenKind::Ident(name));
        }
        Ok(kind)
    }
}

/// Convenience function to lex a whole buffer.
///
/// This is a shorthand for `Lexer::new(source, file).tokenize()`.
#[tracing::instrument(skip_all, fields(file = file, source_len = source.len()))]
pub fn lex(source: &[u8], file: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source, file).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
