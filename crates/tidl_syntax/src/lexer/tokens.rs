//! Token types for the tidl lexer.
//!
//! ## Notes
//! - Reserved words carry a [`KeywordId`] from `tidl_core::lang::keywords`.
//! - Punctuation is not enumerated: every character that starts no other token is a
//!   [`TokenKind::Char`].

use crate::ast::Position;
use tidl_core::lang::keywords::{self, KeywordId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    /// `name:` with the colon consumed; keys of named attribute arguments.
    Label(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),

    /// Body of a `//` or `/* */` comment.
    Comment(String),

    /// `->`
    Arrow,
    /// Any other single character.
    Char(char),

    Eof,
}

impl TokenKind {
    /// Short description used in "expect X, got Y" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("keyword `{}`", keywords::as_str(*id)),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Label(name) => format!("label `{name}:`"),
            TokenKind::Int(value) => format!("integer `{value}`"),
            TokenKind::Float(value) => format!("float `{value}`"),
            TokenKind::Bool(value) => format!("bool `{value}`"),
            TokenKind::String(value) => format!("string {value:?}"),
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Arrow => "`->`".to_string(),
            TokenKind::Char(c) => format!("`{c}`"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its kind and start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn is_char(&self, c: char) -> bool {
        self.kind == TokenKind::Char(c)
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind == TokenKind::Keyword(id)
    }
}

/// Classify an identifier: keyword, boolean literal, or plain identifier.
pub fn classify_word(word: String) -> TokenKind {
    if let Some(id) = keywords::from_str(&word) {
        return TokenKind::Keyword(id);
    }
    match word.as_str() {
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        _ => TokenKind::Ident(word),
    }
}
