//! Number scanning for the tidl lexer
//!
//! Handles decimal and hexadecimal integers and floating-point literals.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Position;
use crate::diagnostics::{CompileError, errors};

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: &Position) -> Result<TokenKind, CompileError> {
        let mut text = String::new();
        let first = self.advance()?;
        text.extend(first);

        // Hexadecimal
        if first == Some('0') && matches!(self.peek()?, Some('x' | 'X')) {
            text.extend(self.advance()?);
            self.take_while(&mut text, |c| c.is_ascii_hexdigit())?;
            if text.len() < 3 {
                return Err(errors::malformed_number(start.clone(), &text));
            }
            return i64::from_str_radix(&text[2..], 16)
                .map(TokenKind::Int)
                .map_err(|_| errors::malformed_number(start.clone(), &text));
        }

        // Mantissa
        self.take_while(&mut text, |c| c.is_ascii_digit())?;
        let mut is_float = false;

        // Fraction
        if self.peek()? == Some('.') {
            is_float = true;
            text.extend(self.advance()?);
            self.take_while(&mut text, |c| c.is_ascii_digit())?;
        }

        // Exponent
        if matches!(self.peek()?, Some('e' | 'E')) {
            is_float = true;
            text.extend(self.advance()?);
            if matches!(self.peek()?, Some('+' | '-')) {
                text.extend(self.advance()?);
            }
            self.take_while(&mut text, |c| c.is_ascii_digit())?;
        }

        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| errors::malformed_number(start.clone(), &text))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| errors::malformed_number(start.clone(), &text))
        }
    }

    fn take_while(&mut self, text: &mut String, accept: impl Fn(char) -> bool) -> Result<(), CompileError> {
        while let Some(c) = self.peek()? {
            if !accept(c) {
                break;
            }
            text.push(c);
            self.advance()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::ErrorKind;
    use crate::lexer::{TokenKind, lex};

    fn first(source: &str) -> Result<TokenKind, ErrorKind> {
        lex(source.as_bytes(), "n.tidl")
            .map(|tokens| tokens[0].kind.clone())
            .map_err(|e| e.kind)
    }

    #[test]
    fn test_hex_literals() {
        assert_eq!(first("0x1A"), Ok(TokenKind::Int(26)));
        assert_eq!(first("0XfF"), Ok(TokenKind::Int(255)));
        assert_eq!(first("0x"), Err(ErrorKind::MalformedNumber));
        assert_eq!(first("0xg"), Err(ErrorKind::MalformedNumber));
        assert_eq!(first("0xFFFFFFFFFFFFFFFFFF"), Err(ErrorKind::MalformedNumber));
    }

    #[test]
    fn test_decimal_and_float_literals() {
        assert_eq!(first("42"), Ok(TokenKind::Int(42)));
        assert_eq!(first("007"), Ok(TokenKind::Int(7)));
        assert_eq!(first("1.5"), Ok(TokenKind::Float(1.5)));
        assert_eq!(first("2e3"), Ok(TokenKind::Float(2000.0)));
        assert_eq!(first("2.5E-1"), Ok(TokenKind::Float(0.25)));
        assert_eq!(first("1e"), Err(ErrorKind::MalformedNumber));
        assert_eq!(first("99999999999999999999"), Err(ErrorKind::MalformedNumber));
    }

    #[test]
    fn test_number_stops_at_non_digit() {
        let tokens = lex(b"12)", "n.tidl").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int(12));
        assert_eq!(tokens[1].kind, TokenKind::Char(')'));
    }
}
