//! String literal and comment scanning for the tidl lexer.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Position;
use crate::diagnostics::{CompileError, errors};

impl<'a> Lexer<'a> {
    /// Scan a single-line string delimited by `"` or `'`.
    ///
    /// ## Notes
    /// - The only escape is a backslash before the enclosing quote.
    pub(super) fn scan_string(&mut self, start: &Position) -> Result<TokenKind, CompileError> {
        let quote = self.advance()?;
        let mut value = String::new();
        loop {
            let escape_at = self.here();
            match self.advance()? {
                None | Some('\n') => return Err(errors::unterminated_string(start.clone())),
                Some('\\') => match self.advance()? {
                    Some(c) if Some(c) == quote => value.push(c),
                    None | Some('\n') => return Err(errors::unterminated_string(start.clone())),
                    Some(c) => return Err(errors::illegal_escape(escape_at, c)),
                },
                Some(c) if Some(c) == quote => return Ok(TokenKind::String(value)),
                Some(c) => value.push(c),
            }
        }
    }

    /// Scan `// ...` up to (not including) the end of line; the first `/` is already consumed.
    pub(super) fn scan_line_comment(&mut self) -> Result<TokenKind, CompileError> {
        self.advance()?;
        let mut text = String::new();
        while let Some(c) = self.peek()? {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance()?;
        }
        Ok(TokenKind::Comment(text))
    }

    /// Scan `/* ... */`; the `/` is already consumed.
    pub(super) fn scan_block_comment(&mut self, start: &Position) -> Result<TokenKind, CompileError> {
        self.advance()?;
        let mut text = String::new();
        loop {
            match self.advance()? {
                None => return Err(errors::unterminated_comment(start.clone())),
                Some('*') if self.peek()? == Some('/') => {
                    self.advance()?;
                    return Ok(TokenKind::Comment(text));
                }
                Some(c) => text.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::ErrorKind;
    use crate::lexer::{TokenKind, lex};

    fn kinds(source: &str) -> Result<Vec<TokenKind>, ErrorKind> {
        lex(source.as_bytes(), "s.tidl")
            .map(|tokens| tokens.into_iter().map(|t| t.kind).collect())
            .map_err(|e| e.kind)
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds(r#""a b" 'c'"#),
            Ok(vec![
                TokenKind::String("a b".into()),
                TokenKind::String("c".into()),
                TokenKind::Eof
            ])
        );
        assert_eq!(
            kinds(r#""say \"hi\"" 'it\'s'"#),
            Ok(vec![
                TokenKind::String("say \"hi\"".into()),
                TokenKind::String("it's".into()),
                TokenKind::Eof
            ])
        );
        // the other quote character needs no escape
        assert_eq!(kinds(r#""it's""#), Ok(vec![TokenKind::String("it's".into()), TokenKind::Eof]));
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(kinds("\"abc"), Err(ErrorKind::UnterminatedString));
        assert_eq!(kinds("\"ab\ncd\""), Err(ErrorKind::UnterminatedString));
        assert_eq!(kinds(r#""a\nb""#), Err(ErrorKind::IllegalEscape));
        assert_eq!(kinds(r#"'a\"b'"#), Err(ErrorKind::IllegalEscape));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// line\nx /* block\n */ y"),
            Ok(vec![
                TokenKind::Comment(" line".into()),
                TokenKind::Ident("x".into()),
                TokenKind::Comment(" block\n ".into()),
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ])
        );
        assert_eq!(kinds("/* open"), Err(ErrorKind::UnterminatedComment));
        assert_eq!(kinds("/* a * b */"), Ok(vec![TokenKind::Comment(" a * b ".into()), TokenKind::Eof]));
    }

    #[test]
    fn test_comment_position_is_its_start() {
        let tokens = lex(b"a\n  // note", "s.tidl").unwrap();
        assert_eq!(tokens[1].position.to_string(), "s.tidl(2:3)");
    }
}
