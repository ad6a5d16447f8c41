/// Token-stream helpers, comment binding and attribute buffering.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `next`); comment tokens are moved into the pending
///   comment buffer on the way, so the grammar never sees them
/// - Matching / expecting punctuation, identifiers and strings
/// - Binding pending comments and attributes to the node that was just parsed
impl<'h, 's> Parser<'h, 's> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn ast(&mut self) -> &mut Ast {
        self.host.ast()
    }

    /// Return the next non-comment token without consuming it.
    fn peek(&mut self) -> Result<&Token, CompileError> {
        while matches!(self.lexer.peek_token()?.kind, TokenKind::Comment(_)) {
            let token = self.lexer.next_token()?;
            if let TokenKind::Comment(text) = token.kind {
                self.comments.push(Comment {
                    text,
                    position: token.position,
                });
            }
        }
        self.lexer.peek_token()
    }

    /// Consume the next non-comment token.
    fn next(&mut self) -> Result<Token, CompileError> {
        self.peek()?;
        self.lexer.next_token()
    }

    /// If the next token is the character `c`, consume it and return `true`.
    fn match_char(&mut self, c: char) -> Result<bool, CompileError> {
        if self.peek()?.is_char(c) {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_char(&mut self, c: char) -> Result<Token, CompileError> {
        let token = self.next()?;
        if token.is_char(c) {
            Ok(token)
        } else {
            Err(errors::unexpected_token(
                token.position,
                &format!("`{c}`"),
                &token.kind.describe(),
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Position), CompileError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.position)),
            other => Err(errors::unexpected_token(token.position, what, &other.describe())),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<(String, Position), CompileError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::String(value) => Ok((value, token.position)),
            other => Err(errors::unexpected_token(token.position, what, &other.describe())),
        }
    }

    /// Turn `Err(existing)` from an arena constructor into a duplicate-name diagnostic.
    fn duplicate(&mut self, kind: ErrorKind, what: &str, name: &str, position: Position, existing: NodeId) -> CompileError {
        errors::duplicate(kind, position, what, name, self.ast().position(existing))
    }

    // ========================================================================
    // Comments and attributes
    // ========================================================================

    /// Bind the comments that lead or trail `node`.
    ///
    /// ## Notes
    /// - Pending comments are scanned newest first; a comment is claimed when it sits on the
    ///   anchor line or the line just above it, and the anchor then moves up to that comment.
    /// - Comments that are not claimed stay pending for the next node.
    fn attach_comments(&mut self, node: NodeId) -> Result<(), CompileError> {
        // Pick up comments trailing the node on its last line.
        self.peek()?;

        let mut anchor = self.ast().position(node).line;
        let mut claimed = Vec::new();
        let mut rest = Vec::new();
        for comment in std::mem::take(&mut self.comments).into_iter().rev() {
            let line = comment.position.line;
            if line == anchor || line + 1 == anchor {
                anchor = line;
                claimed.push(comment);
            } else {
                rest.push(comment);
            }
        }
        claimed.reverse();
        rest.reverse();
        self.comments = rest;
        self.ast().bind_comments(node, claimed);
        Ok(())
    }

    /// Move every pending attribute onto `node`.
    fn attach_attrs(&mut self, node: NodeId) {
        for attr in std::mem::take(&mut self.attrs) {
            self.ast().add_attr(node, attr);
        }
    }

    /// `@TypeRef` or `@TypeRef(args)`, repeated; results are buffered until the next declaration.
    fn parse_attrs(&mut self) -> Result<(), CompileError> {
        while self.peek()?.is_char('@') {
            let at = self.next()?;
            let ty = self.parse_type_ref()?;
            let script = self.script;
            let attr = self.ast().new_attr(script, ty, at.position);
            if self.match_char('(')? {
                if let Some(args) = self.parse_args()? {
                    self.ast().set_attr_args(attr, args);
                }
                self.expect_char(')')?;
            }
            self.attach_comments(attr)?;
            self.attrs.push(attr);
        }
        Ok(())
    }
}
