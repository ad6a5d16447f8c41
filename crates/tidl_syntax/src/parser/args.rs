/// Attribute argument parsing methods.
///
/// An argument list is either entirely named (`Key: value, ...`) or entirely positional
/// (`value, ...`); the first token decides. A value is a literal, a dotted reference (usually an
/// enum value), or a `|` chain of those folded left into [`BinaryOp`] nodes.
impl<'h, 's> Parser<'h, 's> {
    // ========================================================================
    // Arguments
    // ========================================================================

    /// Parse the inside of `@Attr( ... )`; returns `None` for an empty list.
    fn parse_args(&mut self) -> Result<Option<NodeId>, CompileError> {
        let token = self.peek()?.clone();
        let script = self.script;
        match token.kind {
            TokenKind::Char(')') => Ok(None),
            TokenKind::Label(_) => {
                let args = self.ast().new_named_args(script, token.position);
                loop {
                    let label = self.next()?;
                    let TokenKind::Label(name) = label.kind else {
                        return Err(errors::unexpected_token(
                            label.position,
                            "argument label",
                            &label.kind.describe(),
                        ));
                    };
                    let value = self.parse_arg()?;
                    if let Err(existing) = self.ast().insert_named_arg(args, &name, value) {
                        return Err(self.duplicate(ErrorKind::DuplicateArgument, "argument", &name, label.position, existing));
                    }
                    let more = self.match_char(',')?;
                    self.attach_comments(value)?;
                    if !more {
                        return Ok(Some(args));
                    }
                }
            }
            _ => {
                let args = self.ast().new_args(script, token.position);
                loop {
                    let value = self.parse_arg()?;
                    self.ast().push_arg(args, value);
                    let more = self.match_char(',')?;
                    self.attach_comments(value)?;
                    if !more {
                        return Ok(Some(args));
                    }
                }
            }
        }
    }

    /// One argument value, including `a | b | c` chains.
    fn parse_arg(&mut self) -> Result<NodeId, CompileError> {
        let mut value = self.parse_operand()?;
        while self.peek()?.is_char('|') {
            let bar = self.next()?;
            let rhs = self.parse_operand()?;
            let script = self.script;
            value = self.ast().new_binary_op(script, BinaryOpKind::Or, value, rhs, bar.position);
        }
        Ok(value)
    }

    fn parse_operand(&mut self) -> Result<NodeId, CompileError> {
        let token = self.next()?;
        let script = self.script;
        let position = token.position;
        match token.kind {
            TokenKind::Int(value) => Ok(self.ast().new_int(script, value, position)),
            TokenKind::Float(value) => Ok(self.ast().new_float(script, value, position)),
            TokenKind::String(value) => Ok(self.ast().new_string(script, value, position)),
            TokenKind::Bool(value) => Ok(self.ast().new_bool(script, value, position)),
            TokenKind::Char(sign @ ('-' | '+')) => {
                let number = self.next()?;
                let negate = sign == '-';
                match number.kind {
                    TokenKind::Int(value) => {
                        let value = if negate { -value } else { value };
                        Ok(self.ast().new_int(script, value, position))
                    }
                    TokenKind::Float(value) => {
                        let value = if negate { -value } else { value };
                        Ok(self.ast().new_float(script, value, position))
                    }
                    other => Err(errors::unexpected_token(number.position, "number", &other.describe())),
                }
            }
            TokenKind::Ident(first) => self.finish_type_ref(first, position),
            other => Err(errors::unexpected_token(position, "argument", &other.describe())),
        }
    }
}
