/// Type-expression parsing methods.
///
/// This chunk parses field, parameter and return types:
/// - Scalar keywords (`int32`, `string`), which become references into the built-in package
/// - Fixed arrays `[N]T` and lists `[]T`
/// - Maps `map[K]V`
/// - Dotted references to declared types (`Order`, `shop.Order`)
///
/// ## Notes
/// - Array and list elements cannot themselves be arrays or lists; map keys and values cannot be
///   any composite type.
impl<'h, 's> Parser<'h, 's> {
    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Result<NodeId, CompileError> {
        let token = self.next()?;
        let script = self.script;
        match token.kind {
            TokenKind::Char('[') => {
                let mut len = None;
                if let TokenKind::Int(value) = self.peek()?.kind {
                    let literal = self.next()?;
                    if !(1..=i64::from(u16::MAX)).contains(&value) {
                        return Err(errors::array_length_out_of_range(literal.position, value));
                    }
                    len = Some(value as u16);
                }
                self.expect_char(']')?;
                let element = self.parse_type()?;
                if matches!(self.ast().kind(element), NodeKind::Array(_) | NodeKind::List(_)) {
                    return Err(errors::nested_composite(token.position, "array or list element", "an array or list"));
                }
                Ok(match len {
                    Some(len) => self.ast().new_array(script, len, element, token.position),
                    None => self.ast().new_list(script, element, token.position),
                })
            }
            TokenKind::Keyword(KeywordId::Map) => {
                self.expect_char('[')?;
                let key = self.parse_type()?;
                if self.ast().kind(key).is_composite() {
                    return Err(errors::nested_composite(token.position, "map key", "an array, list or map"));
                }
                self.expect_char(']')?;
                let value = self.parse_type()?;
                if self.ast().kind(value).is_composite() {
                    return Err(errors::nested_composite(token.position, "map value", "an array, list or map"));
                }
                Ok(self.ast().new_map(script, key, value, token.position))
            }
            TokenKind::Keyword(id) => match keywords::scalar_type_name(id) {
                Some(name) => Ok(self.builtin_type_ref(name, token.position)),
                None => Err(errors::unexpected_token(token.position, "type", &token.kind.describe())),
            },
            TokenKind::Ident(first) => self.finish_type_ref(first, token.position),
            other => Err(errors::unexpected_token(token.position, "type", &other.describe())),
        }
    }

    /// `Name`, `Enum.Value`, `alias.Name` or `alias.Enum.Value`.
    fn parse_type_ref(&mut self) -> Result<NodeId, CompileError> {
        let (first, position) = self.expect_ident("type name")?;
        self.finish_type_ref(first, position)
    }

    fn finish_type_ref(&mut self, first: String, position: Position) -> Result<NodeId, CompileError> {
        let mut path = vec![first];
        while self.match_char('.')? {
            path.push(self.expect_ident("type name")?.0);
        }
        let script = self.script;
        Ok(self.ast().new_type_ref(script, path, position))
    }
}
