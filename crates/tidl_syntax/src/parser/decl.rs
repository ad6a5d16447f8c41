/// Declaration parsing methods.
///
/// This chunk parses the top-level declarations of a script:
/// - `enum Name [(base)] { Value(n), ... }`
/// - `table Name { field type; ... }` and its `struct` sugar
/// - `contract Name [(Base, ...)] { method(params) [-> (returns)]; ... }`
///
/// ## Notes
/// - Every declaration enters the package-wide type namespace as soon as its name is read, so a
///   duplicate is reported at the second name.
impl<'h, 's> Parser<'h, 's> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare(&mut self, ty: NodeId) -> Result<(), CompileError> {
        let script = self.script;
        self.ast().declare_type(script, ty).map_err(|existing| {
            let ast = self.host.ast();
            errors::duplicate(
                ErrorKind::DuplicateType,
                ast.position(ty).clone(),
                "type name",
                ast.name(ty),
                ast.position(existing),
            )
        })
    }

    /// Reference to a type of the built-in package, spelled as seen from the current package.
    fn builtin_type_ref(&mut self, name: &str, position: Position) -> NodeId {
        let path = if self.package == builtins::PACKAGE {
            vec![name.to_string()]
        } else {
            vec![builtins::ALIAS.to_string(), name.to_string()]
        };
        let script = self.script;
        self.ast().new_type_ref(script, path, position)
    }

    fn parse_enum(&mut self) -> Result<(), CompileError> {
        let (name, position) = self.expect_ident("enum name")?;
        let base = if self.match_char('(')? {
            let token = self.next()?;
            let base = match &token.kind {
                TokenKind::Keyword(id) => keywords::enum_base(*id),
                _ => None,
            };
            let Some(base) = base else {
                return Err(errors::unexpected_token(
                    token.position,
                    "enum base type (byte, sbyte, int16, uint16, int32 or uint32)",
                    &token.kind.describe(),
                ));
            };
            self.expect_char(')')?;
            base
        } else {
            EnumBase::DEFAULT
        };

        let script = self.script;
        let decl = self.ast().new_enum(script, &name, base, position);
        self.declare(decl)?;
        self.attach_comments(decl)?;
        self.attach_attrs(decl);

        self.expect_char('{')?;
        loop {
            self.parse_attrs()?;
            let (value_name, value_position) = self.expect_ident("enum value")?;
            self.expect_char('(')?;
            let negative = self.match_char('-')?;
            let literal = self.next()?;
            let TokenKind::Int(magnitude) = literal.kind else {
                return Err(errors::unexpected_token(literal.position, "integer", &literal.kind.describe()));
            };
            let value = if negative { -magnitude } else { magnitude };
            if !base.contains(value) {
                return Err(errors::enum_value_out_of_range(literal.position, &name, value, base.range()));
            }
            self.expect_char(')')?;

            let val = self
                .ast()
                .new_enum_val(decl, &value_name, value, value_position.clone())
                .map_err(|existing| {
                    self.duplicate(ErrorKind::DuplicateEnumValue, "enum value", &value_name, value_position, existing)
                })?;
            self.attach_attrs(val);
            let more = self.match_char(',')?;
            self.attach_comments(val)?;
            if !more {
                break;
            }
        }
        self.expect_char('}')?;
        Ok(())
    }

    /// `table`/`struct` body; `struct` also gets the built-in `Struct` marker attribute.
    fn parse_table(&mut self, is_struct: bool) -> Result<(), CompileError> {
        let (name, position) = self.expect_ident("table name")?;
        let script = self.script;
        let table = self.ast().new_table(script, &name, position.clone());
        self.declare(table)?;
        self.attach_comments(table)?;
        self.attach_attrs(table);
        if is_struct {
            let ty = self.builtin_type_ref(builtins::STRUCT, position.clone());
            let attr = self.ast().new_attr(script, ty, position);
            self.ast().add_attr(table, attr);
        }

        self.expect_char('{')?;
        loop {
            self.parse_attrs()?;
            if !matches!(self.peek()?.kind, TokenKind::Ident(_)) {
                break;
            }
            let (field_name, field_position) = self.expect_ident("field name")?;
            let ty = self.parse_type()?;
            self.expect_char(';')?;

            let count = self.ast().as_table(table).map_or(0, |t| t.fields.len());
            if count >= usize::from(u16::MAX) {
                return Err(errors::too_many(field_position, "fields"));
            }
            let field = self
                .ast()
                .new_field(table, &field_name, ty, field_position.clone())
                .map_err(|existing| {
                    self.duplicate(ErrorKind::DuplicateField, "field name", &field_name, field_position, existing)
                })?;
            self.attach_comments(field)?;
            self.attach_attrs(field);
        }
        self.expect_char('}')?;
        Ok(())
    }

    fn parse_contract(&mut self) -> Result<(), CompileError> {
        let (name, position) = self.expect_ident("contract name")?;
        let script = self.script;
        let contract = self.ast().new_contract(script, &name, position);
        self.declare(contract)?;
        self.attach_comments(contract)?;
        self.attach_attrs(contract);

        if self.match_char('(')? {
            loop {
                let base = self.parse_type_ref()?;
                if let Err(existing) = self.ast().add_base(contract, base) {
                    let ast = self.ast();
                    return Err(errors::duplicate(
                        ErrorKind::DuplicateBase,
                        ast.position(base).clone(),
                        "base contract",
                        ast.name(base),
                        ast.position(existing),
                    ));
                }
                self.attach_comments(base)?;
                if !self.match_char(',')? {
                    break;
                }
            }
            self.expect_char(')')?;
        }

        self.expect_char('{')?;
        loop {
            self.parse_attrs()?;
            if !matches!(self.peek()?.kind, TokenKind::Ident(_)) {
                break;
            }
            let (method_name, method_position) = self.expect_ident("method name")?;
            let count = self.ast().as_contract(contract).map_or(0, |c| c.methods.len());
            if count >= usize::from(u16::MAX) {
                return Err(errors::too_many(method_position, "methods"));
            }
            let method = self
                .ast()
                .new_method(contract, &method_name, method_position.clone())
                .map_err(|existing| {
                    self.duplicate(ErrorKind::DuplicateMethod, "method name", &method_name, method_position, existing)
                })?;
            // Bind before the parameter list so parameters cannot claim the method's
            // attributes or leading comments.
            self.attach_attrs(method);
            self.attach_comments(method)?;

            self.expect_char('(')?;
            if !self.peek()?.is_char(')') {
                self.parse_params(method, false)?;
            }
            self.expect_char(')')?;
            if matches!(self.peek()?.kind, TokenKind::Arrow) {
                self.next()?;
                self.expect_char('(')?;
                self.parse_params(method, true)?;
                self.expect_char(')')?;
            }
            self.expect_char(';')?;
            self.attach_comments(method)?;
        }
        self.expect_char('}')?;
        Ok(())
    }

    /// Comma separated `[attrs] type` slots of a parameter or return list.
    fn parse_params(&mut self, method: NodeId, returns: bool) -> Result<(), CompileError> {
        loop {
            self.parse_attrs()?;
            let position = self.peek()?.position.clone();
            let ty = self.parse_type()?;
            let param = if returns {
                self.ast().new_return(method, ty, position)
            } else {
                self.ast().new_param(method, ty, position)
            };
            self.attach_attrs(param);
            self.attach_comments(param)?;
            if !self.match_char(',')? {
                return Ok(());
            }
        }
    }
}
