/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its top-level `parse()` entrypoint and the
/// import section every script starts with.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
pub struct Parser<'h, 's> {
    host: &'h mut dyn ParseHost,
    lexer: Lexer<'s>,
    script: NodeId,
    /// Name of the package being compiled; the built-in package skips the implicit import.
    package: String,
    /// Comments read but not yet bound to a node.
    comments: Vec<Comment>,
    /// Attributes read but not yet attached to a declaration.
    attrs: Vec<NodeId>,
}

impl<'h, 's> Parser<'h, 's> {
    /// Create a parser that fills `script` from `source`.
    ///
    /// ## Parameters
    /// - `host`: owner of the arena; compiles imported packages on demand.
    /// - `script`: a [`NodeKind::Script`] already registered under its package.
    /// - `source`: raw UTF-8 bytes of the file.
    pub fn new(host: &'h mut dyn ParseHost, script: NodeId, source: &'s [u8]) -> Self {
        let ast = host.ast();
        let file = match ast.as_script(script).and_then(|s| s.path.as_ref()) {
            Some(path) => path.display().to_string(),
            None => ast.name(script).to_string(),
        };
        let package = ast.package_name(script).unwrap_or_default().to_string();
        Self {
            host,
            lexer: Lexer::new(source, file),
            script,
            package,
            comments: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// Parse the whole file.
    ///
    /// ## Errors
    /// Returns the first [`CompileError`]; there is no recovery.
    pub fn parse(mut self) -> Result<(), CompileError> {
        let _span = tracing::debug_span!("parse", file = %self.lexer.file()).entered();

        self.parse_imports()?;
        loop {
            self.parse_attrs()?;
            let token = self.next()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword(KeywordId::Enum) => self.parse_enum()?,
                TokenKind::Keyword(KeywordId::Table) => self.parse_table(false)?,
                TokenKind::Keyword(KeywordId::Struct) => self.parse_table(true)?,
                TokenKind::Keyword(KeywordId::Contract) => self.parse_contract()?,
                other => {
                    return Err(errors::unexpected_token(
                        token.position,
                        "declaration (enum, table, struct or contract)",
                        &other.describe(),
                    ));
                }
            }
        }

        // Whatever is still pending belongs to the script itself.
        let script = self.script;
        self.attach_attrs(script);
        let comments = std::mem::take(&mut self.comments);
        self.ast().bind_comments(script, comments);
        tracing::debug!(types = self.ast().as_script(script).map_or(0, |s| s.types.len()), "parsed script");
        Ok(())
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn parse_imports(&mut self) -> Result<(), CompileError> {
        while self.peek()?.is_keyword(KeywordId::Import) {
            self.next()?;
            if self.match_char('(')? {
                while !self.peek()?.is_char(')') {
                    self.parse_import()?;
                }
                self.expect_char(')')?;
            } else {
                self.parse_import()?;
            }
        }

        let script = self.script;
        let imported = self
            .ast()
            .as_script(script)
            .is_some_and(|s| s.imports.contains_key(builtins::ALIAS));
        if self.package != builtins::PACKAGE && !imported {
            let position = Position::new(self.lexer.file().clone(), 1, 1);
            let package = self.host.import_package(builtins::PACKAGE, &position)?;
            self.bind_import(builtins::ALIAS, package, position)?;
        }
        Ok(())
    }

    /// `"path"` or `alias "path"`.
    fn parse_import(&mut self) -> Result<(), CompileError> {
        let token = self.next()?;
        let (alias, path, position) = match token.kind {
            TokenKind::String(path) => {
                let alias = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string();
                (alias, path, token.position)
            }
            TokenKind::Ident(alias) => {
                let (path, position) = self.expect_string("import path")?;
                (alias, path, position)
            }
            other => return Err(errors::unexpected_token(token.position, "import path", &other.describe())),
        };
        let package = self.host.import_package(&path, &position)?;
        let package_ref = self.bind_import(&alias, package, position)?;
        self.attach_comments(package_ref)?;
        Ok(())
    }

    fn bind_import(&mut self, alias: &str, package: NodeId, position: Position) -> Result<NodeId, CompileError> {
        let script = self.script;
        let ast = self.ast();
        ast.new_package_ref(script, alias, package, position.clone())
            .map_err(|existing| {
                errors::duplicate(
                    ErrorKind::DuplicateImport,
                    position,
                    "import alias",
                    alias,
                    ast.position(existing),
                )
            })
    }
}
