/// Environment a [`Parser`] runs in.
///
/// The host owns the [`Ast`] arena and compiles imported packages. Import resolution is
/// immediate: `import_package` must return a fully compiled package (or an error) before the
/// parser continues with the rest of the file.
pub trait ParseHost {
    fn ast(&mut self) -> &mut Ast;

    /// Compile (or fetch from cache) the package named by an import path.
    ///
    /// ## Parameters
    /// - `path`: the import path exactly as written, e.g. `"shop/orders"`.
    /// - `position`: where the import appears, for diagnostics.
    fn import_package(&mut self, path: &str, position: &Position) -> Result<NodeId, CompileError>;
}

/// Parse `source` into `script`.
///
/// This is the main public entrypoint for parsing.
///
/// ## Errors
/// Returns the first lexical or syntactic [`CompileError`], or any error raised while compiling
/// an imported package.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_script(host: &mut dyn ParseHost, script: NodeId, source: &[u8]) -> Result<(), CompileError> {
    Parser::new(host, script, source).parse()
}
