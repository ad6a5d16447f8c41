//! Pass 1: type reference resolution.

use super::*;
use crate::frontend::diagnostics::errors;

/// Collects the type references of a package that are still unbound.
#[derive(Default)]
struct Unresolved(Vec<NodeId>);

impl Visitor for Unresolved {
    fn visit_type_ref(&mut self, _: &Ast, id: NodeId, type_ref: &TypeRef) {
        if type_ref.target.is_none() {
            self.0.push(id);
        }
    }
}

impl Linker<'_> {
    /// Bind every unresolved type reference of the package.
    ///
    /// ## Errors
    /// - `UnknownType` when a path names nothing.
    /// - `AliasConflict` when a one-segment path names an import alias of its script.
    pub fn resolve_types(&mut self) -> Result<(), CompileError> {
        let mut unresolved = Unresolved::default();
        self.ast.walk(self.package, &mut unresolved);
        tracing::debug!(package = self.package_name(), refs = unresolved.0.len(), "resolving types");

        for type_ref in unresolved.0 {
            let target = self.lookup(type_ref)?;
            if self.ast.resolve_type_ref(type_ref, target) {
                tracing::trace!(
                    name = self.ast.name(type_ref),
                    kind = self.ast.kind(target).describe(),
                    "resolved type reference"
                );
            }
        }
        Ok(())
    }

    fn lookup(&self, type_ref: NodeId) -> Result<NodeId, CompileError> {
        let ast = &*self.ast;
        let position = ast.position(type_ref);
        let path = ast.as_type_ref(type_ref).map(|r| r.path.as_slice()).unwrap_or_default();
        let unknown = || errors::unknown_type(position.clone(), &path.join("."));

        let script = ast.script_of(type_ref).and_then(|s| ast.as_script(s)).ok_or_else(unknown)?;
        let local = ast.as_package(script.package).map(|p| &p.types).ok_or_else(unknown)?;
        let imported = |alias: &str| {
            script
                .imports
                .get(alias)
                .and_then(|&r| ast.as_package_ref(r))
                .and_then(|r| ast.as_package(r.package))
        };
        let enum_value = |decl: NodeId, value: &str| ast.as_enum(decl).and_then(|e| e.values.get(value)).copied();

        let found = match path {
            [name] => {
                if let Some(&import) = script.imports.get(name) {
                    return Err(errors::alias_conflict(position.clone(), name, ast.position(import)));
                }
                local.get(name).copied()
            }
            [first, second] => match imported(first.as_str()) {
                Some(package) => package.types.get(second).copied(),
                None => local.get(first).and_then(|&decl| enum_value(decl, second.as_str())),
            },
            [alias, name, value] => imported(alias.as_str())
                .and_then(|package| package.types.get(name))
                .and_then(|&decl| enum_value(decl, value.as_str())),
            _ => None,
        };
        found.ok_or_else(unknown)
    }
}
