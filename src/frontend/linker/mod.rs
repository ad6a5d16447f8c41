//! Linker for a parsed tidl package.
//!
//! Runs three passes over one package, after all of its scripts have been parsed:
//!
//! 1. **Type resolution** ([`Linker::resolve_types`]): binds every dotted [`TypeRef`] to its
//!    declaration, enum value or imported type.
//! 2. **Attribute validation** ([`Linker::check_attrs`]): evaluates each attribute type's
//!    `AttrUsage`, keeps attributes on legal sites, relocates the ones only legal on the script or
//!    package, and tags structs and error enums.
//! 3. **Contract flattening** ([`Linker::flatten_contracts`]): copies inherited methods into every
//!    contract and renumbers methods densely.
//!
//! ## Notes
//! - Every pass is idempotent: resolved references, validated attributes and flattened contracts
//!   are left alone when a pass runs again.
//! - Imported packages are fully linked before the importing package is parsed, so cross-package
//!   references always point at linked nodes.
//!
//! ## See also
//! - [`reflect`](super::reflect) for the constant evaluation used by pass 2.

mod attrs;
mod flatten;
mod resolve;


use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;

/// Link `package`.
///
/// ## Parameters
/// - `builtin`: the built-in package, which supplies `AttrUsage`, `AttrTarget` and the marker
///   tables; pass `package` itself when linking the built-in package.
///
/// ## Errors
/// The first link error of any pass.
#[tracing::instrument(skip_all, fields(package = ast.name(package)))]
pub fn link(ast: &mut Ast, package: NodeId, builtin: Option<NodeId>) -> Result<(), CompileError> {
    let mut linker = Linker::new(ast, package, builtin);
    linker.resolve_types()?;
    linker.check_attrs()?;
    linker.flatten_contracts()
}

/// Linker state for one package.
pub struct Linker<'a> {
    ast: &'a mut Ast,
    package: NodeId,
    builtin: Option<NodeId>,
}

impl<'a> Linker<'a> {
    pub fn new(ast: &'a mut Ast, package: NodeId, builtin: Option<NodeId>) -> Self {
        Self { ast, package, builtin }
    }

    fn package_name(&self) -> &str {
        self.ast.name(self.package)
    }

    /// Top-level types of the package being linked, in declaration order.
    fn types(&self) -> Vec<NodeId> {
        self.ast
            .as_package(self.package)
            .map(|p| p.types.values().copied().collect())
            .unwrap_or_default()
    }
}
