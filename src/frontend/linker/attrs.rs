//! Pass 2: attribute validation and relocation.

use std::collections::HashMap;

use tidl_core::lang::builtins::{self, AttrTargetId};

use super::*;
use crate::frontend::diagnostics::errors;
use crate::frontend::reflect;

/// Declarations of the built-in package the pass depends on.
struct WellKnown {
    attr_usage: NodeId,
    /// The `Target` field of `AttrUsage`.
    target_field: NodeId,
    struct_marker: NodeId,
    error_marker: NodeId,
    /// Mask bit of every attachment site, read from the `AttrTarget` enum.
    bits: HashMap<AttrTargetId, i64>,
}

impl WellKnown {
    fn bit(&self, site: AttrTargetId) -> i64 {
        self.bits.get(&site).copied().unwrap_or(0)
    }
}

/// Every node that may carry attributes, with the site it counts as.
#[derive(Default)]
struct Sites(Vec<(NodeId, AttrTargetId)>);

impl Visitor for Sites {
    fn visit_script(&mut self, _: &Ast, id: NodeId, _: &Script) {
        self.0.push((id, AttrTargetId::Script));
    }

    fn visit_enum(&mut self, _: &Ast, id: NodeId, _: &Enum) {
        self.0.push((id, AttrTargetId::Enum));
    }

    fn visit_enum_val(&mut self, _: &Ast, id: NodeId, _: &EnumVal) {
        self.0.push((id, AttrTargetId::EnumVal));
    }

    fn visit_table(&mut self, _: &Ast, id: NodeId, _: &Table) {
        self.0.push((id, AttrTargetId::Table));
    }

    fn visit_field(&mut self, _: &Ast, id: NodeId, _: &Field) {
        self.0.push((id, AttrTargetId::Field));
    }

    fn visit_contract(&mut self, _: &Ast, id: NodeId, _: &Contract) {
        self.0.push((id, AttrTargetId::Contract));
    }

    fn visit_method(&mut self, _: &Ast, id: NodeId, method: &Method) {
        self.0.push((id, AttrTargetId::Method));
        self.0.extend(method.params.iter().map(|&p| (p, AttrTargetId::Param)));
        self.0.extend(method.returns.iter().map(|&p| (p, AttrTargetId::Return)));
    }
}

impl Linker<'_> {
    /// Validate every attribute of the package against its type's `AttrUsage`.
    ///
    /// An attribute that is not legal on its node moves to the node's script if it may target
    /// scripts, else to the package if it may target packages. Tables carrying the built-in
    /// `Struct` marker and enums carrying `Error` are tagged along the way.
    ///
    /// ## Errors
    /// - `AttrTargetMismatch` when no site accepts the attribute.
    /// - `InvalidAttribute` when the attribute type is not a table or has no usable `AttrUsage`.
    /// - `MissingBuiltin` when the built-in package lacks a declaration the pass needs.
    pub fn check_attrs(&mut self) -> Result<(), CompileError> {
        let has_scripts = self.ast.as_package(self.package).is_some_and(|p| !p.scripts.is_empty());
        if !has_scripts {
            return Ok(());
        }
        let known = self.well_known()?;
        tracing::debug!(package = self.package_name(), "checking attributes");

        let mut sites = Sites::default();
        self.ast.walk(self.package, &mut sites);
        for (node, site) in sites.0 {
            let site = match site {
                AttrTargetId::Table => {
                    let is_struct = !self.ast.attrs_of_type(node, known.struct_marker).is_empty();
                    reflect::set_struct(self.ast, node, is_struct);
                    if is_struct { AttrTargetId::Struct } else { AttrTargetId::Table }
                }
                AttrTargetId::Enum => {
                    let is_error = !self.ast.attrs_of_type(node, known.error_marker).is_empty();
                    reflect::set_error(self.ast, node, is_error);
                    AttrTargetId::Enum
                }
                other => other,
            };
            self.check_site(node, site, &known)?;
        }
        Ok(())
    }

    fn check_site(&mut self, node: NodeId, site: AttrTargetId, known: &WellKnown) -> Result<(), CompileError> {
        for attr in self.ast.node(node).attrs.clone() {
            let mask = self.attr_usage(attr, known)?;
            if mask & known.bit(site) != 0 {
                continue;
            }
            let destination = if site != AttrTargetId::Script && mask & known.bit(AttrTargetId::Script) != 0 {
                self.ast.script_of(node)
            } else if mask & known.bit(AttrTargetId::Package) != 0 {
                self.ast.package_of(node)
            } else {
                None
            };
            let Some(destination) = destination else {
                return Err(errors::attr_target_mismatch(
                    self.ast.position(attr).clone(),
                    self.ast.name(attr),
                    &format!("{} {}", site.as_str().to_lowercase(), self.ast.name(node)),
                ));
            };
            self.ast.remove_attr(node, attr);
            self.ast.add_attr(destination, attr);
            tracing::debug!(
                attr = self.ast.name(attr),
                from = self.ast.name(node),
                to = self.ast.kind(destination).describe(),
                "relocated attribute"
            );
        }
        Ok(())
    }

    /// Target mask declared by the `AttrUsage` on an attribute's type.
    fn attr_usage(&self, attr: NodeId, known: &WellKnown) -> Result<i64, CompileError> {
        let ast = &*self.ast;
        let position = ast.position(attr).clone();
        let name = ast.name(attr);
        let Some(ty) = ast.attr_type(attr) else {
            return Err(errors::unknown_type(position, name));
        };
        if ast.as_table(ty).is_none() {
            return Err(errors::invalid_attribute(position, name, "type must be a table"));
        }
        let Some(&usage) = ast.attrs_of_type(ty, known.attr_usage).first() else {
            return Err(errors::invalid_attribute(
                position,
                name,
                &format!("type has no {} declaration", builtins::ATTR_USAGE),
            ));
        };
        let target = ast
            .as_attr(usage)
            .and_then(|a| a.args)
            .and_then(|args| reflect::field_init_arg(ast, known.target_field, args));
        let Some(target) = target else {
            return Err(errors::invalid_attribute(
                position,
                name,
                &format!("usage declaration has no {} argument", builtins::ATTR_USAGE_TARGET_FIELD),
            ));
        };
        reflect::eval_const(ast, target)
    }

    /// Look up the built-in declarations, in the package itself when it is the built-in one.
    fn well_known(&self) -> Result<WellKnown, CompileError> {
        let ast = &*self.ast;
        let builtin = self.builtin.unwrap_or(self.package);
        let position = Position::default();
        let types = &ast
            .as_package(builtin)
            .ok_or_else(|| errors::missing_builtin(position.clone(), builtins::PACKAGE))?
            .types;
        let lookup = |name: &str| {
            types
                .get(name)
                .copied()
                .ok_or_else(|| errors::missing_builtin(position.clone(), name))
        };

        let attr_target = lookup(builtins::ATTR_TARGET)?;
        let values = reflect::enum_values(ast, attr_target);
        let mut bits = HashMap::new();
        for site in AttrTargetId::ALL {
            let bit = values
                .get(site.as_str())
                .copied()
                .ok_or_else(|| errors::missing_builtin(position.clone(), &format!("{}.{site}", builtins::ATTR_TARGET)))?;
            bits.insert(site, bit);
        }

        let attr_usage = lookup(builtins::ATTR_USAGE)?;
        let target_field = ast
            .as_table(attr_usage)
            .and_then(|t| {
                t.fields
                    .iter()
                    .copied()
                    .find(|&f| ast.name(f) == builtins::ATTR_USAGE_TARGET_FIELD)
            })
            .ok_or_else(|| {
                errors::missing_builtin(
                    position.clone(),
                    &format!("{}.{}", builtins::ATTR_USAGE, builtins::ATTR_USAGE_TARGET_FIELD),
                )
            })?;

        Ok(WellKnown {
            attr_usage,
            target_field,
            struct_marker: lookup(builtins::STRUCT)?,
            error_marker: lookup(builtins::ERROR)?,
            bits,
        })
    }
}
