//! Double dispatch over the closed node set.
//!
//! [`Ast::accept`] matches on a node's kind and calls the corresponding `visit_*` method;
//! [`Ast::walk`] does the same for a node and, depth-first, every structural descendant.
//! Every `visit_*` method defaults to doing nothing, so implementers override only what they need.
//!
//! ## Examples
//! ```rust
//! use tidl_syntax::ast::{Ast, Enum, NodeId, Position, Visitor};
//! use tidl_core::lang::keywords::EnumBase;
//!
//! #[derive(Default)]
//! struct EnumNames(Vec<String>);
//!
//! impl Visitor for EnumNames {
//!     fn visit_enum(&mut self, ast: &Ast, id: NodeId, _decl: &Enum) {
//!         self.0.push(ast.name(id).to_string());
//!     }
//! }
//!
//! let mut ast = Ast::new();
//! let package = ast.new_package("demo");
//! let script = ast.new_script(package, "a.tidl", None).unwrap();
//! let color = ast.new_enum(script, "Color", EnumBase::DEFAULT, Position::new("a.tidl", 1, 1));
//! ast.declare_type(script, color).unwrap();
//!
//! let mut names = EnumNames::default();
//! ast.walk(package, &mut names);
//! assert_eq!(names.0, ["Color"]);
//! ```

use super::*;

/// Observer of resolved AST nodes.
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_package(&mut self, ast: &Ast, id: NodeId, package: &Package) {}
    fn visit_script(&mut self, ast: &Ast, id: NodeId, script: &Script) {}
    fn visit_package_ref(&mut self, ast: &Ast, id: NodeId, package_ref: &PackageRef) {}
    fn visit_type_ref(&mut self, ast: &Ast, id: NodeId, type_ref: &TypeRef) {}
    fn visit_enum(&mut self, ast: &Ast, id: NodeId, decl: &Enum) {}
    fn visit_enum_val(&mut self, ast: &Ast, id: NodeId, value: &EnumVal) {}
    fn visit_table(&mut self, ast: &Ast, id: NodeId, table: &Table) {}
    fn visit_field(&mut self, ast: &Ast, id: NodeId, field: &Field) {}
    fn visit_contract(&mut self, ast: &Ast, id: NodeId, contract: &Contract) {}
    fn visit_method(&mut self, ast: &Ast, id: NodeId, method: &Method) {}
    fn visit_param(&mut self, ast: &Ast, id: NodeId, param: &Param) {}
    fn visit_attr(&mut self, ast: &Ast, id: NodeId, attr: &Attr) {}
    fn visit_args(&mut self, ast: &Ast, id: NodeId, args: &Args) {}
    fn visit_named_args(&mut self, ast: &Ast, id: NodeId, args: &NamedArgs) {}
    fn visit_string(&mut self, ast: &Ast, id: NodeId, value: &str) {}
    fn visit_int(&mut self, ast: &Ast, id: NodeId, value: i64) {}
    fn visit_float(&mut self, ast: &Ast, id: NodeId, value: f64) {}
    fn visit_bool(&mut self, ast: &Ast, id: NodeId, value: bool) {}
    fn visit_array(&mut self, ast: &Ast, id: NodeId, array: &Array) {}
    fn visit_list(&mut self, ast: &Ast, id: NodeId, list: &List) {}
    fn visit_map(&mut self, ast: &Ast, id: NodeId, map: &MapType) {}
    fn visit_binary_op(&mut self, ast: &Ast, id: NodeId, op: &BinaryOp) {}
}

impl Ast {
    /// Dispatch `visitor` on a single node.
    pub fn accept<V: Visitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        match self.kind(id) {
            NodeKind::Package(node) => visitor.visit_package(self, id, node),
            NodeKind::Script(node) => visitor.visit_script(self, id, node),
            NodeKind::PackageRef(node) => visitor.visit_package_ref(self, id, node),
            NodeKind::TypeRef(node) => visitor.visit_type_ref(self, id, node),
            NodeKind::Enum(node) => visitor.visit_enum(self, id, node),
            NodeKind::EnumVal(node) => visitor.visit_enum_val(self, id, node),
            NodeKind::Table(node) => visitor.visit_table(self, id, node),
            NodeKind::Field(node) => visitor.visit_field(self, id, node),
            NodeKind::Contract(node) => visitor.visit_contract(self, id, node),
            NodeKind::Method(node) => visitor.visit_method(self, id, node),
            NodeKind::Param(node) => visitor.visit_param(self, id, node),
            NodeKind::Attr(node) => visitor.visit_attr(self, id, node),
            NodeKind::Args(node) => visitor.visit_args(self, id, node),
            NodeKind::NamedArgs(node) => visitor.visit_named_args(self, id, node),
            NodeKind::String(value) => visitor.visit_string(self, id, value),
            NodeKind::Int(value) => visitor.visit_int(self, id, *value),
            NodeKind::Float(value) => visitor.visit_float(self, id, *value),
            NodeKind::Bool(value) => visitor.visit_bool(self, id, *value),
            NodeKind::Array(node) => visitor.visit_array(self, id, node),
            NodeKind::List(node) => visitor.visit_list(self, id, node),
            NodeKind::Map(node) => visitor.visit_map(self, id, node),
            NodeKind::BinaryOp(node) => visitor.visit_binary_op(self, id, node),
        }
    }

    /// Dispatch `visitor` on `root` and then on every descendant, pre-order.
    ///
    /// ## Notes
    /// - Children come from [`Ast::children`]: attributes first, then structure.
    /// - Inherited method clones share their parameter nodes with the base contract, so those
    ///   nodes are visited once per contract that carries the method.
    pub fn walk<V: Visitor + ?Sized>(&self, root: NodeId, visitor: &mut V) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            self.accept(id, visitor);
            stack.extend(self.children(id).into_iter().rev());
        }
    }
}
