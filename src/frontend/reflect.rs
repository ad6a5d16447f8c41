//! Reflection helpers over a linked tree.
//!
//! These are the queries code generators (and the linker itself) need on top of the raw node
//! model: enum value tables, attribute argument lookup, constant evaluation and the struct/error
//! tags. [`TreePrinter`] is a [`Visitor`] rendering a package as an indented outline.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};

/// Values of an enum by name, in declaration order.
pub fn enum_values(ast: &Ast, decl: NodeId) -> IndexMap<String, i64> {
    let Some(decl) = ast.as_enum(decl) else {
        return IndexMap::new();
    };
    decl.values
        .iter()
        .filter_map(|(name, &val)| ast.as_enum_val(val).map(|v| (name.clone(), v.value)))
        .collect()
}

/// Argument of `args` that initializes `field` of the attribute's table.
///
/// Positional arguments match by index (the field id), named arguments by field name.
pub fn field_init_arg(ast: &Ast, field: NodeId, args: NodeId) -> Option<NodeId> {
    match ast.kind(args) {
        NodeKind::Args(args) => {
            let id = ast.as_field(field)?.id;
            args.items.get(usize::from(id)).copied()
        }
        NodeKind::NamedArgs(args) => args.items.get(ast.name(field)).copied(),
        _ => None,
    }
}

/// Argument of an attribute instance for the field named `field_name` of its (resolved) table.
pub fn attr_arg(ast: &Ast, attr: NodeId, field_name: &str) -> Option<NodeId> {
    let args = ast.as_attr(attr)?.args?;
    let table = ast.attr_type(attr)?;
    let field = ast
        .as_table(table)?
        .fields
        .iter()
        .copied()
        .find(|&f| ast.name(f) == field_name)?;
    field_init_arg(ast, field, args)
}

/// Evaluate a constant argument expression to an integer.
///
/// Accepts integer literals, enum values (directly or through a resolved reference) and
/// `|` chains of those.
///
/// ## Errors
/// Any other expression, or a reference that has not been resolved yet.
pub fn eval_const(ast: &Ast, expr: NodeId) -> Result<i64, CompileError> {
    match ast.kind(expr) {
        NodeKind::Int(value) => Ok(*value),
        NodeKind::EnumVal(value) => Ok(value.value),
        NodeKind::TypeRef(type_ref) => match type_ref.target {
            Some(target) if ast.as_enum_val(target).is_some() => eval_const(ast, target),
            Some(target) => Err(errors::not_constant(
                ast.position(expr).clone(),
                ast.kind(target).describe(),
            )),
            None => Err(errors::unknown_type(ast.position(expr).clone(), &type_ref.dotted())),
        },
        NodeKind::BinaryOp(op) => match op.op {
            BinaryOpKind::Or => Ok(eval_const(ast, op.left)? | eval_const(ast, op.right)?),
        },
        other => Err(errors::not_constant(ast.position(expr).clone(), other.describe())),
    }
}

pub fn is_struct(ast: &Ast, table: NodeId) -> bool {
    ast.as_table(table).is_some_and(|t| t.is_struct)
}

pub fn set_struct(ast: &mut Ast, table: NodeId, value: bool) {
    if let Some(table) = ast.as_table_mut(table) {
        table.is_struct = value;
    }
}

pub fn is_error(ast: &Ast, decl: NodeId) -> bool {
    ast.as_enum(decl).is_some_and(|e| e.is_error)
}

pub fn set_error(ast: &mut Ast, decl: NodeId, value: bool) {
    if let Some(decl) = ast.as_enum_mut(decl) {
        decl.is_error = value;
    }
}

// ============================================================================
// Tree printer
// ============================================================================

/// Renders visited nodes as an indented outline, one node per line.
///
/// Indentation is the node's distance from its package, so it is meant to be driven by
/// [`Ast::walk`] from a package root.
#[derive(Debug, Default)]
pub struct TreePrinter {
    out: String,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, ast: &Ast, id: NodeId, text: std::fmt::Arguments<'_>) {
        let mut depth = 0;
        let mut cursor = ast.node(id).parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = ast.node(parent).parent;
        }
        let _ = writeln!(self.out, "{:indent$}{text}", "", indent = depth * 2);
    }

    fn target(ast: &Ast, type_ref: &TypeRef) -> String {
        match type_ref.target {
            Some(target) => format!(
                "{}.{}",
                ast.package_name(target).unwrap_or_default(),
                ast.name(target)
            ),
            None => "?".to_string(),
        }
    }
}

impl Visitor for TreePrinter {
    fn visit_package(&mut self, ast: &Ast, id: NodeId, _: &Package) {
        self.line(ast, id, format_args!("package {}", ast.name(id)));
    }

    fn visit_script(&mut self, ast: &Ast, id: NodeId, _: &Script) {
        self.line(ast, id, format_args!("script {}", ast.name(id)));
    }

    fn visit_package_ref(&mut self, ast: &Ast, id: NodeId, package_ref: &PackageRef) {
        let package = ast.name(package_ref.package);
        self.line(ast, id, format_args!("import {} \"{package}\"", ast.name(id)));
    }

    fn visit_type_ref(&mut self, ast: &Ast, id: NodeId, type_ref: &TypeRef) {
        let target = Self::target(ast, type_ref);
        self.line(ast, id, format_args!("ref {} -> {target}", type_ref.dotted()));
    }

    fn visit_enum(&mut self, ast: &Ast, id: NodeId, decl: &Enum) {
        let sign = if decl.base.signed { "signed" } else { "unsigned" };
        let error = if decl.is_error { " error" } else { "" };
        self.line(
            ast,
            id,
            format_args!("enum {} ({} byte {sign}){error}", ast.name(id), decl.base.width),
        );
    }

    fn visit_enum_val(&mut self, ast: &Ast, id: NodeId, value: &EnumVal) {
        self.line(ast, id, format_args!("{} = {}", ast.name(id), value.value));
    }

    fn visit_table(&mut self, ast: &Ast, id: NodeId, table: &Table) {
        let keyword = if table.is_struct { "struct" } else { "table" };
        self.line(ast, id, format_args!("{keyword} {}", ast.name(id)));
    }

    fn visit_field(&mut self, ast: &Ast, id: NodeId, field: &Field) {
        self.line(ast, id, format_args!("field {} #{}", ast.name(id), field.id));
    }

    fn visit_contract(&mut self, ast: &Ast, id: NodeId, _: &Contract) {
        self.line(ast, id, format_args!("contract {}", ast.name(id)));
    }

    fn visit_method(&mut self, ast: &Ast, id: NodeId, method: &Method) {
        self.line(ast, id, format_args!("method {} #{}", ast.name(id), method.id));
    }

    fn visit_param(&mut self, ast: &Ast, id: NodeId, param: &Param) {
        self.line(ast, id, format_args!("param #{}", param.id));
    }

    fn visit_attr(&mut self, ast: &Ast, id: NodeId, _: &Attr) {
        self.line(ast, id, format_args!("@{}", ast.name(id)));
    }

    fn visit_args(&mut self, ast: &Ast, id: NodeId, _: &Args) {
        self.line(ast, id, format_args!("args"));
    }

    fn visit_named_args(&mut self, ast: &Ast, id: NodeId, args: &NamedArgs) {
        let keys: Vec<&str> = args.items.keys().map(String::as_str).collect();
        self.line(ast, id, format_args!("args {}", keys.join(", ")));
    }

    fn visit_string(&mut self, ast: &Ast, id: NodeId, value: &str) {
        self.line(ast, id, format_args!("{value:?}"));
    }

    fn visit_int(&mut self, ast: &Ast, id: NodeId, value: i64) {
        self.line(ast, id, format_args!("{value}"));
    }

    fn visit_float(&mut self, ast: &Ast, id: NodeId, value: f64) {
        self.line(ast, id, format_args!("{value:?}"));
    }

    fn visit_bool(&mut self, ast: &Ast, id: NodeId, value: bool) {
        self.line(ast, id, format_args!("{value}"));
    }

    fn visit_array(&mut self, ast: &Ast, id: NodeId, array: &Array) {
        self.line(ast, id, format_args!("array [{}]", array.len));
    }

    fn visit_list(&mut self, ast: &Ast, id: NodeId, _: &List) {
        self.line(ast, id, format_args!("list"));
    }

    fn visit_map(&mut self, ast: &Ast, id: NodeId, _: &MapType) {
        self.line(ast, id, format_args!("map"));
    }

    fn visit_binary_op(&mut self, ast: &Ast, id: NodeId, op: &BinaryOp) {
        self.line(ast, id, format_args!("{}", op.op));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidl_core::lang::keywords::EnumBase;

    fn pos(line: u32) -> Position {
        Position::new("r.tidl", line, 1)
    }

    #[test]
    fn test_enum_values_in_declaration_order() {
        let mut ast = Ast::new();
        let package = ast.new_package("demo");
        let script = ast.new_script(package, "r.tidl", None).unwrap();
        let decl = ast.new_enum(script, "Level", EnumBase { width: 1, signed: true }, pos(1));
        ast.new_enum_val(decl, "Low", -1, pos(1)).unwrap();
        ast.new_enum_val(decl, "High", 7, pos(1)).unwrap();
        let values = enum_values(&ast, decl);
        assert_eq!(values.into_iter().collect::<Vec<_>>(), [("Low".to_string(), -1), ("High".to_string(), 7)]);
    }

    #[test]
    fn test_field_init_arg_positional_and_named() {
        let mut ast = Ast::new();
        let package = ast.new_package("demo");
        let script = ast.new_script(package, "r.tidl", None).unwrap();
        let table = ast.new_table(script, "Range", pos(1));
        let lo_ty = ast.new_type_ref(script, vec!["tidl".into(), "Int32".into()], pos(1));
        let hi_ty = ast.new_type_ref(script, vec!["tidl".into(), "Int32".into()], pos(1));
        ast.new_field(table, "Lo", lo_ty, pos(1)).unwrap();
        let hi = ast.new_field(table, "Hi", hi_ty, pos(1)).unwrap();

        let positional = ast.new_args(script, pos(2));
        let one = ast.new_int(script, 1, pos(2));
        let two = ast.new_int(script, 2, pos(2));
        ast.push_arg(positional, one);
        ast.push_arg(positional, two);
        assert_eq!(field_init_arg(&ast, hi, positional), Some(two));

        let named = ast.new_named_args(script, pos(3));
        let nine = ast.new_int(script, 9, pos(3));
        ast.insert_named_arg(named, "Hi", nine).unwrap();
        assert_eq!(field_init_arg(&ast, hi, named), Some(nine));

        let short = ast.new_args(script, pos(4));
        ast.push_arg(short, one);
        assert_eq!(field_init_arg(&ast, hi, short), None);
    }

    #[test]
    fn test_eval_const_or_chain() {
        let mut ast = Ast::new();
        let package = ast.new_package("demo");
        let script = ast.new_script(package, "r.tidl", None).unwrap();
        let decl = ast.new_enum(script, "Flags", EnumBase::DEFAULT, pos(1));
        let a = ast.new_enum_val(decl, "A", 1, pos(1)).unwrap();
        ast.new_enum_val(decl, "B", 4, pos(1)).unwrap();
        let a_ref = ast.new_type_ref(script, vec!["Flags".into(), "A".into()], pos(2));
        ast.resolve_type_ref(a_ref, a);
        let b_ref = ast.new_type_ref(script, vec!["Flags".into(), "B".into()], pos(2));
        let literal = ast.new_int(script, 16, pos(2));
        let inner = ast.new_binary_op(script, BinaryOpKind::Or, a_ref, literal, pos(2));
        let expr = ast.new_binary_op(script, BinaryOpKind::Or, inner, b_ref, pos(2));

        // Unresolved operand.
        assert!(eval_const(&ast, expr).is_err());

        let b = ast.as_enum(decl).unwrap().values["B"];
        ast.resolve_type_ref(b_ref, b);
        assert_eq!(eval_const(&ast, expr).unwrap(), 21);

        let text = ast.new_string(script, "x".into(), pos(3));
        let err = eval_const(&ast, text).unwrap_err();
        assert!(err.message.contains("got string"), "{err}");
    }

    #[test]
    fn test_struct_and_error_tags() {
        let mut ast = Ast::new();
        let package = ast.new_package("demo");
        let script = ast.new_script(package, "r.tidl", None).unwrap();
        let table = ast.new_table(script, "P", pos(1));
        let decl = ast.new_enum(script, "E", EnumBase::DEFAULT, pos(2));
        assert!(!is_struct(&ast, table) && !is_error(&ast, decl));
        set_struct(&mut ast, table, true);
        set_error(&mut ast, decl, true);
        assert!(is_struct(&ast, table) && is_error(&ast, decl));
        assert!(!is_struct(&ast, decl));
    }
}
