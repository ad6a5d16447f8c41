//! Integration tests for the tidl compiler frontend
//!
//! Packages under `tests/fixtures` are compiled from disk; smaller scenarios use the in-memory
//! provider.

use std::path::PathBuf;

use tidl::ast::{Ast, NodeId, NodeKind};
use tidl::diagnostics::{ErrorKind, Phase};
use tidl::frontend::reflect::{self, TreePrinter};
use tidl::{Compiler, FileSystemProvider, InMemoryProvider, SharedCompiler};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture_compiler() -> Compiler {
    Compiler::new(FileSystemProvider::new().with_root(fixtures()))
}

fn methods(ast: &Ast, contract: NodeId) -> Vec<(String, u16)> {
    let mut methods: Vec<(String, u16)> = ast
        .as_contract(contract)
        .unwrap()
        .methods
        .iter()
        .map(|(name, &m)| (name.clone(), ast.as_method(m).unwrap().id))
        .collect();
    methods.sort_by_key(|(_, id)| *id);
    methods
}

fn attr_names(ast: &Ast, node: NodeId) -> Vec<&str> {
    ast.node(node).attrs.iter().map(|&a| ast.name(a)).collect()
}

#[test]
fn test_compile_fixture_packages() {
    let mut compiler = fixture_compiler();
    let orders = compiler.compile("shop/orders").unwrap();

    let names: Vec<&str> = compiler.packages().map(|(name, _)| name).collect();
    assert_eq!(names, ["com/acme/base", "shop/orders", "tidl"]);

    let ast = compiler.ast();
    let scripts: Vec<&String> = ast.as_package(orders).unwrap().scripts.keys().collect();
    assert_eq!(scripts, ["orders.tidl", "service.tidl"]);

    let service = compiler.type_of("shop/orders", "OrderService").unwrap();
    assert_eq!(
        methods(ast, service),
        [("health".to_string(), 0), ("get".to_string(), 1), ("list".to_string(), 2)]
    );

    // `Indexed` may target fields and packages: kept on the field, moved off the contract.
    assert!(ast.node(service).attrs.is_empty());
    assert_eq!(attr_names(ast, orders), ["base.Indexed"]);
    let order = compiler.type_of("shop/orders", "Order").unwrap();
    let id_field = ast.as_table(order).unwrap().fields[0];
    assert_eq!(attr_names(ast, id_field), ["base.Indexed"]);

    let entity = ast.node(order).attrs[0];
    let name = reflect::attr_arg(ast, entity, "Name").unwrap();
    assert!(matches!(ast.kind(name), NodeKind::String(value) if value == "orders"));

    let money = compiler.type_of("com/acme/base", "Money").unwrap();
    assert!(reflect::is_struct(ast, money));
    let total = ast.as_table(order).unwrap().fields[1];
    let total_ty = ast.as_field(total).unwrap().ty;
    assert_eq!(ast.as_type_ref(total_ty).unwrap().target, Some(money));

    let error = compiler.type_of("shop/orders", "OrderError").unwrap();
    assert!(reflect::is_error(ast, error));
    assert_eq!(
        reflect::enum_values(ast, error).into_iter().collect::<Vec<_>>(),
        [("NotFound".to_string(), 404), ("Conflict".to_string(), 409)]
    );
}

#[test]
fn test_fixture_comments_are_bound() {
    let mut compiler = fixture_compiler();
    compiler.compile("shop/orders").unwrap();
    let ast = compiler.ast();
    let order = compiler.type_of("shop/orders", "Order").unwrap();
    let comments: Vec<&str> = ast.node(order).comments.iter().map(|c| c.text.trim()).collect();
    assert_eq!(comments, ["A placed order."]);
}

#[test]
fn test_every_type_ref_is_resolved() {
    #[derive(Default)]
    struct Unbound(Vec<String>);

    impl tidl::ast::Visitor for Unbound {
        fn visit_type_ref(&mut self, _: &Ast, _: NodeId, type_ref: &tidl::ast::TypeRef) {
            if type_ref.target.is_none() {
                self.0.push(type_ref.dotted());
            }
        }
    }

    let mut compiler = fixture_compiler();
    compiler.compile("shop/orders").unwrap();
    let mut unbound = Unbound::default();
    compiler.accept(&mut unbound);
    assert!(unbound.0.is_empty(), "unresolved: {:?}", unbound.0);
}

#[test]
fn test_dump_linked_package() {
    let provider = InMemoryProvider::new().with_file(
        "shop/orders.tidl",
        "enum Status(byte) { Open(0), Closed(1) }\ntable Order {\n    id uint64;\n    status Status;\n}",
    );
    let mut compiler = Compiler::new(provider);
    let shop = compiler.compile("shop").unwrap();
    let mut printer = TreePrinter::new();
    compiler.ast().walk(shop, &mut printer);
    let dump = printer.finish();
    insta::assert_snapshot!(dump.trim_end(), @r#"
    package shop
      script orders.tidl
        import tidl "tidl"
        enum Status (1 byte unsigned)
          Open = 0
          Closed = 1
        table Order
          field id #0
            ref tidl.Uint64 -> tidl.Uint64
          field status #1
            ref Status -> shop.Status
    "#);
}

#[test]
fn test_circular_import() {
    let provider = InMemoryProvider::new()
        .with_file("a/a.tidl", "import \"b\"\ntable A {}")
        .with_file("b/b.tidl", "import \"a\"\ntable B {}");
    let mut compiler = Compiler::new(provider);
    let err = compiler.compile("a").unwrap_err();
    assert_eq!((err.phase, err.kind), (Phase::Link, ErrorKind::CircularImport));
    assert_eq!(
        err.to_string(),
        "link b/b.tidl(1:8) error: circular package import:\n\ta imports\n\tb imports\n\ta"
    );

    // Nothing of the cycle is cached; a second attempt fails the same way.
    assert!(compiler.package("a").is_none());
    assert!(compiler.package("b").is_none());
    assert_eq!(compiler.compile("b").unwrap_err().kind, ErrorKind::CircularImport);
}

#[test]
fn test_shared_dependency_is_compiled_once() {
    let provider = InMemoryProvider::new()
        .with_file("base/base.tidl", "table Id {}")
        .with_file("left/left.tidl", "import \"base\"\ntable L { id base.Id; }")
        .with_file("right/right.tidl", "import \"base\"\ntable R { id base.Id; }")
        .with_file("app/app.tidl", "import (\"left\" \"right\")\ntable App { l left.L; r right.R; }");
    let mut compiler = Compiler::new(provider);
    compiler.compile("app").unwrap();
    let ast = compiler.ast();
    let base = compiler.package("base").unwrap();

    let id = compiler.type_of("base", "Id").unwrap();
    for (package, table) in [("left", "L"), ("right", "R")] {
        let decl = compiler.type_of(package, table).unwrap();
        let field = ast.as_table(decl).unwrap().fields[0];
        let ty = ast.as_field(field).unwrap().ty;
        assert_eq!(ast.as_type_ref(ty).unwrap().target, Some(id));
        assert_eq!(ast.package_of(id), Some(base));
    }
    assert_eq!(compiler.packages().count(), 5);
}

#[test]
fn test_errors_render_through_miette() {
    let provider = InMemoryProvider::new().with_file("shop/a.tidl", "table T { x Missing; }");
    let mut compiler = Compiler::new(provider);
    let err = compiler.compile("shop").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownType);
    let rendered = format!("{:?}", miette::Report::new(err));
    assert!(rendered.contains("unknown type(Missing)"), "{rendered}");
}

#[test]
fn test_shared_compiler_from_threads() {
    let provider = FileSystemProvider::new().with_root(fixtures());
    let shared = SharedCompiler::new(Compiler::new(provider));
    let handles: Vec<_> = ["shop/orders", "com/acme/base", "shop/orders"]
        .into_iter()
        .map(|name| {
            let shared = shared.clone();
            std::thread::spawn(move || shared.compile(name).map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert_eq!(shared.with(|c| c.packages().count()), 3);
}
