#[cfg(test)]
/// Parser unit tests.
///
/// These tests drive the parser through a host that hands out an empty package for every
/// import, so they cover syntax and tree shape only; name resolution is the linker's job.
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct TestHost {
        ast: Ast,
        packages: HashMap<String, NodeId>,
        imported: Vec<String>,
    }

    impl ParseHost for TestHost {
        fn ast(&mut self) -> &mut Ast {
            &mut self.ast
        }

        fn import_package(&mut self, path: &str, _: &Position) -> Result<NodeId, CompileError> {
            self.imported.push(path.to_string());
            let ast = &mut self.ast;
            Ok(*self
                .packages
                .entry(path.to_string())
                .or_insert_with(|| ast.new_package(path)))
        }
    }

    fn parse_in(package: &str, source: &str) -> Result<(TestHost, NodeId), CompileError> {
        let mut host = TestHost::default();
        let package = host.ast.new_package(package);
        let script = host.ast.new_script(package, "test.tidl", None).unwrap();
        parse_script(&mut host, script, source.as_bytes())?;
        Ok((host, script))
    }

    fn parse_ok(source: &str) -> (TestHost, NodeId) {
        parse_in("demo", source).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn parse_err(source: &str) -> CompileError {
        match parse_in("demo", source) {
            Ok(_) => panic!("expected a parse error for:\n{source}"),
            Err(err) => err,
        }
    }

    fn ty(host: &TestHost, script: NodeId, name: &str) -> NodeId {
        let package = host.ast.package_of(script).unwrap();
        *host.ast.as_package(package).unwrap().types.get(name).unwrap()
    }

    fn path(host: &TestHost, type_ref: NodeId) -> Vec<String> {
        host.ast.as_type_ref(type_ref).unwrap().path.clone()
    }

    // ========================================================================
    // Enums
    // ========================================================================

    #[test]
    fn test_parse_enum_color() {
        let (host, script) = parse_ok("enum Color(byte){Red(0),Green(1),Blue(2)}");
        let color = ty(&host, script, "Color");
        let decl = host.ast.as_enum(color).unwrap();
        assert_eq!(decl.base, EnumBase { width: 1, signed: false });
        assert_eq!(decl.values.keys().collect::<Vec<_>>(), ["Red", "Green", "Blue"]);
        let red = decl.default.unwrap();
        assert_eq!(host.ast.name(red), "Red");
        assert_eq!(host.ast.as_enum_val(red).unwrap().value, 0);
        assert_eq!(host.ast.as_enum_val(decl.values["Blue"]).unwrap().value, 2);
    }

    #[test]
    fn test_enum_values_are_range_checked() {
        let (host, script) = parse_ok("enum E(byte){A(255)}");
        let e = ty(&host, script, "E");
        assert_eq!(host.ast.as_enum_val(host.ast.as_enum(e).unwrap().values["A"]).unwrap().value, 255);

        let err = parse_err("enum E(byte){A(256)}");
        assert_eq!(err.kind, ErrorKind::EnumValueOutOfRange);
        assert_eq!(err.position.column, 16);

        assert_eq!(parse_err("enum E{A(-1)}").kind, ErrorKind::EnumValueOutOfRange);
        assert!(parse_in("demo", "enum E(sbyte){Low(-128), High(127)}").is_ok());
        assert_eq!(parse_err("enum E(sbyte){A(-129)}").kind, ErrorKind::EnumValueOutOfRange);
        assert!(parse_in("demo", "enum E(uint32){Max(0xFFFFFFFF)}").is_ok());
        assert_eq!(parse_err("enum E(int16){A(32768)}").kind, ErrorKind::EnumValueOutOfRange);
    }

    #[test]
    fn test_enum_base_must_be_a_narrow_integer() {
        let err = parse_err("enum E(int64){A(1)}");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert!(err.message.contains("enum base type"), "{err}");
    }

    #[test]
    fn test_duplicate_enum_value() {
        let err = parse_err("enum E{A(1),\nA(2)}");
        assert_eq!(err.kind, ErrorKind::DuplicateEnumValue);
        assert!(err.to_string().contains("see: test.tidl(1:8)"), "{err}");
    }

    // ========================================================================
    // Tables and structs
    // ========================================================================

    #[test]
    fn test_parse_table_fields() {
        let (host, script) = parse_ok("table User {\n  id uint64;\n  name string;\n  tags []string;\n}");
        let user = ty(&host, script, "User");
        let table = host.ast.as_table(user).unwrap();
        assert_eq!(table.fields.len(), 3);
        let names: Vec<_> = table.fields.iter().map(|&f| host.ast.name(f)).collect();
        assert_eq!(names, ["id", "name", "tags"]);
        let ids: Vec<_> = table.fields.iter().map(|&f| host.ast.as_field(f).unwrap().id).collect();
        assert_eq!(ids, [0, 1, 2]);

        let id_type = host.ast.as_field(table.fields[0]).unwrap().ty;
        assert_eq!(path(&host, id_type), ["tidl", "Uint64"]);
        let tags_type = host.ast.as_field(table.fields[2]).unwrap().ty;
        assert!(matches!(host.ast.kind(tags_type), NodeKind::List(_)));
        assert!(host.ast.node(user).attrs.is_empty());
    }

    #[test]
    fn test_struct_injects_marker_attribute() {
        let (host, script) = parse_ok("struct Point { x float32; y float32; }");
        let point = ty(&host, script, "Point");
        let attrs = &host.ast.node(point).attrs;
        assert_eq!(attrs.len(), 1);
        let marker = host.ast.as_attr(attrs[0]).unwrap().ty;
        assert_eq!(path(&host, marker), ["tidl", "Struct"]);
    }

    #[test]
    fn test_builtin_package_uses_bare_names() {
        let (host, script) = parse_in(builtins::PACKAGE, "struct Point { x float32; }").unwrap();
        assert!(host.imported.is_empty());
        assert!(host.ast.as_script(script).unwrap().imports.is_empty());
        let point = ty(&host, script, "Point");
        let marker = host.ast.as_attr(host.ast.node(point).attrs[0]).unwrap().ty;
        assert_eq!(path(&host, marker), ["Struct"]);
    }

    #[test]
    fn test_duplicate_type_and_field() {
        let err = parse_err("table A {}\ncontract A {}");
        assert_eq!(err.kind, ErrorKind::DuplicateType);
        assert_eq!(err.position.line, 2);
        assert!(err.message.contains("see: test.tidl(1:7)"), "{err}");

        let err = parse_err("table A { x int32; x int64; }");
        assert_eq!(err.kind, ErrorKind::DuplicateField);
    }

    // ========================================================================
    // Types
    // ========================================================================

    #[test]
    fn test_composite_types() {
        let (host, script) = parse_ok("table T { a [4]byte; b map[string]shop.Order; c []Item; }");
        let fields = host.ast.as_table(ty(&host, script, "T")).unwrap().fields.clone();
        let field_type = |i: usize| host.ast.as_field(fields[i]).unwrap().ty;

        match host.ast.kind(field_type(0)) {
            NodeKind::Array(array) => {
                assert_eq!(array.len, 4);
                assert_eq!(path(&host, array.element), ["tidl", "Byte"]);
            }
            other => panic!("expected array, got {}", other.describe()),
        }
        match host.ast.kind(field_type(1)) {
            NodeKind::Map(map) => {
                assert_eq!(path(&host, map.key), ["tidl", "String"]);
                assert_eq!(path(&host, map.value), ["shop", "Order"]);
            }
            other => panic!("expected map, got {}", other.describe()),
        }
        match host.ast.kind(field_type(2)) {
            NodeKind::List(list) => assert_eq!(path(&host, list.element), ["Item"]),
            other => panic!("expected list, got {}", other.describe()),
        }
    }

    #[test]
    fn test_nested_composites_are_rejected() {
        assert_eq!(parse_err("table T { a [][]byte; }").kind, ErrorKind::NestedComposite);
        assert_eq!(parse_err("table T { a [2][]byte; }").kind, ErrorKind::NestedComposite);
        assert_eq!(parse_err("table T { a map[[]byte]int32; }").kind, ErrorKind::NestedComposite);
        assert_eq!(parse_err("table T { a map[string]map[string]int32; }").kind, ErrorKind::NestedComposite);
        assert!(parse_in("demo", "table T { a []map[string]int32; }").is_ok());
    }

    #[test]
    fn test_nested_composite_messages_name_what_is_allowed() {
        assert!(parse_in("demo", "table T { a []map[int32]int32; b [3]map[string]byte; }").is_ok());
        let err = parse_err("table T { a [][]int32; }");
        assert_eq!(err.message, "array or list element cannot be an array or list");
        assert_eq!(err.position.column, 13);
        let err = parse_err("table T { a map[string][]int32; }");
        assert_eq!(err.message, "map value cannot be an array, list or map");
    }

    #[test]
    fn test_array_length_bounds() {
        assert_eq!(parse_err("table T { a [0]byte; }").kind, ErrorKind::ArrayLengthOutOfRange);
        assert_eq!(parse_err("table T { a [65536]byte; }").kind, ErrorKind::ArrayLengthOutOfRange);
        assert!(parse_in("demo", "table T { a [65535]byte; }").is_ok());
    }

    // ========================================================================
    // Contracts
    // ========================================================================

    #[test]
    fn test_parse_contract() {
        let source = "contract Store(base.Service, Auditable) {\n  get(string, int32) -> (Item, bool);\n  ping();\n}";
        let (host, script) = parse_ok(source);
        let store = ty(&host, script, "Store");
        let contract = host.ast.as_contract(store).unwrap();
        let bases: Vec<_> = contract.bases.iter().map(|&b| path(&host, b)).collect();
        assert_eq!(bases, [vec!["base", "Service"], vec!["Auditable"]]);

        let get = host.ast.as_method(contract.methods["get"]).unwrap();
        assert_eq!(get.id, 0);
        assert_eq!(get.params.len(), 2);
        assert_eq!(get.returns.len(), 2);
        assert_eq!(host.ast.as_param(get.returns[1]).unwrap().id, 1);
        let ping = host.ast.as_method(contract.methods["ping"]).unwrap();
        assert_eq!(ping.id, 1);
        assert!(ping.params.is_empty() && ping.returns.is_empty());
    }

    #[test]
    fn test_contract_errors() {
        assert_eq!(parse_err("contract C(A, A) {}").kind, ErrorKind::DuplicateBase);
        assert_eq!(parse_err("contract C { a(); a(); }").kind, ErrorKind::DuplicateMethod);
        assert_eq!(parse_err("contract C { a() }").kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_method_attributes_are_not_taken_by_params() {
        let (host, script) = parse_ok("contract C {\n  @Idempotent\n  get(@NotNull string) -> (@Nullable Item);\n}");
        let contract = host.ast.as_contract(ty(&host, script, "C")).unwrap();
        let method_id = contract.methods["get"];
        let method = host.ast.as_method(method_id).unwrap();
        let names = |id: NodeId| -> Vec<String> {
            host.ast.node(id).attrs.iter().map(|&a| host.ast.name(a).to_string()).collect()
        };
        assert_eq!(names(method_id), ["Idempotent"]);
        assert_eq!(names(method.params[0]), ["NotNull"]);
        assert_eq!(names(method.returns[0]), ["Nullable"]);
    }

    // ========================================================================
    // Imports
    // ========================================================================

    #[test]
    fn test_implicit_builtin_import() {
        let (host, script) = parse_ok("table T {}");
        assert_eq!(host.imported, [builtins::PACKAGE]);
        let imports = &host.ast.as_script(script).unwrap().imports;
        let builtin = imports[builtins::ALIAS];
        assert_eq!(host.ast.position(builtin).to_string(), "test.tidl(1:1)");
    }

    #[test]
    fn test_grouped_imports_and_aliases() {
        let source = "import (\n  \"shop/orders\" // orders\n  base \"com/acme/base\"\n)\nimport \"tidl\"\n";
        let (host, script) = parse_ok(source);
        assert_eq!(host.imported, ["shop/orders", "com/acme/base", "tidl"]);
        let imports = &host.ast.as_script(script).unwrap().imports;
        assert_eq!(imports.keys().collect::<Vec<_>>(), ["orders", "base", "tidl"]);
        let comments = &host.ast.node(imports["orders"]).comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, " orders");
    }

    #[test]
    fn test_duplicate_import_alias() {
        let err = parse_err("import \"a/x\"\nimport \"b/x\"");
        assert_eq!(err.kind, ErrorKind::DuplicateImport);
        assert!(err.message.contains("see: test.tidl(1:8)"), "{err}");
    }

    #[test]
    fn test_imports_must_precede_declarations() {
        let err = parse_err("table T {}\nimport \"x\"");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert!(err.message.contains("declaration"), "{err}");
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    #[test]
    fn test_named_and_positional_arguments() {
        let source = "@Usage(Target: tidl.AttrTarget.Table | tidl.AttrTarget.Struct, Note: \"x\")\n\
                      @Range(-5, +2.5, 0x10, true)\n\
                      table T {}";
        let (host, script) = parse_ok(source);
        let t = ty(&host, script, "T");
        let attrs = host.ast.node(t).attrs.clone();
        assert_eq!(attrs.len(), 2);

        let usage_args = host.ast.as_attr(attrs[0]).unwrap().args.unwrap();
        let named = host.ast.as_named_args(usage_args).unwrap();
        assert_eq!(named.items.keys().collect::<Vec<_>>(), ["Target", "Note"]);
        match host.ast.kind(named.items["Target"]) {
            NodeKind::BinaryOp(op) => {
                assert_eq!(op.op, BinaryOpKind::Or);
                assert_eq!(path(&host, op.left), ["tidl", "AttrTarget", "Table"]);
                assert_eq!(path(&host, op.right), ["tidl", "AttrTarget", "Struct"]);
            }
            other => panic!("expected binary op, got {}", other.describe()),
        }

        let range_args = host.ast.as_attr(attrs[1]).unwrap().args.unwrap();
        let items = host.ast.as_args(range_args).unwrap().items.clone();
        assert!(matches!(host.ast.kind(items[0]), NodeKind::Int(-5)));
        assert!(matches!(host.ast.kind(items[1]), NodeKind::Float(v) if *v == 2.5));
        assert!(matches!(host.ast.kind(items[2]), NodeKind::Int(16)));
        assert!(matches!(host.ast.kind(items[3]), NodeKind::Bool(true)));
    }

    #[test]
    fn test_or_chains_fold_left() {
        let (host, script) = parse_ok("@Flags(A.x | A.y | A.z)\ntable T {}");
        let attr = host.ast.node(ty(&host, script, "T")).attrs[0];
        let args = host.ast.as_attr(attr).unwrap().args.unwrap();
        let root = host.ast.as_args(args).unwrap().items[0];
        let NodeKind::BinaryOp(outer) = host.ast.kind(root) else {
            panic!("expected binary op");
        };
        assert_eq!(path(&host, outer.right), ["A", "z"]);
        assert!(matches!(host.ast.kind(outer.left), NodeKind::BinaryOp(_)));
    }

    #[test]
    fn test_argument_list_errors() {
        assert_eq!(parse_err("@A(K: 1, K: 2)\ntable T {}").kind, ErrorKind::DuplicateArgument);
        assert_eq!(parse_err("@A(K: 1, 2)\ntable T {}").kind, ErrorKind::UnexpectedToken);
        assert_eq!(parse_err("@A(1, K: 2)\ntable T {}").kind, ErrorKind::UnexpectedToken);
        assert_eq!(parse_err("@A(-x)\ntable T {}").kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_empty_argument_list() {
        let (host, script) = parse_ok("@A()\ntable T {}");
        let attr = host.ast.node(ty(&host, script, "T")).attrs[0];
        assert!(host.ast.as_attr(attr).unwrap().args.is_none());
    }

    #[test]
    fn test_trailing_attributes_belong_to_the_script() {
        let (host, script) = parse_ok("table T {}\n@Version(2)\n");
        assert!(host.ast.node(ty(&host, script, "T")).attrs.is_empty());
        let attrs = &host.ast.node(script).attrs;
        assert_eq!(attrs.len(), 1);
        assert_eq!(host.ast.name(attrs[0]), "Version");
        assert_eq!(host.ast.node(attrs[0]).parent, Some(script));
    }

    // ========================================================================
    // Comments
    // ========================================================================

    #[test]
    fn test_comment_binding() {
        let source = "\
// stray header

// about A
table A {
  // the id
  id int32; // trailing
  /* dangling */
}
// file footer";
        let (host, script) = parse_ok(source);
        let a = ty(&host, script, "A");
        let texts = |id: NodeId| -> Vec<String> {
            host.ast.node(id).comments.iter().map(|c| c.text.trim().to_string()).collect()
        };
        assert_eq!(texts(a), ["about A"]);
        let id = host.ast.as_table(a).unwrap().fields[0];
        assert_eq!(texts(id), ["the id", "trailing"]);
        assert_eq!(texts(script), ["stray header", "dangling", "file footer"]);
    }

    #[test]
    fn test_comments_may_appear_anywhere() {
        let (host, script) = parse_ok("table /* name */ T { id /* type */ int32; }");
        let t = ty(&host, script, "T");
        assert_eq!(host.ast.as_table(t).unwrap().fields.len(), 1);
    }

    #[test]
    fn test_unexpected_token_message() {
        let err = parse_err("table T { id int32 }");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert_eq!(err.to_string(), "parse test.tidl(1:20) error: expect `;`, got `}`");
    }
}
