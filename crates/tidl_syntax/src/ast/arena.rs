//! The node arena and its construction/query API.
//!
//! ## Notes
//! - Constructors that enforce a per-container uniqueness rule return `Err(existing)` with the id
//!   of the first declaration; the caller turns that into a diagnostic pointing at both sites.
//! - Ids are only meaningful for the arena that issued them. Indexing with a foreign id panics,
//!   which is a programming error rather than a user-facing failure.

use super::*;

/// Arena owning every node of a compile session.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

macro_rules! accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($ty:ty);)*) => {
        $(
            pub fn $get(&self, id: NodeId) -> Option<&$ty> {
                match &self.node(id).kind {
                    NodeKind::$variant(value) => Some(value),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self, id: NodeId) -> Option<&mut $ty> {
                match &mut self.node_mut(id).kind {
                    NodeKind::$variant(value) => Some(value),
                    _ => None,
                }
            }
        )*
    };
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated at or after `len`. Nodes below `len` must not refer to them.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn position(&self, id: NodeId) -> &Position {
        &self.node(id).position
    }

    accessors! {
        as_package, as_package_mut => Package(Package);
        as_script, as_script_mut => Script(Script);
        as_package_ref, as_package_ref_mut => PackageRef(PackageRef);
        as_type_ref, as_type_ref_mut => TypeRef(TypeRef);
        as_enum, as_enum_mut => Enum(Enum);
        as_enum_val, as_enum_val_mut => EnumVal(EnumVal);
        as_table, as_table_mut => Table(Table);
        as_field, as_field_mut => Field(Field);
        as_contract, as_contract_mut => Contract(Contract);
        as_method, as_method_mut => Method(Method);
        as_param, as_param_mut => Param(Param);
        as_attr, as_attr_mut => Attr(Attr);
        as_args, as_args_mut => Args(Args);
        as_named_args, as_named_args_mut => NamedArgs(NamedArgs);
    }

    // ========================================================================
    // Tree navigation
    // ========================================================================

    /// Script a node was parsed from (a script is its own script).
    pub fn script_of(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::Script(_) => Some(id),
            _ => self.node(id).script,
        }
    }

    /// Package a node belongs to (a package is its own package).
    pub fn package_of(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::Package(_) => Some(id),
            NodeKind::Script(script) => Some(script.package),
            _ => self.node(id).script.and_then(|script| self.package_of(script)),
        }
    }

    /// Name of the package a node belongs to.
    pub fn package_name(&self, id: NodeId) -> Option<&str> {
        self.package_of(id).map(|package| self.name(package))
    }

    /// Structural children in declaration order, attributes first.
    ///
    /// ## Notes
    /// - A resolved [`TypeRef`] target is a cross reference, not a child.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        let mut children = node.attrs.clone();
        match &node.kind {
            NodeKind::Package(package) => children.extend(package.scripts.values().copied()),
            NodeKind::Script(script) => {
                children.extend(script.imports.values().copied());
                children.extend(script.types.iter().copied());
            }
            NodeKind::Enum(decl) => children.extend(decl.values.values().copied()),
            NodeKind::Table(table) => children.extend(table.fields.iter().copied()),
            NodeKind::Field(field) => children.push(field.ty),
            NodeKind::Contract(contract) => {
                children.extend(contract.bases.iter().copied());
                children.extend(contract.methods.values().copied());
            }
            NodeKind::Method(method) => {
                children.extend(method.params.iter().copied());
                children.extend(method.returns.iter().copied());
            }
            NodeKind::Param(param) => children.push(param.ty),
            NodeKind::Attr(attr) => {
                children.push(attr.ty);
                children.extend(attr.args);
            }
            NodeKind::Args(args) => children.extend(args.items.iter().copied()),
            NodeKind::NamedArgs(args) => children.extend(args.items.values().copied()),
            NodeKind::Array(array) => children.push(array.element),
            NodeKind::List(list) => children.push(list.element),
            NodeKind::Map(map) => children.extend([map.key, map.value]),
            NodeKind::BinaryOp(op) => children.extend([op.left, op.right]),
            NodeKind::PackageRef(_)
            | NodeKind::TypeRef(_)
            | NodeKind::EnumVal(_)
            | NodeKind::String(_)
            | NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Bool(_) => {}
        }
        children
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Allocate a detached node.
    pub fn alloc(
        &mut self,
        name: impl Into<String>,
        script: Option<NodeId>,
        position: Position,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            parent: None,
            script,
            position,
            comments: Vec::new(),
            attrs: Vec::new(),
            extras: BTreeMap::new(),
            kind,
        });
        id
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
    }

    pub fn new_package(&mut self, name: &str) -> NodeId {
        self.alloc(name, None, Position::default(), NodeKind::Package(Package::default()))
    }

    /// Register a script under `package`; script names are unique per package.
    pub fn new_script(&mut self, package: NodeId, name: &str, path: Option<PathBuf>) -> Result<NodeId, NodeId> {
        if let Some(&existing) = self.as_package(package).and_then(|p| p.scripts.get(name)) {
            return Err(existing);
        }
        let script = Script {
            package,
            path,
            imports: IndexMap::new(),
            types: Vec::new(),
        };
        let id = self.alloc(name, None, Position::new(name, 1, 1), NodeKind::Script(script));
        self.adopt(package, id);
        if let Some(package) = self.as_package_mut(package) {
            package.scripts.insert(name.to_string(), id);
        }
        Ok(id)
    }

    /// Enter a declaration into its package's type namespace and its script's type list.
    ///
    /// ## Errors
    /// - `Err(existing)` if the package already has a type with the same name; the first
    ///   declaration wins.
    pub fn declare_type(&mut self, script: NodeId, ty: NodeId) -> Result<(), NodeId> {
        let Some(package) = self.package_of(script) else {
            return Ok(());
        };
        let name = self.name(ty).to_string();
        if let Some(&existing) = self.as_package(package).and_then(|p| p.types.get(&name)) {
            return Err(existing);
        }
        if let Some(package) = self.as_package_mut(package) {
            package.types.insert(name, ty);
        }
        if let Some(script) = self.as_script_mut(script) {
            script.types.push(ty);
        }
        self.adopt(script, ty);
        Ok(())
    }

    /// Bind an import alias; aliases are unique per script.
    pub fn new_package_ref(
        &mut self,
        script: NodeId,
        alias: &str,
        package: NodeId,
        position: Position,
    ) -> Result<NodeId, NodeId> {
        if let Some(&existing) = self.as_script(script).and_then(|s| s.imports.get(alias)) {
            return Err(existing);
        }
        let id = self.alloc(alias, Some(script), position, NodeKind::PackageRef(PackageRef { package }));
        self.adopt(script, id);
        if let Some(script) = self.as_script_mut(script) {
            script.imports.insert(alias.to_string(), id);
        }
        Ok(id)
    }

    pub fn new_type_ref(&mut self, script: NodeId, path: Vec<String>, position: Position) -> NodeId {
        let name = path.join(".");
        self.alloc(name, Some(script), position, NodeKind::TypeRef(TypeRef { path, target: None }))
    }

    pub fn new_enum(&mut self, script: NodeId, name: &str, base: EnumBase, position: Position) -> NodeId {
        let decl = Enum {
            base,
            values: IndexMap::new(),
            default: None,
            is_error: false,
        };
        self.alloc(name, Some(script), position, NodeKind::Enum(decl))
    }

    /// Add a value to an enum; the first value added becomes the default.
    pub fn new_enum_val(&mut self, decl: NodeId, name: &str, value: i64, position: Position) -> Result<NodeId, NodeId> {
        if let Some(&existing) = self.as_enum(decl).and_then(|e| e.values.get(name)) {
            return Err(existing);
        }
        let script = self.node(decl).script;
        let id = self.alloc(name, script, position, NodeKind::EnumVal(EnumVal { value }));
        self.adopt(decl, id);
        if let Some(decl) = self.as_enum_mut(decl) {
            decl.values.insert(name.to_string(), id);
            decl.default.get_or_insert(id);
        }
        Ok(id)
    }

    pub fn new_table(&mut self, script: NodeId, name: &str, position: Position) -> NodeId {
        self.alloc(name, Some(script), position, NodeKind::Table(Table::default()))
    }

    /// Append a field; its id is its index in declaration order.
    pub fn new_field(&mut self, table: NodeId, name: &str, ty: NodeId, position: Position) -> Result<NodeId, NodeId> {
        let fields = self.as_table(table).map(|t| t.fields.clone()).unwrap_or_default();
        if let Some(&existing) = fields.iter().find(|&&f| self.name(f) == name) {
            return Err(existing);
        }
        let field = Field {
            id: fields.len() as u16,
            ty,
        };
        let script = self.node(table).script;
        let id = self.alloc(name, script, position, NodeKind::Field(field));
        self.adopt(table, id);
        self.adopt(id, ty);
        if let Some(table) = self.as_table_mut(table) {
            table.fields.push(id);
        }
        Ok(id)
    }

    pub fn new_contract(&mut self, script: NodeId, name: &str, position: Position) -> NodeId {
        self.alloc(name, Some(script), position, NodeKind::Contract(Contract::default()))
    }

    /// Append a base contract reference; the same dotted path may appear once.
    pub fn add_base(&mut self, contract: NodeId, base: NodeId) -> Result<(), NodeId> {
        let bases = self.as_contract(contract).map(|c| c.bases.clone()).unwrap_or_default();
        if let Some(&existing) = bases.iter().find(|&&b| self.name(b) == self.name(base)) {
            return Err(existing);
        }
        self.adopt(contract, base);
        if let Some(contract) = self.as_contract_mut(contract) {
            contract.bases.push(base);
        }
        Ok(())
    }

    /// Declare a method; its id is its index among the contract's own methods.
    pub fn new_method(&mut self, contract: NodeId, name: &str, position: Position) -> Result<NodeId, NodeId> {
        let Some(methods) = self.as_contract(contract).map(|c| &c.methods) else {
            return Err(contract);
        };
        if let Some(&existing) = methods.get(name) {
            return Err(existing);
        }
        let method = Method {
            id: methods.len() as u16,
            ..Method::default()
        };
        let script = self.node(contract).script;
        let id = self.alloc(name, script, position, NodeKind::Method(method));
        self.adopt(contract, id);
        if let Some(contract) = self.as_contract_mut(contract) {
            contract.methods.insert(name.to_string(), id);
        }
        Ok(id)
    }

    pub fn new_param(&mut self, method: NodeId, ty: NodeId, position: Position) -> NodeId {
        let id = self.as_method(method).map_or(0, |m| m.params.len() as u16);
        let param = self.new_slot(method, id, ty, position);
        if let Some(method) = self.as_method_mut(method) {
            method.params.push(param);
        }
        param
    }

    pub fn new_return(&mut self, method: NodeId, ty: NodeId, position: Position) -> NodeId {
        let id = self.as_method(method).map_or(0, |m| m.returns.len() as u16);
        let param = self.new_slot(method, id, ty, position);
        if let Some(method) = self.as_method_mut(method) {
            method.returns.push(param);
        }
        param
    }

    fn new_slot(&mut self, method: NodeId, id: u16, ty: NodeId, position: Position) -> NodeId {
        let script = self.node(method).script;
        let param = self.alloc(format!("arg{id}"), script, position, NodeKind::Param(Param { id, ty }));
        self.adopt(method, param);
        self.adopt(param, ty);
        param
    }

    /// Install a shallow copy of `method` into `contract` under a new id.
    ///
    /// ## Notes
    /// - The copy shares parameter, return and attribute nodes with the original.
    pub fn clone_method(&mut self, method: NodeId, contract: NodeId, id: u16) -> NodeId {
        let mut copy = self.node(method).clone();
        copy.parent = Some(contract);
        if let NodeKind::Method(inner) = &mut copy.kind {
            inner.id = id;
        }
        let clone = NodeId(self.nodes.len() as u32);
        let name = copy.name.clone();
        self.nodes.push(copy);
        if let Some(contract) = self.as_contract_mut(contract) {
            contract.methods.insert(name, clone);
        }
        clone
    }

    pub fn new_attr(&mut self, script: NodeId, ty: NodeId, position: Position) -> NodeId {
        let name = self.name(ty).to_string();
        let id = self.alloc(name, Some(script), position, NodeKind::Attr(Attr { ty, args: None }));
        self.adopt(id, ty);
        id
    }

    pub fn set_attr_args(&mut self, attr: NodeId, args: NodeId) {
        self.adopt(attr, args);
        if let Some(attr) = self.as_attr_mut(attr) {
            attr.args = Some(args);
        }
    }

    pub fn new_args(&mut self, script: NodeId, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::Args(Args::default()))
    }

    pub fn push_arg(&mut self, args: NodeId, item: NodeId) {
        self.adopt(args, item);
        if let Some(args) = self.as_args_mut(args) {
            args.items.push(item);
        }
    }

    pub fn new_named_args(&mut self, script: NodeId, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::NamedArgs(NamedArgs::default()))
    }

    /// Add `name: item`; argument names are unique per list.
    pub fn insert_named_arg(&mut self, args: NodeId, name: &str, item: NodeId) -> Result<(), NodeId> {
        if let Some(&existing) = self.as_named_args(args).and_then(|a| a.items.get(name)) {
            return Err(existing);
        }
        self.adopt(args, item);
        if let Some(args) = self.as_named_args_mut(args) {
            args.items.insert(name.to_string(), item);
        }
        Ok(())
    }

    pub fn new_string(&mut self, script: NodeId, value: String, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::String(value))
    }

    pub fn new_int(&mut self, script: NodeId, value: i64, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::Int(value))
    }

    pub fn new_float(&mut self, script: NodeId, value: f64, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::Float(value))
    }

    pub fn new_bool(&mut self, script: NodeId, value: bool, position: Position) -> NodeId {
        self.alloc("", Some(script), position, NodeKind::Bool(value))
    }

    pub fn new_array(&mut self, script: NodeId, len: u16, element: NodeId, position: Position) -> NodeId {
        let id = self.alloc("", Some(script), position, NodeKind::Array(Array { len, element }));
        self.adopt(id, element);
        id
    }

    pub fn new_list(&mut self, script: NodeId, element: NodeId, position: Position) -> NodeId {
        let id = self.alloc("", Some(script), position, NodeKind::List(List { element }));
        self.adopt(id, element);
        id
    }

    pub fn new_map(&mut self, script: NodeId, key: NodeId, value: NodeId, position: Position) -> NodeId {
        let id = self.alloc("", Some(script), position, NodeKind::Map(MapType { key, value }));
        self.adopt(id, key);
        self.adopt(id, value);
        id
    }

    pub fn new_binary_op(
        &mut self,
        script: NodeId,
        op: BinaryOpKind,
        left: NodeId,
        right: NodeId,
        position: Position,
    ) -> NodeId {
        let id = self.alloc("", Some(script), position, NodeKind::BinaryOp(BinaryOp { op, left, right }));
        self.adopt(id, left);
        self.adopt(id, right);
        id
    }

    // ========================================================================
    // Attributes, comments, linker facts
    // ========================================================================

    /// Attach an attribute instance to `node` (no-op if already attached).
    pub fn add_attr(&mut self, node: NodeId, attr: NodeId) {
        if !self.node(node).attrs.contains(&attr) {
            self.node_mut(node).attrs.push(attr);
        }
        self.adopt(node, attr);
    }

    /// Detach an attribute instance; returns whether it was attached.
    pub fn remove_attr(&mut self, node: NodeId, attr: NodeId) -> bool {
        let attrs = &mut self.node_mut(node).attrs;
        let before = attrs.len();
        attrs.retain(|&a| a != attr);
        before != attrs.len()
    }

    /// Resolved table of an attribute instance, once linked.
    pub fn attr_type(&self, attr: NodeId) -> Option<NodeId> {
        self.as_attr(attr)
            .and_then(|a| self.as_type_ref(a.ty))
            .and_then(|r| r.target)
    }

    /// Attribute instances on `node` whose type resolved to `ty`.
    pub fn attrs_of_type(&self, node: NodeId, ty: NodeId) -> Vec<NodeId> {
        self.node(node)
            .attrs
            .iter()
            .copied()
            .filter(|&attr| self.attr_type(attr) == Some(ty))
            .collect()
    }

    pub fn bind_comments(&mut self, node: NodeId, comments: Vec<Comment>) {
        self.node_mut(node).comments.extend(comments);
    }

    /// Bind a type reference to its declaration.
    ///
    /// ## Returns
    /// - `false` (and leaves the reference untouched) if it was already bound.
    pub fn resolve_type_ref(&mut self, type_ref: NodeId, target: NodeId) -> bool {
        match self.as_type_ref_mut(type_ref) {
            Some(r) if r.target.is_none() => {
                r.target = Some(target);
                true
            }
            _ => false,
        }
    }

    pub fn set_extra(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.node_mut(id).extras.insert(key.into(), value.into());
    }

    pub fn extra(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id).extras.get(key).map(String::as_str)
    }
}
