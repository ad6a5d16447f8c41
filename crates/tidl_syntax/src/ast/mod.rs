//! Abstract syntax tree for tidl.
//!
//! Every node lives in one [`Ast`] arena owned by the compile session and is addressed by a
//! [`NodeId`]. Children are owned through the id lists of their parent; the `parent` and `script`
//! links, as well as a resolved [`TypeRef::target`], are plain ids and never own anything, so the
//! graph can point across packages without reference cycles.
//!
//! ## Module Structure
//!
//! - `arena` - the [`Ast`] arena: node construction, typed accessors, attribute queries
//! - `visit` - the [`Visitor`] contract and depth-first walking
//!
//! ## Notes
//! - Node kinds form a closed set ([`NodeKind`]); consumers dispatch through [`Ast::accept`].
//! - Facts established by the linker (struct/error tags, flattening) are typed fields on the node
//!   payloads. [`Node::extras`] is reserved for tool-defined metadata.

mod arena;
mod visit;

pub use arena::Ast;
pub use visit::Visitor;

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tidl_core::lang::keywords::EnumBase;

// ============================================================================
// Positions
// ============================================================================

/// Source position of a token or node.
///
/// ## Notes
/// - `line` and `column` are 1-based; a zero line marks an unknown position.
/// - Renders as `file(line:column)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.line != 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.file, self.line, self.column)
    }
}

/// A source comment bound to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment body without its `//` or `/* */` delimiters.
    pub text: String,
    pub position: Position,
}

// ============================================================================
// Nodes
// ============================================================================

/// Index of a node in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Data shared by every node kind.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Owning declaration; `None` for packages and for expressions not yet attached.
    pub parent: Option<NodeId>,
    /// Script the node was parsed from; `None` for packages and scripts.
    pub script: Option<NodeId>,
    pub position: Position,
    pub comments: Vec<Comment>,
    /// Attribute instances ([`NodeKind::Attr`]) attached to this node.
    pub attrs: Vec<NodeId>,
    pub extras: BTreeMap<String, String>,
    pub kind: NodeKind,
}

/// Closed set of node kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Package(Package),
    Script(Script),
    PackageRef(PackageRef),
    TypeRef(TypeRef),
    Enum(Enum),
    EnumVal(EnumVal),
    Table(Table),
    Field(Field),
    Contract(Contract),
    Method(Method),
    Param(Param),
    Attr(Attr),
    Args(Args),
    NamedArgs(NamedArgs),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Array),
    List(List),
    Map(MapType),
    BinaryOp(BinaryOp),
}

impl NodeKind {
    /// Human readable kind name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Package(_) => "package",
            NodeKind::Script(_) => "script",
            NodeKind::PackageRef(_) => "package reference",
            NodeKind::TypeRef(_) => "type reference",
            NodeKind::Enum(_) => "enum",
            NodeKind::EnumVal(_) => "enum value",
            NodeKind::Table(_) => "table",
            NodeKind::Field(_) => "field",
            NodeKind::Contract(_) => "contract",
            NodeKind::Method(_) => "method",
            NodeKind::Param(_) => "param",
            NodeKind::Attr(_) => "attribute",
            NodeKind::Args(_) => "argument list",
            NodeKind::NamedArgs(_) => "named argument list",
            NodeKind::String(_) => "string",
            NodeKind::Int(_) => "integer",
            NodeKind::Float(_) => "float",
            NodeKind::Bool(_) => "bool",
            NodeKind::Array(_) => "array",
            NodeKind::List(_) => "list",
            NodeKind::Map(_) => "map",
            NodeKind::BinaryOp(_) => "binary operation",
        }
    }

    /// `true` for array, list and map type expressions.
    pub fn is_composite(&self) -> bool {
        matches!(self, NodeKind::Array(_) | NodeKind::List(_) | NodeKind::Map(_))
    }
}

// ============================================================================
// Containers
// ============================================================================

/// A compilation unit: one directory of scripts sharing a type namespace.
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Scripts by file name.
    pub scripts: BTreeMap<String, NodeId>,
    /// Every top-level type declared by any script of the package.
    pub types: IndexMap<String, NodeId>,
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct Script {
    pub package: NodeId,
    pub path: Option<PathBuf>,
    /// Import alias to [`NodeKind::PackageRef`].
    pub imports: IndexMap<String, NodeId>,
    /// Types declared by this script, in declaration order.
    pub types: Vec<NodeId>,
}

/// An import alias bound to a compiled package.
#[derive(Debug, Clone)]
pub struct PackageRef {
    pub package: NodeId,
}

/// A dotted name that the linker binds to a declaration.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub path: Vec<String>,
    /// Set exactly once, by the linker.
    pub target: Option<NodeId>,
}

impl TypeRef {
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone)]
pub struct Enum {
    pub base: EnumBase,
    /// Values by name, in declaration order.
    pub values: IndexMap<String, NodeId>,
    /// First declared value.
    pub default: Option<NodeId>,
    /// Tagged by the linker when the enum carries the built-in `Error` marker.
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct EnumVal {
    pub value: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub fields: Vec<NodeId>,
    /// Tagged by the linker when the table carries the built-in `Struct` marker.
    pub is_struct: bool,
}

#[derive(Debug, Clone)]
pub struct Field {
    /// Dense 0-based id in declaration order.
    pub id: u16,
    pub ty: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct Contract {
    /// Base contracts as [`NodeKind::TypeRef`] nodes, in declaration order.
    pub bases: Vec<NodeId>,
    /// Own methods first; after flattening also the inherited clones.
    pub methods: IndexMap<String, NodeId>,
    pub flattened: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Method {
    pub id: u16,
    pub params: Vec<NodeId>,
    pub returns: Vec<NodeId>,
}

/// A slot of a method's parameter or return list.
#[derive(Debug, Clone)]
pub struct Param {
    pub id: u16,
    pub ty: NodeId,
}

// ============================================================================
// Attributes and expressions
// ============================================================================

/// An attribute instance: `@Type` or `@Type(args)`.
#[derive(Debug, Clone)]
pub struct Attr {
    /// [`NodeKind::TypeRef`] naming the attribute's table.
    pub ty: NodeId,
    /// [`NodeKind::Args`] or [`NodeKind::NamedArgs`].
    pub args: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Args {
    pub items: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct NamedArgs {
    pub items: IndexMap<String, NodeId>,
}

/// `[N]T`
#[derive(Debug, Clone)]
pub struct Array {
    pub len: u16,
    pub element: NodeId,
}

/// `[]T`
#[derive(Debug, Clone)]
pub struct List {
    pub element: NodeId,
}

/// `map[K]V`
#[derive(Debug, Clone)]
pub struct MapType {
    pub key: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpKind {
    /// `|`, used to combine flag values.
    Or,
}

impl fmt::Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOpKind::Or => write!(f, "|"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryOp {
    pub op: BinaryOpKind,
    pub left: NodeId,
    pub right: NodeId,
}
