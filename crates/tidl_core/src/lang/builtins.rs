//! The built-in `tidl` package: well-known names and the embedded prelude.
//!
//! Every package except `tidl` itself implicitly imports the built-in package under the alias
//! [`ALIAS`]. The linker looks up the declarations named here (for example [`ATTR_USAGE`]) to
//! validate attribute placement, so renaming anything in `prelude.tidl` must be mirrored here.
//!
//! ## Examples
//! ```rust
//! use tidl_core::lang::builtins::{self, AttrTargetId};
//!
//! assert_eq!(builtins::PACKAGE, "tidl");
//! assert_eq!(AttrTargetId::Field.bit(), 1024);
//! assert_eq!(AttrTargetId::from_str("EnumVal"), Some(AttrTargetId::EnumVal));
//! ```

/// Import path of the built-in package.
pub const PACKAGE: &str = "tidl";
/// Alias the built-in package is implicitly imported under.
pub const ALIAS: &str = "tidl";
/// File extension (without the dot) of tidl source files.
pub const SOURCE_EXTENSION: &str = "tidl";

pub const ATTR_TARGET: &str = "AttrTarget";
pub const ATTR_USAGE: &str = "AttrUsage";
/// Field of [`ATTR_USAGE`] holding the permitted target mask.
pub const ATTR_USAGE_TARGET_FIELD: &str = "Target";
/// Marker attribute the parser injects on `struct` declarations.
pub const STRUCT: &str = "Struct";
/// Marker attribute flagging an enum as an error enum.
pub const ERROR: &str = "Error";

/// Virtual file name of the embedded prelude.
pub const PRELUDE_FILE: &str = "prelude.tidl";
/// Source of the built-in package, used when no `tidl` directory exists on the search path.
pub const PRELUDE_SOURCE: &str = include_str!("prelude.tidl");

/// A place an attribute can be attached to.
///
/// ## Notes
/// - Discriminant order matches bit order: `Package` is bit 0, `Field` is bit 10.
/// - Names match the values of the prelude's `AttrTarget` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrTargetId {
    Package,
    Script,
    Table,
    Struct,
    Enum,
    EnumVal,
    Contract,
    Method,
    Param,
    Return,
    Field,
}

impl AttrTargetId {
    pub const ALL: [AttrTargetId; 11] = [
        AttrTargetId::Package,
        AttrTargetId::Script,
        AttrTargetId::Table,
        AttrTargetId::Struct,
        AttrTargetId::Enum,
        AttrTargetId::EnumVal,
        AttrTargetId::Contract,
        AttrTargetId::Method,
        AttrTargetId::Param,
        AttrTargetId::Return,
        AttrTargetId::Field,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AttrTargetId::Package => "Package",
            AttrTargetId::Script => "Script",
            AttrTargetId::Table => "Table",
            AttrTargetId::Struct => "Struct",
            AttrTargetId::Enum => "Enum",
            AttrTargetId::EnumVal => "EnumVal",
            AttrTargetId::Contract => "Contract",
            AttrTargetId::Method => "Method",
            AttrTargetId::Param => "Param",
            AttrTargetId::Return => "Return",
            AttrTargetId::Field => "Field",
        }
    }

    /// Default mask bit of this target.
    pub const fn bit(self) -> i64 {
        1 << (self as u32)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<AttrTargetId> {
        AttrTargetId::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for AttrTargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
