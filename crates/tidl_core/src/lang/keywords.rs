//! Define the reserved keyword vocabulary for the tidl language.
//!
//! Every reserved word has a [`KeywordId`] and one row in the const [`KEYWORDS`] table. A row
//! holds the spelling, the category and, for scalar keywords, the built-in type the keyword
//! stands for plus its enum backing width when it can back an enum.
//!
//! ## Notes
//! - [`from_str`] matches exact spelling only: `Uint16` is an identifier.
//! - `true`/`false` are not keywords; the lexer turns them into boolean literals.
//!
//! ## Examples
//! ```rust
//! use tidl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("uint16"), Some(KeywordId::Uint16));
//! assert_eq!(keywords::scalar_type_name(KeywordId::Uint16), Some("Uint16"));
//! assert_eq!(keywords::from_str("Uint16"), None);
//! ```

/// Identity of a reserved word.
///
/// ## Notes
/// - Variant order matches [`KEYWORDS`]; the registry is indexed by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Scalar types
    Byte,
    Sbyte,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,

    // Declarations
    Enum,
    Struct,
    Table,
    Contract,
    Import,
    Map,
}

/// High-level grouping for documentation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// A primitive scalar type usable wherever a type is expected.
    Scalar,
    /// A keyword that introduces a declaration or a composite type.
    Declaration,
}

/// Storage class of an enum: byte width plus signedness.
///
/// ## Notes
/// - Enums declared without a base type use [`EnumBase::DEFAULT`] (one byte, unsigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumBase {
    pub width: u8,
    pub signed: bool,
}

impl EnumBase {
    pub const DEFAULT: EnumBase = EnumBase { width: 1, signed: false };

    /// Inclusive `(min, max)` range of values representable by this base.
    ///
    /// ## Examples
    /// ```rust
    /// use tidl_core::lang::keywords::EnumBase;
    ///
    /// assert_eq!(EnumBase::DEFAULT.range(), (0, 255));
    /// assert_eq!(EnumBase { width: 2, signed: true }.range(), (-32768, 32767));
    /// ```
    pub const fn range(self) -> (i64, i64) {
        let bits = self.width as u32 * 8;
        if self.signed {
            (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
        } else {
            (0, (1i64 << bits) - 1)
        }
    }

    /// Check whether `value` fits this base.
    pub const fn contains(self, value: i64) -> bool {
        let (min, max) = self.range();
        value >= min && value <= max
    }
}

/// One row of [`KEYWORDS`].
///
/// ## Notes
/// - `type_name` is set for scalar keywords: the name of the marker type the built-in package
///   declares for it.
/// - `enum_base` is set for the scalar keywords that may back an enum.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub type_name: Option<&'static str>,
    pub enum_base: Option<EnumBase>,
}

/// Registry of all keywords, in [`KeywordId`] discriminant order.
pub const KEYWORDS: &[KeywordInfo] = &[
    scalar(KeywordId::Byte, "byte", "Byte", Some(EnumBase { width: 1, signed: false })),
    scalar(KeywordId::Sbyte, "sbyte", "Sbyte", Some(EnumBase { width: 1, signed: true })),
    scalar(KeywordId::Int16, "int16", "Int16", Some(EnumBase { width: 2, signed: true })),
    scalar(KeywordId::Uint16, "uint16", "Uint16", Some(EnumBase { width: 2, signed: false })),
    scalar(KeywordId::Int32, "int32", "Int32", Some(EnumBase { width: 4, signed: true })),
    scalar(KeywordId::Uint32, "uint32", "Uint32", Some(EnumBase { width: 4, signed: false })),
    scalar(KeywordId::Int64, "int64", "Int64", None),
    scalar(KeywordId::Uint64, "uint64", "Uint64", None),
    scalar(KeywordId::Float32, "float32", "Float32", None),
    scalar(KeywordId::Float64, "float64", "Float64", None),
    scalar(KeywordId::Bool, "bool", "Bool", None),
    scalar(KeywordId::String, "string", "String", None),
    declaration(KeywordId::Enum, "enum"),
    declaration(KeywordId::Struct, "struct"),
    declaration(KeywordId::Table, "table"),
    declaration(KeywordId::Contract, "contract"),
    declaration(KeywordId::Import, "import"),
    declaration(KeywordId::Map, "map"),
];

/// Full metadata.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Name of the built-in marker type a scalar keyword refers to.
///
/// ## Returns
/// - `Some(name)` for scalar keywords (`"Byte"`, `"Sbyte"`, ...).
/// - `None` for declaration keywords.
pub fn scalar_type_name(id: KeywordId) -> Option<&'static str> {
    info_for(id).type_name
}

/// Enum storage class selected by a scalar keyword, if it may back an enum.
pub fn enum_base(id: KeywordId) -> Option<EnumBase> {
    info_for(id).enum_base
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved word.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn scalar(
    id: KeywordId,
    canonical: &'static str,
    type_name: &'static str,
    enum_base: Option<EnumBase>,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::Scalar,
        type_name: Some(type_name),
        enum_base,
    }
}

const fn declaration(id: KeywordId, canonical: &'static str) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::Declaration,
        type_name: None,
        enum_base: None,
    }
}
