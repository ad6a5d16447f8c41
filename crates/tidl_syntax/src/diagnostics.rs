//! Diagnostics for the tidl frontend.
//!
//! Every failure in lexing, parsing, linking or package loading is a [`CompileError`]. Errors are
//! fatal: the first one aborts the package being compiled.
//!
//! ## Notes
//! - Errors render as `<phase> <position> error: <message>`, e.g.
//!   `parse orders.tidl(3:7) error: duplicate type name(Order)`.
//! - [`ErrorKind`] is the stable, matchable category; the message is for humans.
//! - Wording lives in the [`errors`] catalog so each message is written once.

use crate::ast::Position;
use std::fmt;
use thiserror::Error;

/// Compiler phase that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexer,
    Parse,
    Link,
    Driver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexer => write!(f, "lexer"),
            Phase::Parse => write!(f, "parse"),
            Phase::Link => write!(f, "link"),
            Phase::Driver => write!(f, "driver"),
        }
    }
}

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Lexer
    IllegalUtf8,
    UnterminatedString,
    UnterminatedComment,
    IllegalEscape,
    MalformedNumber,

    // Parser
    UnexpectedToken,
    EnumValueOutOfRange,
    ArrayLengthOutOfRange,
    NestedComposite,
    DuplicateType,
    DuplicateField,
    DuplicateMethod,
    DuplicateEnumValue,
    DuplicateImport,
    DuplicateBase,
    DuplicateArgument,
    TooManyItems,

    // Linker
    UnknownType,
    AliasConflict,
    InvalidAttribute,
    AttrTargetMismatch,
    MissingBuiltin,
    NotAContract,
    CircularImport,
    CircularInheritance,

    // Driver
    PackageNotFound,
    AmbiguousPackage,
    DuplicateScript,
    UnknownPackage,
    Io,
}

impl ErrorKind {
    /// Stable diagnostic code, e.g. `tidl::link::unknown_type`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::IllegalUtf8 => "tidl::lexer::illegal_utf8",
            ErrorKind::UnterminatedString => "tidl::lexer::unterminated_string",
            ErrorKind::UnterminatedComment => "tidl::lexer::unterminated_comment",
            ErrorKind::IllegalEscape => "tidl::lexer::illegal_escape",
            ErrorKind::MalformedNumber => "tidl::lexer::malformed_number",
            ErrorKind::UnexpectedToken => "tidl::parse::unexpected_token",
            ErrorKind::EnumValueOutOfRange => "tidl::parse::enum_value_out_of_range",
            ErrorKind::ArrayLengthOutOfRange => "tidl::parse::array_length_out_of_range",
            ErrorKind::NestedComposite => "tidl::parse::nested_composite",
            ErrorKind::DuplicateType => "tidl::parse::duplicate_type",
            ErrorKind::DuplicateField => "tidl::parse::duplicate_field",
            ErrorKind::DuplicateMethod => "tidl::duplicate_method",
            ErrorKind::DuplicateEnumValue => "tidl::parse::duplicate_enum_value",
            ErrorKind::DuplicateImport => "tidl::parse::duplicate_import",
            ErrorKind::DuplicateBase => "tidl::parse::duplicate_base",
            ErrorKind::DuplicateArgument => "tidl::parse::duplicate_argument",
            ErrorKind::TooManyItems => "tidl::too_many_items",
            ErrorKind::UnknownType => "tidl::link::unknown_type",
            ErrorKind::AliasConflict => "tidl::link::alias_conflict",
            ErrorKind::InvalidAttribute => "tidl::link::invalid_attribute",
            ErrorKind::AttrTargetMismatch => "tidl::link::attr_target_mismatch",
            ErrorKind::MissingBuiltin => "tidl::link::missing_builtin",
            ErrorKind::NotAContract => "tidl::link::not_a_contract",
            ErrorKind::CircularImport => "tidl::link::circular_import",
            ErrorKind::CircularInheritance => "tidl::link::circular_inheritance",
            ErrorKind::PackageNotFound => "tidl::driver::package_not_found",
            ErrorKind::AmbiguousPackage => "tidl::driver::ambiguous_package",
            ErrorKind::DuplicateScript => "tidl::driver::duplicate_script",
            ErrorKind::UnknownPackage => "tidl::driver::unknown_package",
            ErrorKind::Io => "tidl::driver::io",
        }
    }
}

/// A fatal compile-time error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{phase} {position} error: {message}")]
pub struct CompileError {
    pub phase: Phase,
    pub kind: ErrorKind,
    pub position: Position,
    pub message: String,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(phase: Phase, kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            phase,
            kind,
            position,
            message: message.into(),
            hints: Vec::new(),
        }
    }

    pub fn lexer(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self::new(Phase::Lexer, kind, position, message)
    }

    pub fn parse(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self::new(Phase::Parse, kind, position, message)
    }

    pub fn link(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self::new(Phase::Link, kind, position, message)
    }

    pub fn driver(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self::new(Phase::Driver, kind, position, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }
}

/// Message catalog.
pub mod errors {
    use super::*;

    fn see(position: &Position) -> String {
        format!("\n\tsee: {position}")
    }

    // ------------------------------------------------------------------------
    // Lexer
    // ------------------------------------------------------------------------

    pub fn illegal_utf8(position: Position) -> CompileError {
        CompileError::lexer(ErrorKind::IllegalUtf8, position, "illegal utf-8 sequence")
    }

    pub fn unterminated_string(position: Position) -> CompileError {
        CompileError::lexer(ErrorKind::UnterminatedString, position, "string literal not terminated")
            .with_hint("string literals cannot span lines")
    }

    pub fn unterminated_comment(position: Position) -> CompileError {
        CompileError::lexer(ErrorKind::UnterminatedComment, position, "block comment not terminated")
    }

    pub fn illegal_escape(position: Position, escaped: char) -> CompileError {
        CompileError::lexer(
            ErrorKind::IllegalEscape,
            position,
            format!("illegal escape sequence `\\{escaped}`"),
        )
        .with_hint("only the enclosing quote character may be escaped")
    }

    pub fn malformed_number(position: Position, literal: &str) -> CompileError {
        CompileError::lexer(
            ErrorKind::MalformedNumber,
            position,
            format!("malformed numeric literal `{literal}`"),
        )
    }

    // ------------------------------------------------------------------------
    // Parser
    // ------------------------------------------------------------------------

    pub fn unexpected_token(position: Position, expected: &str, found: &str) -> CompileError {
        CompileError::parse(
            ErrorKind::UnexpectedToken,
            position,
            format!("expect {expected}, got {found}"),
        )
    }

    pub fn enum_value_out_of_range(position: Position, name: &str, value: i64, range: (i64, i64)) -> CompileError {
        CompileError::parse(
            ErrorKind::EnumValueOutOfRange,
            position,
            format!(
                "value {value} is out of enum({name}) type's range [{}, {}]",
                range.0, range.1
            ),
        )
    }

    pub fn array_length_out_of_range(position: Position, len: i64) -> CompileError {
        CompileError::parse(
            ErrorKind::ArrayLengthOutOfRange,
            position,
            format!("array length out of range: {len}"),
        )
        .with_hint("array length must be between 1 and 65535; use `[]T` for a list")
    }

    /// `nested` names the composites `what` must not be, e.g. `an array or list`.
    pub fn nested_composite(position: Position, what: &str, nested: &str) -> CompileError {
        CompileError::parse(ErrorKind::NestedComposite, position, format!("{what} cannot be {nested}"))
    }

    pub fn duplicate(kind: ErrorKind, position: Position, what: &str, name: &str, first: &Position) -> CompileError {
        CompileError::parse(kind, position, format!("duplicate {what}({name}){}", see(first)))
    }

    pub fn too_many(position: Position, what: &str) -> CompileError {
        CompileError::parse(
            ErrorKind::TooManyItems,
            position,
            format!("too many {what}, at most {} allowed", u16::MAX),
        )
    }

    // ------------------------------------------------------------------------
    // Linker
    // ------------------------------------------------------------------------

    pub fn unknown_type(position: Position, path: &str) -> CompileError {
        CompileError::link(ErrorKind::UnknownType, position, format!("unknown type({path})"))
    }

    pub fn alias_conflict(position: Position, name: &str, import: &Position) -> CompileError {
        CompileError::link(
            ErrorKind::AliasConflict,
            position,
            format!("type name({name}) conflicts with import alias{}", see(import)),
        )
    }

    pub fn invalid_attribute(position: Position, name: &str, reason: &str) -> CompileError {
        CompileError::link(
            ErrorKind::InvalidAttribute,
            position,
            format!("attribute({name}) {reason}"),
        )
    }

    pub fn attr_target_mismatch(position: Position, name: &str, site: &str) -> CompileError {
        CompileError::link(
            ErrorKind::AttrTargetMismatch,
            position,
            format!("attribute({name}) cannot target {site}"),
        )
        .with_hint("check the `Target` of the attribute type's AttrUsage")
    }

    pub fn not_constant(position: Position, found: &str) -> CompileError {
        CompileError::link(
            ErrorKind::InvalidAttribute,
            position,
            format!("expect an integer or enum value, got {found}"),
        )
    }

    pub fn missing_builtin(position: Position, name: &str) -> CompileError {
        CompileError::link(
            ErrorKind::MissingBuiltin,
            position,
            format!("built-in declaration `{name}` not found"),
        )
    }

    pub fn not_a_contract(position: Position, name: &str) -> CompileError {
        CompileError::link(
            ErrorKind::NotAContract,
            position,
            format!("contract can only inherit from contracts, `{name}` is not one"),
        )
    }

    pub fn circular_import(position: Position, chain: &[String]) -> CompileError {
        let mut message = String::from("circular package import:");
        for (i, name) in chain.iter().enumerate() {
            message.push_str("\n\t");
            message.push_str(name);
            if i + 1 < chain.len() {
                message.push_str(" imports");
            }
        }
        CompileError::link(ErrorKind::CircularImport, position, message)
    }

    pub fn circular_inheritance(position: Position, chain: &[String]) -> CompileError {
        let mut message = String::from("circular inheritance:");
        for (i, name) in chain.iter().enumerate() {
            message.push_str("\n\t");
            message.push_str(name);
            if i + 1 < chain.len() {
                message.push_str(" inherits");
            }
        }
        CompileError::link(ErrorKind::CircularInheritance, position, message)
    }

    pub fn duplicate_inherited_method(position: Position, name: &str, first: &Position) -> CompileError {
        CompileError::link(
            ErrorKind::DuplicateMethod,
            position,
            format!("duplicate method({name}) after flattening{}", see(first)),
        )
    }

    // ------------------------------------------------------------------------
    // Driver
    // ------------------------------------------------------------------------

    pub fn package_not_found(name: &str) -> CompileError {
        CompileError::driver(
            ErrorKind::PackageNotFound,
            Position::default(),
            format!("package({name}) not found"),
        )
        .with_hint("add the directory containing it with --path or TIDL_PATH")
    }

    pub fn ambiguous_package(name: &str, candidates: &[String]) -> CompileError {
        CompileError::driver(
            ErrorKind::AmbiguousPackage,
            Position::default(),
            format!("package({name}) found in more than one place:\n\t{}", candidates.join("\n\t")),
        )
    }

    pub fn duplicate_script(name: &str) -> CompileError {
        CompileError::driver(
            ErrorKind::DuplicateScript,
            Position::default(),
            format!("script({name}) loaded twice"),
        )
    }

    pub fn unknown_package(name: &str) -> CompileError {
        CompileError::driver(
            ErrorKind::UnknownPackage,
            Position::default(),
            format!("package({name}) has not been compiled"),
        )
    }

    pub fn unknown_package_type(package: &str, name: &str) -> CompileError {
        CompileError::driver(
            ErrorKind::UnknownType,
            Position::default(),
            format!("package({package}) has no type named {name}"),
        )
    }

    pub fn io(path: &str, err: &std::io::Error) -> CompileError {
        CompileError::driver(ErrorKind::Io, Position::new(path, 0, 0), format!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_contract() {
        let err = errors::unknown_type(Position::new("orders.tidl", 3, 7), "shop.Order");
        assert_eq!(err.to_string(), "link orders.tidl(3:7) error: unknown type(shop.Order)");
    }

    #[test]
    fn test_duplicate_references_first_site() {
        let err = errors::duplicate(
            ErrorKind::DuplicateType,
            Position::new("b.tidl", 4, 7),
            "type name",
            "Order",
            &Position::new("a.tidl", 1, 7),
        );
        assert_eq!(err.phase, Phase::Parse);
        assert!(err.to_string().contains("see: a.tidl(1:7)"), "{err}");
    }

    #[test]
    fn test_circular_chain_rendering() {
        let chain = ["a".to_string(), "b".to_string(), "a".to_string()];
        let err = errors::circular_import(Position::default(), &chain);
        assert!(err.message.ends_with("\n\ta imports\n\tb imports\n\ta"), "{}", err.message);
    }

    #[test]
    fn test_diagnostic_code_and_help() {
        use miette::Diagnostic;
        let err = errors::unterminated_string(Position::new("a.tidl", 1, 1));
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("tidl::lexer::unterminated_string"));
        assert!(err.help().is_some());
    }
}
