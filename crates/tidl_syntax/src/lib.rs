//! Syntax frontend for tidl: lexer, AST arena, parser and diagnostics.
//!
//! The crate turns `.tidl` source into nodes of a shared [`ast::Ast`] arena. It does not resolve
//! names or validate attributes; that is the linker's job in the `tidl` crate.
//!
//! ## Notes
//! - Keyword identity and the built-in package vocabulary come from `tidl_core::lang`.
//! - Parsing needs a [`parser::ParseHost`], which owns the arena and compiles imported packages
//!   on demand.
//!
//! ## Examples
//! ```rust
//! use tidl_syntax::lexer;
//!
//! let tokens = lexer::lex(b"table Point { x int32; }", "point.tidl").unwrap();
//! assert_eq!(tokens.len(), 8);
//! ```
//!
//! ## See also
//! - `tidl_core::lang` for keywords and the built-in package.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
