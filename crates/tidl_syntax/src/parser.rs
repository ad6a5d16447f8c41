//! Parser for the tidl schema language.
//!
//! A recursive-descent, fail-fast parser: one [`Parser`] per source file populates the
//! [`Script`](crate::ast::Script) it was created for, directly in the session's [`Ast`] arena.
//! `import` statements are resolved immediately through the [`ParseHost`], which compiles the
//! imported package before parsing continues.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tidl_syntax::ast::{Ast, NodeId, Position};
//! use tidl_syntax::diagnostics::CompileError;
//! use tidl_syntax::parser::{self, ParseHost};
//!
//! struct Standalone(Ast);
//!
//! impl ParseHost for Standalone {
//!     fn ast(&mut self) -> &mut Ast {
//!         &mut self.0
//!     }
//!     fn import_package(&mut self, path: &str, _: &Position) -> Result<NodeId, CompileError> {
//!         Ok(self.0.new_package(path))
//!     }
//! }
//!
//! let mut host = Standalone(Ast::new());
//! let package = host.0.new_package("demo");
//! let script = host.0.new_script(package, "a.tidl", None).unwrap();
//! parser::parse_script(&mut host, script, b"enum Color { Red(0), Blue(1) }").unwrap();
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, ErrorKind, errors};
use crate::lexer::{Lexer, Token, TokenKind};
use tidl_core::lang::builtins;
use tidl_core::lang::keywords::{self, EnumBase, KeywordId};

// The chunks below are textually included so every `impl Parser` block shares this module's
// private items.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/args.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
