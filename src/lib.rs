#![forbid(unsafe_code)]
//! tidl interface definition language compiler frontend
//!
//! tidl describes enums, tables/structs and service contracts, organized into packages that import
//! one another. This crate turns a package name into a fully linked tree that code generators walk
//! through the [`Visitor`](frontend::ast::Visitor) trait.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//!
//! ```rust
//! use tidl::{Compiler, InMemoryProvider};
//!
//! let provider = InMemoryProvider::new()
//!     .with_file("shop/order.tidl", "enum Status { Open(0), Closed(1) }\ntable Order { status Status; }");
//! let mut compiler = Compiler::new(provider);
//! compiler.compile("shop").unwrap();
//! let order = compiler.type_of("shop", "Order").unwrap();
//! assert_eq!(compiler.ast().name(order), "Order");
//! ```

pub mod cli;
pub mod frontend;
pub mod version;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use frontend::driver::{Compiler, SharedCompiler};
pub use frontend::source::{FileSystemProvider, InMemoryProvider, SourceProvider};
