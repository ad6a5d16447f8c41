//! tidl compiler frontend
//!
//! This module contains all frontend components:
//! - `lexer`, `parser`, `ast`, `diagnostics`: the syntax layer, from the `tidl_syntax` crate
//! - `source`: package lookup and file IO behind the `SourceProvider` trait
//! - `driver`: the compile session (package cache, import cycles, linking)
//! - `linker`: type resolution, attribute validation and contract flattening
//! - `reflect`: queries over linked trees for code generators

// Syntax components are provided by the shared tidl_syntax crate.
pub use tidl_syntax::{ast, diagnostics, lexer, parser};

pub mod driver;
pub mod linker;
pub mod reflect;
pub mod source;
