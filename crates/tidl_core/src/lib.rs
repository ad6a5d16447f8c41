//! Provide the canonical language vocabulary for the tidl schema compiler.
//!
//! This crate is intentionally small and dependency-free. It answers "what words does the language
//! reserve" and "what does the built-in package declare" for every other crate in the workspace.
//!
//! ## Notes
//!
//! - This is a vocabulary crate: **no IO**, no global state, and no AST types.
//! - The embedded built-in package source lives here so the syntax crate and the driver agree on
//!   the names it declares.

pub mod lang;
