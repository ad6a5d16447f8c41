//! tidl language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`keywords::KeywordId`], [`builtins::AttrTargetId`]) and
//! look up spellings/metadata via registry tables instead of scattering string comparisons across
//! the compiler.
//!
//! ## Examples
//! ```rust
//! use tidl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("contract"), Some(KeywordId::Contract));
//! assert_eq!(keywords::as_str(KeywordId::Contract), "contract");
//! ```

pub mod builtins;
pub mod keywords;
