//! Package driver: loads, parses and links packages on demand.
//!
//! A [`Compiler`] is one compile session. It owns the node arena, the cache of linked packages
//! and the stack of packages currently loading, and it is the [`ParseHost`] of every parser it
//! starts, so an `import` compiles the imported package to completion before parsing continues.
//!
//! ## Notes
//! - A package is cached only after it linked successfully; a failed compile leaves the cache
//!   untouched and the package can be retried.
//! - A failed compile releases the nodes it allocated, unless a dependency it imported linked
//!   and was cached meanwhile; those dependency nodes sit after the failed package's own and
//!   are kept.
//! - The built-in package falls back to the copy embedded in the compiler when the provider has
//!   no directory for it.
//!
//! ## Examples
//! ```rust
//! use tidl::frontend::driver::Compiler;
//! use tidl::frontend::source::InMemoryProvider;
//!
//! let provider = InMemoryProvider::new().with_file("shop/order.tidl", "table Order { id uint64; }");
//! let mut compiler = Compiler::new(provider);
//! compiler.compile("shop").unwrap();
//! assert!(compiler.type_of("shop", "Order").is_ok());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tidl_core::lang::builtins;

use crate::frontend::ast::{Ast, NodeId, Position, Visitor};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::linker;
use crate::frontend::parser::{self, ParseHost};
use crate::frontend::source::SourceProvider;

/// Where the scripts of a package come from.
enum Sources {
    Files(Vec<PathBuf>),
    Prelude,
}

/// One compile session.
pub struct Compiler {
    ast: Ast,
    provider: Box<dyn SourceProvider + Send>,
    /// Linked packages by name.
    loaded: BTreeMap<String, NodeId>,
    /// Packages being compiled, outermost first.
    loading: Vec<(String, NodeId)>,
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("nodes", &self.ast.len())
            .field("loaded", &self.loaded)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl Compiler {
    pub fn new(provider: impl SourceProvider + Send + 'static) -> Self {
        Self {
            ast: Ast::new(),
            provider: Box::new(provider),
            loaded: BTreeMap::new(),
            loading: Vec::new(),
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    #[cfg(test)]
    pub(crate) fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Compile the package `name` (an import path such as `shop/orders`) and everything it
    /// imports; returns the cached package when it was compiled before.
    ///
    /// ## Errors
    /// The first lexer, parse, link or driver error; the package is not cached.
    #[tracing::instrument(skip(self))]
    pub fn compile(&mut self, name: &str) -> Result<NodeId, CompileError> {
        self.compile_at(name, &Position::default())
    }

    /// Linked package by name.
    pub fn package(&self, name: &str) -> Option<NodeId> {
        self.loaded.get(name).copied()
    }

    /// Linked packages, sorted by name.
    pub fn packages(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.loaded.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// Top-level type `name` of the linked package `package`.
    ///
    /// ## Errors
    /// - `UnknownPackage` if the package has not been compiled.
    /// - `UnknownType` if it declares no such type.
    pub fn type_of(&self, package: &str, name: &str) -> Result<NodeId, CompileError> {
        let id = self.package(package).ok_or_else(|| errors::unknown_package(package))?;
        self.ast
            .as_package(id)
            .and_then(|p| p.types.get(name))
            .copied()
            .ok_or_else(|| errors::unknown_package_type(package, name))
    }

    /// Walk every linked package with `visitor`, in package-name order.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for &package in self.loaded.values() {
            self.ast.walk(package, visitor);
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    fn compile_at(&mut self, name: &str, position: &Position) -> Result<NodeId, CompileError> {
        if let Some(package) = self.package(name) {
            return Ok(package);
        }
        if let Some(start) = self.loading.iter().position(|(loading, _)| loading == name) {
            let chain: Vec<String> = self.loading[start..]
                .iter()
                .map(|(loading, _)| loading.clone())
                .chain(std::iter::once(name.to_string()))
                .collect();
            return Err(errors::circular_import(position.clone(), &chain));
        }

        let sources = self.locate(name).map_err(|err| at(err, position))?;
        let mark = self.ast.len();
        let cached = self.loaded.len();
        let package = self.ast.new_package(name);
        self.loading.push((name.to_string(), package));
        let result = self.load(name, package, sources);
        self.loading.pop();
        if let Err(err) = result {
            if self.loaded.len() == cached {
                self.ast.truncate(mark);
            }
            return Err(err);
        }

        self.loaded.insert(name.to_string(), package);
        tracing::debug!(package = name, "package linked");
        Ok(package)
    }

    fn locate(&self, name: &str) -> Result<Sources, CompileError> {
        let mut dirs = self.provider.find_package(name);
        match dirs.len() {
            0 if name == builtins::PACKAGE => {
                tracing::debug!("using embedded built-in package");
                Ok(Sources::Prelude)
            }
            0 => Err(errors::package_not_found(name)),
            1 => {
                let dir = dirs.remove(0);
                tracing::debug!(package = name, dir = %dir.display(), "located package");
                let files = self
                    .provider
                    .list_sources(&dir)
                    .map_err(|err| errors::io(&dir.display().to_string(), &err))?;
                Ok(Sources::Files(files))
            }
            _ => {
                let candidates: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
                Err(errors::ambiguous_package(name, &candidates))
            }
        }
    }

    fn load(&mut self, name: &str, package: NodeId, sources: Sources) -> Result<(), CompileError> {
        match sources {
            Sources::Prelude => {
                self.parse_file(package, builtins::PRELUDE_FILE, None, builtins::PRELUDE_SOURCE.as_bytes())?;
            }
            Sources::Files(files) => {
                for path in files {
                    let display = path.display().to_string();
                    let source = self.provider.read_source(&path).map_err(|err| errors::io(&display, &err))?;
                    let file_name = path
                        .file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or(display);
                    self.parse_file(package, &file_name, Some(path), &source)?;
                }
            }
        }

        let builtin = if name == builtins::PACKAGE {
            Some(package)
        } else {
            self.package(builtins::PACKAGE)
        };
        linker::link(&mut self.ast, package, builtin)
    }

    fn parse_file(
        &mut self,
        package: NodeId,
        name: &str,
        path: Option<PathBuf>,
        source: &[u8],
    ) -> Result<(), CompileError> {
        let script = self
            .ast
            .new_script(package, name, path)
            .map_err(|_| errors::duplicate_script(name))?;
        tracing::debug!(script = name, bytes = source.len(), "parsing script");
        parser::parse_script(self, script, source)
    }
}

impl ParseHost for Compiler {
    fn ast(&mut self) -> &mut Ast {
        &mut self.ast
    }

    fn import_package(&mut self, path: &str, position: &Position) -> Result<NodeId, CompileError> {
        self.compile_at(path, position)
    }
}

/// Point a position-less driver error at the import that triggered it.
fn at(mut err: CompileError, position: &Position) -> CompileError {
    if !err.position.is_valid() && position.is_valid() {
        err.position = position.clone();
    }
    err
}

// ============================================================================
// Shared access
// ============================================================================

/// A [`Compiler`] shared between threads.
///
/// Every call holds the lock for its whole duration, so a package is never compiled by two
/// threads at once and the cache and loading stack are never observed half-updated.
#[derive(Clone)]
pub struct SharedCompiler(Arc<Mutex<Compiler>>);

impl SharedCompiler {
    pub fn new(compiler: Compiler) -> Self {
        Self(Arc::new(Mutex::new(compiler)))
    }

    pub fn compile(&self, name: &str) -> Result<NodeId, CompileError> {
        self.lock().compile(name)
    }

    /// Run `f` with shared access to the session, e.g. to query or visit linked packages.
    pub fn with<R>(&self, f: impl FnOnce(&Compiler) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Compiler> {
        // Packages enter the cache only once linked, so a poisoned session is still consistent.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
