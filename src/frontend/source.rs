//! Source provider abstraction for package lookup.
//!
//! The driver never touches `std::fs` directly: a [`SourceProvider`] maps a package name to the
//! directories that could hold it, lists the `.tidl` files of a directory and reads them.
//!
//! ## Notes
//! - [`FileSystemProvider`] searches an ordered list of roots for `<root>/<package name>`.
//! - [`InMemoryProvider`] serves virtual paths, for tests and embedding without a filesystem.

use std::collections::BTreeMap;
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

use tidl_core::lang::builtins;

/// Environment variable holding extra search roots, in the platform path-list format.
pub const TIDL_PATH: &str = "TIDL_PATH";

/// File IO boundary of the driver.
pub trait SourceProvider {
    /// Every directory that could be the package `name` (import paths use `/` separators).
    ///
    /// The driver requires exactly one candidate.
    fn find_package(&self, name: &str) -> Vec<PathBuf>;

    /// Source files directly inside `dir` (non-recursive), sorted by path.
    fn list_sources(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>>;
}

fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == builtins::SOURCE_EXTENSION)
}

// ============================================================================
// Filesystem
// ============================================================================

/// Filesystem-backed provider searching an ordered list of roots.
#[derive(Debug, Clone, Default)]
pub struct FileSystemProvider {
    roots: Vec<PathBuf>,
}

impl FileSystemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a search root after the existing ones.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Provider searching every root listed in `TIDL_PATH`.
    pub fn from_env() -> Self {
        let mut provider = Self::new();
        if let Some(paths) = env::var_os(TIDL_PATH) {
            provider.roots.extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        provider
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl SourceProvider for FileSystemProvider {
    fn find_package(&self, name: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        for root in &self.roots {
            let candidate = root.join(name);
            if candidate.is_dir() && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        found
    }

    fn list_sources(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut sources = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_source_file(&path) {
                sources.push(path);
            }
        }
        sources.sort();
        Ok(sources)
    }

    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

// ============================================================================
// In memory
// ============================================================================

/// Provider over a fixed map of virtual paths to source text.
///
/// A package `a/b` lives in the virtual directory `a/b`; its scripts are the `.tidl` entries
/// directly below it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn with_file(mut self, path: impl AsRef<Path>, source: impl Into<Vec<u8>>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<Vec<u8>>) {
        self.files.insert(Self::normalize_path(path.as_ref()), source.into());
    }

    /// Resolve `.` and `..` without touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl SourceProvider for InMemoryProvider {
    fn find_package(&self, name: &str) -> Vec<PathBuf> {
        let dir = Self::normalize_path(Path::new(name));
        let exists = self.files.keys().any(|path| path.parent() == Some(dir.as_path()));
        if exists { vec![dir] } else { Vec::new() }
    }

    fn list_sources(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let dir = Self::normalize_path(dir);
        // BTreeMap keys are already sorted.
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir.as_path()) && is_source_file(path))
            .cloned()
            .collect())
    }

    fn read_source(&self, path: &Path) -> io::Result<Vec<u8>> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }
}
