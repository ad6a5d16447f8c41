//! Implementations of the CLI commands.

use std::path::PathBuf;

use crate::frontend::ast::{Ast, NodeId, NodeKind};
use crate::frontend::driver::Compiler;
use crate::frontend::reflect::TreePrinter;
use crate::frontend::source::FileSystemProvider;

use super::{CliError, CliResult, ExitCode};

/// Compile each package, print a summary line (and the tree with `dump`), report errors.
///
/// Every package is attempted even after an earlier one failed.
///
/// ## Errors
/// - A `--path` root that is not a directory is a usage error; nothing is compiled.
pub fn check(paths: &[PathBuf], dump: bool, packages: &[String]) -> CliResult<ExitCode> {
    let mut provider = FileSystemProvider::new();
    for path in paths {
        if !path.is_dir() {
            return Err(CliError::usage(format!("search path {} is not a directory", path.display())));
        }
        provider = provider.with_root(path);
    }
    for root in FileSystemProvider::from_env().roots() {
        provider = provider.with_root(root);
    }
    tracing::debug!(roots = ?provider.roots(), "package search path");

    let mut compiler = Compiler::new(provider);
    let mut failed = false;
    for name in packages {
        match compiler.compile(name) {
            Ok(package) => {
                println!("{}", summarize(compiler.ast(), package));
                if dump {
                    let mut printer = TreePrinter::new();
                    compiler.ast().walk(package, &mut printer);
                    print!("{}", printer.finish());
                }
            }
            Err(err) => {
                eprintln!("{:?}", miette::Report::new(err));
                failed = true;
            }
        }
    }
    Ok(if failed { ExitCode::COMPILE_FAILED } else { ExitCode::OK })
}

/// One-line description of a linked package.
pub fn summarize(ast: &Ast, package: NodeId) -> String {
    let Some(decl) = ast.as_package(package) else {
        return format!("{}: not a package", ast.name(package));
    };
    let (mut enums, mut tables, mut contracts) = (0, 0, 0);
    for &ty in decl.types.values() {
        match ast.kind(ty) {
            NodeKind::Enum(_) => enums += 1,
            NodeKind::Table(_) => tables += 1,
            NodeKind::Contract(_) => contracts += 1,
            _ => {}
        }
    }
    format!(
        "ok {}: {} script(s), {enums} enum(s), {tables} table(s), {contracts} contract(s)",
        ast.name(package),
        decl.scripts.len()
    )
}
