//! Command line interface of the `tidl` binary.
//!
//! ```text
//! tidl check [--path DIR]... [-v] [--dump] <PACKAGE>...
//! ```
//!
//! Commands report failure through [`CliResult`]; [`run`] is the one place that turns a result
//! into a process exit status.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::version::TIDL_VERSION;

/// Status a command asks the process to exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const OK: ExitCode = ExitCode(0);
    /// At least one package failed to compile.
    pub const COMPILE_FAILED: ExitCode = ExitCode(1);
    /// The command line itself was unusable.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// A command that could not run at all, as opposed to one that ran and found compile errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::USAGE,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// The tidl interface definition language compiler
#[derive(Parser, Debug)]
#[command(name = "tidl", version = TIDL_VERSION)]
#[command(about = "The tidl interface definition language compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile and link packages
    Check {
        /// Package search root, searched before the roots in TIDL_PATH (repeatable)
        #[arg(long = "path", value_name = "DIR")]
        paths: Vec<PathBuf>,
        /// Log compiler progress
        #[arg(short, long)]
        verbose: bool,
        /// Print the linked tree of every package
        #[arg(long)]
        dump: bool,
        /// Packages to compile, e.g. `shop/orders`
        #[arg(value_name = "PACKAGE", required = true)]
        packages: Vec<String>,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        let Command::Check { verbose, .. } = &self.command;
        *verbose
    }
}

/// Run the parsed command line and exit the process unless it succeeded.
pub fn run(cli: Cli) {
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code
        }
    };
    if code != ExitCode::OK {
        std::process::exit(code.0);
    }
}

fn dispatch(cli: Cli) -> CliResult<ExitCode> {
    let Command::Check {
        paths, dump, packages, ..
    } = cli.command;
    commands::check(&paths, dump, &packages)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from([
            "tidl", "check", "--path", "idl", "--path", "vendor", "--dump", "shop", "shop/orders",
        ])
        .unwrap();
        let Command::Check {
            paths,
            verbose,
            dump,
            packages,
        } = cli.command;
        assert_eq!(paths, [PathBuf::from("idl"), PathBuf::from("vendor")]);
        assert!(!verbose);
        assert!(dump);
        assert_eq!(packages, ["shop", "shop/orders"]);
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::try_parse_from(["tidl", "check", "-v", "shop"]).unwrap();
        assert!(cli.verbose());
    }

    #[test]
    fn test_cli_requires_a_package() {
        assert!(Cli::try_parse_from(["tidl", "check"]).is_err());
        assert!(Cli::try_parse_from(["tidl"]).is_err());
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = CliError::usage("bad root");
        assert_eq!(err.exit_code, ExitCode::USAGE);
        assert_eq!(err.to_string(), "bad root");
    }
}
