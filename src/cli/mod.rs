//! CLI module for the BHS tooling
//!
//! This module provides the command-line interface over the analysis engine.
//!
//! ## Commands
//!
//! - `check <path>...` - Report diagnostics for files or directories of `.bhs` scripts
//! - `scopes <file>` - Print the scope tree with the symbols of each scope
//! - `visible <file> --offset N` - List the symbols visible at a byte offset
//! - `functions` - Summarize the function database
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::database::FUNCTIONS_ENV;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Analysis tooling for BHS scripts
#[derive(Parser, Debug)]
#[command(name = "bhs")]
#[command(version = VERSION)]
#[command(about = "Analysis tooling for BHS scripts", long_about = None)]
pub struct Cli {
    /// Function database (JSON)
    #[arg(long, global = true, value_name = "PATH", env = FUNCTIONS_ENV)]
    pub functions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report diagnostics
    Check {
        /// Script files, or directories to search for `.bhs` files
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the scope tree (debug)
    Scopes {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the symbols visible at a byte offset (debug)
    Visible {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Byte offset into the file
        #[arg(long)]
        offset: usize,
    },

    /// Summarize the function database given with --functions
    Functions {
        /// Only list functions whose label contains this text
        #[arg(value_name = "FILTER")]
        filter: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Check { paths, no_color } => commands::check_paths(&paths, !no_color),
        Command::Scopes { file } => commands::print_scopes(&file),
        Command::Visible { file, offset } => commands::print_visible(&file, offset),
        Command::Functions { filter } => commands::list_functions(cli.functions.as_deref(), filter.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================
