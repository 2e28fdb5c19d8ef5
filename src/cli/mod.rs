//! CLI module for mahdb
//!
//! Provides the command-line interface:
//! - create: make a new relation directory
//! - insert: add tuples read from stdin
//! - select: run a partial-match query
//! - stats: show parameters and tuple distribution
//! - gen: emit random tuple lines for fixtures

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{create, gen_tuples, insert, run, run_command, select, stats};
pub use errors::{CliError, CliResult};
pub use io::{read_tuple_lines, write_tuple};
