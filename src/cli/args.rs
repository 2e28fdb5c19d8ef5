//! CLI argument definitions using clap
//!
//! Commands:
//! - mahdb create --dir <path> --name <name> --nattrs <n> --npages <n> [--chvec <spec>]
//! - mahdb insert --dir <path>            (tuples on stdin, one per line)
//! - mahdb select --dir <path> <query>    (matching tuples on stdout)
//! - mahdb stats --dir <path>
//! - mahdb gen --nattrs <n> --count <n> [--seed <n>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mahdb - a multi-attribute linear-hashed file store
#[derive(Parser, Debug)]
#[command(name = "mahdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new relation
    Create {
        /// Directory to hold the relation
        #[arg(long)]
        dir: PathBuf,

        /// Relation name
        #[arg(long)]
        name: String,

        /// Number of attributes per tuple
        #[arg(long)]
        nattrs: usize,

        /// Initial bucket count (a power of two)
        #[arg(long, default_value_t = 1)]
        npages: u32,

        /// Choice vector description, e.g. "0,0:1,0:0,1"
        #[arg(long)]
        chvec: Option<String>,
    },

    /// Insert tuples read from stdin, one per line
    Insert {
        /// Relation directory
        #[arg(long)]
        dir: PathBuf,
    },

    /// Run a partial-match query, e.g. "1234,?,abc"
    Select {
        /// Relation directory
        #[arg(long)]
        dir: PathBuf,

        /// The query: one value per attribute, ? for any
        query: String,
    },

    /// Print relation parameters and the tuple distribution
    Stats {
        /// Relation directory
        #[arg(long)]
        dir: PathBuf,
    },

    /// Generate random tuple lines for fixture construction
    Gen {
        /// Number of attributes per tuple
        #[arg(long)]
        nattrs: usize,

        /// Number of tuples to generate
        #[arg(long)]
        count: u64,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
