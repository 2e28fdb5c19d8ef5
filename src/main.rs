//! mahdb CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch, print the failure to
//! stderr and exit non-zero. All logic lives in the cli module.

use mahdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
