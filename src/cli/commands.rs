//! CLI command implementations
//!
//! Commands open the relation, do their work through the library
//! subsystems, and log lifecycle events. `select` logs to stderr so its
//! stdout stays a clean tuple stream.

use std::io::Write;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hashing::to_binary;
use crate::observability::{log_event, log_event_stderr, Event};
use crate::query::Scan;
use crate::relation::Relation;
use crate::tuple::Tuple;

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_tuple_lines, write_tuple};

/// Parses arguments and dispatches to the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Dispatches one already-parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Create {
            dir,
            name,
            nattrs,
            npages,
            chvec,
        } => create(&dir, &name, nattrs, npages, chvec.as_deref()),
        Command::Insert { dir } => insert(&dir),
        Command::Select { dir, query } => select(&dir, &query),
        Command::Stats { dir } => stats(&dir),
        Command::Gen {
            nattrs,
            count,
            seed,
        } => gen_tuples(nattrs, count, seed),
    }
}

/// Create a new relation.
pub fn create(
    dir: &Path,
    name: &str,
    nattrs: usize,
    npages: u32,
    chvec: Option<&str>,
) -> CliResult<()> {
    log_event(
        Event::RelnCreateStart,
        &[("dir", &dir.display().to_string()), ("name", name)],
    );
    let reln = Relation::create(dir, name, nattrs, npages, chvec)?;
    log_event(
        Event::RelnCreateComplete,
        &[
            ("chvec", &reln.chvec().to_string()),
            ("depth", &reln.depth().to_string()),
            ("npages", &reln.npages().to_string()),
            ("split_every", &reln.split_every().to_string()),
        ],
    );
    Ok(())
}

/// Insert tuples read from stdin, one per line.
pub fn insert(dir: &Path) -> CliResult<()> {
    let mut reln = Relation::open(dir)?;
    log_event(
        Event::InsertBatchStart,
        &[("dir", &dir.display().to_string()), ("name", reln.name())],
    );
    let mut count: u64 = 0;
    for line in read_tuple_lines() {
        let tuple = Tuple::parse(&line?, reln.nattrs())?;
        reln.insert(&tuple)?;
        count += 1;
    }
    log_event(
        Event::InsertBatchComplete,
        &[
            ("count", &count.to_string()),
            ("depth", &reln.depth().to_string()),
            ("npages", &reln.npages().to_string()),
            ("ntuples", &reln.ntuples().to_string()),
        ],
    );
    Ok(())
}

/// Run a partial-match query, printing matching tuples to stdout.
pub fn select(dir: &Path, query: &str) -> CliResult<()> {
    let reln = Relation::open(dir)?;
    let mut scan = Scan::start(&reln, query)?;
    log_event_stderr(
        Event::ScanStart,
        &[
            ("name", reln.name()),
            ("query", query),
            ("known_bits", &to_binary(scan.known_bits())),
            ("unknown_mask", &to_binary(scan.unknown_mask())),
        ],
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut returned: u64 = 0;
    while let Some(tuple) = scan.next_tuple()? {
        write_tuple(&mut out, &tuple)?;
        returned += 1;
    }
    out.flush().map_err(super::errors::CliError::from)?;

    log_event_stderr(
        Event::ScanComplete,
        &[
            ("buckets_visited", &scan.buckets_visited().to_string()),
            ("tuples", &returned.to_string()),
        ],
    );
    Ok(())
}

/// Print relation parameters and the per-bucket tuple distribution.
pub fn stats(dir: &Path) -> CliResult<()> {
    let reln = Relation::open(dir)?;
    println!("relation   {}", reln.name());
    println!("nattrs     {}", reln.nattrs());
    println!("depth      {}", reln.depth());
    println!("splitp     {}", reln.splitp());
    println!("npages     {}", reln.npages());
    println!("novflow    {}", reln.novflow_pages());
    println!("ntuples    {}", reln.ntuples());
    println!("chvec      {}", reln.chvec());
    println!();

    // One line per bucket: tuple counts along the chain, primary first.
    let width = (reln.depth() + 1) as usize;
    for bucket in 0..reln.npages() {
        let mut counts = Vec::new();
        let mut page = reln.data_page(bucket)?;
        loop {
            counts.push(page.ntuples().to_string());
            match page.ovflow() {
                Some(ov) => page = reln.ovflow_page(ov)?,
                None => break,
            }
        }
        println!(
            "bucket {:>6} [{:0>width$b}]  {}",
            bucket,
            bucket,
            counts.join(" -> "),
            width = width
        );
    }
    Ok(())
}

/// Generate random tuple lines on stdout.
pub fn gen_tuples(nattrs: usize, count: u64, seed: Option<u64>) -> CliResult<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for _ in 0..count {
        let values: Vec<String> = (0..nattrs)
            .map(|att| {
                let letter = (b'a' + (att % 26) as u8) as char;
                format!("{}{}", letter, rng.gen_range(0..10_000))
            })
            .collect();
        writeln!(out, "{}", values.join(",")).map_err(super::errors::CliError::from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_stats_succeeds() {
        let dir = TempDir::new().unwrap();
        let reln_dir = dir.path().join("people");
        create(&reln_dir, "people", 2, 4, Some("0,0:1,0")).unwrap();
        stats(&reln_dir).unwrap();
    }

    #[test]
    fn test_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        let reln_dir = dir.path().join("people");
        create(&reln_dir, "people", 2, 4, None).unwrap();
        let err = create(&reln_dir, "people", 2, 4, None).unwrap_err();
        assert!(format!("{}", err).contains("MAH_RELN_EXISTS"));
    }

    #[test]
    fn test_select_on_missing_relation_fails() {
        let dir = TempDir::new().unwrap();
        let err = select(&dir.path().join("absent"), "?,?").unwrap_err();
        assert!(format!("{}", err).contains("MAH_RELN_NOT_FOUND"));
    }
}
