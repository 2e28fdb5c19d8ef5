//! Line-oriented tuple I/O for the CLI
//!
//! The data plane is plain text: one tuple per line, comma-separated.
//! Blank lines are skipped so generated fixtures can be piped in directly.

use std::io::{self, BufRead, Write};

use crate::tuple::Tuple;

use super::errors::{CliError, CliResult};

/// Reads tuple lines from stdin, trimmed, skipping blanks.
pub fn read_tuple_lines() -> impl Iterator<Item = CliResult<String>> {
    io::stdin().lock().lines().filter_map(|line| match line {
        Ok(line) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Ok(trimmed.to_string()))
            }
        }
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Writes one tuple line.
pub fn write_tuple<W: Write>(out: &mut W, tuple: &Tuple) -> CliResult<()> {
    writeln!(out, "{}", tuple).map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tuple_is_text_form() {
        let tuple = Tuple::parse("5,abc", 2).unwrap();
        let mut buf = Vec::new();
        write_tuple(&mut buf, &tuple).unwrap();
        assert_eq!(buf, b"5,abc\n");
    }
}
