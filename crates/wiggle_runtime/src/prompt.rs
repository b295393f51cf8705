//! Stand-in for a file picker when a path is not given on the command line

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Ask for a path on stdin; `None` if the answer is empty or stdin is closed
pub fn prompt_path(label: &str) -> Option<PathBuf> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    match read_path(&mut stdin.lock(), &mut stderr, label) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Could not read path from stdin: {}", e);
            None
        }
    }
}

pub fn read_path(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> io::Result<Option<PathBuf>> {
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}
