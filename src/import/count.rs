use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Number of data rows: line count minus the header line.
pub fn count_rows(path: &Path) -> io::Result<u64> {
    let reader = BufReader::new(File::open(path)?);

    let mut lines = 0u64;
    for line in reader.split(b'\n') {
        line?;
        lines += 1;
    }

    Ok(lines.saturating_sub(1))
}
