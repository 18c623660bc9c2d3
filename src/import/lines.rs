//! Blank line detection.
//!
//! The csv reader skips empty lines without yielding a record. A blank line
//! in CONCEPT.csv is a row with no fields, so the importer recovers the
//! skipped lines from the reader's line counter: each record accounts for
//! its own terminator plus the newlines inside its quoted fields, and any
//! extra line consumed by the read was a blank one.

use csv::StringRecord;

/// Line accounting for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    /// Reader line before the read
    start: u64,
    /// Reader line after the read
    end: u64,
    /// Newlines inside quoted fields
    embedded: u64,
}

#[derive(Debug, Default)]
pub struct LineTracker {
    last: Option<Span>,
}

impl LineTracker {
    /// Account for a record read between reader lines `start` and `end`.
    ///
    /// Returns the line of the first blank line skipped before the record.
    /// Blank lines are skipped at the start of a read, so that is `start`.
    pub fn track(&mut self, start: u64, end: u64, record: &StringRecord) -> Option<u64> {
        let span = Span {
            start,
            end,
            embedded: embedded_newlines(record),
        };
        self.last = Some(span);

        (span.end - span.start > span.embedded + 1).then_some(span.start)
    }

    /// Check the tail of the file once the reader is exhausted.
    ///
    /// `end` is the reader line after EOF, `physical_lines` the number of
    /// lines in the file (a last line without a newline included).
    pub fn finish(&self, end: u64, physical_lines: u64) -> Option<u64> {
        let last = self.last?;

        // 最終行に改行がない: 最終レコードは自身の改行を消費していない
        if physical_lines == end {
            return (last.end - last.start > last.embedded).then_some(last.start);
        }

        (end > last.end).then_some(last.end)
    }
}

/// A CRLF blank line reaches the reader as a single `"\r"` field.
pub fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0) == Some("\r")
}

fn embedded_newlines(record: &StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.bytes().filter(|b| *b == b'\n').count() as u64)
        .sum()
}
