use super::count::count_rows;
use super::header::{validate_header, EXPECTED_COLUMNS};
use super::lines::{is_blank, LineTracker};
use super::row::parse_row;
use crate::config::DEFAULT_PROGRESS_INTERVAL;
use crate::error::{ImportError, Result};
use crate::progress::ProgressReporter;
use crate::store::{ConceptRepository, ConceptStore, UnitOfWork};
use csv::{Reader, ReaderBuilder, StringRecord, Terminator};
use indicatif::HumanCount;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const PROGRESS_PREFIX: &str = "Importing OMOP CONCEPTS: ";

/// Result of one successful import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub path: PathBuf,
    /// Data rows according to the line count
    pub total_rows: u64,
    pub created: u64,
    pub updated: u64,
    pub elapsed_ms: u64,
}

impl ImportSummary {
    /// Rows written, `created + updated`
    pub fn processed(&self) -> u64 {
        self.created + self.updated
    }
}

/// CONCEPT.csv を1トランザクションでストアへ upsert する
///
/// ヘッダー不一致はトランザクション開始前に検出する。
/// 行の不正・日付不正・ストアエラーのいずれかが起きた時点で中断し、
/// それまでの書き込みは全てロールバックされる。
pub struct ConceptImporter<'a> {
    store: &'a mut dyn ConceptStore,
    progress: &'a mut dyn ProgressReporter,
    progress_interval: usize,
}

impl<'a> ConceptImporter<'a> {
    pub fn new(store: &'a mut dyn ConceptStore, progress: &'a mut dyn ProgressReporter) -> Self {
        Self {
            store,
            progress,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Report progress every `interval` rows (minimum 1)
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn run(&mut self, path: &Path) -> Result<ImportSummary> {
        let started = Instant::now();

        let total_rows = count_rows(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), total_rows, "counted data rows");

        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // 改行は LF のみを終端とし、CRLF の \r はフィールド末尾に残る（trim で除去）
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_reader(BufReader::new(file));
        let mut lines = LineTracker::default();

        let mut header = StringRecord::new();
        let start = reader.position().line();
        if reader.read_record(&mut header)?
            && lines.track(start, reader.position().line(), &header).is_some()
        {
            // 先頭の空行がヘッダー行として扱われる
            header.clear();
        }
        validate_header(
            header.iter().map(|column| column.trim_end_matches('\r')),
            &EXPECTED_COLUMNS,
        )?;
        debug!("header matches CONCEPT columns");

        let mut unit = self.store.begin()?;
        debug!("transaction started");

        let rows = RowLoop {
            progress: &mut *self.progress,
            interval: self.progress_interval,
            total_rows,
            lines,
        };
        let outcome = rows.run(&mut reader, unit.as_mut());
        self.progress.finish();

        let (created, updated) = match outcome {
            Ok(counts) => counts,
            Err(err) => {
                warn!(error = %err, "import failed, rolling back");
                drop(unit);
                return Err(err);
            }
        };

        unit.commit()?;
        info!(created, updated, "transaction committed");

        Ok(ImportSummary {
            path: path.to_path_buf(),
            total_rows,
            created,
            updated,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

struct RowLoop<'p> {
    progress: &'p mut dyn ProgressReporter,
    interval: usize,
    total_rows: u64,
    lines: LineTracker,
}

impl RowLoop<'_> {
    fn run(
        mut self,
        reader: &mut Reader<BufReader<File>>,
        unit: &mut dyn UnitOfWork,
    ) -> Result<(u64, u64)> {
        let mut created = 0u64;
        let mut updated = 0u64;
        let mut record = StringRecord::new();
        let mut index = 0usize;

        loop {
            let start = reader.position().line();
            if !reader.read_record(&mut record)? {
                break;
            }
            let line = line_of(&record, index);

            if let Some(blank) = self.lines.track(start, reader.position().line(), &record) {
                return Err(blank_row(blank));
            }
            if is_blank(&record) {
                return Err(blank_row(line));
            }

            let concept = parse_row(&record, line)?;
            let (_, was_created) = unit.upsert(concept)?;
            if was_created {
                created += 1;
            } else {
                updated += 1;
            }

            if index % self.interval == 0 {
                let current = index as u64;
                let suffix = format!(
                    "{}/{}",
                    HumanCount(current),
                    HumanCount(self.total_rows)
                );
                self.progress
                    .report(current, self.total_rows, PROGRESS_PREFIX, &suffix);
            }
            index += 1;
        }

        // ヘッダー行を含む物理行数
        let physical_lines = self.total_rows + 1;
        if let Some(blank) = self.lines.finish(reader.position().line(), physical_lines) {
            return Err(blank_row(blank));
        }

        Ok((created, updated))
    }
}

fn blank_row(line: u64) -> ImportError {
    ImportError::MalformedRow {
        line,
        expected: EXPECTED_COLUMNS.len(),
        found: 0,
    }
}

/// 1-based file line of a data record; the header is line 1.
fn line_of(record: &StringRecord, index: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(index as u64 + 2)
}

#[cfg(test)]
#[path = "importer_test.rs"]
mod tests;
