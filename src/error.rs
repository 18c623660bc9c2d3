pub mod code;
pub mod formatter;
pub mod rich;

pub use code::ErrorCode;
pub use formatter::ErrorFormatter;
pub use rich::{ErrorContext, RichError};

use crate::concept::DateParseError;
use crate::config::ConfigError;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// インポート処理の統一エラー型
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Header does not match the OMOP CONCEPT columns")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Row at line {line} has {found} fields, expected {expected}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {column} at line {line}: {source}")]
    DateParse {
        line: u64,
        column: &'static str,
        #[source]
        source: DateParseError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ImportError>;

impl ImportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ImportError::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::Io001,
                std::io::ErrorKind::PermissionDenied => ErrorCode::Io002,
                _ => ErrorCode::Io003,
            },
            ImportError::Csv(_) => ErrorCode::Csv004,
            ImportError::SchemaMismatch { .. } => ErrorCode::Csv001,
            ImportError::MalformedRow { .. } => ErrorCode::Csv002,
            ImportError::DateParse { .. } => ErrorCode::Csv003,
            ImportError::Store(StoreError::Sqlite(_)) => ErrorCode::Db001,
            ImportError::Store(_) => ErrorCode::Db002,
            ImportError::Config(ConfigError::InvalidValue { .. }) => ErrorCode::Cfg002,
            ImportError::Config(_) => ErrorCode::Cfg001,
        }
    }

    /// Converts into a RichError for CLI display, attaching the input path.
    pub fn into_rich(self, input: Option<PathBuf>) -> RichError {
        let code = self.code();
        let message = self.to_string();
        let mut context = ErrorContext::new();

        match &self {
            ImportError::Io { path, .. } => {
                context = context.with_file_path(path.clone());
            }
            ImportError::Csv(err) => {
                if let Some(position) = err.position() {
                    context = context.with_line(position.line());
                }
            }
            ImportError::SchemaMismatch { expected, actual } => {
                let missing: Vec<&str> = expected
                    .iter()
                    .filter(|c| !actual.contains(c))
                    .map(String::as_str)
                    .collect();
                let unexpected: Vec<&str> = actual
                    .iter()
                    .filter(|c| !expected.contains(c))
                    .map(String::as_str)
                    .collect();

                context = context
                    .with_line(1)
                    .with_additional("expected", expected.join(", "))
                    .with_additional("actual", actual.join(", "));
                if !missing.is_empty() {
                    context = context.with_additional("missing", missing.join(", "));
                }
                if !unexpected.is_empty() {
                    context = context.with_additional("unexpected", unexpected.join(", "));
                }
            }
            ImportError::MalformedRow { line, .. } => {
                context = context.with_line(*line);
            }
            ImportError::DateParse { line, column, .. } => {
                context = context.with_line(*line).with_additional("column", *column);
            }
            ImportError::Store(_) | ImportError::Config(_) => {}
        }

        if context.file_path.is_none() {
            if let (Some(path), true) = (input, self.refers_to_input()) {
                context = context.with_file_path(path);
            }
        }

        RichError::new(code, message)
            .with_context(context)
            .with_source(self)
    }

    fn refers_to_input(&self) -> bool {
        matches!(
            self,
            ImportError::Csv(_)
                | ImportError::SchemaMismatch { .. }
                | ImportError::MalformedRow { .. }
                | ImportError::DateParse { .. }
        )
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
