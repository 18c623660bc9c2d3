//! omop-import import-concepts コマンド
//!
//! Athena からエクスポートした CONCEPT.csv（タブ区切り）を
//! SQLite の concept テーブルへ upsert する。

use crate::config::{ConfigOverrides, ImportConfig};
use crate::error::{ErrorCode, ErrorContext, ImportError, RichError};
use crate::import::{ConceptImporter, ImportSummary};
use crate::output::{summary_json, CommandSummary};
use crate::progress::{BarProgress, ProgressReporter, SilentProgress};
use crate::store::SqliteConceptStore;
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(after_help = "CONFIGURATION:
  --database > OMOP_IMPORT_DATABASE > config file > omop.sqlite3
  OMOP_IMPORT_PROGRESS_INTERVAL > config file > 500

CONFIG FILE (TOML):
  database = \"vocab.sqlite3\"
  progress_interval = 500")]
pub struct Args {
    /// File path to CONCEPT.csv
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// SQLite database to import into
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn run(args: Args) -> Result<(), RichError> {
    // 1. パス未指定は何もせず終了
    let Some(path) = args.path.as_deref() else {
        println!("File path not specified.");
        return Ok(());
    };

    // 2. 設定解決
    let config = ImportConfig::resolve(&ConfigOverrides {
        database: args.database.clone(),
        config_file: args.config.clone(),
    })
    .map_err(|e| ImportError::from(e).into_rich(None))?;

    if !args.json {
        println!("Importing OMOP concepts from: {}", path.display());
    }

    // 3. インポート実行
    let summary = import(path, &config, !(args.json || args.no_progress))?;

    // 4. 結果表示
    if args.json {
        let json = summary_json(&summary).map_err(|e| RichError::new(ErrorCode::Int001, e))?;
        println!("{json}");
    } else {
        let use_color = std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
        let summary = CommandSummary::format(&summary, use_color);
        println!("{} {}", summary.prefix, summary.message);
    }

    Ok(())
}

fn import(path: &Path, config: &ImportConfig, show_progress: bool) -> Result<ImportSummary, RichError> {
    let mut store = open_store(&config.database)?;

    let mut bar = BarProgress::new();
    let mut silent = SilentProgress;
    let progress: &mut dyn ProgressReporter = if show_progress {
        &mut bar
    } else {
        &mut silent
    };

    ConceptImporter::new(&mut store, progress)
        .with_progress_interval(config.progress_interval)
        .run(path)
        .map_err(|e| e.into_rich(Some(path.to_path_buf())))
}

fn open_store(database: &Path) -> Result<SqliteConceptStore, RichError> {
    SqliteConceptStore::open(database).map_err(|e| {
        RichError::new(
            ErrorCode::Db001,
            format!("Failed to open database: {}", database.display()),
        )
        .with_context(ErrorContext::new().with_file_path(database))
        .with_source(e)
    })
}

#[cfg(test)]
#[path = "import_concepts_test.rs"]
mod tests;
