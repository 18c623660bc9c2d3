use clap::{Parser, Subcommand};

use crate::commands::import_concepts;

#[derive(Debug, Parser)]
#[command(name = "omop-import")]
#[command(about = "OMOP vocabulary importer", long_about = None)]
pub struct Cli {
    /// Show cause, remediation and source chain for errors
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// OMOP CONCEPT.csv をインポート
    ImportConcepts(import_concepts::Args),
}
