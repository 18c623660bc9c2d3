use crate::cli::Command;
use crate::error::RichError;

pub mod import_concepts;

pub fn dispatch(cli: crate::cli::Cli) -> Result<(), RichError> {
    match cli.command {
        Command::ImportConcepts(args) => import_concepts::run(args),
    }
}
