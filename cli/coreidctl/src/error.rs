//! Error handling and display for the CLI.

use colored::Colorize;
use coreid_id::IdError;
use coreid_issuer::{db::DbError, IssueError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("'{input}' is not a CORE ID: {reason}")]
    InvalidIdentifier {
        input: String,
        #[source]
        reason: IdError,
    },

    #[error("{}: {}", .0.user_message(), .0)]
    Issue(#[from] IssueError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::InvalidIdentifier { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: CORE IDs look like 04.3171.0008 (role.location.sequence).".yellow()
                );
            }
            CliError::Database(DbError::Connect(_))
            | CliError::Issue(IssueError::Store(DbError::Connect(_))) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check DATABASE_URL, or pass --in-memory for a throwaway store.".yellow()
                );
            }
            CliError::Database(DbError::MigrationDirNotFound { .. }) => {
                eprintln!(
                    "\n{}",
                    "Hint: Run from the repository root or libs/issuer.".yellow()
                );
            }
            CliError::Issue(IssueError::CalibrationConflict { .. }) => {
                eprintln!(
                    "\n{}",
                    "Hint: Resolve the clashing identifiers first, or narrow the run with --role."
                        .yellow()
                );
            }
            CliError::Issue(e) => {
                eprintln!("\nReason: {}", e.reason_code());
            }
            _ => {}
        }
    }
}
