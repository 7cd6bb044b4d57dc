//! Error types for exportfs command construction and execution

use thiserror::Error;

/// Errors raised while building, parsing or running exportfs command lines.
#[derive(Error, Debug)]
pub enum ExportfsError {
    /// The runner was handed a command line without any tokens
    #[error("empty command line")]
    EmptyCommandLine,
    /// The process could not be started at all
    #[error("command `{command}` could not be started: {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// The underlying spawn error
        #[source]
        source: std::io::Error,
    },
    /// The process ran but exited unsuccessfully
    #[error("command `{command}` failed ({}): {output}", status_text(.status))]
    CommandFailed {
        /// The command line that was attempted
        command: String,
        /// Exit code, `None` when terminated by a signal
        status: Option<i32>,
        /// Combined stdout and stderr
        output: String,
    },
    /// Both the plain and the elevated attempt failed
    #[error("command `{command}` failed with elevation as well: {output}")]
    EscalatedFailure {
        /// The elevated command line
        command: String,
        /// Combined output of the elevated attempt
        output: String,
    },
    /// Option keyword not in the catalog
    #[error("unknown export option: {keyword}")]
    UnknownOption {
        /// The unrecognised keyword
        keyword: String,
    },
    /// Option keyword known but its value is unusable
    #[error("invalid export option `{option}`: {reason}")]
    InvalidOption {
        /// The option text as given
        option: String,
        /// Why it was rejected
        reason: String,
    },
    /// Configuration rejected
    #[error("configuration error: {reason}")]
    Config {
        /// The configuration problem
        reason: String,
    },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl ExportfsError {
    /// Output captured from the failing process, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExportfsError::CommandFailed { output, .. }
            | ExportfsError::EscalatedFailure { output, .. } => Some(output.as_str()),
            _ => None,
        }
    }
}

/// Result type alias using ExportfsError as the error type.
pub type Result<T> = std::result::Result<T, ExportfsError>;
