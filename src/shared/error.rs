use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - at least one statement matched the query
    Success = 0,
    /// The document contains no statement matching the query
    NoMatch = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (document parse error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::NoMatch => write!(f, "No Match (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for VEX document querying.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum VexError {
    #[error("VEX document not found: {path}\n\n💡 Hint: {suggestion}")]
    DocumentNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse VEX document: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file contains a valid OpenVEX document")]
    DocumentParseError { path: PathBuf, details: String },

    #[error("Failed to parse CSAF document: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file contains a valid CSAF advisory")]
    CsafParseError { path: PathBuf, details: String },

    #[error("Invalid image reference: {reference}\nReason: {reason}\n\n💡 Hint: {hint}")]
    InvalidImageReference {
        reference: String,
        reason: String,
        hint: String,
    },

    /// Validation error for query arguments and config values
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },
}
