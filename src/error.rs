//! Error handling for pkgbaker.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while generating a package.
///
/// Every variant that touches the filesystem or git carries the path or the
/// operation that failed, so a user can tell where generation stopped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Failed to write '{path}'. Original error: {source}")]
    WriteError {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move '{from}' to '{to}'. Original error: {source}")]
    MoveError {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    #[error("Git operation '{operation}' failed. Original error: {source}")]
    GitError {
        operation: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Malformed placeholder or section syntax.
    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Cannot proceed: output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error("Unknown license '{license}'. Available licenses: {available}.")]
    UnknownLicenseError { license: String, available: String },

    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Failed to parse config file '{path}'. Original error: {reason}")]
    ConfigParseError { path: String, reason: String },

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}.")]
    ValidationError(String),

    #[error("Invalid version '{version}'.")]
    VersionParseError { version: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Wraps a `git2` error with the name of the operation that produced it.
pub(crate) fn git_error(operation: &'static str) -> impl FnOnce(git2::Error) -> Error {
    move |source| Error::GitError { operation, source }
}

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
