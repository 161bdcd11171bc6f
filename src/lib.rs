//! pkgbaker generates Julia packages as ready-to-push git repositories.
//! It writes the package skeleton, commits it, records a remote and lets
//! plugins contribute CI configuration, documentation and README badges.

/// Command-line interface module for the pkgbaker application
pub mod cli;

/// Configuration handling, from code or JSON/YAML files
pub mod config;

/// Common constants: file names, branch names, commit messages
pub mod constants;

/// Error types and handling for the pkgbaker application
pub mod error;

/// End-to-end package generation
pub mod generate;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// License bodies for the generated LICENSE file
pub mod license;

/// Plugins contributing files, .gitignore patterns and badges
pub mod plugin;

/// Mustache-style template substitution
pub mod renderer;

/// Git repository construction
pub mod repository;

/// Julia versions and the REQUIRE version floor
pub mod version;
