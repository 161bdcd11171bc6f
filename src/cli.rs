//! Command-line interface implementation for pkgbaker.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for pkgbaker.
#[derive(Parser, Debug)]
#[command(author, version, about = "pkgbaker: Julia package scaffolding tool", long_about = None)]
pub struct Args {
    /// Name of the package to generate, with or without the .jl suffix
    #[arg(value_name = "PKG_NAME")]
    pub pkg_name: String,

    /// Configuration file (JSON or YAML). Defaults to pkgbaker.{json,yml,yaml}
    /// in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the package is created in, overriding the configured one
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Force overwrite of an existing package directory
    #[arg(short, long)]
    pub force: bool,

    /// Record an SSH remote instead of an HTTPS one
    #[arg(long)]
    pub ssh: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
