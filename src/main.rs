//! pkgbaker's main application entry point.
//! Parses arguments, loads the configuration and generates the package.

use pkgbaker::{
    cli::{get_args, Args},
    config::{find_config, load_config},
    error::{default_error_handler, Result},
    generate::generate,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Locates and loads the configuration
/// 2. Applies command-line overrides
/// 3. Generates the package
fn run(args: Args) -> Result<()> {
    let config_path = match args.config {
        Some(path) => path,
        None => find_config(".")?,
    };
    let mut config = load_config(&config_path)?;
    if let Some(output_dir) = args.output_dir {
        config.dir = output_dir;
    }

    let generated = generate(&args.pkg_name, &config, args.force, args.ssh)?;

    for file in &generated.files {
        println!("Generated: '{}'", file);
    }
    if generated.multiple_branches {
        println!("Remember to push all created branches to your remote: git push --all");
    }
    println!("Package generation completed successfully in {}.", generated.path.display());
    Ok(())
}
