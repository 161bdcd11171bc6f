//! Common constants used throughout pkgbaker.

/// Extension of Julia source files, also the suffix of package repositories.
pub const PKG_EXT: &str = ".jl";

/// Branch created by `git init` in the scratch repository.
pub const DEFAULT_BRANCH: &str = "master";

/// Branch that receives published documentation.
pub const PAGES_BRANCH: &str = "gh-pages";

pub const REMOTE_NAME: &str = "origin";

/// User part of SSH remotes.
pub const SSH_LOGIN: &str = "git";

pub const EMPTY_COMMIT_MESSAGE: &str = "Empty initial commit";

pub const FILES_COMMIT_MESSAGE: &str = "Files generated by pkgbaker";

/// Pattern every generated .gitignore starts with.
pub const BASE_IGNORE: &str = ".DS_Store";

pub const README_FILE: &str = "README.md";
pub const REQUIRE_FILE: &str = "REQUIRE";
pub const IGNORE_FILE: &str = ".gitignore";
pub const LICENSE_FILE: &str = "LICENSE";

/// Supported configuration file extensions, tried as JSON then YAML.
pub const CONFIG_FILES: [&str; 3] = ["pkgbaker.json", "pkgbaker.yml", "pkgbaker.yaml"];
