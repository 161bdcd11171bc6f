//! Configuration of package generation.
//! A [`TemplateConfig`] is built in code or loaded from a JSON/YAML file and is
//! read-only while a package is generated.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::Deserialize;

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::plugin::Plugins;
use crate::version::Version;

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "github.com".to_string()
}

fn current_year() -> String {
    chrono::Local::now().year().to_string()
}

/// Everything a generated package depends on besides its name.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Directory the package directory is created in.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Root of the scratch area. A fresh temporary directory is used when unset.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    #[serde(default = "default_host")]
    pub host: String,
    /// Account name on `host`.
    #[serde(default)]
    pub user: String,
    /// Applied to the generated repository's local git config, in order.
    #[serde(default)]
    pub git_config: IndexMap<String, String>,
    pub julia_version: Version,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Directory of license bodies used instead of the embedded ones.
    #[serde(default)]
    pub license_dir: Option<PathBuf>,
    #[serde(default = "current_year")]
    pub years: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub plugins: Plugins,
}

impl TemplateConfig {
    pub fn new<S: Into<String>>(user: S, julia_version: Version) -> Self {
        Self {
            dir: default_dir(),
            scratch_dir: None,
            host: default_host(),
            user: user.into(),
            git_config: IndexMap::new(),
            julia_version,
            requirements: Vec::new(),
            license: None,
            license_dir: None,
            years: current_year(),
            authors: String::new(),
            plugins: Plugins::default(),
        }
    }

    /// Requirements in their configured order with duplicates dropped.
    pub fn unique_requirements(&self) -> Vec<&str> {
        let mut seen = IndexSet::new();
        for requirement in &self.requirements {
            if !seen.insert(requirement.as_str()) {
                warn!("Requirement '{}' is listed more than once.", requirement);
            }
        }
        seen.into_iter().collect()
    }

    /// Fills `user` and `authors` from the global git config when they are empty.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no user is configured and `github.user` is unset
    pub fn fill_from_git_config(&mut self) -> Result<()> {
        if !self.user.is_empty() && !self.authors.is_empty() {
            return Ok(());
        }

        let git_config = match git2::Config::open_default() {
            Ok(config) => Some(config),
            Err(e) => {
                debug!("Global git config is unavailable: {}", e);
                None
            }
        };
        let lookup = |key: &str| git_config.as_ref().and_then(|c| c.get_string(key).ok());

        if self.user.is_empty() {
            self.user = lookup("github.user").ok_or_else(|| {
                Error::ConfigError(
                    "no user was provided and the git config key 'github.user' is not set"
                        .to_string(),
                )
            })?;
        }
        if self.authors.is_empty() {
            self.authors = lookup("user.name").unwrap_or_default();
        }
        Ok(())
    }
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigParseError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str, origin: &str) -> Result<TemplateConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(json_error) => {
            debug!("'{}' is not JSON ({}), trying YAML.", origin, json_error);
            serde_yaml::from_str(content).map_err(|e| Error::ConfigParseError {
                path: origin.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Loads a configuration file and fills missing identity fields from git.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TemplateConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let mut config = parse_config(&content, &path.display().to_string())?;
    config.fill_from_git_config()?;
    Ok(config)
}

/// Finds the first supported configuration file in `dir`.
///
/// # Errors
/// * `Error::ConfigError` if none of the supported file names exists
pub fn find_config<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    CONFIG_FILES
        .iter()
        .map(|file| dir.join(file))
        .find(|path| path.exists())
        .ok_or_else(|| {
            Error::ConfigError(format!(
                "No configuration file found in '{}' (tried: {})",
                dir.display(),
                CONFIG_FILES.join(", ")
            ))
        })
}
