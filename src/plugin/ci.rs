//! Continuous integration services.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::json;

use super::{missing_file, read_template, GenerationContext};
use crate::error::Result;

const TRAVIS_TEMPLATE: &str = include_str!("../../templates/travis.yml");
const APPVEYOR_TEMPLATE: &str = include_str!("../../templates/appveyor.yml");
const GITLAB_TEMPLATE: &str = include_str!("../../templates/gitlab-ci.yml");

pub const TRAVIS_BADGES: [&str; 1] = [
    "[![Build Status](https://travis-ci.com/{{USER}}/{{PKGNAME}}.jl.svg?branch=master)](https://travis-ci.com/{{USER}}/{{PKGNAME}}.jl)",
];

pub const APPVEYOR_BADGES: [&str; 1] = [
    "[![Build Status](https://ci.appveyor.com/api/projects/status/github/{{USER}}/{{PKGNAME}}.jl?svg=true)](https://ci.appveyor.com/project/{{USER}}/{{PKGNAME}}-jl)",
];

/// Pipeline badge first; the coverage badge is only shown with coverage enabled.
pub const GITLAB_BADGES: [&str; 2] = [
    "[![Build Status](https://gitlab.com/{{USER}}/{{PKGNAME}}.jl/badges/master/pipeline.svg)](https://gitlab.com/{{USER}}/{{PKGNAME}}.jl/pipelines)",
    "[![Coverage](https://gitlab.com/{{USER}}/{{PKGNAME}}.jl/badges/master/coverage.svg)](https://gitlab.com/{{USER}}/{{PKGNAME}}.jl/commits/master)",
];

/// Where a CI plugin's configuration file comes from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFile {
    /// The template shipped with pkgbaker.
    #[default]
    Default,
    /// A template file of the user's.
    Custom(PathBuf),
    /// No configuration file is written.
    #[serde(alias = "none")]
    Disabled,
}

impl ConfigFile {
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            ConfigFile::Custom(path) if !path.is_file() => Err(missing_file(path)),
            _ => Ok(()),
        }
    }

    fn source(&self, default: &str) -> Result<Option<String>> {
        match self {
            ConfigFile::Default => Ok(Some(default.to_string())),
            ConfigFile::Custom(path) => read_template(path).map(Some),
            ConfigFile::Disabled => Ok(None),
        }
    }
}

fn generate_config_file(
    ctx: &GenerationContext<'_>,
    config_file: &ConfigFile,
    default: &str,
    dest: &str,
    extra: &serde_json::Value,
) -> Result<Vec<String>> {
    match config_file.source(default)? {
        Some(template) => Ok(vec![ctx.render_to(&template, dest, extra)?]),
        None => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TravisCi {
    pub config_file: ConfigFile,
}

impl TravisCi {
    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        generate_config_file(ctx, &self.config_file, TRAVIS_TEMPLATE, ".travis.yml", &json!({}))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppVeyor {
    pub config_file: ConfigFile,
}

impl AppVeyor {
    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        generate_config_file(
            ctx,
            &self.config_file,
            APPVEYOR_TEMPLATE,
            ".appveyor.yml",
            &json!({}),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabCi {
    pub config_file: ConfigFile,
    /// Report coverage from the test job.
    pub coverage: bool,
}

impl Default for GitLabCi {
    fn default() -> Self {
        Self { config_file: ConfigFile::default(), coverage: true }
    }
}

impl GitLabCi {
    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        generate_config_file(
            ctx,
            &self.config_file,
            GITLAB_TEMPLATE,
            ".gitlab-ci.yml",
            &json!({ "GITLABCOVERAGE": self.coverage }),
        )
    }
}
