//! Coverage reporting services.
//!
//! Neither service needs a configuration file; a custom one is rendered into
//! the package when given.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::json;

use super::{missing_file, read_template, GenerationContext};
use crate::error::Result;

pub const CODECOV_BADGES: [&str; 1] = [
    "[![Codecov](https://codecov.io/gh/{{USER}}/{{PKGNAME}}.jl/branch/master/graph/badge.svg)](https://codecov.io/gh/{{USER}}/{{PKGNAME}}.jl)",
];

pub const COVERALLS_BADGES: [&str; 1] = [
    "[![Coveralls](https://coveralls.io/repos/github/{{USER}}/{{PKGNAME}}.jl/badge.svg?branch=master)](https://coveralls.io/github/{{USER}}/{{PKGNAME}}.jl?branch=master)",
];

pub(crate) fn validate_config_file(config_file: &Option<PathBuf>) -> Result<()> {
    match config_file {
        Some(path) if !path.is_file() => Err(missing_file(path)),
        _ => Ok(()),
    }
}

fn generate_config_file(
    ctx: &GenerationContext<'_>,
    config_file: &Option<PathBuf>,
    dest: &str,
) -> Result<Vec<String>> {
    match config_file {
        Some(path) => {
            let template = read_template(path)?;
            Ok(vec![ctx.render_to(&template, dest, &json!({}))?])
        }
        None => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Codecov {
    pub config_file: Option<PathBuf>,
}

impl Codecov {
    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        generate_config_file(ctx, &self.config_file, ".codecov.yml")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Coveralls {
    pub config_file: Option<PathBuf>,
}

impl Coveralls {
    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        generate_config_file(ctx, &self.config_file, ".coveralls.yml")
    }
}
