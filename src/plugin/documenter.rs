//! Documentation built with Documenter.jl, optionally published to GitHub Pages.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;

use super::{missing_file, GenerationContext};
use crate::error::{Error, Result};
use crate::ioutils::copy_file;

const MAKE_TEMPLATE: &str = include_str!("../../templates/docs/make.jl");
const INDEX_TEMPLATE: &str = include_str!("../../templates/docs/index.md");

pub const DOCS_IGNORE: [&str; 2] = ["/docs/build/", "/docs/site/"];

pub const BADGES: [&str; 2] = [
    "[![Stable](https://img.shields.io/badge/docs-stable-blue.svg)](https://{{USER}}.github.io/{{PKGNAME}}.jl/stable)",
    "[![Dev](https://img.shields.io/badge/docs-dev-blue.svg)](https://{{USER}}.github.io/{{PKGNAME}}.jl/dev)",
];

/// Local documentation: `docs/make.jl` and `docs/src/index.md`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Documenter {
    /// Files copied to `docs/src/assets` and listed in `makedocs`.
    pub assets: Vec<PathBuf>,
}

/// Documentation deployed to a `gh-pages` branch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubPages {
    pub assets: Vec<PathBuf>,
}

pub(crate) fn validate_assets(assets: &[PathBuf]) -> Result<()> {
    match assets.iter().find(|asset| !asset.is_file()) {
        Some(asset) => Err(missing_file(asset)),
        None => Ok(()),
    }
}

fn asset_name(asset: &Path) -> Result<&str> {
    asset.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        Error::ValidationError(format!("invalid asset path '{}'", asset.display()))
    })
}

pub(crate) fn generate_docs(
    ctx: &GenerationContext<'_>,
    assets: &[PathBuf],
    deploy: bool,
) -> Result<Vec<String>> {
    let names = assets.iter().map(|asset| asset_name(asset)).collect::<Result<Vec<_>>>()?;
    let asset_lines: Vec<String> =
        names.iter().map(|name| format!("        \"assets/{name}\",")).collect();

    let view = json!({
        "HOST": ctx.config.host,
        "AUTHORS": ctx.config.authors,
        "ASSETS": asset_lines.join("\n"),
        "DEPLOY": deploy,
    });
    let mut files = vec![
        ctx.render_to(MAKE_TEMPLATE, "docs/make.jl", &view)?,
        ctx.render_to(INDEX_TEMPLATE, "docs/src/index.md", &view)?,
    ];

    for (asset, name) in assets.iter().zip(names) {
        let dest = format!("docs/src/assets/{name}");
        copy_file(asset, ctx.pkg_dir.join(&dest))?;
        files.push(dest);
    }

    Ok(files)
}
