use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{missing_file, read_template, GenerationContext};
use crate::error::{Error, Result};

/// Relative, naming a file and without `..`, so joining it onto the package
/// directory cannot leave it.
fn is_inside_package(dest: &Path) -> bool {
    dest.components().any(|c| matches!(c, Component::Normal(_)))
        && dest.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// A user-defined plugin. Its name is its kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomPlugin {
    pub name: String,
    #[serde(default)]
    pub gitignore: Vec<String>,
    /// Template rendered into the package at `dest`.
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub dest: Option<String>,
    /// Badge templates; `USER`, `PKGNAME` and `view` are available.
    #[serde(default)]
    pub badges: Vec<String>,
    /// Extra keys for the plugin's templates.
    #[serde(default)]
    pub view: Map<String, Value>,
}

impl CustomPlugin {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError("custom plugins need a name".to_string()));
        }
        match (&self.source, &self.dest) {
            (Some(source), _) if !source.is_file() => Err(missing_file(source)),
            (Some(_), None) => Err(Error::ValidationError(format!(
                "custom plugin '{}' has a source but no dest",
                self.name
            ))),
            (_, Some(dest)) if !is_inside_package(Path::new(dest)) => {
                Err(Error::ValidationError(format!(
                    "custom plugin '{}' dest '{}' must be a relative path inside the package",
                    self.name, dest
                )))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        match (&self.source, &self.dest) {
            (Some(source), Some(dest)) => {
                let template = read_template(source)?;
                Ok(vec![ctx.render_to(&template, dest, &Value::Object(self.view.clone()))?])
            }
            _ => Ok(Vec::new()),
        }
    }
}
