//! Plugins contribute files, .gitignore patterns and README badges to a package.
//!
//! The set of plugins is closed: every variant of [`Plugin`] is one kind, and a
//! [`Plugins`] registry holds at most one plugin per [`PluginKind`], in the order
//! they were configured. That order drives file hooks and ignore patterns; badges
//! follow [`BADGE_ORDER`] first.

use std::fmt;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::TemplateConfig;
use crate::constants::BASE_IGNORE;
use crate::error::{Error, Result};
use crate::ioutils::write_file;
use crate::renderer::TemplateRenderer;

pub mod ci;
pub mod coverage;
pub mod custom;
pub mod documenter;

pub use ci::{AppVeyor, ConfigFile, GitLabCi, TravisCi};
pub use coverage::{Codecov, Coveralls};
pub use custom::CustomPlugin;
pub use documenter::{Documenter, GitHubPages};

/// Patterns for coverage output written by `Pkg.test(coverage=true)`.
pub const COVERAGE_IGNORE: [&str; 3] = ["*.jl.cov", "*.jl.*.cov", "*.jl.mem"];

/// Identifies a plugin. The registry keeps at most one plugin per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Documenter,
    GitHubPages,
    TravisCi,
    AppVeyor,
    GitLabCi,
    Codecov,
    Coveralls,
    /// A user-defined plugin, identified by its name.
    Custom(String),
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Documenter => write!(f, "Documenter"),
            PluginKind::GitHubPages => write!(f, "GitHubPages"),
            PluginKind::TravisCi => write!(f, "TravisCI"),
            PluginKind::AppVeyor => write!(f, "AppVeyor"),
            PluginKind::GitLabCi => write!(f, "GitLabCI"),
            PluginKind::Codecov => write!(f, "Codecov"),
            PluginKind::Coveralls => write!(f, "Coveralls"),
            PluginKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// README badge placement. Kinds not listed here follow, sorted by name.
pub const BADGE_ORDER: [PluginKind; 6] = [
    PluginKind::GitHubPages,
    PluginKind::TravisCi,
    PluginKind::AppVeyor,
    PluginKind::GitLabCi,
    PluginKind::Codecov,
    PluginKind::Coveralls,
];

/// What a plugin's file hook works with.
pub struct GenerationContext<'a> {
    pub pkg_name: &'a str,
    pub config: &'a TemplateConfig,
    /// Package directory inside the scratch area.
    pub pkg_dir: &'a Path,
    pub renderer: &'a dyn TemplateRenderer,
}

impl GenerationContext<'_> {
    /// Renders `template` with the config's default view plus `PKGNAME` and
    /// `extra`, writes it to `dest` and returns `dest`.
    pub fn render_to(&self, template: &str, dest: &str, extra: &Value) -> Result<String> {
        let mut view = json!({ "PKGNAME": self.pkg_name });
        if let (Some(view), Some(extra)) = (view.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                view.insert(key.clone(), value.clone());
            }
        }
        let text = self.renderer.render_with_config(template, self.config, &view)?;
        debug!("Writing plugin file '{}'.", dest);
        write_file(self.pkg_dir.join(dest), &text)?;
        Ok(dest.to_string())
    }
}

/// A plugin, one variant per kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Plugin {
    Documenter(Documenter),
    #[serde(rename = "github_pages")]
    GitHubPages(GitHubPages),
    TravisCi(TravisCi),
    #[serde(rename = "appveyor")]
    AppVeyor(AppVeyor),
    #[serde(rename = "gitlab_ci")]
    GitLabCi(GitLabCi),
    Codecov(Codecov),
    Coveralls(Coveralls),
    Custom(CustomPlugin),
}

impl Plugin {
    pub fn kind(&self) -> PluginKind {
        match self {
            Plugin::Documenter(_) => PluginKind::Documenter,
            Plugin::GitHubPages(_) => PluginKind::GitHubPages,
            Plugin::TravisCi(_) => PluginKind::TravisCi,
            Plugin::AppVeyor(_) => PluginKind::AppVeyor,
            Plugin::GitLabCi(_) => PluginKind::GitLabCi,
            Plugin::Codecov(_) => PluginKind::Codecov,
            Plugin::Coveralls(_) => PluginKind::Coveralls,
            Plugin::Custom(custom) => PluginKind::Custom(custom.name.clone()),
        }
    }

    /// Whether the plugin builds documentation with Documenter.jl.
    pub fn is_documenter(&self) -> bool {
        matches!(self, Plugin::Documenter(_) | Plugin::GitHubPages(_))
    }

    /// .gitignore patterns, in the plugin's order.
    pub fn gitignore(&self) -> Vec<String> {
        match self {
            Plugin::Documenter(_) | Plugin::GitHubPages(_) => {
                documenter::DOCS_IGNORE.iter().map(|p| p.to_string()).collect()
            }
            Plugin::Codecov(_) | Plugin::Coveralls(_) => {
                COVERAGE_IGNORE.iter().map(|p| p.to_string()).collect()
            }
            Plugin::GitLabCi(gitlab) if gitlab.coverage => {
                COVERAGE_IGNORE.iter().map(|p| p.to_string()).collect()
            }
            Plugin::Custom(custom) => custom.gitignore.clone(),
            _ => Vec::new(),
        }
    }

    fn badge_templates(&self) -> Vec<String> {
        let templates: &[&str] = match self {
            Plugin::GitHubPages(_) => &documenter::BADGES,
            Plugin::TravisCi(_) => &ci::TRAVIS_BADGES,
            Plugin::AppVeyor(_) => &ci::APPVEYOR_BADGES,
            Plugin::GitLabCi(gitlab) if gitlab.coverage => &ci::GITLAB_BADGES,
            Plugin::GitLabCi(_) => &ci::GITLAB_BADGES[..1],
            Plugin::Codecov(_) => &coverage::CODECOV_BADGES,
            Plugin::Coveralls(_) => &coverage::COVERALLS_BADGES,
            Plugin::Custom(custom) => return custom.badges.clone(),
            Plugin::Documenter(_) => &[],
        };
        templates.iter().map(|t| t.to_string()).collect()
    }

    /// README badges rendered with `USER` and `PKGNAME`.
    pub fn badges(
        &self,
        renderer: &dyn TemplateRenderer,
        user: &str,
        pkg_name: &str,
    ) -> Result<Vec<String>> {
        let mut view = serde_json::Map::new();
        if let Plugin::Custom(custom) = self {
            view.extend(custom.view.clone());
        }
        view.insert("USER".to_string(), json!(user));
        view.insert("PKGNAME".to_string(), json!(pkg_name));
        let view = Value::Object(view);

        self.badge_templates()
            .iter()
            .map(|template| renderer.render(template, &view))
            .collect()
    }

    /// Writes the plugin's files and returns their paths relative to the package.
    pub fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<String>> {
        match self {
            Plugin::Documenter(docs) => documenter::generate_docs(ctx, &docs.assets, false),
            Plugin::GitHubPages(pages) => documenter::generate_docs(ctx, &pages.assets, true),
            Plugin::TravisCi(travis) => travis.generate(ctx),
            Plugin::AppVeyor(appveyor) => appveyor.generate(ctx),
            Plugin::GitLabCi(gitlab) => gitlab.generate(ctx),
            Plugin::Codecov(codecov) => codecov.generate(ctx),
            Plugin::Coveralls(coveralls) => coveralls.generate(ctx),
            Plugin::Custom(custom) => custom.generate(ctx),
        }
    }

    /// Checks that every file the plugin reads exists.
    pub fn validate(&self) -> Result<()> {
        match self {
            Plugin::Documenter(docs) => documenter::validate_assets(&docs.assets),
            Plugin::GitHubPages(pages) => documenter::validate_assets(&pages.assets),
            Plugin::TravisCi(travis) => travis.config_file.validate(),
            Plugin::AppVeyor(appveyor) => appveyor.config_file.validate(),
            Plugin::GitLabCi(gitlab) => gitlab.config_file.validate(),
            Plugin::Codecov(codecov) => coverage::validate_config_file(&codecov.config_file),
            Plugin::Coveralls(coveralls) => {
                coverage::validate_config_file(&coveralls.config_file)
            }
            Plugin::Custom(custom) => custom.validate(),
        }
    }
}

pub(crate) fn missing_file(path: &Path) -> Error {
    Error::ValidationError(format!("file '{}' does not exist", path.display()))
}

pub(crate) fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read template '{}': {}", path.display(), e))
    })
}

/// The configured plugins, at most one per kind, in configuration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<Plugin>")]
pub struct Plugins {
    plugins: IndexMap<PluginKind, Plugin>,
}

impl Plugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin. A plugin of the same kind is replaced in place and returned.
    pub fn insert(&mut self, plugin: Plugin) -> Option<Plugin> {
        self.plugins.insert(plugin.kind(), plugin)
    }

    pub fn get(&self, kind: &PluginKind) -> Option<&Plugin> {
        self.plugins.get(kind)
    }

    pub fn contains(&self, kind: &PluginKind) -> bool {
        self.plugins.contains_key(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn has_documenter(&self) -> bool {
        self.iter().any(Plugin::is_documenter)
    }

    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(Plugin::validate)
    }

    /// README badges: [`BADGE_ORDER`] first, then the remaining kinds sorted by name.
    pub fn badges(
        &self,
        renderer: &dyn TemplateRenderer,
        user: &str,
        pkg_name: &str,
    ) -> Result<Vec<String>> {
        let mut ordered: Vec<&Plugin> =
            BADGE_ORDER.iter().filter_map(|kind| self.get(kind)).collect();

        let mut rest: Vec<&Plugin> =
            self.iter().filter(|plugin| !BADGE_ORDER.contains(&plugin.kind())).collect();
        rest.sort_by_key(|plugin| plugin.kind().to_string());
        ordered.extend(rest);

        let mut badges = Vec::new();
        for plugin in ordered {
            badges.extend(plugin.badges(renderer, user, pkg_name)?);
        }
        Ok(badges)
    }

    /// .gitignore lines: [`BASE_IGNORE`] then every plugin's patterns, keeping
    /// the first occurrence of each.
    pub fn gitignore(&self) -> Vec<String> {
        let mut patterns = IndexSet::new();
        patterns.insert(BASE_IGNORE.to_string());
        for plugin in self.iter() {
            patterns.extend(plugin.gitignore());
        }
        patterns.into_iter().collect()
    }
}

impl FromIterator<Plugin> for Plugins {
    fn from_iter<I: IntoIterator<Item = Plugin>>(iter: I) -> Self {
        let mut plugins = Plugins::new();
        for plugin in iter {
            if let Some(previous) = plugins.insert(plugin) {
                warn!(
                    "Plugin list contained more than one {} plugin, only the last one is kept.",
                    previous.kind()
                );
            }
        }
        plugins
    }
}

impl From<Vec<Plugin>> for Plugins {
    fn from(plugins: Vec<Plugin>) -> Self {
        plugins.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_kind_display() {
        assert_eq!(PluginKind::TravisCi.to_string(), "TravisCI");
        assert_eq!(PluginKind::Custom("Lint".to_string()).to_string(), "Lint");
    }

    #[test]
    fn test_duplicate_kind_keeps_last_at_first_position() {
        let plugins: Plugins = vec![
            Plugin::GitLabCi(GitLabCi { coverage: true, ..Default::default() }),
            Plugin::Codecov(Codecov::default()),
            Plugin::GitLabCi(GitLabCi { coverage: false, ..Default::default() }),
        ]
        .into();

        assert_eq!(plugins.len(), 2);
        let kinds: Vec<PluginKind> = plugins.iter().map(Plugin::kind).collect();
        assert_eq!(kinds, vec![PluginKind::GitLabCi, PluginKind::Codecov]);
        match plugins.get(&PluginKind::GitLabCi) {
            Some(Plugin::GitLabCi(gitlab)) => assert!(!gitlab.coverage),
            other => panic!("Expected GitLabCi plugin, got {:?}", other),
        }
    }
}
