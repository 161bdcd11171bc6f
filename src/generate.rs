//! End-to-end package generation.
//!
//! A package is built in a scratch directory: repository, commits, branches,
//! remote and files. Only when everything succeeded is the scratch package
//! moved to its destination, so a failed generation never touches the
//! destination. Scratch leftovers of a failed generation are not cleaned up.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};
use regex::Regex;
use serde_json::json;

use crate::config::TemplateConfig;
use crate::constants::{
    EMPTY_COMMIT_MESSAGE, FILES_COMMIT_MESSAGE, IGNORE_FILE, LICENSE_FILE, PAGES_BRANCH, PKG_EXT,
    README_FILE, REQUIRE_FILE, SSH_LOGIN,
};
use crate::error::{Error, Result};
use crate::ioutils::{ensure_output_dir, move_dir, remove_dir_if_empty, write_file};
use crate::license::{DirectoryLicenses, EmbeddedLicenses, LicenseStore};
use crate::plugin::{GenerationContext, PluginKind};
use crate::renderer::{MustacheRenderer, TemplateRenderer};
use crate::repository::GitRepository;
use crate::version::version_floor;

/// Outcome of a successful generation.
#[derive(Debug)]
pub struct Generated {
    /// Final location of the package.
    pub path: PathBuf,
    /// Every generated file, relative to `path`, in generation order.
    pub files: Vec<String>,
    /// More than one branch was created; a plain `git push` would miss some.
    pub multiple_branches: bool,
}

/// Strips one trailing `.jl` from a package name.
pub fn normalize_name(pkg_name: &str) -> &str {
    pkg_name.strip_suffix(PKG_EXT).unwrap_or(pkg_name)
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern is valid"))
}

/// URL recorded as `origin`.
///
/// The SSH form ends in `.jl.git`, the HTTPS form in `.jl`.
pub fn remote_url(host: &str, user: &str, pkg_name: &str, ssh: bool) -> String {
    if ssh {
        format!("{SSH_LOGIN}@{host}:{user}/{pkg_name}{PKG_EXT}.git")
    } else {
        format!("https://{host}/{user}/{pkg_name}{PKG_EXT}")
    }
}

/// Generates package `pkg_name` with the embedded licenses, or the licenses in
/// `config.license_dir` when it is set.
pub fn generate(
    pkg_name: &str,
    config: &TemplateConfig,
    force: bool,
    ssh: bool,
) -> Result<Generated> {
    let renderer = MustacheRenderer::new();
    match &config.license_dir {
        Some(dir) => {
            let licenses = DirectoryLicenses::new(dir);
            Generator::new(config, &licenses, &renderer).generate(pkg_name, force, ssh)
        }
        None => Generator::new(config, &EmbeddedLicenses, &renderer).generate(pkg_name, force, ssh),
    }
}

/// Generates packages from one configuration.
pub struct Generator<'a> {
    config: &'a TemplateConfig,
    licenses: &'a dyn LicenseStore,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Generator<'a> {
    pub fn new(
        config: &'a TemplateConfig,
        licenses: &'a dyn LicenseStore,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self { config, licenses, renderer }
    }

    /// Generates package `pkg_name` into `config.dir`.
    ///
    /// # Arguments
    /// * `pkg_name` - Package name, with or without a trailing `.jl`
    /// * `force` - Replace an existing package directory
    /// * `ssh` - Record an SSH remote instead of an HTTPS one
    ///
    /// # Errors
    /// * `Error::OutputDirectoryExistsError` if the package directory exists and `force` is false
    /// * `Error::UnknownLicenseError` if the configured license is unknown
    /// * `Error::ValidationError` for invalid names or plugin settings
    /// * Any filesystem, git or template error met on the way
    pub fn generate(&self, pkg_name: &str, force: bool, ssh: bool) -> Result<Generated> {
        let config = self.config;
        let pkg_name = normalize_name(pkg_name);
        self.validate(pkg_name)?;
        let license_body = match &config.license {
            Some(id) => Some(self.licenses.read_body(id)?),
            None => None,
        };

        let dest = ensure_output_dir(config.dir.join(pkg_name), force)?;

        let scratch_root = match &config.scratch_dir {
            Some(dir) => dir.clone(),
            None => tempfile::Builder::new().prefix("pkgbaker-").tempdir()?.keep(),
        };
        let pkg_dir = scratch_root.join(pkg_name);
        if pkg_dir.exists() {
            warn!("Removing stale scratch directory '{}'.", pkg_dir.display());
            std::fs::remove_dir_all(&pkg_dir)?;
        }
        info!("Generating {} in scratch directory '{}'.", pkg_name, pkg_dir.display());

        let repo = GitRepository::init(&pkg_dir)?;
        for (key, value) in &config.git_config {
            repo.set_config(key, value)?;
        }
        repo.commit(EMPTY_COMMIT_MESSAGE)?;
        repo.set_remote(&remote_url(&config.host, &config.user, pkg_name, ssh))?;

        if config.plugins.contains(&PluginKind::GitHubPages) {
            let primary = repo.current_branch()?;
            repo.create_branch(PAGES_BRANCH)?;
            repo.checkout_branch(PAGES_BRANCH)?;
            repo.commit(EMPTY_COMMIT_MESSAGE)?;
            repo.checkout_branch(&primary)?;
        }

        let files = self.generate_files(pkg_name, &pkg_dir, license_body.as_deref())?;
        repo.stage_files(&files)?;
        repo.commit(FILES_COMMIT_MESSAGE)?;

        let multiple_branches = repo.list_branches()?.len() > 1;
        if multiple_branches {
            warn!("Remember to push all created branches to your remote: git push --all");
        }
        drop(repo);

        move_dir(&pkg_dir, &dest)?;
        // The package is in place; a scratch root that cannot be removed is not a failure.
        if let Err(e) = remove_dir_if_empty(&scratch_root) {
            warn!("Could not remove scratch directory '{}': {}", scratch_root.display(), e);
        }
        info!("New package is at '{}'.", dest.display());

        Ok(Generated { path: dest, files, multiple_branches })
    }

    fn validate(&self, pkg_name: &str) -> Result<()> {
        if !name_regex().is_match(pkg_name) {
            return Err(Error::ValidationError(format!(
                "'{pkg_name}' is not a valid package name"
            )));
        }
        if self.config.user.trim().is_empty() {
            return Err(Error::ValidationError("no git host user is configured".to_string()));
        }
        self.config.plugins.validate()
    }

    /// Writes every file in its fixed order and returns their relative paths.
    fn generate_files(
        &self,
        pkg_name: &str,
        pkg_dir: &Path,
        license_body: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut files = vec![
            gen_entrypoint(pkg_dir, pkg_name)?,
            gen_tests(pkg_dir, pkg_name)?,
            gen_require(pkg_dir, self.config)?,
            self.gen_readme(pkg_dir, pkg_name)?,
            gen_gitignore(pkg_dir, self.config)?,
        ];
        if let Some(body) = license_body {
            files.push(gen_license(pkg_dir, self.config, body)?);
        }

        let ctx = GenerationContext {
            pkg_name,
            config: self.config,
            pkg_dir,
            renderer: self.renderer,
        };
        for plugin in self.config.plugins.iter() {
            debug!("Running {} plugin.", plugin.kind());
            files.extend(plugin.generate(&ctx)?);
        }

        Ok(files)
    }

    fn gen_readme(&self, pkg_dir: &Path, pkg_name: &str) -> Result<String> {
        let badges = self.config.plugins.badges(self.renderer, &self.config.user, pkg_name)?;

        let mut lines = vec![format!("# {pkg_name}")];
        if !badges.is_empty() {
            lines.push(String::new());
            lines.extend(badges);
        }
        write_text(pkg_dir, README_FILE, &lines.join("\n"))
    }
}

fn write_text(pkg_dir: &Path, file: &str, text: &str) -> Result<String> {
    debug!("Writing '{}'.", file);
    write_file(pkg_dir.join(file), text)?;
    Ok(file.to_string())
}

fn gen_entrypoint(pkg_dir: &Path, pkg_name: &str) -> Result<String> {
    let text = format!("module {pkg_name}\n\n# Package code goes here.\n\nend # module");
    write_text(pkg_dir, &format!("src/{pkg_name}{PKG_EXT}"), &text)
}

fn gen_tests(pkg_dir: &Path, pkg_name: &str) -> Result<String> {
    let text = format!(
        "using {pkg_name}\nusing Test\n\n\
         @testset \"{pkg_name}{PKG_EXT}\" begin\n    # Write your own tests here.\nend"
    );
    write_text(pkg_dir, &format!("test/runtests{PKG_EXT}"), &text)
}

fn gen_require(pkg_dir: &Path, config: &TemplateConfig) -> Result<String> {
    let mut lines = vec![format!("julia {}", version_floor(&config.julia_version))];
    lines.extend(config.unique_requirements().into_iter().map(str::to_string));
    write_text(pkg_dir, REQUIRE_FILE, &lines.join("\n"))
}

fn gen_gitignore(pkg_dir: &Path, config: &TemplateConfig) -> Result<String> {
    write_text(pkg_dir, IGNORE_FILE, &config.plugins.gitignore().join("\n"))
}

fn gen_license(pkg_dir: &Path, config: &TemplateConfig, body: &str) -> Result<String> {
    let text = format!("Copyright (c) {} {}\n\n{}", config.years, config.authors, body);
    write_text(pkg_dir, LICENSE_FILE, &text)
}
