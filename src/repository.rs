//! The git operations package generation needs, on top of `git2`.

use std::path::Path;

use git2::{
    build::CheckoutBuilder, BranchType, Oid, Repository, RepositoryInitOptions, Signature,
};
use log::{debug, warn};

use crate::constants::{DEFAULT_BRANCH, REMOTE_NAME};
use crate::error::{git_error, Result};

/// A repository being built in the scratch area.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Creates (or reinitializes) a repository at `path` whose first branch is
    /// [`DEFAULT_BRANCH`].
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Initializing git repository at '{}'.", path.display());

        let mut opts = RepositoryInitOptions::new();
        opts.mkpath(true).initial_head(DEFAULT_BRANCH);
        let repo = Repository::init_opts(path, &opts).map_err(git_error("init"))?;
        Ok(Self { repo })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).map_err(git_error("open"))?;
        Ok(Self { repo })
    }

    /// Sets `key` in the repository's local config.
    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        debug!("Setting git config '{}'.", key);
        let mut config = self.repo.config().map_err(git_error("config"))?;
        config.set_str(key, value).map_err(git_error("config"))
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(e) => {
                warn!("No git identity configured ({}), committing as 'Unknown'.", e.message());
                Signature::now("Unknown", "unknown@unknown").map_err(git_error("signature"))
            }
        }
    }

    /// Commits the current index on top of `HEAD`. Without anything staged this
    /// is an empty commit.
    pub fn commit(&self, message: &str) -> Result<Oid> {
        let mut index = self.repo.index().map_err(git_error("commit"))?;
        let tree_oid = index.write_tree().map_err(git_error("commit"))?;
        let tree = self.repo.find_tree(tree_oid).map_err(git_error("commit"))?;

        let signature = self.signature()?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(git_error("commit"))?),
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        debug!("Committing '{}'.", message);
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(git_error("commit"))
    }

    /// Creates branch `name` at the current `HEAD` commit.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(git_error("branch"))?;
        self.repo.branch(name, &head, false).map_err(git_error("branch"))?;
        Ok(())
    }

    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        debug!("Checking out branch '{}'.", name);
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .map_err(git_error("checkout"))?;
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().force()))
            .map_err(git_error("checkout"))
    }

    /// Short name of the branch `HEAD` points to.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(git_error("head"))?;
        Ok(head.shorthand().unwrap_or(DEFAULT_BRANCH).to_string())
    }

    /// Points the `origin` remote at `url`, creating it if needed.
    pub fn set_remote(&self, url: &str) -> Result<()> {
        debug!("Setting remote '{}' to '{}'.", REMOTE_NAME, url);
        if self.repo.find_remote(REMOTE_NAME).is_ok() {
            self.repo.remote_set_url(REMOTE_NAME, url).map_err(git_error("remote"))
        } else {
            self.repo.remote(REMOTE_NAME, url).map(|_| ()).map_err(git_error("remote"))
        }
    }

    /// Stages the files at `paths`, relative to the working directory.
    ///
    /// Paths are taken literally and staged even when `.gitignore` matches them.
    pub fn stage_files<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        let mut index = self.repo.index().map_err(git_error("stage"))?;
        for path in paths {
            index.add_path(Path::new(path.as_ref())).map_err(git_error("stage"))?;
        }
        index.write().map_err(git_error("stage"))
    }

    pub fn list_branches(&self) -> Result<Vec<String>> {
        let branches = self.repo.branches(Some(BranchType::Local)).map_err(git_error("branches"))?;
        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(git_error("branches"))?;
            if let Some(name) = branch.name().map_err(git_error("branches"))? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Remote URL of `origin`, if any.
    pub fn remote_url(&self) -> Result<Option<String>> {
        match self.repo.find_remote(REMOTE_NAME) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(git_error("remote")(e)),
        }
    }

    /// Number of commits reachable from `HEAD`.
    pub fn count_commits(&self) -> Result<usize> {
        let mut walk = self.repo.revwalk().map_err(git_error("log"))?;
        walk.push_head().map_err(git_error("log"))?;
        Ok(walk.count())
    }
}
