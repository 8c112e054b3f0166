//! Git plumbing: repository root, current branch, and origin remote.

use codeowners_annotate_core::remote::{Repository, RepositoryParseError};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable couldn't be started.
    #[error("could not run git: {0}")]
    Spawn(#[source] io::Error),

    /// git exited with an error.
    #[error("git {args} failed: {stderr}")]
    Failed { args: String, stderr: String },

    /// The origin remote doesn't name a GitHub repository.
    #[error("no repository; use --repo to select one ({0})")]
    Remote(#[from] RepositoryParseError),
}

fn exec(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    debug!("Running git {} in {}", args.join(" "), dir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(GitError::Spawn)?;

    if !output.status.success() {
        return Err(GitError::Failed {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Returns the root of the working tree containing `dir`.
pub fn root_dir(dir: &Path) -> Result<PathBuf, GitError> {
    exec(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// Returns the full ref of the checked out branch, e.g. `refs/heads/main`.
pub fn branch_ref(dir: &Path) -> Result<String, GitError> {
    exec(dir, &["rev-parse", "--symbolic-full-name", "HEAD"])
}

/// Returns the repository the `origin` remote points to.
pub fn origin_repository(dir: &Path) -> Result<Repository, GitError> {
    let url = exec(dir, &["remote", "get-url", "origin"])?;
    Ok(Repository::from_remote_url(&url)?)
}
