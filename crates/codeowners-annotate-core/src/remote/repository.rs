//! Repository identifiers.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The host used when a repository spec doesn't name one.
pub const DEFAULT_HOST: &str = "github.com";

/// Errors from parsing a repository spec or remote URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryParseError {
    /// The spec isn't in `[HOST/]OWNER/REPO` form.
    #[error("expected the \"[HOST/]OWNER/REPO\" format, got {0:?}")]
    InvalidSpec(String),

    /// The remote URL doesn't point at a repository.
    #[error("unsupported remote URL {0:?}")]
    InvalidRemote(String),
}

/// A repository on a GitHub host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Repository {
    host: String,
    owner: String,
    name: String,
}

impl Repository {
    /// Creates a repository on the given host.
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the host name, e.g. `github.com`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the owning user or organization.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parses a git remote URL.
    ///
    /// Accepts `https://`, `http://`, `ssh://` and `git://` URLs as well as
    /// scp-like `git@host:owner/repo.git` addresses.
    pub fn from_remote_url(url: &str) -> Result<Self, RepositoryParseError> {
        let invalid = || RepositoryParseError::InvalidRemote(url.to_string());
        let url = url.trim();

        let (authority, path) = if let Some((_, rest)) = url.split_once("://") {
            rest.split_once('/').ok_or_else(invalid)?
        } else {
            // scp-like: [user@]host:path
            url.split_once(':').ok_or_else(invalid)?
        };

        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = host.split(':').next().unwrap_or(host);

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        match path.split('/').collect::<Vec<_>>()[..] {
            [owner, name] if !host.is_empty() && !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(host.to_lowercase(), owner, name))
            }
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Repository {
    type Err = RepositoryParseError;

    /// Parses `[HOST/]OWNER/REPO`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(RepositoryParseError::InvalidSpec(s.to_string()));
        }

        match parts[..] {
            [owner, name] => Ok(Self::new(DEFAULT_HOST, owner, name)),
            [host, owner, name] => Ok(Self::new(host.to_lowercase(), owner, name)),
            _ => Err(RepositoryParseError::InvalidSpec(s.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host != DEFAULT_HOST {
            write!(f, "{}/", self.host)?;
        }
        write!(f, "{}/{}", self.owner, self.name)
    }
}
