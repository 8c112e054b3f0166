//! GitHub API abstraction for fetching CODEOWNERS errors and pull request files.
//!
//! The [`CodeownersApi`] trait keeps the core free of any particular HTTP
//! client. The CLI implements it on top of octocrab; tests use in-memory
//! implementations.

pub mod graphql;
mod repository;

pub use repository::{DEFAULT_HOST, Repository, RepositoryParseError};

use crate::diagnostics::ErrorSet;
use crate::ownership::OwnersLookup;
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API returned an error.
    #[error("GitHub API error: {0}")]
    Api(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The requested resource does not exist.
    #[error("Could not find {0}")]
    NotFound(String),

    /// The response couldn't be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// A file changed in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestFile {
    /// Repository-relative path.
    pub path: String,
    /// How the file changed, e.g. `ADDED` or `MODIFIED`.
    pub change_type: String,
}

/// One page of a pull request's changed files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesPage {
    pub files: Vec<PullRequestFile>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Trait for GitHub API client implementations.
#[async_trait]
pub trait CodeownersApi: Send + Sync {
    /// Fetches the CODEOWNERS validation errors GitHub reports for `repo`.
    ///
    /// `ref_name` selects the branch or ref to validate; `None` means the
    /// default branch. A repository without a CODEOWNERS file yields an empty
    /// set.
    async fn codeowners_errors(
        &self,
        repo: &Repository,
        ref_name: Option<&str>,
    ) -> Result<ErrorSet, ApiError>;

    /// Fetches the page of changed files following the cursor `after`.
    async fn pull_request_files_page(
        &self,
        repo: &Repository,
        number: u64,
        after: Option<&str>,
    ) -> Result<FilesPage, ApiError>;
}

/// Streams the pages of a pull request's changed files.
///
/// Each page is requested only after the previous one arrives, since the
/// cursor for the next page comes from the current one.
pub fn pull_request_pages<'a>(
    api: &'a dyn CodeownersApi,
    repo: &'a Repository,
    number: u64,
) -> impl Stream<Item = Result<FilesPage, ApiError>> + Send + 'a {
    // None: done; Some(None): first page; Some(Some(cursor)): next page
    stream::try_unfold(Some(None::<String>), move |state| async move {
        let Some(cursor) = state else {
            return Ok(None);
        };

        let page = api
            .pull_request_files_page(repo, number, cursor.as_deref())
            .await?;
        debug!(
            "Fetched {} file(s) of pull request #{} (more: {})",
            page.files.len(),
            number,
            page.has_next_page
        );

        let next = match (page.has_next_page, &page.end_cursor) {
            (false, _) => None,
            (true, Some(end_cursor)) => Some(Some(end_cursor.clone())),
            (true, None) => {
                return Err(ApiError::Decode(
                    "page claims more files but has no end cursor".to_string(),
                ));
            }
        };
        Ok(Some((page, next)))
    })
}

/// Collects every changed file of a pull request, in order.
pub async fn pull_request_files(
    api: &dyn CodeownersApi,
    repo: &Repository,
    number: u64,
) -> Result<Vec<PullRequestFile>, ApiError> {
    pull_request_pages(api, repo, number)
        .try_fold(Vec::new(), |mut files, page| async move {
            files.extend(page.files);
            Ok::<_, ApiError>(files)
        })
        .await
}

/// A changed file along with its owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub path: String,
    pub change_type: String,
    pub owners: Vec<String>,
}

impl ChangedFile {
    /// Pairs each changed file with its owners according to `lookup`.
    pub fn resolve(files: Vec<PullRequestFile>, lookup: &dyn OwnersLookup) -> Vec<Self> {
        files
            .into_iter()
            .map(|file| {
                let owners = lookup.owners_for(&file.path);
                Self {
                    path: file.path,
                    change_type: file.change_type,
                    owners,
                }
            })
            .collect()
    }
}
