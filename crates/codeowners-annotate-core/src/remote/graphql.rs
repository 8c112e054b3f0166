//! GraphQL queries and response payloads for the GitHub API.
//!
//! Transports post the request bodies built here and hand the decoded
//! [`GraphqlResponse`] back for conversion into domain types.

use super::repository::Repository;
use super::{ApiError, FilesPage, PullRequestFile};
use crate::diagnostics::{ErrorRecord, ErrorSet};
use serde::Deserialize;
use serde_json::{Value, json};

/// Fetches the validation errors GitHub reports for a repository's CODEOWNERS.
pub const CODEOWNERS_ERRORS_QUERY: &str = r#"query CodeownersErrors($owner: String!, $repo: String!, $ref: String) {
  repository(owner: $owner, name: $repo) {
    codeowners(refName: $ref) {
      errors {
        kind
        path
        line
        column
        source
        message
      }
    }
  }
}"#;

/// Fetches one page of the files changed in a pull request.
pub const PULL_REQUEST_FILES_QUERY: &str = r#"query PullRequestFiles($owner: String!, $repo: String!, $number: Int!, $endCursor: String) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      files(first: 100, after: $endCursor) {
        nodes {
          path
          changeType
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}"#;

/// Builds the request body for [`CODEOWNERS_ERRORS_QUERY`].
///
/// Without a ref, GitHub validates the default branch.
pub fn codeowners_errors_request(repo: &Repository, ref_name: Option<&str>) -> Value {
    json!({
        "query": CODEOWNERS_ERRORS_QUERY,
        "variables": {
            "owner": repo.owner(),
            "repo": repo.name(),
            "ref": ref_name,
        },
    })
}

/// Builds the request body for [`PULL_REQUEST_FILES_QUERY`].
pub fn pull_request_files_request(repo: &Repository, number: u64, after: Option<&str>) -> Value {
    json!({
        "query": PULL_REQUEST_FILES_QUERY,
        "variables": {
            "owner": repo.owner(),
            "repo": repo.name(),
            "number": number,
            "endCursor": after,
        },
    })
}

/// A GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    /// The data, absent when the query failed outright.
    pub data: Option<T>,
    /// Errors reported alongside (or instead of) the data.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// A single GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    /// The error message.
    pub message: String,
}

impl<T> GraphqlResponse<T> {
    /// Returns the data, or an error if the response carries any errors.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ApiError::Api(messages.join("; ")));
        }
        Ok(self.data)
    }
}

/// Response data for [`CODEOWNERS_ERRORS_QUERY`].
#[derive(Debug, Deserialize)]
pub struct CodeownersErrorsData {
    repository: Option<CodeownersRepository>,
}

#[derive(Debug, Deserialize)]
struct CodeownersRepository {
    codeowners: Option<Codeowners>,
}

#[derive(Debug, Deserialize)]
struct Codeowners {
    #[serde(default)]
    errors: Vec<ErrorRecord>,
}

impl GraphqlResponse<CodeownersErrorsData> {
    /// Converts the response into the reported errors.
    ///
    /// Missing nodes mean there is nothing to report.
    pub fn into_error_set(self) -> Result<ErrorSet, ApiError> {
        let errors = self
            .into_data()?
            .and_then(|data| data.repository)
            .and_then(|repo| repo.codeowners)
            .map(|codeowners| codeowners.errors)
            .unwrap_or_default();
        Ok(ErrorSet::new(errors))
    }
}

/// Response data for [`PULL_REQUEST_FILES_QUERY`].
#[derive(Debug, Deserialize)]
pub struct PullRequestFilesData {
    repository: Option<PullRequestRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestRepository {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    files: Option<FilesConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilesConnection {
    #[serde(default)]
    nodes: Vec<PullRequestFile>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl GraphqlResponse<PullRequestFilesData> {
    /// Converts the response into a page of changed files.
    pub fn into_files_page(self, number: u64) -> Result<FilesPage, ApiError> {
        let pull_request = self
            .into_data()?
            .and_then(|data| data.repository)
            .and_then(|repo| repo.pull_request)
            .ok_or_else(|| ApiError::NotFound(format!("pull request #{}", number)))?;

        let Some(files) = pull_request.files else {
            return Ok(FilesPage::default());
        };

        Ok(FilesPage {
            files: files.nodes,
            has_next_page: files.page_info.has_next_page,
            end_cursor: files.page_info.end_cursor,
        })
    }
}
