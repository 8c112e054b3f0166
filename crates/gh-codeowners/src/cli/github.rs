//! GitHub client implementation using octocrab.
//!
//! This module provides the octocrab-based implementation of the
//! `CodeownersApi` trait, posting the GraphQL queries from the core.

use async_trait::async_trait;
use codeowners_annotate_core::ErrorSet;
use codeowners_annotate_core::remote::graphql::{
    CodeownersErrorsData, GraphqlResponse, PullRequestFilesData, codeowners_errors_request,
    pull_request_files_request,
};
use codeowners_annotate_core::remote::{ApiError, CodeownersApi, FilesPage, Repository};
use http::StatusCode;
use tracing::debug;

/// A wrapper around `octocrab::Octocrab` that implements `CodeownersApi`.
///
/// This wrapper is necessary due to Rust's orphan rules, which prevent
/// implementing external traits on external types.
pub struct OctocrabClient(pub octocrab::Octocrab);

impl OctocrabClient {
    /// Creates a new OctocrabClient from an Octocrab instance.
    pub fn new(client: octocrab::Octocrab) -> Self {
        Self(client)
    }
}

impl std::ops::Deref for OctocrabClient {
    type Target = octocrab::Octocrab;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extracts the HTTP status code from an octocrab error.
fn extract_status_code(error: &octocrab::Error) -> Option<StatusCode> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

/// Maps an octocrab error onto the API error taxonomy.
fn map_error(error: octocrab::Error) -> ApiError {
    if let Some(status) = extract_status_code(&error) {
        return match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(error.to_string()),
            StatusCode::NOT_FOUND => ApiError::NotFound(error.to_string()),
            _ => ApiError::Api(error.to_string()),
        };
    }

    match error {
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => {
            ApiError::Decode(error.to_string())
        }
        octocrab::Error::Service { .. } => ApiError::Network(error.to_string()),
        _ => ApiError::Other(error.to_string()),
    }
}

#[async_trait]
impl CodeownersApi for OctocrabClient {
    async fn codeowners_errors(
        &self,
        repo: &Repository,
        ref_name: Option<&str>,
    ) -> Result<ErrorSet, ApiError> {
        debug!("Querying CODEOWNERS errors for {} at {:?}", repo, ref_name);
        let body = codeowners_errors_request(repo, ref_name);
        let response: GraphqlResponse<CodeownersErrorsData> =
            self.0.graphql(&body).await.map_err(map_error)?;
        response.into_error_set()
    }

    async fn pull_request_files_page(
        &self,
        repo: &Repository,
        number: u64,
        after: Option<&str>,
    ) -> Result<FilesPage, ApiError> {
        debug!("Querying files of {}#{} after {:?}", repo, number, after);
        let body = pull_request_files_request(repo, number, after);
        let response: GraphqlResponse<PullRequestFilesData> =
            self.0.graphql(&body).await.map_err(map_error)?;
        response.into_files_page(number)
    }
}
