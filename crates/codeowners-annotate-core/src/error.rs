use crate::remote::ApiError;
use crate::render::RenderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from locating, reading, or fetching a CODEOWNERS file.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No CODEOWNERS file exists in any supported location.
    #[error("no CODEOWNERS file found in {}", root.display())]
    NotFound { root: PathBuf },

    /// Rendering the CODEOWNERS file failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The GitHub API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
