//! CODEOWNERS Annotate Core
//!
//! A library for mapping GitHub's CODEOWNERS validation errors back onto the
//! file they came from.
//!
//! # Features
//!
//! - **Diagnostics**: Extract the unknown owner each error refers to and
//!   aggregate errors per file and per line
//! - **Rendering**: Stream a CODEOWNERS file with unknown owners and comments
//!   decorated, leaving every other byte intact
//! - **Ownership**: Resolve the owners of a path from local rules
//! - **Remote**: Fetch errors and pull request files through a pluggable API
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_annotate_core::diagnostics::{ErrorRecord, ErrorSet};
//! use codeowners_annotate_core::render::{Plain, RenderOptions, Renderer};
//!
//! let source = "* @default\ndocs/** @writers @unknown\n";
//! let errors = ErrorSet::new(vec![ErrorRecord::unknown_owner_at(
//!     ".github/CODEOWNERS",
//!     2,
//!     18,
//!     "docs/** @writers @unknown",
//! )]);
//!
//! for owner in errors.unique_owners() {
//!     println!("Unknown owner: {}", owner);
//! }
//!
//! let mut out = Vec::new();
//! Renderer::new(&errors, &Plain, RenderOptions::new())
//!     .render(source.as_bytes(), &mut out)
//!     .unwrap();
//! assert_eq!(out, source.as_bytes());
//! ```
//!
//! # Modules
//!
//! - [`diagnostics`]: Validation error records and aggregate views
//! - [`render`]: Line-by-line annotated rendering
//! - [`ownership`]: Local CODEOWNERS rules and owner lookup
//! - [`remote`]: GitHub API abstraction

use log::debug;
use std::path::{Path, PathBuf};

pub mod diagnostics;
mod error;
#[cfg(feature = "generate")]
pub mod generate;
pub mod ownership;
pub mod remote;
pub mod render;

pub use diagnostics::{ErrorKind, ErrorRecord, ErrorSet, LineIndex};
pub use error::Error;
pub use ownership::{OwnersLookup, Ruleset};
pub use remote::{ApiError, CodeownersApi, Repository};
pub use render::{Decorate, RenderError, RenderOptions, Renderer, render_file};

/// Locations GitHub checks for a CODEOWNERS file, in priority order.
pub const CODEOWNERS_LOCATIONS: [&str; 3] = [".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"];

/// Finds the CODEOWNERS file in a repository.
///
/// Searches in the following locations (in order):
/// 1. `.github/CODEOWNERS`
/// 2. `CODEOWNERS`
/// 3. `docs/CODEOWNERS`
///
/// Directories with those names are skipped. Returns `Some(path)` if found,
/// `None` otherwise.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use codeowners_annotate_core::find_codeowners_file;
///
/// let repo_path = Path::new("/path/to/repo");
/// if let Some(codeowners_path) = find_codeowners_file(repo_path) {
///     println!("Found CODEOWNERS at: {}", codeowners_path.display());
/// } else {
///     eprintln!("CODEOWNERS file not found");
/// }
/// ```
pub fn find_codeowners_file(repo_path: &Path) -> Option<PathBuf> {
    let found = CODEOWNERS_LOCATIONS
        .iter()
        .map(|location| repo_path.join(location))
        .find(|p| p.exists() && !p.is_dir());
    debug!("CODEOWNERS lookup in {}: {:?}", repo_path.display(), found);
    found
}

/// Returns the file the errors refer to, or the located CODEOWNERS file if
/// the errors don't name one.
pub fn resolve_codeowners_path(repo_path: &Path, errors: &ErrorSet) -> Result<PathBuf, Error> {
    if !errors.path().is_empty() {
        return Ok(repo_path.join(errors.path()));
    }

    find_codeowners_file(repo_path).ok_or_else(|| Error::NotFound {
        root: repo_path.to_path_buf(),
    })
}
