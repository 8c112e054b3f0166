//! Validation errors reported by GitHub for a CODEOWNERS file.
//!
//! GitHub validates CODEOWNERS files on its side and reports each problem
//! with a line, a column, and the text of the offending line. This module
//! models those records and derives the views the renderer needs: the file
//! they refer to, the set of unknown owners, and a per-line index.
//!
//! # Example
//!
//! ```rust
//! use codeowners_annotate_core::diagnostics::{ErrorRecord, ErrorSet};
//!
//! let errors = ErrorSet::new(vec![
//!     ErrorRecord::unknown_owner_at("CODEOWNERS", 1, 13, "testdata/** @foo @bar"),
//!     ErrorRecord::unknown_owner_at("CODEOWNERS", 1, 18, "testdata/** @foo @bar"),
//! ]);
//!
//! assert_eq!(errors.path(), "CODEOWNERS");
//! assert_eq!(errors.unique_owners(), vec!["@bar", "@foo"]);
//! assert_eq!(errors.line_index().get(1), Some(&["@foo", "@bar"][..]));
//! ```

mod record;
mod set;

pub use record::{ErrorKind, ErrorRecord};
pub use set::{ErrorSet, LineIndex};
