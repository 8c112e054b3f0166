//! A single validation error reported for a CODEOWNERS file.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The kind of a validation error, as reported by GitHub.
///
/// Only [`ErrorKind::UnknownOwner`] carries extraction semantics. Every other
/// kind is kept verbatim so it can be displayed and serialized unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorKind {
    /// An owner that could not be resolved to a user, team, or email.
    UnknownOwner,
    /// Any other kind of error.
    Other(String),
}

impl ErrorKind {
    /// The wire value GitHub uses for unknown owners.
    pub const UNKNOWN_OWNER: &'static str = "Unknown owner";

    /// Returns the wire representation of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::UnknownOwner => Self::UNKNOWN_OWNER,
            ErrorKind::Other(kind) => kind,
        }
    }
}

impl Default for ErrorKind {
    fn default() -> Self {
        ErrorKind::Other(String::new())
    }
}

impl From<String> for ErrorKind {
    fn from(kind: String) -> Self {
        if kind == Self::UNKNOWN_OWNER {
            ErrorKind::UnknownOwner
        } else {
            ErrorKind::Other(kind)
        }
    }
}

impl From<&str> for ErrorKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UnknownOwner => ErrorKind::UNKNOWN_OWNER.to_string(),
            ErrorKind::Other(kind) => kind,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation error, addressed by line and column within a file.
///
/// Records are built once from a remote response (or a test fixture) and
/// never mutated. `line` and `column` are signed so malformed upstream values
/// can be represented and ignored instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Repository-relative path of the file the error belongs to.
    #[serde(default)]
    pub path: String,
    /// Line number (1-based).
    pub line: i64,
    /// Byte offset into `source` where the offending token begins (1-based).
    /// Zero means not applicable.
    #[serde(default)]
    pub column: i64,
    /// The text of the line as reported by the validator.
    #[serde(default)]
    pub source: String,
    /// Human-readable description of the error.
    #[serde(default)]
    pub message: String,
}

impl ErrorRecord {
    /// Creates a new error record.
    pub fn new(
        kind: impl Into<ErrorKind>,
        path: impl Into<String>,
        line: i64,
        column: i64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
            line,
            column,
            source: source.into(),
            message: String::new(),
        }
    }

    /// Creates an unknown owner record.
    pub fn unknown_owner_at(
        path: impl Into<String>,
        line: i64,
        column: i64,
        source: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownOwner, path, line, column, source)
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns true if this record reports an unknown owner.
    pub fn is_unknown_owner(&self) -> bool {
        self.kind == ErrorKind::UnknownOwner
    }

    /// Returns the 1-based line as an index key, or `None` if it is not positive.
    pub fn line_number(&self) -> Option<usize> {
        usize::try_from(self.line).ok().filter(|&line| line > 0)
    }

    /// Extracts the owner token this record flags as unknown.
    ///
    /// Returns an empty string unless the kind is [`ErrorKind::UnknownOwner`]
    /// and `column` points at a character within `source`. The token starts at
    /// byte `column - 1` and runs up to the next whitespace, or to the end of
    /// the line if none follows.
    pub fn unknown_owner(&self) -> &str {
        if !self.is_unknown_owner() || self.column <= 0 {
            return "";
        }

        let Some(owner) = usize::try_from(self.column - 1)
            .ok()
            .and_then(|start| self.source.get(start..))
        else {
            return "";
        };

        match owner.find(char::is_whitespace) {
            Some(idx) if idx > 0 => &owner[..idx],
            _ => owner,
        }
    }
}

impl Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.path, self.line, self.column, self.kind)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}
