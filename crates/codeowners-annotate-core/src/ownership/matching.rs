//! Pattern matching for CODEOWNERS rules.
//!
//! Patterns follow the gitignore-style rules GitHub documents for CODEOWNERS:
//!
//! - `*` matches any sequence of non-slash characters
//! - `**` matches any sequence including slashes
//! - `/` at the start anchors to the repository root
//! - `/` at the end matches only the contents of a directory
//! - Patterns without a slash match at any depth
//! - A pattern naming a directory also matches everything inside it, unless
//!   its last segment is a wildcard (`docs/*` doesn't match `docs/a/b.md`)

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// A compiled CODEOWNERS pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    original: String,
    matcher: GlobSet,
    anchored: bool,
    directory_only: bool,
}

impl Pattern {
    /// Compiles a CODEOWNERS pattern.
    ///
    /// Returns `None` if the pattern is not a valid glob.
    pub fn new(pattern: &str) -> Option<Self> {
        let normalized = normalize_pattern(pattern);

        let mut builder = GlobSetBuilder::new();
        for glob in &normalized.globs {
            // literal_separator keeps `*` from matching `/`
            let glob = GlobBuilder::new(glob)
                .literal_separator(true)
                .build()
                .ok()?;
            builder.add(glob);
        }

        Some(Self {
            original: pattern.to_string(),
            matcher: builder.build().ok()?,
            anchored: normalized.anchored,
            directory_only: normalized.directory_only,
        })
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Returns true if this pattern is anchored to the repository root.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Returns true if this pattern only matches directory contents.
    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// Checks if this pattern matches a repository-relative path.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.matcher.is_match(path)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Normalized {
    globs: Vec<String>,
    anchored: bool,
    directory_only: bool,
}

/// Translates a CODEOWNERS pattern into the globs that implement it.
fn normalize_pattern(pattern: &str) -> Normalized {
    let mut glob = pattern;
    let mut anchored = false;
    let mut directory_only = false;

    if let Some(stripped) = glob.strip_suffix('/') {
        directory_only = true;
        glob = stripped;
    }

    if let Some(stripped) = glob.strip_prefix('/') {
        anchored = true;
        glob = stripped;
    }

    let glob = if anchored || glob.contains('/') {
        glob.to_string()
    } else {
        format!("**/{}", glob)
    };

    let globs = if directory_only {
        vec![format!("{}/**", glob)]
    } else if glob.ends_with("**") || glob.rsplit('/').next().is_some_and(|s| s.contains('*')) {
        vec![glob]
    } else {
        let contents = format!("{}/**", glob);
        vec![glob, contents]
    };

    Normalized {
        globs,
        anchored,
        directory_only,
    }
}
