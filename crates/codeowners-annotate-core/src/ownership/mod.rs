//! Resolving the owners of a path from a local CODEOWNERS file.
//!
//! Later rules take precedence: the owners of a path are those of the last
//! rule whose pattern matches it. A rule without owners unsets ownership.
//!
//! # Example
//!
//! ```rust
//! use codeowners_annotate_core::ownership::{OwnersLookup, Ruleset};
//!
//! let rules = Ruleset::parse("# comment\n* @heaths\ndocs/ @writers\n");
//! assert_eq!(rules.owners_for("main.go"), vec!["@heaths"]);
//! assert_eq!(rules.owners_for("docs/README.md"), vec!["@writers"]);
//! ```

mod lexer;
mod matching;

pub use matching::Pattern;

use lexer::{is_blank_line, parse_comment_line, parse_rule_line};
use log::{debug, trace};
use std::fs;
use std::io;
use std::path::Path;

/// Looks up the owners of a repository-relative path.
pub trait OwnersLookup {
    /// Returns the owners of `path` in the order they are listed, or an
    /// empty list if no rule assigns it.
    fn owners_for(&self, path: &str) -> Vec<String>;
}

/// A single CODEOWNERS rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The compiled pattern.
    pub pattern: Pattern,
    /// Owners assigned by this rule.
    pub owners: Vec<String>,
    /// Line number of the rule (1-based).
    pub line: usize,
}

/// The rules of a CODEOWNERS file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Parses CODEOWNERS content.
    ///
    /// Blank lines and comments are skipped, as are lines whose pattern isn't
    /// a valid glob. Validating the file is GitHub's job; this only needs the
    /// rules that can match.
    pub fn parse(input: &str) -> Self {
        let mut rules = Vec::new();

        for (idx, text) in input.lines().enumerate() {
            let line = idx + 1;
            if is_blank_line(text) || parse_comment_line(text).is_ok() {
                continue;
            }

            let Ok((_, tokens)) = parse_rule_line(text) else {
                debug!("Skipping unparsable line {}", line);
                continue;
            };

            let Some(pattern) = Pattern::new(tokens.pattern) else {
                debug!("Skipping invalid pattern {:?} on line {}", tokens.pattern, line);
                continue;
            };

            trace!("Rule {:?} -> {:?}", tokens.pattern, tokens.owners);
            rules.push(Rule {
                pattern,
                owners: tokens.owners.iter().map(|o| o.to_string()).collect(),
                line,
            });
        }

        debug!("Parsed {} rule(s)", rules.len());
        Self { rules }
    }

    /// Reads and parses a CODEOWNERS file.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Returns the last rule matching `path`.
    pub fn matching_rule(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().rev().find(|rule| rule.pattern.matches(path))
    }

    /// Returns the rules in file order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl OwnersLookup for Ruleset {
    fn owners_for(&self, path: &str) -> Vec<String> {
        self.matching_rule(path)
            .map(|rule| rule.owners.clone())
            .unwrap_or_default()
    }
}
