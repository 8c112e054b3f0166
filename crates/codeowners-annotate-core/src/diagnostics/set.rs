//! Aggregate views over the validation errors reported for one file.

use super::record::ErrorRecord;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// An ordered sequence of validation errors for a single CODEOWNERS file.
///
/// All records are expected to share the same `path`; this is not enforced.
/// Serializes as a plain JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet {
    errors: Vec<ErrorRecord>,
}

impl ErrorSet {
    /// Creates an error set from records in the order they were reported.
    pub fn new(errors: Vec<ErrorRecord>) -> Self {
        Self { errors }
    }

    /// Returns the path of the first record, or an empty string.
    pub fn path(&self) -> &str {
        self.errors.first().map_or("", |e| e.path.as_str())
    }

    /// Returns the distinct unknown owners across all records, sorted.
    ///
    /// Records that don't yield an owner are skipped. The result is the same
    /// regardless of record order or duplication.
    pub fn unique_owners(&self) -> Vec<&str> {
        let owners: BTreeSet<&str> = self
            .errors
            .iter()
            .map(ErrorRecord::unknown_owner)
            .filter(|owner| !owner.is_empty())
            .collect();

        trace!(
            "{} unique unknown owner(s) in {} error(s)",
            owners.len(),
            self.errors.len()
        );
        owners.into_iter().collect()
    }

    /// Indexes the extracted owner of every record by line.
    pub fn line_index(&self) -> LineIndex<'_> {
        LineIndex::build(&self.errors)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over records in reported order.
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRecord> {
        self.errors.iter()
    }

    /// Returns the records as a slice.
    pub fn as_slice(&self) -> &[ErrorRecord] {
        &self.errors
    }
}

impl From<Vec<ErrorRecord>> for ErrorSet {
    fn from(errors: Vec<ErrorRecord>) -> Self {
        Self::new(errors)
    }
}

impl FromIterator<ErrorRecord> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = ErrorRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ErrorSet {
    type Item = ErrorRecord;
    type IntoIter = std::vec::IntoIter<ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Sparse map from 1-based line number to the owners flagged on that line.
///
/// Owners on a line keep the order and multiplicity of the records that
/// produced them, including empty extractions from records that don't name
/// an owner. Lines without records are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex<'a> {
    lines: HashMap<usize, Vec<&'a str>>,
}

impl<'a> LineIndex<'a> {
    fn build(errors: &'a [ErrorRecord]) -> Self {
        let mut lines: HashMap<usize, Vec<&'a str>> = HashMap::with_capacity(errors.len());
        for error in errors {
            // Non-positive lines can never match a line in the file
            let Some(line) = error.line_number() else {
                trace!("Skipping error with line {}", error.line);
                continue;
            };
            lines.entry(line).or_default().push(error.unknown_owner());
        }
        Self { lines }
    }

    /// Returns the owners flagged on `line`, if any record refers to it.
    pub fn get(&self, line: usize) -> Option<&[&'a str]> {
        self.lines.get(&line).map(Vec::as_slice)
    }

    /// Returns true if any record refers to `line`.
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains_key(&line)
    }

    /// Returns the number of distinct lines with records.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line has records.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
