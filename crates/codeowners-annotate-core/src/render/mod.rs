//! Line-by-line rendering of a CODEOWNERS file with its errors highlighted.
//!
//! The renderer streams the file one line at a time. On lines with errors,
//! each unknown owner is decorated with [`Style::Error`]; anything from the
//! first `#` onward is decorated with [`Style::Comment`]. Nothing else about
//! the line changes, so with decoration disabled the output is identical to
//! the input. Lines are read as bytes; a line that isn't valid UTF-8 is
//! written back untouched.
//!
//! # Example
//!
//! ```rust
//! use codeowners_annotate_core::diagnostics::{ErrorRecord, ErrorSet};
//! use codeowners_annotate_core::render::{RenderOptions, Renderer, Style};
//!
//! let source = "* @default # Default owner(s)\ndocs/** @writers @unknown\n";
//! let errors = ErrorSet::new(vec![ErrorRecord::unknown_owner_at(
//!     "CODEOWNERS",
//!     2,
//!     18,
//!     "docs/** @writers @unknown",
//! )]);
//!
//! let brackets = |text: &str, _style: Style| format!("[{text}]");
//! let renderer = Renderer::new(&errors, &brackets, RenderOptions::decorated());
//!
//! let mut out = Vec::new();
//! renderer.render(source.as_bytes(), &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "* @default [# Default owner(s)]\ndocs/** @writers [@unknown]\n"
//! );
//! ```

mod decorate;

pub use decorate::{Decorate, Plain, Style};

use crate::diagnostics::{ErrorSet, LineIndex};
use log::{debug, trace};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Options controlling a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether decoration is applied at all. Disabled when output is not a
    /// terminal, in which case lines are emitted unchanged.
    pub decorate: bool,
}

impl RenderOptions {
    /// Creates options with decoration disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with decoration enabled.
    pub fn decorated() -> Self {
        Self { decorate: true }
    }

    /// Sets whether decoration is applied.
    pub fn with_decoration(mut self, decorate: bool) -> Self {
        self.decorate = decorate;
        self
    }
}

/// Errors from a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Reading the CODEOWNERS file failed.
    #[error("failed to read CODEOWNERS file: {0}")]
    Read(#[source] io::Error),

    /// Writing the rendered lines failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Rewrites lines of a CODEOWNERS file using the errors reported for it.
pub struct Renderer<'a> {
    index: LineIndex<'a>,
    decorator: &'a dyn Decorate,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer for the file `errors` refer to.
    pub fn new(errors: &'a ErrorSet, decorator: &'a dyn Decorate, options: RenderOptions) -> Self {
        Self {
            index: errors.line_index(),
            decorator,
            options,
        }
    }

    /// Renders a single line (without its terminator).
    ///
    /// Each flagged owner replaces its first occurrence in the line as
    /// rewritten so far. The search is a plain substring match, so an owner
    /// like `@foo` also matches inside `@foobar` if that comes first.
    pub fn render_line(&self, line_number: usize, line: &str) -> String {
        let mut line = line.to_string();
        if !self.options.decorate {
            return line;
        }

        if let Some(owners) = self.index.get(line_number) {
            for &owner in owners.iter().filter(|owner| !owner.is_empty()) {
                let decorated = self.decorator.decorate(owner, Style::Error);
                line = line.replacen(owner, &decorated, 1);
            }
        }

        if let Some(idx) = line.find('#') {
            let comment = self.decorator.decorate(&line[idx..], Style::Comment);
            line.truncate(idx);
            line.push_str(&comment);
        }

        line
    }

    /// Renders a single line of raw bytes (without its terminator).
    ///
    /// Lines with nothing to decorate are returned borrowed and unchanged.
    /// Lines that need decorating but aren't valid UTF-8 are also left as is.
    pub fn render_bytes<'l>(&self, line_number: usize, line: &'l [u8]) -> Cow<'l, [u8]> {
        if !self.needs_rewrite(line_number, line) {
            return Cow::Borrowed(line);
        }

        match std::str::from_utf8(line) {
            Ok(text) => Cow::Owned(self.render_line(line_number, text).into_bytes()),
            Err(e) => {
                trace!("Line {} is not UTF-8 ({}), leaving it undecorated", line_number, e);
                Cow::Borrowed(line)
            }
        }
    }

    fn needs_rewrite(&self, line_number: usize, line: &[u8]) -> bool {
        self.options.decorate && (self.index.contains(line_number) || line.contains(&b'#'))
    }

    /// Returns an iterator over the rendered lines of `reader`.
    ///
    /// Each item includes the line terminator the input line had (`\n`,
    /// `\r\n`, or none for a final unterminated line).
    pub fn lines<R: BufRead>(&self, reader: R) -> RenderedLines<'_, 'a, R> {
        RenderedLines {
            renderer: self,
            reader,
            line_number: 0,
            done: false,
        }
    }

    /// Renders every line of `reader` to `writer`.
    ///
    /// Returns the number of lines written. Read and write errors abort the
    /// pass; lines already written stay written.
    pub fn render<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<usize, RenderError> {
        let mut count = 0;
        for line in self.lines(reader) {
            let line = line.map_err(RenderError::Read)?;
            writer.write_all(&line).map_err(RenderError::Write)?;
            count += 1;
        }
        writer.flush().map_err(RenderError::Write)?;
        debug!("Rendered {} line(s)", count);
        Ok(count)
    }
}

/// Iterator over rendered lines, created by [`Renderer::lines`].
pub struct RenderedLines<'r, 'a, R> {
    renderer: &'r Renderer<'a>,
    reader: R,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> Iterator for RenderedLines<'_, '_, R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                let (content, terminator) = split_terminator(&buf);
                let rewritten = match self.renderer.render_bytes(self.line_number, content) {
                    Cow::Borrowed(_) => None,
                    Cow::Owned(line) => Some(line),
                };
                match rewritten {
                    Some(mut line) => {
                        line.extend_from_slice(terminator);
                        Some(Ok(line))
                    }
                    None => Some(Ok(buf)),
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Splits a line into its content and its terminator.
fn split_terminator(line: &[u8]) -> (&[u8], &'static [u8]) {
    if let Some(content) = line.strip_suffix(b"\r\n") {
        (content, b"\r\n")
    } else if let Some(content) = line.strip_suffix(b"\n") {
        (content, b"\n")
    } else {
        (line, b"")
    }
}

/// Opens `path` relative to `root` and renders it to `writer`.
///
/// An absolute `path` is opened as is.
pub fn render_file<P: AsRef<Path>, W: Write>(
    root: &Path,
    path: P,
    errors: &ErrorSet,
    decorator: &dyn Decorate,
    options: RenderOptions,
    writer: W,
) -> Result<usize, crate::Error> {
    let full_path = root.join(path);
    debug!("Rendering {}", full_path.display());
    let file = File::open(&full_path)?;
    Ok(Renderer::new(errors, decorator, options).render(BufReader::new(file), writer)?)
}
