//! Decoration capability injected into the renderer.

use std::fmt;

/// The style to decorate a piece of text with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// An owner flagged by a validation error.
    Error,
    /// A comment, from `#` to the end of the line.
    Comment,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Error => write!(f, "error"),
            Style::Comment => write!(f, "comment"),
        }
    }
}

/// Wraps text for display, e.g. with terminal color sequences.
///
/// Implementations must only add to `text`: stripping whatever they insert
/// has to recover the original text exactly.
pub trait Decorate {
    /// Returns the decorated form of `text`.
    fn decorate(&self, text: &str, style: Style) -> String;
}

/// Leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Decorate for Plain {
    fn decorate(&self, text: &str, _style: Style) -> String {
        text.to_string()
    }
}

impl<F> Decorate for F
where
    F: Fn(&str, Style) -> String,
{
    fn decorate(&self, text: &str, style: Style) -> String {
        self(text, style)
    }
}
