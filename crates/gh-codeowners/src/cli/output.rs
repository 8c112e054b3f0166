//! Output formatting for the CLI.
//!
//! This module provides the ANSI decorator used when rendering, the
//! human-readable error listing, and JSON output.

use crate::cli::config::{ColorConfig, Rgb};
use codeowners_annotate_core::render::{Decorate, Style};
use codeowners_annotate_core::{ErrorRecord, ErrorSet};
use colored::{Color, Colorize};
use serde::Serialize;
use std::io::{self, Write};

/// Decorates text with 24-bit ANSI foreground colors.
///
/// Sequences are written directly rather than through `colored`'s override
/// detection, since the caller has already decided color is wanted.
#[derive(Debug, Clone, Copy)]
pub struct AnsiDecorator {
    colors: ColorConfig,
}

impl AnsiDecorator {
    pub fn new(colors: ColorConfig) -> Self {
        Self { colors }
    }
}

fn true_color(rgb: Rgb) -> Color {
    Color::TrueColor {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

impl Decorate for AnsiDecorator {
    fn decorate(&self, text: &str, style: Style) -> String {
        let rgb = match style {
            Style::Error => self.colors.error,
            Style::Comment => self.colors.comment,
        };
        format!("\x1b[{}m{}\x1b[0m", true_color(rgb).to_fg_str(), text)
    }
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes a single error as `path:line:column: kind: message`.
    pub fn write_record(&mut self, record: &ErrorRecord) -> io::Result<()> {
        if !self.use_colors {
            return writeln!(self.writer, "{}", record);
        }

        let location = format!("{}:{}:{}:", record.path, record.line, record.column);
        write!(self.writer, "{} {}", location.bold(), record.kind.as_str().red().bold())?;
        if !record.message.is_empty() {
            write!(self.writer, ": {}", record.message)?;
        }
        writeln!(self.writer)
    }

    /// Writes every error followed by a summary.
    pub fn write_errors(&mut self, errors: &ErrorSet) -> io::Result<()> {
        for record in errors {
            self.write_record(record)?;
        }
        self.write_summary(errors.len())
    }

    /// Writes a summary of the errors found.
    pub fn write_summary(&mut self, total_errors: usize) -> io::Result<()> {
        if total_errors == 0 {
            let message = "✓ CODEOWNERS file is valid";
            if self.use_colors {
                writeln!(self.writer, "{}", message.green().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        } else {
            let message = format!("\n✗ Found {} error(s)", total_errors);
            if self.use_colors {
                writeln!(self.writer, "{}", message.red().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        }

        Ok(())
    }

    /// Writes one owner per line.
    pub fn write_owners(&mut self, owners: &[&str]) -> io::Result<()> {
        for owner in owners {
            writeln!(self.writer, "{}", owner)?;
        }
        Ok(())
    }
}

/// Writes `value` as JSON followed by a newline.
///
/// Pretty-printed with two-space indentation when `pretty` is set.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
    pretty: bool,
) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ErrorRecord {
        ErrorRecord::unknown_owner_at(".github/CODEOWNERS", 4, 18, "docs/** @writers @unknown")
            .with_message("Unknown owner on line 4")
    }

    #[test]
    fn ansi_decorator_wraps_true_color() {
        let decorator = AnsiDecorator::new(ColorConfig::default());
        assert_eq!(
            decorator.decorate("@unknown", Style::Error),
            "\x1b[38;2;244;71;71m@unknown\x1b[0m"
        );
        assert_eq!(
            decorator.decorate("# comment", Style::Comment),
            "\x1b[38;2;106;153;85m# comment\x1b[0m"
        );
    }

    #[test]
    fn write_errors_plain() {
        let mut buf = Vec::new();
        let errors = ErrorSet::new(vec![record()]);
        HumanOutput::new(&mut buf, false).write_errors(&errors).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ".github/CODEOWNERS:4:18: Unknown owner: Unknown owner on line 4\n\n✗ Found 1 error(s)\n"
        );
    }

    #[test]
    fn write_errors_empty() {
        let mut buf = Vec::new();
        HumanOutput::new(&mut buf, false)
            .write_errors(&ErrorSet::default())
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "✓ CODEOWNERS file is valid\n");
    }

    #[test]
    fn write_record_colored_keeps_text() {
        let mut buf = Vec::new();
        HumanOutput::new(&mut buf, true).write_record(&record()).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains(".github/CODEOWNERS:4:18:"));
        assert!(output.contains("Unknown owner on line 4"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn write_owners_one_per_line() {
        let mut buf = Vec::new();
        HumanOutput::new(&mut buf, false)
            .write_owners(&["@bar", "@foo"])
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "@bar\n@foo\n");
    }

    #[test]
    fn write_json_compact_and_pretty() {
        #[derive(Serialize)]
        struct Entry {
            path: &'static str,
            owners: Vec<&'static str>,
        }
        let value = vec![Entry {
            path: "main.go",
            owners: vec!["@heaths"],
        }];

        let mut buf = Vec::new();
        write_json(&mut buf, &value, false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[{\"path\":\"main.go\",\"owners\":[\"@heaths\"]}]\n"
        );

        let mut buf = Vec::new();
        write_json(&mut buf, &value, true).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[\n  {\n    \"path\": \"main.go\",\n    \"owners\": [\n      \"@heaths\"\n    ]\n  }\n]\n"
        );
    }
}
