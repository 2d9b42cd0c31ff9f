//! Fancy diagnostics support using `ariadne`.
//!
//! [`QuaParseError`] knows the byte offset where the YAML parser stopped, so it can point at the
//! offending value in the `.qua` source. Ariadne handles the row/column calculations for display.
//!
//! # Usage Example
//!
//! ```rust
//! use qua2osu::{diagnostics::emit_qua_error, qua::parse_qua};
//!
//! let source = "Mode: Keys4\nHitObjects:\n- Lane: left\n";
//! if let Err(err) = parse_qua(source) {
//!     emit_qua_error("broken.qua", source, &err);
//! }
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{convert::ConvertError, qua::QuaParseError};

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

// One character wide span at `index`, or an empty span at the end of the text.
fn span_at(text: &str, index: Option<usize>) -> std::ops::Range<usize> {
    let mut start = index.unwrap_or(0).min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let end = text[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

impl ToAriadne for QuaParseError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let range = span_at(src.text(), self.index());
        build_report(
            src,
            ReportKind::Error,
            range,
            "invalid qua",
            self,
            Color::Red,
        )
    }
}

impl ToAriadne for ConvertError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        match self {
            Self::Parse(err) => err.to_report(src),
            other => build_report(
                src,
                ReportKind::Error,
                span_at(src.text(), None),
                "conversion failed",
                other,
                Color::Red,
            ),
        }
    }
}

/// Convenience method: render a [`QuaParseError`] to stderr.
pub fn emit_qua_error(name: &str, source: &str, error: &QuaParseError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Convenience method: render a [`ConvertError`] to stderr.
pub fn emit_convert_error(name: &str, source: &str, error: &ConvertError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Build the report of a [`ConvertError`] without printing it.
///
/// This is useful in tests to verify diagnostics can be generated while keeping test output clean.
#[must_use]
pub fn collect_convert_report<'a>(
    name: &'a str,
    source: &'a str,
    error: &ConvertError,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    error.to_report(&SimpleSource::new(name, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_stays_in_bounds() {
        assert_eq!(span_at("abc", Some(1)), 1..2);
        assert_eq!(span_at("abc", Some(10)), 3..3);
        assert_eq!(span_at("", None), 0..0);
        assert_eq!(span_at("é", Some(0)), 0..2);
    }
}
