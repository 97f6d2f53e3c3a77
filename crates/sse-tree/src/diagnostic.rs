//! Diagnostic rendering for parse errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use sse_parse::Location;

use crate::error::ParseError;

impl ParseError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with
    /// source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = span_for(self.location(), source);
        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(label_text(self))
                    .with_color(Color::Red),
            );
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

fn label_text(err: &ParseError) -> &'static str {
    match err {
        ParseError::Syntax(_) => "invalid syntax here",
        ParseError::Build(_) => "problem here",
    }
}

/// Byte range for a line/column location, clamped to the source.
fn span_for(location: Location, source: &str) -> std::ops::Range<usize> {
    if !location.is_known() {
        return source.len()..source.len();
    }

    let mut offset = 0;
    for (i, line) in source.split('\n').enumerate() {
        if i + 1 == location.line as usize {
            let column = (location.column as usize).saturating_sub(1);
            for (j, (byte, _)) in line.char_indices().enumerate() {
                if j == column {
                    offset += byte;
                    return offset..(offset + 1).min(source.len());
                }
            }
            offset += line.len();
            return offset..(offset + 1).min(source.len());
        }
        offset += line.len() + 1;
    }
    source.len()..source.len()
}
