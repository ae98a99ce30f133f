//! LSP type conversion utilities.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use coffeelint_core::{Annotation, Severity};

/// `source` of every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "coffeelint";

/// Converts an annotation to an LSP diagnostic.
pub fn to_lsp_diagnostic(annotation: &Annotation, text: &str) -> Option<Diagnostic> {
    let range = offset_to_range(annotation.range.start, annotation.range.end, text)?;

    let severity = match annotation.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Some(Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(annotation.source.clone())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: annotation.message.clone(),
        ..Default::default()
    })
}

/// Converts byte offsets to an LSP range.
pub fn offset_to_range(start: usize, end: usize, text: &str) -> Option<Range> {
    let start_pos = offset_to_position(start, text)?;
    let end_pos = offset_to_position(end, text)?;
    Some(Range::new(start_pos, end_pos))
}

/// Converts a byte offset to an LSP position (UTF-16 columns).
pub fn offset_to_position(offset: usize, text: &str) -> Option<Position> {
    if offset > text.len() {
        return None;
    }

    let mut line = 0u32;
    let mut col = 0u32;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += ch.len_utf16() as u32;
        }

        current_offset += ch.len_utf8();
    }

    Some(Position::new(line, col))
}
