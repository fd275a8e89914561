//! The diagnostic sink shared by the scanner and the preparser.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

use calla_source::types::SourceManager;

use super::error::{Diagnostic, DiagnosticLevel};

/// Collects diagnostics and tracks the error count.
///
/// The reporter is owned by the caller and handed to each stage as a mutable
/// borrow. Emission order follows source order modulo lookahead; the reporter
/// is single-threaded by construction. After each stage the caller checks
/// [`DiagnosticReporter::error_count`] and stops the compilation when it is
/// non-zero.
#[derive(Debug, Clone)]
pub struct DiagnosticReporter {
    /// Source manager for rendering source snippets
    source_manager: Arc<SourceManager>,
    /// Collection of diagnostics, in emission order
    diagnostics: Vec<Diagnostic>,
    /// Number of error-level diagnostics emitted so far
    error_count: usize,
}

impl DiagnosticReporter {
    /// Creates a new diagnostic reporter with the given source manager.
    #[must_use]
    pub const fn new(source_manager: Arc<SourceManager>) -> Self {
        Self { source_manager, diagnostics: Vec::new(), error_count: 0 }
    }

    /// Emits a diagnostic, bumping the error count for error-level records.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == DiagnosticLevel::Error {
            self.error_count += 1;
        }

        self.diagnostics.push(diagnostic);
    }

    /// Returns the number of error-level diagnostics emitted so far.
    #[must_use]
    pub const fn error_count(&self) -> usize { self.error_count }

    /// Returns true if any error-level diagnostic has been emitted.
    #[must_use]
    pub const fn has_errors(&self) -> bool { self.error_count > 0 }

    /// Returns the number of diagnostics, warnings included.
    #[must_use]
    pub const fn len(&self) -> usize { self.diagnostics.len() }

    /// Returns true if no diagnostic has been emitted.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.diagnostics.is_empty() }

    /// Returns the collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }

    /// Returns the source manager used for rendering.
    #[must_use]
    pub const fn source_manager(&self) -> &Arc<SourceManager> { &self.source_manager }

    /// Formats all diagnostics in a style similar to rustc.
    ///
    /// ```text
    /// error[unclosed-string-literal]: unclosed string literal
    ///   --> file.cl:10:5
    ///    |
    /// 10 |     val x Str := "oops;
    ///    |                  ^^^^^^
    ///    |
    ///    = help: add `"` to the end of string literal
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();

        for diagnostic in &self.diagnostics {
            self.render_diagnostic(&mut output, diagnostic);
        }

        output
    }

    /// Prints all diagnostics to the given writer.
    ///
    /// ## Errors
    ///
    /// Returns an I/O error if writing to the output writer fails.
    pub fn print<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", self.render())
    }

    /// Renders a single diagnostic and appends it to the given string.
    fn render_diagnostic(&self, output: &mut String, diagnostic: &Diagnostic) {
        let Some(file) = self.source_manager.get_file(diagnostic.file) else {
            // Fallback format if the file isn't available
            let _ = writeln!(output, "{}: {}", diagnostic.level, diagnostic.code);
            return;
        };

        let color = diagnostic.level.color_code();
        let reset = DiagnosticLevel::reset_code();

        // Header line
        let _ = write!(
            output,
            "{}{}{}[{}]: {}",
            color,
            diagnostic.level,
            reset,
            diagnostic.code.as_str(),
            diagnostic.code
        );

        if let Some(detail) = &diagnostic.detail {
            let _ = write!(output, " ({detail})");
        }

        output.push('\n');

        // File location line
        let _ = writeln!(
            output,
            "  --> {}:{}:{}",
            file.name, diagnostic.location.start.line, diagnostic.location.start.column
        );

        // Empty line with pipe
        let _ = writeln!(output, "   |");

        // Source line with line number and underline
        if let Some(line_text) =
            self.source_manager.line_at_position(diagnostic.file, diagnostic.location.start)
        {
            let _ = writeln!(output, "{:>3} | {}", diagnostic.location.start.line, line_text);

            let column = diagnostic.location.start.column;
            let underline_spaces = " ".repeat(column - 1);
            let underline_length =
                if diagnostic.location.start.line == diagnostic.location.end.line {
                    (diagnostic.location.end.column - diagnostic.location.start.column).max(1)
                } else {
                    line_text.len().saturating_sub(column - 1).max(1)
                };

            let underline = "^".repeat(underline_length);

            let _ = writeln!(output, "    | {underline_spaces}{color}{underline}{reset}");
        }

        // Empty line with pipe
        output.push_str("   |\n");

        // Help and notes
        for help in &diagnostic.help {
            let _ = writeln!(output, "   = help: {help}");
        }

        for note in &diagnostic.notes {
            let _ = writeln!(output, "   = note: {note}");
        }

        // Empty line between diagnostics
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use calla_source::types::{FileID, Location, Position};

    use super::*;
    use crate::diagnostics::DiagnosticCode;

    fn setup() -> (DiagnosticReporter, FileID) {
        let mut manager = SourceManager::new();
        let file_id = manager.add_file("test.cl".to_string(), "val x := ;\n".to_string());

        (DiagnosticReporter::new(Arc::new(manager)), file_id)
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let (mut reporter, file_id) = setup();
        let location =
            Location::new(Position::new(1, 1, 0), Position::new(1, 2, 1), file_id);

        reporter.emit(Diagnostic::warning(DiagnosticCode::UnusedSemicolon, file_id, location));
        assert_eq!(reporter.error_count(), 0);
        assert!(!reporter.has_errors());

        reporter.emit(Diagnostic::error(DiagnosticCode::ExpectedExpression, file_id, location));
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.len(), 2);
    }

    #[test]
    fn test_render_includes_location_and_snippet() {
        let (mut reporter, file_id) = setup();
        let location =
            Location::new(Position::new(1, 10, 9), Position::new(1, 11, 10), file_id);

        reporter.emit(
            Diagnostic::error(DiagnosticCode::ExpectedExpression, file_id, location)
                .with_help("write an expression after `:=`"),
        );

        let rendered = reporter.render();

        assert!(rendered.contains("--> test.cl:1:10"));
        assert!(rendered.contains("val x := ;"));
        assert!(rendered.contains("= help: write an expression after `:=`"));
    }
}
