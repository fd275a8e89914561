//! Diagnostic reporting for the Calla scanner and preparser.
//!
//! Both stages share one [`DiagnosticReporter`] sink. Diagnostics are
//! structured records — level, code, file, location, plus optional help,
//! notes, and detail text — and the sink keeps a running error count that the
//! caller consults after each stage. Warnings never increment the count.
//!
//! Rendering (rustc-style source snippets with caret underlines) is a
//! capability of the sink, not of the stages: the scanner and preparser only
//! ever *emit* records.

mod error;
mod reporter;

pub use error::{Diagnostic, DiagnosticCode, DiagnosticLevel};
pub use reporter::DiagnosticReporter;
