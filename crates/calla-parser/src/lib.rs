//! # Calla Parser
//!
//! Scanner and preparser for the Calla programming language, a statically
//! typed, block-structured language.
//!
//! This crate implements the first two stages of the compiler front end:
//!
//! - The [`scanner`] turns the bytes of one source file into a flat token
//!   vector with recursively balanced bracket groups, full literal and escape
//!   handling, multi-base numeric literals with typed suffixes, and a trailing
//!   end-of-file sentinel.
//! - The [`preparser`] walks the token vector and carves the source into
//!   declaration and statement *skeletons*, capturing nested expression tokens
//!   verbatim for the full parser that runs later.
//!
//! Both stages report structural errors early through the shared
//! [`diagnostics`] sink and keep going after every error, so one run surfaces
//! as many problems as possible. Errors are reported, not returned: a routine
//! that fails to build a construct emits a diagnostic, skips to the next
//! plausible construct boundary, and carries on. The caller consults the
//! sink's error count once the whole file has been processed.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use calla_parser::diagnostics::DiagnosticReporter;
//! use calla_parser::preparser::{PreparseOptions, Preparser};
//! use calla_parser::scanner::Scanner;
//! use calla_source::types::SourceManager;
//!
//! let mut manager = SourceManager::new();
//! let file_id = manager.add_file("hello.cl".to_string(), "val x I32 := 42;".to_string());
//! let manager = Arc::new(manager);
//! let file = manager.get_file(file_id).unwrap();
//!
//! let mut reporter = DiagnosticReporter::new(manager.clone());
//! let tokens = Scanner::new(file_id, file, &mut reporter).run(false);
//! assert_eq!(reporter.error_count(), 0);
//!
//! let info =
//!     Preparser::new(file_id, &tokens, PreparseOptions::default(), &mut reporter).run();
//! assert_eq!(info.decls.len(), 1);
//! ```

pub mod diagnostics;
pub mod preparser;
pub mod scanner;
