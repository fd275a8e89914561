//! # Calla AST
//!
//! Token model and preparse skeleton tree for the Calla programming language.
//!
//! This crate defines the value types shared by the scanner and the preparser:
//!
//! - [`token::Token`] and [`token::TokenKind`]: the flat token enumeration
//!   produced by the scanner, with owned payloads for identifiers, literals,
//!   and documentation comments.
//! - [`token::MacroTokens`]: a borrowed macro body terminated by a synthesised
//!   end-of-file token.
//! - [`nodes`]: the declaration and statement *skeletons* built by the
//!   preparser. Skeletons record construct boundaries and capture nested
//!   expression tokens verbatim as borrowed slices; no expression is parsed
//!   at this stage.
//! - [`info::PreparseInfo`]: the complete preparser output for one file.
//!
//! Every captured token slice borrows from the scanner's token vector, which
//! therefore must outlive the preparse output.

pub mod info;
pub mod nodes;
pub mod token;
