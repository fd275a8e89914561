//! Preparse skeleton node definitions.
//!
//! This module provides the node types built by the preparser, organized by
//! family. A skeleton records a construct's boundaries, names, and modifier
//! flags, and captures every embedded expression as a borrowed token slice —
//! full expression parsing happens in a later stage.

mod body;
mod decl;
mod fun;
mod library;
mod macros;
mod modules;
mod object;
mod types;

use std::fmt;

pub use body::*;
pub use decl::*;
pub use fun::*;
pub use library::*;
pub use macros::*;
pub use modules::*;
pub use object::*;
pub use types::*;

use crate::token::Token;

/// A borrowed range of the scanner's token vector.
///
/// Slices are how the preparser defers expression parsing: the tokens of a
/// nested expression are captured verbatim and handed to the full parser
/// later. The token vector must outlive every slice.
pub type TokenSlice<'t> = &'t [Token];

/// The visibility attached to a declaration or member.
///
/// A fresh top-level iteration always begins `Private`; a `pub` prefix makes
/// the next declaration `Public`, and `global` inside class and trait bodies
/// makes the next member `Static`. Visibility never leaks past the
/// declaration it was set for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible only inside the enclosing scope (the default)
    #[default]
    Private,
    /// Exported from the enclosing scope (`pub`)
    Public,
    /// Shared by all instances of the enclosing object (`global`)
    Static,
}

impl Visibility {
    /// Returns the source keyword for this visibility, if any.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "pub",
            Self::Static => "global",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}
