//! Macro declaration and macro expansion skeleton types.

use calla_source::types::Location;

use super::TokenSlice;
use crate::token::MacroTokens;

/// A macro declaration: `macro <name> [ ( <param>, ... ) ] = { <tokens> } ;`.
///
/// The body is recorded verbatim and terminated by a synthesised end-of-file
/// token (see [`MacroTokens`]); expansion happens in a later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroDecl<'t> {
    /// The macro name
    pub name: String,
    /// Captured parameters, one slice per comma-separated parameter
    pub params: Option<Vec<TokenSlice<'t>>>,
    /// The raw macro body
    pub tokens: MacroTokens<'t>,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> MacroDecl<'t> {
    /// Creates a new macro declaration.
    #[must_use]
    pub const fn new(name: String, tokens: MacroTokens<'t>, location: Location) -> Self {
        Self { name, params: None, tokens, location }
    }

    /// Sets the parameter list.
    #[must_use]
    pub fn with_params(mut self, params: Vec<TokenSlice<'t>>) -> Self {
        self.params = Some(params);
        self
    }
}

/// A macro expansion site: `<name>!( <arg>, ... ) ;`.
///
/// Usable both as a declaration and as a function-body item. Arguments are
/// captured token slices split at top-level commas; `()` is an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroExpand<'t> {
    /// The macro name
    pub name: String,
    /// Captured arguments, one slice per top-level comma
    pub args: Option<Vec<TokenSlice<'t>>>,
    /// The span of the expansion site
    pub location: Location,
}

impl<'t> MacroExpand<'t> {
    /// Creates a new macro expansion.
    #[must_use]
    pub const fn new(name: String, location: Location) -> Self {
        Self { name, args: None, location }
    }

    /// Sets the argument list.
    #[must_use]
    pub fn with_args(mut self, args: Vec<TokenSlice<'t>>) -> Self {
        self.args = Some(args);
        self
    }
}
