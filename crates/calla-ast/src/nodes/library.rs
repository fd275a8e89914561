//! Foreign library declaration skeleton types.
//!
//! ```text
//! lib ( "<C|CC|CPP>" ) <name>? = <body> end
//! ```

use calla_source::types::Location;

use super::TokenSlice;

/// The foreign language a `lib` block binds against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibFrom {
    /// C (`"C"` or `"CC"`)
    Cc,
    /// C++ (`"CPP"`)
    Cpp,
}

/// A constant prototype inside a `lib` body: `val <name> <type> ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct LibConstant<'t> {
    /// The constant name
    pub name: String,
    /// Captured data-type tokens
    pub data_type: TokenSlice<'t>,
    /// The span of the prototype
    pub location: Location,
}

/// A function prototype inside a `lib` body:
/// `fun <name> [ (<params>) ] <ret> [ := <new-name> ] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct LibFun<'t> {
    /// The function name as declared
    pub name: String,
    /// Captured parameters, one slice per top-level comma
    pub params: Option<Vec<TokenSlice<'t>>>,
    /// Captured return data-type tokens
    pub return_data_type: TokenSlice<'t>,
    /// The linked symbol name, when renamed with `:=`
    pub link_name: Option<String>,
    /// The span of the prototype
    pub location: Location,
}

/// One item of a `lib` body.
///
/// `type` and `object` items are reserved by the grammar but not implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum LibBodyItem<'t> {
    /// A constant prototype
    Constant(LibConstant<'t>),
    /// A function prototype
    Fun(LibFun<'t>),
}

/// A foreign library declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Lib<'t> {
    /// Optional library name
    pub name: Option<String>,
    /// The foreign language
    pub from: LibFrom,
    /// The body prototypes
    pub body: Vec<LibBodyItem<'t>>,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> Lib<'t> {
    /// Creates a new library declaration.
    #[must_use]
    pub const fn new(
        name: Option<String>,
        from: LibFrom,
        body: Vec<LibBodyItem<'t>>,
        location: Location,
    ) -> Self {
        Self { name, from, body, location }
    }
}
