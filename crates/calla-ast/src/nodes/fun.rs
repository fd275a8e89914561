//! Function declaration skeleton types.

use calla_source::types::Location;

use super::{FunBodyItem, TokenSlice, Visibility};

/// A function declaration skeleton.
///
/// ```text
/// fun [@<object-impl-path>] <name-or-operator>
///     [ [<generic-params>] ] [ ( <params> ) ]
///     [ when [<cond>]+ ..., ]? [ req [<cond>]+ ..., ]?
///     [ comptime (req|when) [<cond>]+ ... ]?
///     [ <return-data-type> ]
/// = <body> end
/// ```
///
/// Parameters, generic parameters, conditions, and the return data type are
/// captured token slices; only the body is broken into statement skeletons.
#[derive(Debug, Clone, PartialEq)]
pub struct Fun<'t> {
    /// The function name (or operator lexeme for operator-named functions)
    pub name: String,
    /// The `@`-prefixed dotted object path this function is implemented on
    pub object_impl: Option<String>,
    /// Captured generic parameters, one slice per comma-separated parameter
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured parameters, one slice per top-level comma
    pub params: Option<Vec<TokenSlice<'t>>>,
    /// `when` conditions, one bracket-delimited slice per `+`-joined condition
    pub when: Vec<TokenSlice<'t>>,
    /// `req` conditions, one bracket-delimited slice per `+`-joined condition
    pub req: Vec<TokenSlice<'t>>,
    /// Whether the `when` conditions are `comptime`
    pub when_is_comptime: bool,
    /// Whether the `req` conditions are `comptime`
    pub req_is_comptime: bool,
    /// Captured return data-type tokens (empty when omitted)
    pub return_data_type: TokenSlice<'t>,
    /// The statement skeletons of the body
    pub body: Vec<FunBodyItem<'t>>,
    /// Whether the function is operator-named
    pub is_operator: bool,
    /// Whether the function is `async`
    pub is_async: bool,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> Fun<'t> {
    /// Creates a new function skeleton with empty clauses.
    #[must_use]
    pub const fn new(
        name: String,
        return_data_type: TokenSlice<'t>,
        body: Vec<FunBodyItem<'t>>,
        visibility: Visibility,
        location: Location,
    ) -> Self {
        Self {
            name,
            object_impl: None,
            generic_params: None,
            params: None,
            when: Vec::new(),
            req: Vec::new(),
            when_is_comptime: false,
            req_is_comptime: false,
            return_data_type,
            body,
            is_operator: false,
            is_async: false,
            visibility,
            location,
        }
    }

    /// Sets the object-impl path.
    #[must_use]
    pub fn with_object_impl(mut self, object_impl: String) -> Self {
        self.object_impl = Some(object_impl);
        self
    }

    /// Sets the generic parameters.
    #[must_use]
    pub fn with_generic_params(mut self, generic_params: Vec<TokenSlice<'t>>) -> Self {
        self.generic_params = Some(generic_params);
        self
    }

    /// Sets the parameters.
    #[must_use]
    pub fn with_params(mut self, params: Vec<TokenSlice<'t>>) -> Self {
        self.params = Some(params);
        self
    }

    /// Marks the function as operator-named.
    #[must_use]
    pub const fn as_operator(mut self) -> Self {
        self.is_operator = true;
        self
    }
}
