//! Declaration skeleton types.
//!
//! This file contains the top-level declaration sum type and the declaration
//! families small enough not to warrant their own file: constants, error
//! declarations, `use`/`include`, and modules.

use std::fmt;

use calla_source::types::Location;

use super::{Fun, Lib, MacroExpand, Object, TokenSlice, TypeDecl, Visibility};

// ============================================================================
// Decl
// ============================================================================

/// A top-level (or module-level) declaration skeleton.
///
/// Every variant's location spans from the first token consumed — including a
/// `pub` prefix when present — through the token that closes the declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl<'t> {
    /// `val ... := ... ;` in simple or multiple form
    Constant(Constant<'t>),
    /// `error <name> [...] ;`
    Error(ErrorDecl<'t>),
    /// `fun ... = <body> end`
    Fun(Fun<'t>),
    /// `include <path> ;`
    Include(Include<'t>),
    /// `lib (...) ... = <body> end`
    Lib(Lib<'t>),
    /// `<name>!( ... ) ;`
    MacroExpand(MacroExpand<'t>),
    /// `module <name> = <decls> end`
    Module(ModuleDecl<'t>),
    /// `object ... = <body> end`
    Object(Object<'t>),
    /// `type <name> (alias | enum | record) = <body>`
    Type(TypeDecl<'t>),
    /// `use <path> ;`
    Use(Use<'t>),
}

impl Decl<'_> {
    /// Returns the location spanning the whole declaration.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Constant(constant) => constant.location(),
            Self::Error(error) => error.location,
            Self::Fun(fun) => fun.location,
            Self::Include(include) => include.location,
            Self::Lib(lib) => lib.location,
            Self::MacroExpand(expand) => expand.location,
            Self::Module(module) => module.location,
            Self::Object(object) => object.location(),
            Self::Type(type_decl) => type_decl.location(),
            Self::Use(use_decl) => use_decl.location,
        }
    }
}

// ============================================================================
// Constant
// ============================================================================

/// One constant binding: name, captured data-type tokens, captured expression
/// tokens, and the visibility in force when it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantInfo<'t> {
    /// The constant name
    pub name: String,
    /// Captured expression tokens (right of `:=`)
    pub expr: TokenSlice<'t>,
    /// Captured data-type tokens (between the name and `:=`)
    pub data_type: TokenSlice<'t>,
    /// Visibility of this binding
    pub visibility: Visibility,
    /// The span of this binding
    pub location: Location,
}

impl<'t> ConstantInfo<'t> {
    /// Creates a new constant binding.
    #[must_use]
    pub const fn new(
        name: String,
        expr: TokenSlice<'t>,
        data_type: TokenSlice<'t>,
        visibility: Visibility,
        location: Location,
    ) -> Self {
        Self { name, expr, data_type, visibility, location }
    }
}

/// A constant declaration in simple (`val x ... := ... ;`) or multiple
/// (`val (x ..., y ...) := (..., ...) ;`) form.
///
/// A multiple constant always holds as many expressions and data types as
/// names; when the source provides fewer, the preparser pads with empty
/// slices after emitting a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant<'t> {
    /// A single binding
    Simple(ConstantInfo<'t>),
    /// A destructuring group of bindings
    Multiple(MultipleConstant<'t>),
}

impl Constant<'_> {
    /// Returns the location spanning the whole `val` declaration.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Simple(info) => info.location,
            Self::Multiple(multiple) => multiple.location,
        }
    }
}

/// The bindings of a multiple-form constant declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleConstant<'t> {
    /// The bindings, in source order
    pub constants: Vec<ConstantInfo<'t>>,
    /// The span of the whole declaration
    pub location: Location,
}

impl<'t> MultipleConstant<'t> {
    /// Creates a new multiple-form constant.
    #[must_use]
    pub const fn new(constants: Vec<ConstantInfo<'t>>, location: Location) -> Self {
        Self { constants, location }
    }
}

// ============================================================================
// ErrorDecl
// ============================================================================

/// An error declaration: `error <name> [ [<generics>] ] [ : <data type> ] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDecl<'t> {
    /// The error name
    pub name: String,
    /// Captured payload data-type tokens, when declared with `:`
    pub data_type: Option<TokenSlice<'t>>,
    /// Captured generic parameters, one slice per comma-separated parameter
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> ErrorDecl<'t> {
    /// Creates a new error declaration.
    #[must_use]
    pub const fn new(name: String, visibility: Visibility, location: Location) -> Self {
        Self { name, data_type: None, generic_params: None, visibility, location }
    }

    /// Sets the payload data type.
    #[must_use]
    pub fn with_data_type(mut self, data_type: TokenSlice<'t>) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets the generic parameters.
    #[must_use]
    pub fn with_generic_params(mut self, generic_params: Vec<TokenSlice<'t>>) -> Self {
        self.generic_params = Some(generic_params);
        self
    }
}

// ============================================================================
// Use / Include
// ============================================================================

/// A `use <path> ;` declaration; the path is captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Use<'t> {
    /// Captured path tokens
    pub path: TokenSlice<'t>,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> Use<'t> {
    /// Creates a new `use` declaration.
    #[must_use]
    pub const fn new(path: TokenSlice<'t>, location: Location) -> Self { Self { path, location } }
}

/// An `include <path> ;` declaration; the path is captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Include<'t> {
    /// Captured path tokens
    pub path: TokenSlice<'t>,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> Include<'t> {
    /// Creates a new `include` declaration.
    #[must_use]
    pub const fn new(path: TokenSlice<'t>, location: Location) -> Self { Self { path, location } }
}

// ============================================================================
// ModuleDecl
// ============================================================================

/// A module declaration: `module <dotted-name> = <decl>* end`.
///
/// The body recursively holds any top-level declaration form.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl<'t> {
    /// The dotted module name
    pub name: String,
    /// The declarations inside the module
    pub body: Vec<Decl<'t>>,
    /// Visibility of the module
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

impl<'t> ModuleDecl<'t> {
    /// Creates a new module declaration.
    #[must_use]
    pub const fn new(
        name: String,
        body: Vec<Decl<'t>>,
        visibility: Visibility,
        location: Location,
    ) -> Self {
        Self { name, body, visibility, location }
    }
}

impl fmt::Display for ModuleDecl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {} ({} declarations)", self.name, self.body.len())
    }
}
