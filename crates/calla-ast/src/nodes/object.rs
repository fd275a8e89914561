//! Object declaration skeleton types: classes, traits, record objects, and
//! enum objects.
//!
//! ```text
//! [pub] [close] object [impl[<...>] in] [inherit[<...>] in] <name>
//!     [ [<generics>] ] ( class | trait | record | enum ) = <body> end
//! ```
//!
//! `impl` and `inherit` clauses each appear at most once and may list several
//! paths joined by `+`. Traits reject `impl`; record and enum objects reject
//! `inherit`; `close` applies only to classes and traits.

use calla_source::types::Location;

use super::{Constant, EnumVariant, Fun, MacroExpand, RecordField, TokenSlice, Visibility};

// ============================================================================
// Object
// ============================================================================

/// An object declaration skeleton.
#[derive(Debug, Clone, PartialEq)]
pub enum Object<'t> {
    /// `object ... class = <attributes, methods> end`
    Class(Class<'t>),
    /// `object ... trait = <attributes, prototypes> end`
    Trait(TraitObject<'t>),
    /// `object ... record = <fields, constants, methods> end`
    Record(RecordObject<'t>),
    /// `object ... enum = <variants, constants, methods> end`
    Enum(EnumObject<'t>),
}

impl Object<'_> {
    /// Returns the location spanning the whole declaration.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Class(class) => class.location,
            Self::Trait(trait_object) => trait_object.location,
            Self::Record(record) => record.location,
            Self::Enum(enum_object) => enum_object.location,
        }
    }

    /// Returns the declared object name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(class) => &class.name,
            Self::Trait(trait_object) => &trait_object.name,
            Self::Record(record) => &record.name,
            Self::Enum(enum_object) => &enum_object.name,
        }
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// An object attribute:
/// `[pub|global] val <name> <type> [ := <expr> ] [ :: get|set [, get|set] ] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'t> {
    /// The attribute name
    pub name: String,
    /// Captured data-type tokens
    pub data_type: TokenSlice<'t>,
    /// Captured default-value expression tokens, when present
    pub expr: Option<TokenSlice<'t>>,
    /// A getter was requested (`:: get`)
    pub is_get: bool,
    /// A setter was requested (`:: set`)
    pub is_set: bool,
    /// Visibility of the attribute
    pub visibility: Visibility,
    /// The span of the attribute
    pub location: Location,
}

// ============================================================================
// Class
// ============================================================================

/// One item of a class body.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassBodyItem<'t> {
    /// An attribute
    Attribute(Attribute<'t>),
    /// A method
    Method(Fun<'t>),
    /// A macro expansion site
    MacroExpand(MacroExpand<'t>),
}

/// A class object.
#[derive(Debug, Clone, PartialEq)]
pub struct Class<'t> {
    /// The class name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured `impl` paths, one slice per `+`-joined path
    pub impls: Option<Vec<TokenSlice<'t>>>,
    /// Captured `inherit` paths, one slice per `+`-joined path
    pub inherits: Option<Vec<TokenSlice<'t>>>,
    /// Declared `close`
    pub is_close: bool,
    /// The class body items
    pub body: Vec<ClassBodyItem<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

// ============================================================================
// Trait
// ============================================================================

/// A method prototype: `fun <name> [ [<gen>] ] [(<params>)] [<ret>] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype<'t> {
    /// The prototype name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured parameters, one slice per top-level comma
    pub params: Option<Vec<TokenSlice<'t>>>,
    /// Captured return data-type tokens (empty when omitted)
    pub return_data_type: TokenSlice<'t>,
    /// The span of the prototype
    pub location: Location,
}

/// One item of a trait body.
#[derive(Debug, Clone, PartialEq)]
pub enum TraitBodyItem<'t> {
    /// An attribute
    Attribute(Attribute<'t>),
    /// A method prototype
    Prototype(Prototype<'t>),
    /// A macro expansion site
    MacroExpand(MacroExpand<'t>),
}

/// A trait object. Traits may `inherit` but never `impl`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitObject<'t> {
    /// The trait name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured `inherit` paths, one slice per `+`-joined path
    pub inherits: Option<Vec<TokenSlice<'t>>>,
    /// Declared `close`
    pub is_close: bool,
    /// The trait body items
    pub body: Vec<TraitBodyItem<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

// ============================================================================
// Record object
// ============================================================================

/// One item of a record-object body.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordObjectBodyItem<'t> {
    /// A field
    Field(RecordField<'t>),
    /// A constant
    Constant(Constant<'t>),
    /// A method
    Method(Fun<'t>),
    /// A macro expansion site
    MacroExpand(MacroExpand<'t>),
}

/// A record object. Record objects may `impl` but never `inherit`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordObject<'t> {
    /// The record name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured `impl` paths, one slice per `+`-joined path
    pub impls: Option<Vec<TokenSlice<'t>>>,
    /// The record body items
    pub body: Vec<RecordObjectBodyItem<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

// ============================================================================
// Enum object
// ============================================================================

/// One item of an enum-object body.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumObjectBodyItem<'t> {
    /// A variant
    Variant(EnumVariant<'t>),
    /// A constant
    Constant(Constant<'t>),
    /// A method
    Method(Fun<'t>),
    /// A macro expansion site
    MacroExpand(MacroExpand<'t>),
}

/// An enum object. Enum objects may `impl` but never `inherit`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumObject<'t> {
    /// The enum name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// Captured `impl` paths, one slice per `+`-joined path
    pub impls: Option<Vec<TokenSlice<'t>>>,
    /// The enum body items
    pub body: Vec<EnumObjectBodyItem<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}
