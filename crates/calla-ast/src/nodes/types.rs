//! Type declaration skeleton types: aliases, enums, and records.

use calla_source::types::Location;

use super::{TokenSlice, Visibility};

// ============================================================================
// TypeDecl
// ============================================================================

/// A type declaration:
/// `type <name> [ [<generics>] ] ( alias | enum | record ) = <body> [end|;]`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl<'t> {
    /// `type N alias = <data type> ;`
    Alias(AliasType<'t>),
    /// `type N enum = <variants> end`
    Enum(EnumType<'t>),
    /// `type N record = <fields> end`
    Record(RecordType<'t>),
}

impl TypeDecl<'_> {
    /// Returns the location spanning the whole declaration.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Alias(alias) => alias.location,
            Self::Enum(enum_type) => enum_type.location,
            Self::Record(record) => record.location,
        }
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Alias(alias) => &alias.name,
            Self::Enum(enum_type) => &enum_type.name,
            Self::Record(record) => &record.name,
        }
    }
}

// ============================================================================
// Alias
// ============================================================================

/// A type alias body: a captured data-type token slice.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasType<'t> {
    /// The alias name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// The aliased data-type tokens
    pub data_type: TokenSlice<'t>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

// ============================================================================
// Enum
// ============================================================================

/// One enum variant: `<name> [ : <data type> ] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant<'t> {
    /// The variant name
    pub name: String,
    /// Captured payload data-type tokens, when declared with `:`
    pub data_type: Option<TokenSlice<'t>>,
    /// The span of the variant
    pub location: Location,
}

/// An enum type body: a variant list terminated by `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType<'t> {
    /// The enum name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// The variants, in source order
    pub variants: Vec<EnumVariant<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}

// ============================================================================
// Record
// ============================================================================

/// One record field: `[pub] [mut] <name> <data type> [ := <default> ] ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField<'t> {
    /// The field name
    pub name: String,
    /// Captured data-type tokens
    pub data_type: TokenSlice<'t>,
    /// Captured default-value expression tokens, when present
    pub default: Option<TokenSlice<'t>>,
    /// Declared `pub`
    pub is_pub: bool,
    /// Declared `mut`
    pub is_mut: bool,
    /// The span of the field
    pub location: Location,
}

/// A record type body: a field list terminated by `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType<'t> {
    /// The record name
    pub name: String,
    /// Captured generic parameters
    pub generic_params: Option<Vec<TokenSlice<'t>>>,
    /// The fields, in source order
    pub fields: Vec<RecordField<'t>>,
    /// Visibility of the declaration
    pub visibility: Visibility,
    /// The span of the declaration
    pub location: Location,
}
