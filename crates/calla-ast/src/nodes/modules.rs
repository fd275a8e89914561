//! Import and package skeleton types.

use calla_source::types::Location;

use super::Visibility;

// ============================================================================
// Import
// ============================================================================

/// An import declaration: `import "<path>" [as <ident>] ;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The import path, as written in the string literal
    pub value: String,
    /// Optional alias (`as <ident>`)
    pub as_name: Option<String>,
    /// The span of the declaration
    pub location: Location,
}

impl Import {
    /// Creates a new import.
    #[must_use]
    pub const fn new(value: String, location: Location) -> Self {
        Self { value, as_name: None, location }
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_as_name(mut self, as_name: String) -> Self {
        self.as_name = Some(as_name);
        self
    }
}

// ============================================================================
// Package
// ============================================================================

/// One sub-package entry of a package declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPackage {
    /// Visibility of the sub-package entry
    pub visibility: Visibility,
    /// The sub-path as written
    pub name: String,
    /// The fully qualified name: the configured default package access (when
    /// any), a `.`, then the sub-path
    pub global_name: String,
}

impl SubPackage {
    /// Creates a new sub-package entry.
    #[must_use]
    pub const fn new(visibility: Visibility, name: String, global_name: String) -> Self {
        Self { visibility, name, global_name }
    }
}

/// A package declaration: `package [<name>] = { [pub] .<sub-path>; }* end`.
///
/// At most one package declaration may appear per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Optional package name
    pub name: Option<String>,
    /// The declared sub-packages, in source order
    pub sub_packages: Vec<SubPackage>,
    /// The span of the declaration
    pub location: Location,
}

impl Package {
    /// Creates a new package declaration.
    #[must_use]
    pub const fn new(name: Option<String>, sub_packages: Vec<SubPackage>, location: Location) -> Self {
        Self { name, sub_packages, location }
    }
}
