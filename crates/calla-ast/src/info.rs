//! The preparser's output for one source file.

use crate::nodes::{Decl, Import, MacroDecl, Package};

/// Everything the preparser recognised in one file: imports and macros split
/// by visibility, the package declaration (at most one), and the ordered
/// declaration skeletons.
///
/// All token slices inside borrow from the scanner's token vector.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PreparseInfo<'t> {
    /// Imports declared `pub`
    pub public_imports: Vec<Import>,
    /// Imports with default visibility
    pub private_imports: Vec<Import>,
    /// Macros declared `pub`
    pub public_macros: Vec<MacroDecl<'t>>,
    /// Macros with default visibility
    pub private_macros: Vec<MacroDecl<'t>>,
    /// The package declaration, at most one per file
    pub package: Option<Package>,
    /// The top-level declarations, in source order
    pub decls: Vec<Decl<'t>>,
}

impl PreparseInfo<'_> {
    /// Creates an empty preparse result.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the total number of imports, both visibilities included.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.public_imports.len() + self.private_imports.len()
    }

    /// Returns the total number of macros, both visibilities included.
    #[must_use]
    pub fn macro_count(&self) -> usize { self.public_macros.len() + self.private_macros.len() }
}
