//! Function-body statement skeleton types.
//!
//! A function body is a sequence of [`FunBodyItem`]s. Each item records its
//! own boundaries; embedded expressions stay captured token slices. Block
//! statements (`if`, `for`, `while`, `try`, ...) hold nested item sequences.

use calla_source::types::Location;

use super::{MacroExpand, TokenSlice};

// ============================================================================
// FunBodyItem
// ============================================================================

/// One statement skeleton inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum FunBodyItem<'t> {
    /// A run of expression tokens up to a statement terminator
    Exprs(ExprsItem<'t>),
    /// A lambda expression, optionally immediately invoked
    Lambda(Lambda<'t>),
    /// A macro expansion site
    MacroExpand(MacroExpand<'t>),
    /// `asm ( <token>, ... ) ;`
    Asm(AsmStmt<'t>),
    /// `await <expr> ;`
    Await(AwaitStmt<'t>),
    /// `begin <body> end` or `@{ <body> }`
    Block(BlockStmt<'t>),
    /// `break [<ident>] ;`
    Break(BreakStmt),
    /// `defer <item> ;`
    Defer(DeferStmt<'t>),
    /// `drop <expr> ;`
    Drop(DropStmt<'t>),
    /// `for [(<name>)] <expr> [:> <capture>] do <body> end`
    For(ForStmt<'t>),
    /// `if ... [elif ...]* [else ...] end`
    If(IfStmt<'t>),
    /// `match <expr> do <arms> end`
    Match(MatchStmt<'t>),
    /// `next [<ident>] ;`
    Next(NextStmt),
    /// `raise <expr> ;`
    Raise(RaiseStmt<'t>),
    /// `return [<expr>] ;`
    Return(ReturnStmt<'t>),
    /// `try do <body> [catch [<expr>] do <body>] end`
    Try(TryStmt<'t>),
    /// `unsafe = <body> end`
    Unsafe(UnsafeStmt<'t>),
    /// `[ref:|trace:|drop:] (val|mut) <name> [<type>] := <expr> ;`
    Var(VarStmt<'t>),
    /// `while <expr> do <body> end`
    While(WhileStmt<'t>),
}

impl FunBodyItem<'_> {
    /// Returns the location spanning the whole item.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Exprs(item) => item.location,
            Self::Lambda(lambda) => lambda.location,
            Self::MacroExpand(expand) => expand.location,
            Self::Asm(stmt) => stmt.location,
            Self::Await(stmt) => stmt.location,
            Self::Block(stmt) => stmt.location,
            Self::Break(stmt) => stmt.location,
            Self::Defer(stmt) => stmt.location,
            Self::Drop(stmt) => stmt.location,
            Self::For(stmt) => stmt.location,
            Self::If(stmt) => stmt.location,
            Self::Match(stmt) => stmt.location,
            Self::Next(stmt) => stmt.location,
            Self::Raise(stmt) => stmt.location,
            Self::Return(stmt) => stmt.location,
            Self::Try(stmt) => stmt.location,
            Self::Unsafe(stmt) => stmt.location,
            Self::Var(stmt) => stmt.location,
            Self::While(stmt) => stmt.location,
        }
    }

    /// Returns true for items that close themselves with `end` or `}` and
    /// need no trailing semicolon.
    #[must_use]
    pub const fn is_block_shaped(&self) -> bool {
        matches!(
            self,
            Self::Block(_)
                | Self::For(_)
                | Self::If(_)
                | Self::Match(_)
                | Self::Try(_)
                | Self::Unsafe(_)
                | Self::While(_)
        )
    }
}

// ============================================================================
// Exprs
// ============================================================================

/// A run of expression tokens forming one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprsItem<'t> {
    /// The captured tokens
    pub tokens: TokenSlice<'t>,
    /// The span of the run
    pub location: Location,
}

impl<'t> ExprsItem<'t> {
    /// Creates a new expression run.
    #[must_use]
    pub const fn new(tokens: TokenSlice<'t>, location: Location) -> Self {
        Self { tokens, location }
    }
}

// ============================================================================
// Lambda
// ============================================================================

/// A lambda: `fun <name>? [(<params>)] [<ret>] -> <item> ;` with an optional
/// immediate-invocation clause `\ ( <params-call> ) ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda<'t> {
    /// Optional lambda name
    pub name: Option<String>,
    /// Captured parameters, one slice per top-level comma
    pub params: Option<Vec<TokenSlice<'t>>>,
    /// Captured return data-type tokens (empty when omitted)
    pub return_data_type: TokenSlice<'t>,
    /// The single item after `->`
    pub item: Box<FunBodyItem<'t>>,
    /// Call-site arguments of the immediate invocation, when present
    pub call_params: Option<Vec<TokenSlice<'t>>>,
    /// The span of the lambda
    pub location: Location,
}

impl<'t> Lambda<'t> {
    /// Creates a new lambda.
    #[must_use]
    pub const fn new(
        return_data_type: TokenSlice<'t>,
        item: Box<FunBodyItem<'t>>,
        location: Location,
    ) -> Self {
        Self { name: None, params: None, return_data_type, item, call_params: None, location }
    }
}

// ============================================================================
// Simple statements
// ============================================================================

/// `asm ( <token>, ... ) ;`
#[derive(Debug, Clone, PartialEq)]
pub struct AsmStmt<'t> {
    /// The captured assembly parameters
    pub params: Vec<TokenSlice<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `await <expr> ;`
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitStmt<'t> {
    /// The awaited expression tokens
    pub expr: TokenSlice<'t>,
    /// The span of the statement
    pub location: Location,
}

/// `begin <body> end` or `@{ <body> }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt<'t> {
    /// The nested items
    pub body: Vec<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `break [<ident>] ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakStmt {
    /// Optional loop label
    pub name: Option<String>,
    /// The span of the statement
    pub location: Location,
}

/// `defer <item> ;`
#[derive(Debug, Clone, PartialEq)]
pub struct DeferStmt<'t> {
    /// The deferred item
    pub item: Box<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `drop <expr> ;`
#[derive(Debug, Clone, PartialEq)]
pub struct DropStmt<'t> {
    /// The dropped expression tokens
    pub expr: TokenSlice<'t>,
    /// The span of the statement
    pub location: Location,
}

/// `next [<ident>] ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextStmt {
    /// Optional loop label
    pub name: Option<String>,
    /// The span of the statement
    pub location: Location,
}

/// `raise <expr> ;`
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseStmt<'t> {
    /// The raised expression tokens
    pub expr: TokenSlice<'t>,
    /// The span of the statement
    pub location: Location,
}

/// `return [<expr>] ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt<'t> {
    /// The returned expression tokens, when present
    pub expr: Option<TokenSlice<'t>>,
    /// The span of the statement
    pub location: Location,
}

// ============================================================================
// Control flow
// ============================================================================

/// `for [(<name>)] <expr> [:> <capture>] do <body> end`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt<'t> {
    /// Optional loop label
    pub name: Option<String>,
    /// The head expression tokens
    pub expr: TokenSlice<'t>,
    /// The capture clause tokens, when present
    pub capture: Option<TokenSlice<'t>>,
    /// The loop body
    pub body: Vec<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `if <e> [:> <c>] do <b> [elif <e> [:> <c>] do <b>]* [else <b>] end`
///
/// The elif vectors run in parallel: `elif_exprs[i]`, `elif_captures[i]`, and
/// `elif_bodies[i]` describe the `i`-th `elif` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt<'t> {
    /// The `if` head expression tokens
    pub if_expr: TokenSlice<'t>,
    /// The `if` capture clause, when present
    pub if_capture: Option<TokenSlice<'t>>,
    /// The `if` branch body
    pub if_body: Vec<FunBodyItem<'t>>,
    /// The `elif` head expressions
    pub elif_exprs: Vec<TokenSlice<'t>>,
    /// The `elif` capture clauses
    pub elif_captures: Vec<Option<TokenSlice<'t>>>,
    /// The `elif` branch bodies
    pub elif_bodies: Vec<Vec<FunBodyItem<'t>>>,
    /// The `else` branch body, when present
    pub else_body: Option<Vec<FunBodyItem<'t>>>,
    /// The span of the statement
    pub location: Location,
}

/// `match <e> do { <pattern> [? <cond>] => <item> [;] }* end`
///
/// The arm vectors run in parallel: `patterns[i]`, `pattern_conds[i]`, and
/// `bodies[i]` describe the `i`-th arm.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStmt<'t> {
    /// The matched expression tokens
    pub expr: TokenSlice<'t>,
    /// The arm patterns
    pub patterns: Vec<TokenSlice<'t>>,
    /// The arm guard conditions (`? <cond>`)
    pub pattern_conds: Vec<Option<TokenSlice<'t>>>,
    /// The arm bodies, one item per arm
    pub bodies: Vec<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `try do <body> [catch [<e>] do <body>] end`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt<'t> {
    /// The tried body
    pub body: Vec<FunBodyItem<'t>>,
    /// The catch binding expression, when present
    pub catch_expr: Option<TokenSlice<'t>>,
    /// The catch body, when a catch clause is present
    pub catch_body: Option<Vec<FunBodyItem<'t>>>,
    /// The span of the statement
    pub location: Location,
}

/// `unsafe = <body> end`
#[derive(Debug, Clone, PartialEq)]
pub struct UnsafeStmt<'t> {
    /// The nested items
    pub body: Vec<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

/// `while <expr> do <body> end`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt<'t> {
    /// The head expression tokens
    pub expr: TokenSlice<'t>,
    /// The loop body
    pub body: Vec<FunBodyItem<'t>>,
    /// The span of the statement
    pub location: Location,
}

// ============================================================================
// Var
// ============================================================================

/// A variable binding statement:
/// `[ref:|trace:|drop:] (val|mut) <name> [<type>] := <expr> ;`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarStmt<'t> {
    /// The bound name
    pub name: String,
    /// Captured data-type tokens, when present
    pub data_type: Option<TokenSlice<'t>>,
    /// The initialiser expression tokens
    pub expr: TokenSlice<'t>,
    /// Declared with `mut` instead of `val`
    pub is_mut: bool,
    /// Declared with the `trace:` prefix
    pub is_trace: bool,
    /// Declared with the `ref:` prefix
    pub is_ref: bool,
    /// Declared with the `drop:` prefix
    pub is_drop: bool,
    /// The span of the statement
    pub location: Location,
}

impl<'t> VarStmt<'t> {
    /// Creates a new variable binding.
    #[must_use]
    pub const fn new(
        name: String,
        expr: TokenSlice<'t>,
        is_mut: bool,
        location: Location,
    ) -> Self {
        Self {
            name,
            data_type: None,
            expr,
            is_mut,
            is_trace: false,
            is_ref: false,
            is_drop: false,
            location,
        }
    }
}
