//! Error types with rich diagnostics using miette
//!
//! Expression errors carry the source text and a span so the presentation
//! layer can point at the offending part of the input field.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::PhasorId;

// ============================================================================
// Expression Errors
// ============================================================================

/// Errors that occur while parsing or evaluating a phasor expression
#[derive(Error, Diagnostic, Debug)]
pub enum ExprError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(phasorviz::expr::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown function: {name}")]
    #[diagnostic(
        code(phasorviz::expr::unknown_function),
        help("available functions are exp, sin, cos and tan")
    )]
    UnknownFunction { name: String },

    #[error("undefined symbol: {name}")]
    #[diagnostic(code(phasorviz::expr::undefined_symbol))]
    UndefinedSymbol { name: String },

    #[error("symbol {name} refers to an invalid phasor")]
    #[diagnostic(code(phasorviz::expr::invalid_symbol))]
    InvalidSymbol { name: String },

    #[error("looping dependency through symbol {name}")]
    #[diagnostic(
        code(phasorviz::expr::cyclic_dependency),
        help("a phasor cannot depend on itself, directly or through other phasors")
    )]
    CyclicDependency { name: String },

    #[error("expression does not evaluate to a finite number")]
    #[diagnostic(code(phasorviz::expr::non_finite))]
    NonFinite,
}

impl ExprError {
    pub(crate) fn syntax(source: &str, message: impl Into<String>, offset: usize, len: usize) -> Self {
        ExprError::Syntax {
            message: message.into(),
            src: NamedSource::new("<expression>", source.to_string()),
            span: (offset.min(source.len()), len).into(),
        }
    }
}

// ============================================================================
// Attribute Errors
// ============================================================================

/// Errors returned by a rejected attribute change. The phasor is untouched.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SetError {
    #[error("no phasor with id {0}")]
    #[diagnostic(code(phasorviz::set::unknown_phasor))]
    UnknownPhasor(PhasorId),

    #[error("invalid label: {0:?}")]
    #[diagnostic(
        code(phasorviz::set::invalid_label),
        help("labels are 1 to 64 characters without angle brackets or quotes")
    )]
    InvalidLabel(String),

    #[error("invalid symbol: {0:?}")]
    #[diagnostic(
        code(phasorviz::set::invalid_symbol),
        help("symbols start with a letter or underscore, followed by letters, digits or underscores")
    )]
    InvalidSymbol(String),

    #[error("symbol {0:?} is reserved")]
    #[diagnostic(code(phasorviz::set::reserved_symbol))]
    ReservedSymbol(String),

    #[error("symbol {0:?} is already in use")]
    #[diagnostic(code(phasorviz::set::symbol_in_use))]
    SymbolInUse(String),

    #[error("no phasor with symbol {0:?}")]
    #[diagnostic(code(phasorviz::set::unknown_parent))]
    UnknownParent(String),

    #[error("parent {0:?} would create a loop")]
    #[diagnostic(code(phasorviz::set::parent_cycle))]
    ParentCycle(String),

    #[error("{attribute} {value} out of range {min}..={max}")]
    #[diagnostic(code(phasorviz::set::out_of_range))]
    OutOfRange {
        attribute: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("expression has no coordinate system to cycle")]
    #[diagnostic(code(phasorviz::set::no_system))]
    NoSystem,
}

// ============================================================================
// Color Errors
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("invalid color: {0:?}")]
#[diagnostic(
    code(phasorviz::color::invalid),
    help("use #rrggbb, rgb(r, g, b) or rgba(r, g, b, a)")
)]
pub struct ColorError(pub String);

// ============================================================================
// Settings Errors
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("settings field {field} is invalid")]
    #[diagnostic(code(phasorviz::settings::field))]
    Field { field: &'static str },

    #[error("major unit {major} is invalid for a diagram of size {max_magnitude}")]
    #[diagnostic(
        code(phasorviz::settings::major_unit),
        help("the major unit must be positive, below twice the longest phasor and give at most 15 rings")
    )]
    MajorUnit { major: f64, max_magnitude: f64 },

    #[error("minor unit {minor} is invalid for major unit {major}")]
    #[diagnostic(
        code(phasorviz::settings::minor_unit),
        help("the minor unit must be positive, below the major unit and at least a fifteenth of it")
    )]
    MinorUnit { major: f64, minor: f64 },
}

// ============================================================================
// Load Errors
// ============================================================================

/// Errors that abort a bulk load. The registry is left unchanged.
#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("malformed saved state")]
    #[diagnostic(code(phasorviz::load::json))]
    Json(#[from] serde_json::Error),

    #[error("record {index}: field {field} {reason}")]
    #[diagnostic(code(phasorviz::load::field))]
    Field {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("record {index}: {source}")]
    #[diagnostic(code(phasorviz::load::color))]
    Color {
        index: usize,
        #[source]
        source: ColorError,
    },

    #[error("record {index}: parent {parent} not found")]
    #[diagnostic(code(phasorviz::load::unresolved_parent))]
    UnresolvedParent { index: usize, parent: i64 },

    #[error("symbol {0:?} is used twice")]
    #[diagnostic(code(phasorviz::load::duplicate_symbol))]
    DuplicateSymbol(String),

    #[error("phasor {0} is its own ancestor")]
    #[diagnostic(code(phasorviz::load::parent_cycle))]
    ParentCycle(PhasorId),

    #[error("invalid settings")]
    #[diagnostic(code(phasorviz::load::settings))]
    Settings(#[from] SettingsError),
}
