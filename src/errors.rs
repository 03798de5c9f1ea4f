//! Error types with rich diagnostics using miette
//!
//! Ignorable host input never becomes an error; only configuration defects,
//! unknown unit names and malformed event scripts do.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::{NumericError, Unit};

// ============================================================================
// Configuration Errors
// ============================================================================

/// Defects found while building a conversion table or engine configuration.
///
/// These indicate a programming error, not bad input, and are fatal at startup.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no conversion factor from {from} to {to}")]
    #[diagnostic(
        code(seglabel::config::missing_pair),
        help("every ordered pair of distinct units needs an entry")
    )]
    MissingPair { from: Unit, to: Unit },

    #[error("conversion from {from} to {to} is listed more than once")]
    #[diagnostic(code(seglabel::config::duplicate_pair))]
    DuplicatePair { from: Unit, to: Unit },

    #[error("conversion from {unit} to itself must not be listed")]
    #[diagnostic(
        code(seglabel::config::identity_pair),
        help("identity conversions are implicit with factor 1")
    )]
    IdentityPair { unit: Unit },

    #[error("invalid conversion factor from {from} to {to}: {reason}")]
    #[diagnostic(code(seglabel::config::invalid_factor))]
    InvalidFactor {
        from: Unit,
        to: Unit,
        reason: NumericError,
    },

    #[error("conversions between {a} and {b} are not reciprocal ({forward} x {backward} != 1)")]
    #[diagnostic(code(seglabel::config::not_reciprocal))]
    NotReciprocal {
        a: Unit,
        b: Unit,
        forward: f64,
        backward: f64,
    },

    #[error("invalid {setting}: {reason}")]
    #[diagnostic(code(seglabel::config::invalid_setting))]
    InvalidSetting {
        setting: &'static str,
        reason: NumericError,
    },
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Errors surfaced by the annotation engine's public operations
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown unit: {name:?}")]
    #[diagnostic(
        code(seglabel::engine::unknown_unit),
        help("expected one of miles, kilometers, feet, meters, yards, nautical-miles")
    )]
    UnknownUnit { name: String },
}

// ============================================================================
// Script Errors
// ============================================================================

/// Errors from parsing a recorded event script
#[derive(Error, Diagnostic, Debug)]
pub enum ScriptError {
    #[error("syntax error: expected {expected}")]
    #[diagnostic(code(seglabel::script::syntax))]
    Syntax {
        expected: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown unit: {name}")]
    #[diagnostic(
        code(seglabel::script::unknown_unit),
        help("expected one of miles, kilometers, feet, meters, yards, nautical-miles")
    )]
    UnknownUnit {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a unit")]
        span: SourceSpan,
    },

    #[error("unknown tool: {name}")]
    #[diagnostic(code(seglabel::script::unknown_tool), help("expected distance, area or location"))]
    UnknownTool {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a tool")]
        span: SourceSpan,
    },

    #[error("invalid number: {reason}")]
    #[diagnostic(code(seglabel::script::invalid_number))]
    InvalidNumber {
        reason: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },
}
