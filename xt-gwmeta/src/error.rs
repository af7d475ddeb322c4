//! Error types for xt-gwmeta
//!
//! This module defines the error hierarchy for the GWMETA target extension.
//! Errors are categorized by the stage of the rule lifecycle that produced
//! them, and map onto the exit statuses the xtables host uses when it aborts
//! a rule definition.

use std::io;

use thiserror::Error;

/// xtables exit status for generic failures (`OTHER_PROBLEM`).
pub const EXIT_OTHER_PROBLEM: i32 = 1;

/// xtables exit status for malformed rule parameters (`PARAMETER_PROBLEM`).
pub const EXIT_PARAMETER_PROBLEM: i32 = 2;

/// Top-level error type for xt-gwmeta
#[derive(Debug, Error)]
pub enum GwmetaError {
    /// A directive token could not be applied
    #[error("GWMETA: {0}")]
    Parse(#[from] ParseError),

    /// The rule was rejected after all directives were parsed
    #[error("GWMETA: {0}")]
    Validation(#[from] ValidationError),

    /// The binary descriptor could not be decoded
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl GwmetaError {
    /// Exit status the host should report for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(_) | Self::Validation(_) => EXIT_PARAMETER_PROBLEM,
            Self::Descriptor(_) | Self::Config(_) | Self::Io(_) => EXIT_OTHER_PROBLEM,
        }
    }

    /// Check if this error means the token belongs to another extension
    ///
    /// The host uses this to fall through to its own unknown-option report.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Parse(ParseError::Unrecognized { .. }))
    }
}

/// Errors raised while applying a single directive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The directive requires a value and none was given
    #[error("{directive} requires a value")]
    MissingArgument { directive: String },

    /// The value is present but unparseable, non-positive or out of range
    #[error("invalid value {value:?} for {directive}: {reason}")]
    InvalidValue {
        directive: String,
        value: String,
        reason: String,
    },

    /// The token is not owned by this extension
    #[error("unknown option {token:?}")]
    Unrecognized { token: String },

    /// A value was attached to a directive that takes none
    #[error("{directive} does not take a value")]
    UnexpectedArgument { directive: String },
}

impl ParseError {
    /// Create a missing argument error
    pub fn missing_argument(directive: impl Into<String>) -> Self {
        Self::MissingArgument {
            directive: directive.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        directive: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            directive: directive.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an unrecognized token error
    pub fn unrecognized(token: impl Into<String>) -> Self {
        Self::Unrecognized {
            token: token.into(),
        }
    }
}

/// Errors raised by the final check of a rule definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No directive was applied before finalize
    #[error("you must specify a directive")]
    Unconfigured,
}

/// Errors raised while decoding the engine-facing record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Buffer shorter than the record
    #[error("descriptor truncated: {actual} bytes (minimum {expected} required)")]
    Truncated { expected: usize, actual: usize },

    /// Kind code outside the known range
    #[error("unknown descriptor kind: {0}")]
    UnknownKind(u32),

    /// Mask record carrying an empty mask
    #[error("mask descriptor carries a zero mask")]
    ZeroMask,

    /// Hex dump could not be decoded
    #[error("invalid hex dump: {0}")]
    InvalidHex(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {name}: {reason}")]
    EnvError { name: String, reason: String },

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

/// Type alias for Result with `GwmetaError`
pub type Result<T> = std::result::Result<T, GwmetaError>;
