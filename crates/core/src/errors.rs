//! Error types for the RecordMerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.
//!
//! Note that the hashing, detection, and unbounded diff operations are total
//! and have no error type at all.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Conflict errors
// ---------------------------------------------------------------------------

/// Errors from applying a merge resolution.
///
/// `MissingResolutionContent` and `UnknownStrategy` indicate a caller bug and
/// should not be shown to end users as something they can fix.
/// `InvalidResolution` carries a user-correctable validation message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConflictError {
    /// A manual merge was requested without any merged content.
    #[error("manual merge for record '{record_id}' requires resolved content")]
    MissingResolutionContent {
        record_id: String,
    },

    /// A strategy tag outside the known set was supplied.
    #[error("unknown merge strategy '{0}' (expected use-local, use-remote or manual-merge)")]
    UnknownStrategy(String),

    /// Manually merged content failed validation.
    #[error("invalid resolution for record '{record_id}': {detail}")]
    InvalidResolution {
        record_id: String,
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// Diff errors
// ---------------------------------------------------------------------------

/// Errors from the size-bounded diff entry point.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// One side has more lines than the configured limit.
    #[error("{side} content has {lines} lines, exceeding the diff limit of {limit}")]
    InputTooLarge {
        side: &'static str,
        lines: usize,
        limit: usize,
    },

    /// The LCS table for the two sides would exceed the cell budget.
    #[error("diff would need {cells} table cells, exceeding the limit of {limit}")]
    TableTooLarge {
        cells: usize,
        limit: usize,
    },
}

// ---------------------------------------------------------------------------
// Fingerprint errors
// ---------------------------------------------------------------------------

/// Errors from parsing a textual fingerprint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("invalid fingerprint '{0}': expected 8 hex digits")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
