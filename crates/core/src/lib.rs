//! RecordMerge core library.
//!
//! Save-time conflict detection and merge resolution for collaboratively
//! edited records: content fingerprints, three-way conflict detection, a
//! line-level diff, conflict-marker rendering, and resolution with
//! validation of manual merges. Every operation is a synchronous pure
//! function; the version store, edit locks, and UI live elsewhere.

pub mod config;
pub mod conflict;
pub mod diff;
pub mod errors;
pub mod fingerprint;
pub mod models;

// Re-exports for convenience.
pub use config::EngineConfig;
pub use conflict::{
    create_merged_content, ConflictDetector, ConflictResolver, MergeMarkerFormatter,
    ResolutionValidator, SaveCheck,
};
pub use diff::{generate_diff, DiffEngine};
pub use errors::{ConflictError, CoreError};
pub use fingerprint::{compute_hash, Fingerprint};
pub use models::{
    ConflictInfo, DiffLine, DiffLineType, DiffResult, LineNumber, MergeResolution,
    MergeStrategy, ValidationResult, VersionSnapshot,
};
