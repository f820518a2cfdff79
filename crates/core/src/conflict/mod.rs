//! Conflict detection, merge markers, and resolution.
//!
//! The conflict subsystem is responsible for:
//! 1. **Detection** -- comparing local, remote, and baseline fingerprints.
//! 2. **Markers** -- rendering both versions for a manual merge.
//! 3. **Resolution** -- applying a chosen strategy and validating manual merges.

pub mod detector;
pub mod markers;
pub mod resolver;
pub mod validator;

pub use detector::{ConflictDetector, SaveCheck};
pub use markers::{create_merged_content, MergeMarkerFormatter};
pub use resolver::ConflictResolver;
pub use validator::ResolutionValidator;
