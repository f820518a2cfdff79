//! Validation of manually merged content.
//!
//! A manual merge result must pass [`ResolutionValidator::validate_resolved_content`]
//! before it is persisted. The check is pure and never corrects the content.

use tracing::debug;

use super::markers::{LOCAL_MARKER, REMOTE_MARKER, SEPARATOR_MARKER};
use crate::models::ValidationResult;

pub const UNRESOLVED_MARKERS_MESSAGE: &str = "Content still contains unresolved conflict markers";
pub const EMPTY_CONTENT_MESSAGE: &str = "Resolved content cannot be empty";

/// Stateless checks over merged content.
pub struct ResolutionValidator;

impl ResolutionValidator {
    /// True only when all three conflict sentinels are still present.
    pub fn has_conflict_markers(content: &str) -> bool {
        content.contains(LOCAL_MARKER)
            && content.contains(SEPARATOR_MARKER)
            && content.contains(REMOTE_MARKER)
    }

    /// Check that `content` is a finished merge.
    pub fn validate_resolved_content(content: &str) -> ValidationResult {
        if Self::has_conflict_markers(content) {
            debug!("resolved content still has conflict markers");
            return ValidationResult::invalid(UNRESOLVED_MARKERS_MESSAGE);
        }
        if content.trim().is_empty() {
            debug!("resolved content is empty");
            return ValidationResult::invalid(EMPTY_CONTENT_MESSAGE);
        }
        ValidationResult::ok()
    }
}
