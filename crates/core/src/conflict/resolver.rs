//! Conflict resolution actions.
//!
//! The [`ConflictResolver`] turns a chosen [`MergeResolution`] into the
//! content that should be persisted for a conflicted record.

use tracing::{debug, info, warn};

use super::validator::ResolutionValidator;
use crate::errors::ConflictError;
use crate::models::{ConflictInfo, MergeResolution, MergeStrategy};

/// Stateless conflict resolution operations.
pub struct ConflictResolver;

impl ConflictResolver {
    /// Get the content that should be saved for the chosen strategy.
    ///
    /// Fails with [`ConflictError::MissingResolutionContent`] when a manual
    /// merge carries no content. This does not validate manual content; use
    /// [`resolve_for_save`](Self::resolve_for_save) for the guarded path.
    pub fn apply_resolution(
        resolution: &MergeResolution,
        conflict: &ConflictInfo,
    ) -> Result<String, ConflictError> {
        info!(
            record_id = %conflict.record_id,
            strategy = %resolution.strategy,
            "applying resolution"
        );

        match resolution.strategy {
            MergeStrategy::UseLocal => {
                Self::note_ignored_content(resolution, conflict);
                Ok(conflict.local_version.content.clone())
            }
            MergeStrategy::UseRemote => {
                Self::note_ignored_content(resolution, conflict);
                Ok(conflict.remote_version.content.clone())
            }
            MergeStrategy::ManualMerge => resolution.resolved_content.clone().ok_or_else(|| {
                ConflictError::MissingResolutionContent {
                    record_id: conflict.record_id.clone(),
                }
            }),
        }
    }

    /// Apply `resolution` and, for a manual merge, require the result to pass
    /// validation before it may be persisted.
    pub fn resolve_for_save(
        resolution: &MergeResolution,
        conflict: &ConflictInfo,
    ) -> Result<String, ConflictError> {
        let content = Self::apply_resolution(resolution, conflict)?;

        if resolution.strategy == MergeStrategy::ManualMerge {
            let verdict = ResolutionValidator::validate_resolved_content(&content);
            if !verdict.valid {
                let detail = verdict.error.unwrap_or_default();
                warn!(record_id = %conflict.record_id, %detail, "manual merge rejected");
                return Err(ConflictError::InvalidResolution {
                    record_id: conflict.record_id.clone(),
                    detail,
                });
            }
        }

        info!(record_id = %conflict.record_id, "conflict resolved");
        Ok(content)
    }

    fn note_ignored_content(resolution: &MergeResolution, conflict: &ConflictInfo) {
        if resolution.resolved_content.is_some() {
            debug!(
                record_id = %conflict.record_id,
                strategy = %resolution.strategy,
                "ignoring resolved content for non-manual strategy"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::markers::create_merged_content;
    use crate::conflict::validator::{EMPTY_CONTENT_MESSAGE, UNRESOLVED_MARKERS_MESSAGE};
    use crate::models::VersionSnapshot;
    use chrono::Utc;

    fn sample_conflict() -> ConflictInfo {
        let now = Utc::now();
        ConflictInfo {
            record_id: "doc-1".into(),
            record_type: "document".into(),
            local_version: VersionSnapshot::capture("local body", "alice", now),
            remote_version: VersionSnapshot::capture("remote body", "bob", now),
        }
    }

    #[test]
    fn test_use_local() {
        let conflict = sample_conflict();
        let content =
            ConflictResolver::apply_resolution(&MergeResolution::use_local(), &conflict).unwrap();
        assert_eq!(content, conflict.local_version.content);
    }

    #[test]
    fn test_use_remote() {
        let conflict = sample_conflict();
        let content =
            ConflictResolver::apply_resolution(&MergeResolution::use_remote(), &conflict).unwrap();
        assert_eq!(content, conflict.remote_version.content);
    }

    #[test]
    fn test_non_manual_ignores_resolved_content() {
        let conflict = sample_conflict();
        let resolution = MergeResolution {
            strategy: MergeStrategy::UseRemote,
            resolved_content: Some("stray".into()),
        };
        let content = ConflictResolver::apply_resolution(&resolution, &conflict).unwrap();
        assert_eq!(content, "remote body");
    }

    #[test]
    fn test_manual_merge() {
        let conflict = sample_conflict();
        let content =
            ConflictResolver::apply_resolution(&MergeResolution::manual("merged"), &conflict)
                .unwrap();
        assert_eq!(content, "merged");
    }

    #[test]
    fn test_manual_merge_without_content_fails() {
        let conflict = sample_conflict();
        let resolution = MergeResolution {
            strategy: MergeStrategy::ManualMerge,
            resolved_content: None,
        };
        let result = ConflictResolver::apply_resolution(&resolution, &conflict);
        assert_eq!(
            result,
            Err(ConflictError::MissingResolutionContent {
                record_id: "doc-1".into()
            })
        );
    }

    #[test]
    fn test_resolve_for_save_rejects_unresolved_markers() {
        let conflict = sample_conflict();
        let marked = create_merged_content("a", "b", "alice", "bob");
        let result =
            ConflictResolver::resolve_for_save(&MergeResolution::manual(marked), &conflict);
        assert!(matches!(
            result,
            Err(ConflictError::InvalidResolution { ref detail, .. })
                if detail == UNRESOLVED_MARKERS_MESSAGE
        ));
    }

    #[test]
    fn test_resolve_for_save_rejects_blank_merge() {
        let conflict = sample_conflict();
        let result = ConflictResolver::resolve_for_save(&MergeResolution::manual("  "), &conflict);
        assert!(matches!(
            result,
            Err(ConflictError::InvalidResolution { ref detail, .. })
                if detail == EMPTY_CONTENT_MESSAGE
        ));
    }

    #[test]
    fn test_resolve_for_save_does_not_validate_chosen_sides() {
        // Picking a side keeps that side verbatim, even if it is empty.
        let mut conflict = sample_conflict();
        conflict.local_version.content = String::new();
        let content =
            ConflictResolver::resolve_for_save(&MergeResolution::use_local(), &conflict).unwrap();
        assert_eq!(content, "");
    }
}
