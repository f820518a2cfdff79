//! Save-time conflict detection.
//!
//! Implements optimistic concurrency control over content fingerprints: a
//! save conflicts when the stored record has moved away from the baseline
//! the editor started from, and the content being saved differs from what is
//! stored.

use tracing::{debug, info};

use crate::fingerprint::Fingerprint;
use crate::models::{ConflictInfo, VersionSnapshot};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of checking a pending save against the stored version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCheck {
    /// The content being saved is already what is stored.
    Unchanged,
    /// Nobody else changed the record since editing began; overwrite is safe.
    Clear,
    /// The save would clobber a concurrent change.
    Conflict(ConflictInfo),
}

impl SaveCheck {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// The conflict details, if any.
    pub fn into_conflict(self) -> Option<ConflictInfo> {
        match self {
            Self::Conflict(info) => Some(info),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Stateless three-way conflict detector.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Decide whether saving `local` over `remote` loses a concurrent change.
    ///
    /// - equal `local` and `remote`: nothing to save, no conflict;
    /// - `remote` equal to `baseline`: nobody else saved, no conflict;
    /// - anything else is a conflict.
    ///
    /// A local copy still at the baseline while remote moved on is reported
    /// as a conflict rather than a fast-forward.
    pub fn detect_conflict(local: Fingerprint, remote: Fingerprint, baseline: Fingerprint) -> bool {
        if local == remote {
            return false;
        }
        if remote == baseline {
            return false;
        }
        true
    }

    /// Check a pending save and, on conflict, package both versions.
    pub fn check_save(
        record_id: &str,
        record_type: &str,
        local: VersionSnapshot,
        remote: VersionSnapshot,
        baseline: Fingerprint,
    ) -> SaveCheck {
        info!(
            record_id,
            record_type,
            local = %local.hash,
            remote = %remote.hash,
            baseline = %baseline,
            "checking save for conflicts"
        );

        if local.hash == remote.hash {
            debug!(record_id, "local matches remote, nothing to save");
            return SaveCheck::Unchanged;
        }
        if !Self::detect_conflict(local.hash, remote.hash, baseline) {
            debug!(record_id, "remote unchanged since baseline, save is clear");
            return SaveCheck::Clear;
        }

        info!(
            record_id,
            local_author = %local.edited_by,
            remote_author = %remote.edited_by,
            "conflict detected"
        );
        SaveCheck::Conflict(ConflictInfo {
            record_id: record_id.to_string(),
            record_type: record_type.to_string(),
            local_version: local,
            remote_version: remote,
        })
    }
}
