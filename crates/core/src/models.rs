//! Domain model types exchanged between the engine and its collaborators.
//!
//! These are plain owned records. They serialize to flat JSON objects with
//! camelCase field names so they can cross a process boundary unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ConflictError;
use crate::fingerprint::{compute_hash, Fingerprint};

// ---------------------------------------------------------------------------
// Versions & conflicts
// ---------------------------------------------------------------------------

/// One side (local or remote) of a conflict, captured at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub content: String,
    pub edited_at: DateTime<Utc>,
    pub edited_by: String,
    pub hash: Fingerprint,
}

impl VersionSnapshot {
    /// Capture a snapshot, fingerprinting `content`.
    pub fn capture(
        content: impl Into<String>,
        edited_by: impl Into<String>,
        edited_at: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let hash = compute_hash(&content);
        Self {
            content,
            edited_at,
            edited_by: edited_by.into(),
            hash,
        }
    }
}

/// Both competing versions of a record whose save would clobber a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub record_id: String,
    pub record_type: String,
    pub local_version: VersionSnapshot,
    pub remote_version: VersionSnapshot,
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineType {
    Unchanged,
    Added,
    Removed,
}

/// 1-based positions of a line in the local and/or remote content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineNumber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<usize>,
}

/// One line of a line-level diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub line_type: DiffLineType,
    pub content: String,
    pub line_number: LineNumber,
}

impl DiffLine {
    pub(crate) fn unchanged(content: &str, local: usize, remote: usize) -> Self {
        Self {
            line_type: DiffLineType::Unchanged,
            content: content.to_string(),
            line_number: LineNumber {
                local: Some(local),
                remote: Some(remote),
            },
        }
    }

    pub(crate) fn added(content: &str, remote: usize) -> Self {
        Self {
            line_type: DiffLineType::Added,
            content: content.to_string(),
            line_number: LineNumber {
                local: None,
                remote: Some(remote),
            },
        }
    }

    pub(crate) fn removed(content: &str, local: usize) -> Self {
        Self {
            line_type: DiffLineType::Removed,
            content: content.to_string(),
            line_number: LineNumber {
                local: Some(local),
                remote: None,
            },
        }
    }
}

/// A complete line-level diff from local to remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub lines: Vec<DiffLine>,
    pub has_changes: bool,
    pub added_count: usize,
    pub removed_count: usize,
}

impl DiffResult {
    /// Build a result from ordered lines, deriving the counters.
    pub fn from_lines(lines: Vec<DiffLine>) -> Self {
        let added_count = lines
            .iter()
            .filter(|l| l.line_type == DiffLineType::Added)
            .count();
        let removed_count = lines
            .iter()
            .filter(|l| l.line_type == DiffLineType::Removed)
            .count();
        Self {
            lines,
            has_changes: added_count > 0 || removed_count > 0,
            added_count,
            removed_count,
        }
    }

    pub fn unchanged_count(&self) -> usize {
        self.lines.len() - self.added_count - self.removed_count
    }

    /// Reconstruct the local content (every line that is not `added`).
    pub fn local_text(&self) -> String {
        self.join_except(DiffLineType::Added)
    }

    /// Reconstruct the remote content (every line that is not `removed`).
    pub fn remote_text(&self) -> String {
        self.join_except(DiffLineType::Removed)
    }

    fn join_except(&self, skip: DiffLineType) -> String {
        self.lines
            .iter()
            .filter(|l| l.line_type != skip)
            .map(|l| l.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// How a conflict is to be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum MergeStrategy {
    /// Keep the content being saved.
    UseLocal,
    /// Keep the content currently stored.
    UseRemote,
    /// Use content merged by hand.
    ManualMerge,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 3] = [Self::UseLocal, Self::UseRemote, Self::ManualMerge];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseLocal => "use-local",
            Self::UseRemote => "use-remote",
            Self::ManualMerge => "manual-merge",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = ConflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ConflictError::UnknownStrategy(s.to_string()))
    }
}

impl TryFrom<String> for MergeStrategy {
    type Error = ConflictError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A chosen resolution, produced by a human or an automated policy.
///
/// `resolved_content` is only consulted for [`MergeStrategy::ManualMerge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResolution {
    pub strategy: MergeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_content: Option<String>,
}

impl MergeResolution {
    pub fn use_local() -> Self {
        Self {
            strategy: MergeStrategy::UseLocal,
            resolved_content: None,
        }
    }

    pub fn use_remote() -> Self {
        Self {
            strategy: MergeStrategy::UseRemote,
            resolved_content: None,
        }
    }

    pub fn manual(content: impl Into<String>) -> Self {
        Self {
            strategy: MergeStrategy::ManualMerge,
            resolved_content: Some(content.into()),
        }
    }
}

/// Outcome of validating manually merged content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}
