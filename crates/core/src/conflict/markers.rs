//! Conflict-marker rendering for manual merges.
//!
//! The output is a starting point a person edits down to the final merged
//! text; no merging happens here.

/// Opens the local block.
pub const LOCAL_MARKER: &str = "<<<<<<<";
/// Separates the local and remote blocks.
pub const SEPARATOR_MARKER: &str = "=======";
/// Closes the remote block.
pub const REMOTE_MARKER: &str = ">>>>>>>";

pub const DEFAULT_LOCAL_LABEL: &str = "Your changes";
pub const DEFAULT_REMOTE_LABEL: &str = "Their changes";

/// Renders both versions of a record between conflict sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeMarkerFormatter {
    pub local_label: String,
    pub remote_label: String,
}

impl Default for MergeMarkerFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_LABEL, DEFAULT_REMOTE_LABEL)
    }
}

impl MergeMarkerFormatter {
    pub fn new(local_label: impl Into<String>, remote_label: impl Into<String>) -> Self {
        Self {
            local_label: local_label.into(),
            remote_label: remote_label.into(),
        }
    }

    /// Render `local` and `remote` as a marked-up block attributed to their
    /// authors.
    pub fn format(
        &self,
        local: &str,
        remote: &str,
        local_author: &str,
        remote_author: &str,
    ) -> String {
        format!(
            "{LOCAL_MARKER} {} ({local_author})\n{local}\n{SEPARATOR_MARKER}\n{remote}\n{REMOTE_MARKER} {} ({remote_author})",
            self.local_label, self.remote_label,
        )
    }
}

/// Render both versions with the default labels.
pub fn create_merged_content(
    local: &str,
    remote: &str,
    local_author: &str,
    remote_author: &str,
) -> String {
    MergeMarkerFormatter::default().format(local, remote, local_author, remote_author)
}
