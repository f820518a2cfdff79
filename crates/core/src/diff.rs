//! Line-level diff engine.
//!
//! Computes a diff between the local and remote content of a record using a
//! longest-common-subsequence table over lines. Both time and memory are
//! O(n·m) in the number of lines, which is fine for typical record bodies but
//! must be bounded by the host for large documents; [`DiffEngine`] provides
//! that bound, while [`generate_diff`] is total and unbounded.
//!
//! The table is a single flat `Vec<u32>`, so a diff costs 4 bytes per cell.
//!
//! A linear-space algorithm (Hirschberg, Myers) could replace the table
//! without changing the [`DiffResult`] contract.

use tracing::{debug, info};

use crate::errors::DiffError;
use crate::models::{DiffLine, DiffResult};

/// Default upper bound on lines per side accepted by [`DiffEngine`].
pub const DEFAULT_MAX_LINES: usize = 5_000;

/// Default upper bound on LCS table cells accepted by [`DiffEngine`]
/// (16 MiB of table).
pub const DEFAULT_MAX_CELLS: usize = 4_000_000;

/// Bytes used per LCS table cell.
pub const CELL_BYTES: usize = std::mem::size_of::<u32>();

/// Split content into lines on `\n`.
///
/// Unlike [`str::lines`], an empty input is a single empty line and a
/// trailing newline produces a trailing empty line, so joining the result
/// with `\n` restores the input byte for byte.
fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Produce a line-level diff from `local` to `remote`.
///
/// Never fails. Identical inputs yield only `unchanged` lines.
pub fn generate_diff(local: &str, remote: &str) -> DiffResult {
    let local_lines = split_lines(local);
    let remote_lines = split_lines(remote);
    let m = local_lines.len();
    let n = remote_lines.len();

    // at(i, j) = LCS length of local[..i] and remote[..j], row-major.
    let width = n + 1;
    let at = |i: usize, j: usize| i * width + j;
    let mut table = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            table[at(i, j)] = if local_lines[i - 1] == remote_lines[j - 1] {
                table[at(i - 1, j - 1)] + 1
            } else {
                table[at(i - 1, j)].max(table[at(i, j - 1)])
            };
        }
    }

    // Backtrack from the bottom-right corner, collecting lines in reverse.
    let mut lines = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && local_lines[i - 1] == remote_lines[j - 1] {
            lines.push(DiffLine::unchanged(local_lines[i - 1], i, j));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[at(i, j - 1)] >= table[at(i - 1, j)]) {
            lines.push(DiffLine::added(remote_lines[j - 1], j));
            j -= 1;
        } else {
            lines.push(DiffLine::removed(local_lines[i - 1], i));
            i -= 1;
        }
    }
    lines.reverse();

    let result = DiffResult::from_lines(lines);
    debug!(
        local_lines = m,
        remote_lines = n,
        added = result.added_count,
        removed = result.removed_count,
        "diff generated"
    );
    result
}

/// Render a git-style unified patch from `local` to `remote`.
pub fn unified_patch(local: &str, remote: &str) -> String {
    diffy::create_patch(local, remote).to_string()
}

/// Size-bounded diff entry point for hosts that accept untrusted input.
///
/// Inputs are refused when either side has more than `max_lines` lines or
/// when the LCS table would need more than `max_cells` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    max_lines: usize,
    max_cells: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES, DEFAULT_MAX_CELLS)
    }
}

impl DiffEngine {
    pub fn new(max_lines: usize, max_cells: usize) -> Self {
        Self {
            max_lines,
            max_cells,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Refuse inputs too large to diff, without diffing them.
    pub fn check(&self, local: &str, remote: &str) -> Result<(), DiffError> {
        let local_lines = self.check_side("local", local)?;
        let remote_lines = self.check_side("remote", remote)?;

        let cells = (local_lines + 1).saturating_mul(remote_lines + 1);
        if cells > self.max_cells {
            return Err(DiffError::TableTooLarge {
                cells,
                limit: self.max_cells,
            });
        }
        Ok(())
    }

    /// Diff `local` against `remote`, refusing inputs over the limits.
    pub fn diff(&self, local: &str, remote: &str) -> Result<DiffResult, DiffError> {
        self.check(local, remote)?;
        info!(
            max_lines = self.max_lines,
            max_cells = self.max_cells,
            "generating bounded diff"
        );
        Ok(generate_diff(local, remote))
    }

    /// Bounded variant of [`unified_patch`].
    pub fn unified_patch(&self, local: &str, remote: &str) -> Result<String, DiffError> {
        self.check(local, remote)?;
        Ok(unified_patch(local, remote))
    }

    fn check_side(&self, side: &'static str, content: &str) -> Result<usize, DiffError> {
        let lines = content.split('\n').count();
        if lines > self.max_lines {
            return Err(DiffError::InputTooLarge {
                side,
                lines,
                limit: self.max_lines,
            });
        }
        Ok(lines)
    }
}
