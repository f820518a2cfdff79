//! Conflict inspection and resolution commands.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use recordmerge_core::{
    ConflictInfo, ConflictResolver, DiffLineType, DiffResult, EngineConfig, MergeResolution,
    MergeStrategy, ResolutionValidator, VersionSnapshot,
};

use crate::style;

/// Output format for the `diff` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffFormat {
    Pretty,
    Json,
    Unified,
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_conflict(path: &Path) -> Result<ConflictInfo> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid conflict document", path.display()))
}

/// Show a diff between two files.
pub fn run_diff(
    config: &EngineConfig,
    local: &Path,
    remote: &Path,
    format: DiffFormat,
) -> Result<()> {
    let local_text = read_text(local)?;
    let remote_text = read_text(remote)?;
    let engine = config.diff_engine();

    if format == DiffFormat::Unified {
        let patch = engine
            .unified_patch(&local_text, &remote_text)
            .context("diff refused")?;
        print!("{}", patch);
        return Ok(());
    }

    let result = engine
        .diff(&local_text, &remote_text)
        .context("diff refused")?;

    match format {
        DiffFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            for line in render_diff(&result) {
                println!("{}", line);
            }
            println!();
            println!("{}", summary(&result));
        }
    }

    Ok(())
}

/// Render diff lines with local/remote gutters.
fn render_diff(result: &DiffResult) -> Vec<String> {
    let gutter = |n: Option<usize>| n.map(|n| n.to_string()).unwrap_or_default();
    result
        .lines
        .iter()
        .map(|line| {
            let numbers = format!(
                "{:>5} {:>5} ",
                gutter(line.line_number.local),
                gutter(line.line_number.remote)
            );
            let body = match line.line_type {
                DiffLineType::Unchanged => format!(" {}", line.content),
                DiffLineType::Added => style::added(&line.content),
                DiffLineType::Removed => style::removed(&line.content),
            };
            format!("{}{}", style::dim(&numbers), body)
        })
        .collect()
}

fn summary(result: &DiffResult) -> String {
    if !result.has_changes {
        return style::success("No differences");
    }
    format!(
        "{} added, {} removed, {} unchanged",
        result.added_count,
        result.removed_count,
        result.unchanged_count()
    )
}

/// Print both versions of a conflict as a table.
pub fn run_show(conflict_path: &Path) -> Result<()> {
    let conflict = load_conflict(conflict_path)?;

    println!();
    println!(
        "{}",
        style::header(&format!(
            "Conflict on {} '{}'",
            conflict.record_type, conflict.record_id
        ))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Side", "Edited by", "Edited at", "Hash", "Lines", "Bytes"]);
    table.add_row(snapshot_row("local", &conflict.local_version));
    table.add_row(snapshot_row("remote", &conflict.remote_version));

    println!("{}", table);
    println!();

    Ok(())
}

fn snapshot_row(side: &str, snapshot: &VersionSnapshot) -> Vec<Cell> {
    vec![
        Cell::new(side),
        Cell::new(&snapshot.edited_by),
        Cell::new(snapshot.edited_at.format("%Y-%m-%d %H:%M:%S UTC")),
        Cell::new(snapshot.hash),
        Cell::new(snapshot.content.split('\n').count()),
        Cell::new(snapshot.content.len()),
    ]
}

/// Print marker-wrapped content for a manual merge.
pub fn run_markers(
    config: &EngineConfig,
    local: &Path,
    remote: &Path,
    local_author: &str,
    remote_author: &str,
) -> Result<()> {
    let merged = render_markers(config, local, remote, local_author, remote_author)?;
    println!("{}", merged);
    Ok(())
}

fn render_markers(
    config: &EngineConfig,
    local: &Path,
    remote: &Path,
    local_author: &str,
    remote_author: &str,
) -> Result<String> {
    let local_text = read_text(local)?;
    let remote_text = read_text(remote)?;
    let formatter = config.marker_formatter();
    Ok(formatter.format(&local_text, &remote_text, local_author, remote_author))
}

/// Resolve a conflict document with the given strategy.
pub fn run_resolve(
    conflict_path: &Path,
    strategy: &str,
    content: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let conflict = load_conflict(conflict_path)?;
    let strategy: MergeStrategy = strategy.parse()?;

    let resolved_content = match content {
        Some(path) => Some(read_text(path)?),
        None => None,
    };
    if strategy != MergeStrategy::ManualMerge && resolved_content.is_some() {
        eprintln!(
            "{}",
            style::warn(&format!("--content is ignored for strategy {}", strategy))
        );
    }

    let resolution = MergeResolution {
        strategy,
        resolved_content,
    };
    let final_content = ConflictResolver::resolve_for_save(&resolution, &conflict)
        .context("failed to resolve conflict")?;

    match output {
        Some(path) => {
            std::fs::write(path, &final_content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{}",
                style::success(&format!(
                    "Record '{}' resolved ({}), written to {}",
                    conflict.record_id,
                    strategy,
                    path.display()
                ))
            );
        }
        None => print!("{}", final_content),
    }

    Ok(())
}

/// Validate a manually merged file.
pub fn run_validate(path: &Path) -> Result<()> {
    let content = read_text(path)?;
    let verdict = ResolutionValidator::validate_resolved_content(&content);

    if verdict.valid {
        println!("{}", style::success("Content is resolved"));
        return Ok(());
    }

    let message = verdict.error.unwrap_or_default();
    anyhow::bail!("{}: {}", path.display(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordmerge_core::generate_diff;

    #[test]
    fn test_render_diff_has_one_row_per_line() {
        let result = generate_diff("a\nb", "a\nc");
        let rows = render_diff(&result);
        assert_eq!(rows.len(), result.lines.len());
        assert!(console::strip_ansi_codes(&rows[0]).ends_with(" a"));
    }

    #[test]
    fn test_summary_counts() {
        let result = generate_diff("a\nb", "a\nc\nd");
        let text = summary(&result);
        assert_eq!(text, "2 added, 1 removed, 1 unchanged");
    }

    fn write_conflict(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("conflict.json");
        let now = chrono::Utc::now();
        let conflict = ConflictInfo {
            record_id: "r1".into(),
            record_type: "page".into(),
            local_version: VersionSnapshot::capture("mine", "alice", now),
            remote_version: VersionSnapshot::capture("theirs", "bob", now),
        };
        std::fs::write(&path, serde_json::to_string(&conflict).unwrap()).unwrap();
        path
    }

    fn numbered_file(dir: &Path, name: &str, count: usize) -> std::path::PathBuf {
        let path = dir.join(name);
        let body: Vec<String> = (0..count).map(|i| format!("{name} {i}")).collect();
        std::fs::write(&path, body.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_diff_respects_line_limit_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let local = numbered_file(dir.path(), "local", 20);
        let remote = numbered_file(dir.path(), "remote", 20);

        let mut config = EngineConfig::default();
        config.diff.max_lines = 10;
        for format in [DiffFormat::Pretty, DiffFormat::Json, DiffFormat::Unified] {
            let err = run_diff(&config, &local, &remote, format).unwrap_err();
            assert!(format!("{err:#}").contains("exceeding the diff limit"));
        }

        config.diff.max_lines = 100;
        assert!(run_diff(&config, &local, &remote, DiffFormat::Unified).is_ok());
    }

    #[test]
    fn test_unified_diff_respects_cell_limit() {
        let dir = tempfile::tempdir().unwrap();
        let local = numbered_file(dir.path(), "local", 20);
        let remote = numbered_file(dir.path(), "remote", 20);

        let mut config = EngineConfig::default();
        config.diff.max_cells = 100;
        let err = run_diff(&config, &local, &remote, DiffFormat::Unified).unwrap_err();
        assert!(format!("{err:#}").contains("table cells"));
    }

    #[test]
    fn test_markers_use_configured_labels() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.txt");
        let remote = dir.path().join("remote.txt");
        std::fs::write(&local, "mine").unwrap();
        std::fs::write(&remote, "theirs").unwrap();

        let mut config = EngineConfig::default();
        config.markers.local_label = "Draft".into();
        config.markers.remote_label = "Published".into();

        let merged = render_markers(&config, &local, &remote, "alice", "bob").unwrap();
        assert_eq!(
            merged,
            "<<<<<<< Draft (alice)\nmine\n=======\ntheirs\n>>>>>>> Published (bob)"
        );

        let missing = dir.path().join("missing.txt");
        assert!(render_markers(&config, &missing, &remote, "alice", "bob").is_err());
    }

    #[test]
    fn test_show_loads_conflict_document() {
        let dir = tempfile::tempdir().unwrap();
        let conflict_path = write_conflict(dir.path());
        assert!(run_show(&conflict_path).is_ok());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"recordId": "r1"}"#).unwrap();
        let err = run_show(&bad).unwrap_err();
        assert!(err.to_string().contains("not a valid conflict document"));
    }

    #[test]
    fn test_resolve_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let conflict_path = write_conflict(dir.path());
        let merged_path = dir.path().join("merged.txt");
        let out_path = dir.path().join("out.txt");

        std::fs::write(&merged_path, "mine and theirs").unwrap();

        run_resolve(&conflict_path, "manual-merge", Some(&merged_path), Some(&out_path)).unwrap();
        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "mine and theirs");

        run_resolve(&conflict_path, "use-remote", None, Some(&out_path)).unwrap();
        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "theirs");

        assert!(run_resolve(&conflict_path, "keep-both", None, Some(&out_path)).is_err());
        assert!(run_resolve(&conflict_path, "manual-merge", None, Some(&out_path)).is_err());
    }

    #[test]
    fn test_validate_rejects_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(
            &path,
            recordmerge_core::create_merged_content("a", "b", "alice", "bob"),
        )
        .unwrap();
        let err = run_validate(&path).unwrap_err();
        assert!(err.to_string().contains("unresolved conflict markers"));

        std::fs::write(&path, "a and b").unwrap();
        assert!(run_validate(&path).is_ok());
    }
}
