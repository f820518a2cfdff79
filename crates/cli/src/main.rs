//! RecordMerge command-line tool.
//!
//! Exposes the conflict engine over files and JSON documents: fingerprint
//! content, check three-way hashes, diff two versions, render merge markers,
//! resolve a conflict document, and validate a manual merge.

mod conflicts;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recordmerge_core::config::EngineConfig;
use recordmerge_core::{compute_hash, ConflictDetector, Fingerprint};

use conflicts::DiffFormat;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// RecordMerge command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "recordmerge",
    version,
    about = "Detect and resolve conflicting saves of versioned records"
)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the content fingerprint of a file.
    Hash {
        file: PathBuf,
    },

    /// Decide whether saving would clobber a concurrent change.
    Detect {
        /// Fingerprint of the content being saved.
        #[arg(long)]
        local: String,
        /// Fingerprint of the content currently stored.
        #[arg(long)]
        remote: String,
        /// Fingerprint captured when editing began.
        #[arg(long)]
        baseline: String,
    },

    /// Show a line diff from LOCAL to REMOTE.
    Diff {
        local: PathBuf,
        remote: PathBuf,

        /// Emit the diff as JSON.
        #[arg(long, conflicts_with = "unified")]
        json: bool,

        /// Emit a unified patch.
        #[arg(long)]
        unified: bool,
    },

    /// Wrap both versions in conflict markers for manual merging.
    Markers {
        local: PathBuf,
        remote: PathBuf,

        #[arg(long, default_value = "you")]
        local_author: String,

        #[arg(long, default_value = "them")]
        remote_author: String,
    },

    /// Show both versions recorded in a conflict JSON document.
    Show {
        conflict: PathBuf,
    },

    /// Resolve a conflict JSON document.
    Resolve {
        conflict: PathBuf,

        /// Strategy: use-local, use-remote or manual-merge.
        #[arg(short, long)]
        strategy: String,

        /// File holding the merged content (manual-merge only).
        #[arg(long)]
        content: Option<PathBuf>,

        /// Write the resolved content here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a manually merged file is fully resolved.
    Validate {
        file: PathBuf,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./recordmerge.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    CheckConfig,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &EngineConfig) -> Result<()> {
    match cli.command {
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Detect {
            local,
            remote,
            baseline,
        } => cmd_detect(&local, &remote, &baseline),
        Commands::Diff {
            local,
            remote,
            json,
            unified,
        } => {
            let format = if json {
                DiffFormat::Json
            } else if unified {
                DiffFormat::Unified
            } else {
                DiffFormat::Pretty
            };
            conflicts::run_diff(config, &local, &remote, format)
        }
        Commands::Markers {
            local,
            remote,
            local_author,
            remote_author,
        } => conflicts::run_markers(config, &local, &remote, &local_author, &remote_author),
        Commands::Show { conflict } => conflicts::run_show(&conflict),
        Commands::Resolve {
            conflict,
            strategy,
            content,
            output,
        } => conflicts::run_resolve(&conflict, &strategy, content.as_deref(), output.as_deref()),
        Commands::Validate { file } => conflicts::run_validate(&file),
        Commands::Init { output } => cmd_init(&output),
        Commands::CheckConfig => cmd_check_config(cli.config.as_deref(), config),
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    EngineConfig::load_and_validate(path).context("failed to load configuration file")
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_hash(file: &Path) -> Result<()> {
    println!("{}", hash_file(file)?);
    Ok(())
}

fn hash_file(file: &Path) -> Result<Fingerprint> {
    let content = conflicts::read_text(file)?;
    Ok(compute_hash(&content))
}

fn parse_fingerprint(flag: &str, value: &str) -> Result<Fingerprint> {
    value
        .parse()
        .with_context(|| format!("invalid value for --{}", flag))
}

/// Either verdict is a successful run; only malformed input fails.
fn cmd_detect(local: &str, remote: &str, baseline: &str) -> Result<()> {
    for line in detect_report(local, remote, baseline)? {
        println!("{}", line);
    }
    Ok(())
}

fn detect_report(local: &str, remote: &str, baseline: &str) -> Result<Vec<String>> {
    let local = parse_fingerprint("local", local)?;
    let remote = parse_fingerprint("remote", remote)?;
    let baseline = parse_fingerprint("baseline", baseline)?;

    if !ConflictDetector::detect_conflict(local, remote, baseline) {
        return Ok(vec![style::success("no conflict")]);
    }

    let mut lines = vec![style::warn("conflict")];
    if local == baseline {
        lines.push(style::dim(
            "local is unchanged since the baseline; reload to pick up the remote",
        ));
    }
    Ok(lines)
}

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# RecordMerge Configuration

[logging]
# trace, debug, info, warn, error (RUST_LOG overrides this)
level = "warn"

[diff]
# Diffs are quadratic in line count; larger inputs are refused.
max_lines = 5000
# (local lines + 1) * (remote lines + 1), 4 bytes each.
max_cells = 4000000

[markers]
local_label = "Your changes"
remote_label = "Their changes"
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!(
        "Validate with: recordmerge check-config --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_check_config(path: Option<&Path>, config: &EngineConfig) -> Result<()> {
    match path {
        Some(path) => println!("Configuration: {}", path.display()),
        None => println!("Configuration: built-in defaults (no --config given)"),
    }
    println!();
    println!("  [OK] TOML structure is valid");
    println!("  [OK] All values are valid");
    println!();
    println!("Configuration summary:");
    println!("  Log level     : {}", config.logging.level);
    println!("  Diff max lines: {}", config.diff.max_lines);
    println!("  Diff max cells: {}", config.diff.max_cells);
    println!("  Local label   : {}", config.markers.local_label);
    println!("  Remote label  : {}", config.markers.remote_label);

    Ok(())
}
