//! constable CLI - NASA-grade const-candidate analyzer for local declarations.
//!
//! Features:
//! - Analyzes a single unit file or a whole directory tree of units
//! - Rayon-powered parallel analysis across unit files
//! - Plain or JSON reporting per unit
//! - Rule tuning from constable.toml and the command line
//! - CI-friendly exit codes with `--deny`

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use constable_core::{
    init_structured_logging, load_config, print_json, print_plain, AnalysisReport, Analyzer,
    CancellationToken, CompilationUnit, RuleRegistry, UnitModel,
};

/// Directories to exclude by default (build output and VCS internals).
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", ".cargo"];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "NASA-grade const-candidate analyzer for local declarations"
)]
pub struct Cli {
    /// Path to a unit file or a directory of .json unit files
    #[arg(default_value = ".")]
    path: String,

    /// Output reports in JSON format
    #[arg(long)]
    json: bool,

    /// Exit with code 1 when any finding is reported
    #[arg(long)]
    deny: bool,

    /// Rule ids or names to disable
    #[arg(long, num_args = 1..)]
    disable: Vec<String>,

    /// List registered rules and exit
    #[arg(long)]
    list_rules: bool,
}

/// Checks if a directory entry should be pruned (excluded from traversal).
///
/// This is called by `WalkDir::filter_entry` and runs sequentially,
/// but enables O(1) subtree skipping for excluded directories.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all .json unit files recursively below the root.
///
/// Uses early directory pruning to skip `target/`, `.git/`, etc. in
/// O(1) and parallelizes the extension checks across CPU cores. The
/// result is sorted so report order never depends on scheduling.
fn gather_unit_files(root: &Path) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!(
            "Failed to gather unit files from {}",
            root.display()
        ))?;

    files.sort();
    Ok(files)
}

/// Loads one unit file, builds its reference model, and analyzes it.
fn analyze_file(
    path: &Path,
    analyzer: &Analyzer,
    cancel: &CancellationToken,
) -> Result<AnalysisReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read unit file: {}", path.display()))?;
    let mut unit: CompilationUnit = serde_json::from_str(&content)
        .with_context(|| format!("Invalid unit file: {}", path.display()))?;
    unit.assign_ids();

    let model = UnitModel::build(&unit);
    let report = analyzer.analyze_unit(&unit, &model, cancel)?;
    Ok(report)
}

fn main() -> Result<()> {
    // Global panic guard - NASA-grade resilience
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] constable internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let input_path = Path::new(&cli.path);

    // 1. Assemble the rule registry from config and flags
    let config_root: PathBuf = if input_path.is_dir() {
        input_path.to_path_buf()
    } else {
        input_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    };

    let mut registry = RuleRegistry::with_default_rules();
    let mut json_output = cli.json;
    match load_config(&config_root) {
        Ok(Some(cfg)) => {
            if let Err(e) = registry.apply_config(&cfg) {
                eprintln!("[WARN] config apply failed: {}", e);
            }
            if let Some(output) = &cfg.output {
                if output.format.as_deref() == Some("json") {
                    json_output = true;
                }
            }
        }
        Ok(None) => {} // No config file - that's fine
        Err(e) => {
            eprintln!("[WARN] config load failed: {}", e);
        }
    }
    for rule in &cli.disable {
        registry.disable(rule);
    }

    // 2. Rule listing mode
    if cli.list_rules {
        let descriptors = registry.descriptors();
        if json_output {
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        } else {
            println!("REGISTERED RULES ({}):", descriptors.len());
            for descriptor in descriptors {
                let status = if registry.is_enabled(descriptor) {
                    "enabled"
                } else {
                    "disabled"
                };
                println!(
                    "- {} ({}) [{}]: {}",
                    descriptor.id, descriptor.name, status, descriptor.description
                );
            }
        }
        return Ok(());
    }

    // 3. Discover unit files
    let files = if input_path.is_dir() {
        gather_unit_files(input_path)?
    } else {
        vec![input_path.to_path_buf()]
    };
    if files.is_empty() {
        println!("No unit files found under {}", input_path.display());
        return Ok(());
    }

    // 4. Analyze all units in parallel using Rayon
    let analyzer = Analyzer::with_registry(registry);
    let cancel = CancellationToken::new();
    let reports: Vec<AnalysisReport> = files
        .par_iter()
        .map(|file| analyze_file(file, &analyzer, &cancel))
        .collect::<Result<_>>()?;

    // 5. Report results per unit, in discovery order
    let mut total = 0usize;
    for report in &reports {
        total += report.finding_count();
        if json_output {
            print_json(report);
        } else {
            print_plain(report);
        }
    }

    // 6. Exit code (CI-friendly)
    std::process::exit(if cli.deny && total > 0 { 1 } else { 0 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::File::create(path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("constable_cli_test")
            .join(format!("{}_{}", name, id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    const CANDIDATE_UNIT: &str = r#"
{
  "source_name": "candidate.unit",
  "functions": [
    {
      "name": "main",
      "body": {
        "statements": [
          {
            "local": {
              "declared_type": { "name": "int" },
              "variables": [
                { "name": "x", "initializer": { "kind": { "literal": { "int": 4 } } } }
              ]
            }
          }
        ]
      }
    }
  ]
}
"#;

    // --- gather_unit_files TESTS ---

    #[test]
    fn test_gather_unit_files_finds_nested() {
        let temp_dir = create_temp_dir("nested");
        create_file(&temp_dir.join("a.json"), "{}");
        create_file(&temp_dir.join("sub/b.json"), "{}");
        create_file(&temp_dir.join("sub/notes.txt"), "ignored");

        let files = gather_unit_files(&temp_dir).unwrap();
        assert_eq!(files.len(), 2, "only .json files are discovered");
        assert!(files[0] < files[1], "discovery output must be sorted");
    }

    #[test]
    fn test_gather_unit_files_skips_excluded_dirs() {
        let temp_dir = create_temp_dir("excluded");
        create_file(&temp_dir.join("unit.json"), "{}");
        create_file(&temp_dir.join("target/skip.json"), "{}");
        create_file(&temp_dir.join(".git/skip.json"), "{}");

        let files = gather_unit_files(&temp_dir).unwrap();
        assert_eq!(files.len(), 1, "target/ and .git/ must be pruned");
    }

    // --- analyze_file TESTS ---

    #[test]
    fn test_analyze_file_reports_finding() {
        let temp_dir = create_temp_dir("finding");
        let file = temp_dir.join("candidate.json");
        create_file(&file, CANDIDATE_UNIT);

        let analyzer = Analyzer::new();
        let report = analyze_file(&file, &analyzer, &CancellationToken::new()).unwrap();

        assert_eq!(report.source, "candidate.unit");
        assert_eq!(report.finding_count(), 1);
        assert_eq!(report.findings[0].identifier, "x");
    }

    #[test]
    fn test_analyze_file_rejects_invalid_json() {
        let temp_dir = create_temp_dir("invalid");
        let file = temp_dir.join("bad.json");
        create_file(&file, "this is not a unit");

        let analyzer = Analyzer::new();
        let result = analyze_file(&file, &analyzer, &CancellationToken::new());
        assert!(result.is_err(), "malformed unit files must error, not panic");
    }

    #[test]
    fn test_analyze_file_missing_file_errors() {
        let temp_dir = create_temp_dir("missing");
        let file = temp_dir.join("does_not_exist.json");

        let analyzer = Analyzer::new();
        let result = analyze_file(&file, &analyzer, &CancellationToken::new());
        assert!(result.is_err());
    }

    // --- Cli TESTS ---

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["constable"]);
        assert_eq!(cli.path, ".");
        assert!(!cli.json);
        assert!(!cli.deny);
        assert!(cli.disable.is_empty());
        assert!(!cli.list_rules);
    }

    #[test]
    fn test_cli_disable_takes_many() {
        let cli = Cli::parse_from(["constable", "--disable", "CST001", "make-const", "--deny"]);
        assert_eq!(cli.disable, vec!["CST001", "make-const"]);
        assert!(cli.deny);
    }
}
