//! Check command - reports diagnostics without writing PHP

use anyhow::{anyhow, Result};
use clap::Args;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tsphp_diagnostics::{Diagnostics, SourceCache};
use walkdir::WalkDir;

use super::transpile::transpile_source;
use super::{emit_diagnostics, is_failure};
use crate::config::Config;
use crate::{Output, OutputFormat};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input TypeScript file or directory
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// TypeScript sources under `path`, skipping `node_modules` and `.d.ts` files.
pub fn collect_ts_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return if is_ts_source(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_ts_source(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn is_ts_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ts")
        && !path.to_string_lossy().ends_with(".d.ts")
}

pub fn run(args: CheckArgs, output: Output) -> Result<()> {
    let files = collect_ts_files(&args.input);

    if files.is_empty() {
        match output.format {
            OutputFormat::Text => {
                if !output.quiet {
                    println!("No TypeScript files found.");
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "type": "summary",
                        "success": true,
                        "files_checked": 0,
                        "errors": 0,
                        "warnings": 0,
                    })
                );
            }
        }
        return Ok(());
    }

    if output.format == OutputFormat::Text && !output.quiet {
        println!("Checking {} file(s)...", files.len());
    }

    let mut cache = SourceCache::new();
    let mut all_diagnostics = Diagnostics::new();
    let mut visited = HashSet::new();
    let mut checked_files = 0;

    for file in &files {
        let canonical = file.canonicalize().unwrap_or_else(|_| file.clone());
        if !visited.insert(canonical.clone()) {
            continue;
        }

        let source = match fs::read_to_string(&canonical) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("could not read {}: {e}", canonical.display());
                continue;
            }
        };

        let config = Config::for_input(&canonical)?;
        let options = config.emit_options(None, None);
        let filename = file.to_string_lossy().to_string();
        let report = transpile_source(&source, &filename, &options, &mut cache);
        log::debug!(
            "{}: {} diagnostic(s)",
            filename,
            report.diagnostics.len()
        );
        all_diagnostics.extend(report.diagnostics);
        checked_files += 1;
    }

    emit_diagnostics(&all_diagnostics, &cache, output)?;

    let errors = all_diagnostics.error_count();
    let warnings = all_diagnostics.warning_count();
    let failed = is_failure(&all_diagnostics, args.strict);

    match output.format {
        OutputFormat::Text => {
            if !output.quiet {
                if failed {
                    println!("Check failed: {errors} error(s), {warnings} warning(s)");
                } else if warnings > 0 {
                    println!("Check passed: {warnings} warning(s)");
                } else {
                    println!("All checks passed! - {checked_files} file(s) checked");
                }
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "type": "summary",
                "success": !failed,
                "files_checked": checked_files,
                "errors": errors,
                "warnings": warnings,
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    if failed {
        Err(anyhow!("Check failed with errors"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_ts_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("src/models/user.ts"), "").unwrap();
        fs::write(root.join("src/types.d.ts"), "").unwrap();
        fs::write(root.join("src/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.ts"), "").unwrap();

        let files = collect_ts_files(root);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/main.ts", "src/models/user.ts"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();
        assert_eq!(collect_ts_files(&file), vec![file]);
        assert!(collect_ts_files(&dir.path().join("missing.ts")).is_empty());
    }
}
