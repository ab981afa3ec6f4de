//! Transpile command - writes PHP for one TypeScript file

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tsphp_diagnostics::{Diagnostics, SourceCache};
use tsphp_emitter::EmitOptions;

use super::{emit_diagnostics, is_failure};
use crate::config::Config;
use crate::{Output, OutputFormat};

#[derive(Args, Debug)]
pub struct TranspileArgs {
    /// Input TypeScript file
    pub input: PathBuf,

    /// Output PHP file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// PHP namespace for the generated file
    #[arg(long)]
    pub namespace: Option<String>,

    /// Prefix for generated helper calls
    #[arg(long)]
    pub helper_namespace: Option<String>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Result of running the pipeline on one file.
#[derive(Debug)]
pub struct FileReport {
    /// `None` when the file did not parse.
    pub php: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Parse and transpile `source`. Problems in the source end up in the
/// report's diagnostics, never as an `Err`.
pub fn transpile_source(
    source: &str,
    filename: &str,
    options: &EmitOptions,
    cache: &mut SourceCache,
) -> FileReport {
    let mut diagnostics = Diagnostics::new();
    let parsed =
        match tsphp_parser::parse_typescript_with_cache(source, filename, cache, &mut diagnostics) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("{e}");
                return FileReport {
                    php: None,
                    diagnostics,
                };
            }
        };
    diagnostics.extend(parsed.diagnostics.iter().cloned());

    let output = tsphp_emitter::transpile(&parsed, source, options);
    diagnostics.extend(output.diagnostics);
    FileReport {
        php: Some(output.php),
        diagnostics,
    }
}

pub fn run(args: TranspileArgs, output: Output) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let config = Config::for_input(&args.input)?;
    let options = config.emit_options(args.namespace.clone(), args.helper_namespace.clone());
    log::info!(
        "transpiling {} (namespace: {:?}, helpers: {:?})",
        args.input.display(),
        options.namespace,
        options.helper_namespace
    );

    let mut cache = SourceCache::new();
    let filename = args.input.to_string_lossy().to_string();
    let report = transpile_source(&source, &filename, &options, &mut cache);

    emit_diagnostics(&report.diagnostics, &cache, output)?;

    let failed = is_failure(&report.diagnostics, args.strict);
    let php = match report.php {
        Some(php) if !failed => php,
        _ => return Err(anyhow!("transpilation of {} failed", args.input.display())),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &php)
                .with_context(|| format!("failed to write {}", path.display()))?;
            match output.format {
                OutputFormat::Text if !output.quiet => {
                    eprintln!("Wrote {}", path.display());
                }
                OutputFormat::Text => {}
                OutputFormat::Json => {
                    let result = serde_json::json!({
                        "type": "result",
                        "success": true,
                        "output": path.to_string_lossy(),
                        "errors": report.diagnostics.error_count(),
                        "warnings": report.diagnostics.warning_count(),
                    });
                    println!("{}", serde_json::to_string(&result)?);
                }
            }
        }
        None => match output.format {
            OutputFormat::Text => print!("{php}"),
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "type": "result",
                    "success": true,
                    "php": php,
                    "errors": report.diagnostics.error_count(),
                    "warnings": report.diagnostics.warning_count(),
                });
                println!("{}", serde_json::to_string(&result)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsphp_diagnostics::DiagnosticCode;

    #[test]
    fn test_transpile_source() {
        let mut cache = SourceCache::new();
        let report = transpile_source(
            "const keys = Object.keys(row);",
            "main.ts",
            &EmitOptions::default(),
            &mut cache,
        );
        assert_eq!(report.php.as_deref(), Some("<?php\n\n$keys = \\array_keys($row);\n"));
        assert!(report.diagnostics.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_parse_failure_has_no_output() {
        let mut cache = SourceCache::new();
        let report = transpile_source("const x = ;", "bad.ts", &EmitOptions::default(), &mut cache);
        assert!(report.php.is_none());
        assert_eq!(report.diagnostics.count_of(DiagnosticCode::ParseError), 1);
    }

    #[test]
    fn test_unsupported_object_method_is_reported() {
        let mut cache = SourceCache::new();
        let report = transpile_source(
            "const pairs = Object.entries(row);",
            "main.ts",
            &EmitOptions::default(),
            &mut cache,
        );
        assert_eq!(
            report.diagnostics.count_of(DiagnosticCode::UnsupportedObjectMethod),
            1
        );
        assert!(is_failure(&report.diagnostics, false));
    }
}
