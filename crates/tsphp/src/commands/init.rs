//! Init command - set up a tsphp project

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, DEFAULT_CONFIG};
use crate::{Output, OutputFormat};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

const DEFAULT_MAIN_TS: &str = r#"// Main entry point

class Greeter {
    constructor(private name: string) {}

    greet(): string {
        return "Hello, " + this.name;
    }
}

const defaults = { greeting: "Hello" };
const settings = Object.assign({}, defaults, { name: "tsphp" });
const greeter = new Greeter(settings["name"]);
"#;

/// Files written by `init`, relative to the project root.
pub fn scaffold(root: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let src_dir = root.join("src");
    fs::create_dir_all(&src_dir)
        .with_context(|| format!("failed to create {}", src_dir.display()))?;

    let mut results = Vec::new();
    for (path, contents) in [
        (root.join(CONFIG_FILE), DEFAULT_CONFIG),
        (src_dir.join("main.ts"), DEFAULT_MAIN_TS),
    ] {
        let created = !path.exists();
        if created {
            fs::write(&path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        results.push((path, created));
    }
    Ok(results)
}

pub fn run(args: InitArgs, output: Output) -> Result<()> {
    let project_path = args.path.canonicalize().unwrap_or(args.path.clone());
    let text = output.format == OutputFormat::Text && !output.quiet;

    if text {
        println!("Initializing tsphp project in {}...\n", project_path.display());
    }

    let results = scaffold(&project_path)?;
    if text {
        for (path, created) in &results {
            let relative = path.strip_prefix(&project_path).unwrap_or(path);
            if *created {
                println!("  Created {}", relative.display());
            } else {
                println!("  Skipped {} (already exists)", relative.display());
            }
        }
        println!("\nDone! Next steps:");
        println!("  cd {}", project_path.display());
        println!("  tsphp transpile src/main.ts -o main.php");
    }

    if output.format == OutputFormat::Json {
        let created: Vec<_> = results
            .iter()
            .filter(|(_, created)| *created)
            .map(|(path, _)| path.to_string_lossy().to_string())
            .collect();
        let result = serde_json::json!({
            "success": true,
            "path": project_path.to_string_lossy(),
            "created": created,
        });
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::transpile::transpile_source;
    use crate::config::Config;
    use tempfile::TempDir;
    use tsphp_diagnostics::SourceCache;

    #[test]
    fn test_scaffold_creates_then_skips() {
        let dir = TempDir::new().unwrap();
        let first = scaffold(dir.path()).unwrap();
        assert!(first.iter().all(|(_, created)| *created));
        assert!(dir.path().join(CONFIG_FILE).is_file());
        assert!(dir.path().join("src/main.ts").is_file());

        let second = scaffold(dir.path()).unwrap();
        assert!(second.iter().all(|(_, created)| !*created));
    }

    #[test]
    fn test_starter_file_transpiles_cleanly() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path()).unwrap();
        let main = dir.path().join("src/main.ts");
        let config = Config::for_input(&main).unwrap();
        let options = config.emit_options(None, None);

        let mut cache = SourceCache::new();
        let report = transpile_source(DEFAULT_MAIN_TS, "main.ts", &options, &mut cache);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        let php = report.php.unwrap();
        assert!(php.contains("$settings = \\array_merge([], $defaults, [\"name\" => \"tsphp\"]);"));
        assert!(php.contains("return \"Hello, \" . $this->name;"));
    }
}
