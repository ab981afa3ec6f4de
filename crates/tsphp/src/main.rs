//! tsphp - TypeScript to PHP transpiler
//!
//! CLI driver: transpiles single files, checks whole trees, and explains
//! diagnostic codes.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// TypeScript to PHP transpiler
#[derive(Parser, Debug)]
#[command(name = "tsphp")]
#[command(author, version, about = "Transpile TypeScript to PHP")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings every command shares.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub format: OutputFormat,
    pub use_color: bool,
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transpile a TypeScript file to PHP
    Transpile(commands::transpile::TranspileArgs),

    /// Report diagnostics for files without writing PHP
    Check(commands::check::CheckArgs),

    /// Explain a diagnostic code
    Explain(commands::explain::ExplainArgs),

    /// Create a tsphp.toml and a starter source file
    Init(commands::init::InitArgs),
}

/// `tsphp file.ts` is shorthand for `tsphp transpile file.ts`.
fn is_shorthand_invocation(args: &[String]) -> bool {
    for arg in args.iter().skip(1) {
        if arg.starts_with('-') {
            continue;
        }
        if matches!(
            arg.as_str(),
            "transpile" | "check" | "explain" | "init" | "help"
        ) {
            return false;
        }
        return arg.ends_with(".ts");
    }
    false
}

fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    if is_shorthand_invocation(&args) {
        args.insert(1, "transpile".to_string());
    }

    let cli = Cli::parse_from(args);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose, cli.quiet)),
    )
    .init();

    let output = Output {
        format: cli.format,
        use_color: !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stderr),
        quiet: cli.quiet,
    };

    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Transpile(args) => commands::transpile::run(args, output),
        Commands::Check(args) => commands::check::run(args, output),
        Commands::Explain(args) => commands::explain::run(args, output),
        Commands::Init(args) => commands::init::run(args, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shorthand_detection() {
        assert!(is_shorthand_invocation(&args(&["tsphp", "main.ts"])));
        assert!(is_shorthand_invocation(&args(&["tsphp", "-v", "main.ts"])));
        assert!(!is_shorthand_invocation(&args(&["tsphp", "check", "main.ts"])));
        assert!(!is_shorthand_invocation(&args(&["tsphp", "init"])));
        assert!(!is_shorthand_invocation(&args(&["tsphp"])));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0, false), "warn");
        assert_eq!(log_filter(2, false), "debug");
        assert_eq!(log_filter(5, false), "trace");
        assert_eq!(log_filter(3, true), "error");
    }

    #[test]
    fn test_cli_parses_transpile() {
        let cli = Cli::parse_from(args(&[
            "tsphp",
            "--format",
            "json",
            "transpile",
            "src/main.ts",
            "-o",
            "out.php",
            "--namespace",
            "App",
        ]));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Transpile(args)) => {
                assert_eq!(args.input.to_str(), Some("src/main.ts"));
                assert_eq!(args.output.as_deref().and_then(|p| p.to_str()), Some("out.php"));
                assert_eq!(args.namespace.as_deref(), Some("App"));
                assert!(!args.strict);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
