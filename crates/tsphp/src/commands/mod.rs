//! CLI command implementations

pub mod check;
pub mod explain;
pub mod init;
pub mod transpile;

use anyhow::Result;
use tsphp_diagnostics::{
    DiagnosticEmitter, Diagnostics, JsonEmitter, SimpleEmitter, SourceCache, TerminalEmitter,
};

use crate::{Output, OutputFormat};

/// Render diagnostics: terminal snippets on stderr (one line each under
/// `--quiet`), or JSON lines on stdout.
pub fn emit_diagnostics(
    diagnostics: &Diagnostics,
    cache: &SourceCache,
    output: Output,
) -> Result<()> {
    match output.format {
        OutputFormat::Text if output.quiet => {
            SimpleEmitter::new(std::io::stderr().lock()).emit_all(diagnostics, cache)?;
        }
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(std::io::stderr().lock(), output.use_color);
            emitter.emit_all(diagnostics, cache)?;
            emitter.emit_summary(diagnostics)?;
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stdout().lock());
            emitter.emit_all(diagnostics, cache)?;
        }
    }
    Ok(())
}

/// Errors always fail; warnings fail only under `--strict`.
pub fn is_failure(diagnostics: &Diagnostics, strict: bool) -> bool {
    diagnostics.has_errors() || (strict && diagnostics.warning_count() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsphp_diagnostics::{Diagnostic, DiagnosticCode};

    #[test]
    fn test_failure_policy() {
        let mut diagnostics = Diagnostics::new();
        assert!(!is_failure(&diagnostics, true));

        diagnostics.push(Diagnostic::warning(DiagnosticCode::UnsupportedStatement, "w").build());
        assert!(!is_failure(&diagnostics, false));
        assert!(is_failure(&diagnostics, true));

        diagnostics.push(Diagnostic::error(DiagnosticCode::PrototypeAccess, "e").build());
        assert!(is_failure(&diagnostics, false));
    }
}
