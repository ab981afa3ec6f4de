//! Rendering diagnostics for people and for tools.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use std::io::Write;

/// Output format for a stream of diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// Terminal output with an optional ANSI palette and a source snippet.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.colored {
            code
        } else {
            ""
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        self.paint(match severity {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Hint => "\x1b[34m",
        })
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let color = self.severity_color(diagnostic.severity);
        let reset = self.paint("\x1b[0m");
        let bold = self.paint("\x1b[1m");
        let cyan = self.paint("\x1b[36m");

        writeln!(
            self.writer,
            "{bold}{color}{}[{}]{reset}: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        )?;

        if let Some(loc) = cache.location(diagnostic.span) {
            writeln!(self.writer, "  {cyan}-->{reset} {loc}")?;

            let line_text = cache
                .get_file(diagnostic.span.file_id)
                .and_then(|file| file.line_text(loc.line));
            if let Some(line_text) = line_text {
                let gutter = loc.line.to_string();
                let pad = " ".repeat(gutter.len());
                let indent = (loc.column - 1) as usize;
                let room = line_text.len().saturating_sub(indent).max(1);
                let carets = "^".repeat((diagnostic.span.len().max(1) as usize).min(room));

                writeln!(self.writer, "{pad} {cyan}|{reset}")?;
                writeln!(self.writer, "{cyan}{gutter} |{reset} {line_text}")?;
                writeln!(
                    self.writer,
                    "{pad} {cyan}|{reset} {}{color}{carets}{reset}",
                    " ".repeat(indent)
                )?;
            }
        }

        if let Some(help) = &diagnostic.help {
            writeln!(self.writer, "  {cyan}= help:{reset} {help}")?;
        }

        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        let color = if errors > 0 {
            self.severity_color(Severity::Error)
        } else {
            self.severity_color(Severity::Warning)
        };
        let reset = self.paint("\x1b[0m");
        let plural = |n: usize| if n == 1 { "" } else { "s" };

        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{errors} error{}", plural(errors)));
        }
        if warnings > 0 {
            parts.push(format!("{warnings} warning{}", plural(warnings)));
        }
        writeln!(self.writer, "{color}{} emitted{reset}", parts.join(" and "))
    }
}

/// One JSON object per line, for editor and CI integration.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let location = cache.location(diagnostic.span).map(|l| {
            serde_json::json!({
                "file": l.file,
                "line": l.line,
                "column": l.column,
            })
        });
        let span = (!diagnostic.span.is_dummy()).then(|| {
            serde_json::json!({
                "start": diagnostic.span.start,
                "end": diagnostic.span.end,
            })
        });

        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "severity": diagnostic.severity,
            "message": diagnostic.message,
            "location": location,
            "span": span,
            "help": diagnostic.help,
        });
        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "total": diagnostics.len(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)
    }
}

/// `file:line:col: severity: message [code]`, nothing else.
pub struct SimpleEmitter<W: Write> {
    writer: W,
}

impl<W: Write> SimpleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for SimpleEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        if let Some(loc) = cache.location(diagnostic.span) {
            write!(self.writer, "{loc}: ")?;
        }
        writeln!(
            self.writer,
            "{}: {} [{}]",
            diagnostic.severity, diagnostic.message, diagnostic.code
        )
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticCode, Span};

    fn sample() -> (SourceCache, Diagnostics) {
        let mut cache = SourceCache::new();
        let id = cache.add_file("main.ts", "const n = Object.entries(o);\n".to_string());
        let mut diags = Diagnostics::new();
        diags.push(
            Diagnostic::new(
                DiagnosticCode::UnsupportedObjectMethod,
                "Object.entries is not supported.",
            )
            .with_span(Span::new(id, 10, 27))
            .build(),
        );
        (cache, diags)
    }

    #[test]
    fn test_terminal_without_color() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, false);
        emitter.emit_all(&diags, &cache).unwrap();
        emitter.emit_summary(&diags).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error[U101]: Object.entries is not supported."));
        assert!(text.contains("--> main.ts:1:11"));
        assert!(text.contains(&format!("{}{}", " ".repeat(10), "^".repeat(17))));
        assert!(text.ends_with("1 error emitted\n"));
    }

    #[test]
    fn test_json_line() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        JsonEmitter::new(&mut out).emit_all(&diags, &cache).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(out.split(|b| *b == b'\n').next().unwrap()).unwrap();
        assert_eq!(value["code"], "U101");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["location"]["column"], 11);
        assert_eq!(value["span"]["end"], 27);
    }

    #[test]
    fn test_simple_without_location() {
        let cache = SourceCache::new();
        let diag = Diagnostic::new(DiagnosticCode::InternalError, "boom").build();
        let mut out = Vec::new();
        SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "error: boom [I001]\n");
    }
}
