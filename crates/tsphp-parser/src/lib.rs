//! TypeScript parser wrapper using SWC
//!
//! Parses a TypeScript file into an SWC [`Module`], registers the text in the
//! [`SourceCache`] and turns parser errors into diagnostics.

use anyhow::Result;
use swc_common::{input::StringInput, sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, Parser, Syntax, TsSyntax};
use tsphp_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, FileId, SourceCache, Span};

// Re-export AST types for consumers that need to inspect the AST
pub use swc_ecma_ast;

pub use swc_common::Spanned;

/// Result of parsing one TypeScript file.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub file_id: FileId,
    /// SWC position of the first byte of the file. SWC positions are global to
    /// its source map, so this is subtracted to get file offsets.
    pub start_pos: u32,
    /// Recoverable parse errors, reported as warnings.
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    /// File-relative span for a node of this module.
    pub fn span(&self, swc_span: swc_common::Span) -> Span {
        swc_span_to_span(swc_span, self.file_id, self.start_pos)
    }
}

/// Parse TypeScript source and register it in `cache`.
///
/// A fatal syntax error is returned as `Err`; its diagnostic is also pushed into
/// `errors` so the caller can render it with a location.
pub fn parse_typescript_with_cache(
    source: &str,
    filename: &str,
    cache: &mut SourceCache,
    errors: &mut Diagnostics,
) -> Result<ParseResult> {
    let file_id = cache.add_file(filename, source.to_string());

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    let start_pos = source_file.start_pos.0;

    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            dts: false,
            no_early_errors: false,
            disallow_ambiguous_jsx_like: false,
        }),
        swc_ecma_ast::EsVersion::Es2022,
        StringInput::from(&*source_file),
        None,
    );

    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| {
        let message = e.kind().msg().to_string();
        errors.push(
            Diagnostic::error(DiagnosticCode::ParseError, message.clone())
                .with_span(swc_span_to_span(e.span(), file_id, start_pos))
                .build(),
        );
        anyhow::anyhow!("{filename}: parse error: {message}")
    })?;

    let mut diagnostics = Diagnostics::new();
    for error in parser.take_errors() {
        diagnostics.push(
            Diagnostic::warning(DiagnosticCode::ParseError, error.kind().msg().to_string())
                .with_span(swc_span_to_span(error.span(), file_id, start_pos))
                .build(),
        );
    }
    log::debug!(
        "parsed {filename}: {} items, {} recoverable errors",
        module.body.len(),
        diagnostics.len()
    );

    Ok(ParseResult {
        module,
        file_id,
        start_pos,
        diagnostics,
    })
}

/// Convert an SWC span to a file-relative span. Synthesized nodes (dummy SWC
/// spans) map to [`Span::DUMMY`].
pub fn swc_span_to_span(swc_span: swc_common::Span, file_id: FileId, start_pos: u32) -> Span {
    if swc_span.lo.0 == 0 && swc_span.hi.0 == 0 {
        return Span::DUMMY;
    }
    Span::new(
        file_id,
        swc_span.lo.0.saturating_sub(start_pos),
        swc_span.hi.0.saturating_sub(start_pos),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{Decl, ModuleItem, Stmt};

    fn parse(source: &str) -> (ParseResult, SourceCache) {
        let mut cache = SourceCache::new();
        let mut errors = Diagnostics::new();
        let result = parse_typescript_with_cache(source, "test.ts", &mut cache, &mut errors)
            .expect("source should parse");
        assert!(errors.is_empty());
        (result, cache)
    }

    #[test]
    fn test_parse_class() {
        let (result, cache) = parse(
            r#"
            class User {
                public name: string;
                constructor(name: string) {
                    this.name = name;
                }
            }
            const u = new User("ada");
        "#,
        );

        assert_eq!(result.module.body.len(), 2);
        assert!(result.diagnostics.is_empty());
        assert!(cache.get_file(result.file_id).is_some());
    }

    #[test]
    fn test_spans_are_file_relative() {
        let source = "let answer = 42;";
        let (result, cache) = parse(source);

        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &result.module.body[0] else {
            panic!("expected a variable declaration");
        };
        let span = result.span(var.decls[0].name.span());
        assert_eq!(cache.source_text(span), Some("answer"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut cache = SourceCache::new();
        let mut errors = Diagnostics::new();
        let result =
            parse_typescript_with_cache("let x: number = ;", "bad.ts", &mut cache, &mut errors);

        assert!(result.is_err());
        assert_eq!(errors.count_of(DiagnosticCode::ParseError), 1);
        assert!(errors.has_errors());
    }

    #[test]
    fn test_dummy_span_maps_to_dummy() {
        let span = swc_span_to_span(swc_common::DUMMY_SP, FileId(0), 1);
        assert!(span.is_dummy());
    }
}
