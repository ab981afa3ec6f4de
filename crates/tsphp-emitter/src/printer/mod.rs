//! Generic TypeScript to PHP printer.
//!
//! The printer is also the [`EmitHost`] handed to features, so a feature that
//! emits a sub-expression goes back through the full dispatch.

mod expressions;
mod statements;

use std::collections::HashSet;

use swc_ecma_ast as ast;
use tsphp_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use tsphp_types::TypeClassifier;

use crate::features::{create_diagnostic, Feature};
use crate::host::{EmitHint, EmitHost, SourceRef};
use crate::writer::PhpWriter;
use crate::EmitOptions;

pub struct PhpPrinter<'a> {
    writer: PhpWriter,
    source: &'a str,
    file: SourceRef,
    options: &'a EmitOptions,
    classifier: &'a dyn TypeClassifier,
    features: &'a [Box<dyn Feature>],
    /// Classes declared in the module; `Name.member` on these is static access.
    class_names: HashSet<String>,
    diagnostics: Diagnostics,
}

impl<'a> PhpPrinter<'a> {
    pub fn new(
        source: &'a str,
        file: SourceRef,
        options: &'a EmitOptions,
        classifier: &'a dyn TypeClassifier,
        features: &'a [Box<dyn Feature>],
    ) -> Self {
        Self {
            writer: PhpWriter::new(),
            source,
            file,
            options,
            classifier,
            features,
            class_names: HashSet::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Print a whole module: open tag, optional namespace, then every item.
    pub fn print_module(&mut self, module: &ast::Module) {
        self.class_names = declared_classes(module);

        self.writer.write("<?php");
        self.writer.write_line();
        if let Some(namespace) = &self.options.namespace {
            self.writer.write_line();
            self.writer.write(&format!("namespace {namespace};"));
            self.writer.write_line();
        }
        if !module.body.is_empty() {
            self.writer.write_line();
        }

        for item in &module.body {
            self.emit_module_item(item);
        }
    }

    /// Output written so far.
    pub fn output(&self) -> &str {
        self.writer.as_str()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn finish(self) -> (String, Diagnostics) {
        (self.writer.into_string(), self.diagnostics)
    }

    fn report_error(&mut self, span: swc_common::Span, code: DiagnosticCode, message: String) {
        let diagnostic = create_diagnostic(span, self.file, code, message);
        self.diagnostics.push(diagnostic);
    }

    fn report_warning(&mut self, span: swc_common::Span, code: DiagnosticCode, message: String) {
        let diagnostic = Diagnostic::warning(code, message)
            .with_span(self.file.span(span))
            .build();
        self.diagnostics.push(diagnostic);
    }

    /// Offer `expr` to each feature in order; `true` once one handled it.
    fn try_features(&mut self, hint: EmitHint, expr: &ast::Expr) -> bool {
        let features = self.features;
        for feature in features {
            if feature.emit(hint, expr, self) {
                log::trace!("expression handled by feature `{}`", feature.name());
                return true;
            }
        }
        false
    }

    fn is_declared_class(&self, name: &str) -> bool {
        self.class_names.contains(name)
    }
}

impl EmitHost for PhpPrinter<'_> {
    fn text_of_node(&self, span: swc_common::Span) -> Option<&str> {
        if span.lo.0 == 0 && span.hi.0 == 0 {
            return None;
        }
        let lo = span.lo.0.checked_sub(self.file.start_pos)? as usize;
        let hi = span.hi.0.checked_sub(self.file.start_pos)? as usize;
        self.source.get(lo..hi)
    }

    fn emit_with_hint(&mut self, hint: EmitHint, expr: &ast::Expr) {
        if !self.try_features(hint, expr) {
            self.emit_expr_default(expr);
        }
    }

    fn emit_expression_list(&mut self, args: &[ast::ExprOrSpread]) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            if arg.spread.is_some() {
                self.writer.write("...");
            }
            self.emit_expression(&arg.expr);
        }
    }

    fn write_base(&mut self, text: &str) {
        self.writer.write(text);
    }

    fn write_punctuation(&mut self, text: &str) {
        self.writer.write(text);
    }

    fn type_classifier(&self) -> &dyn TypeClassifier {
        self.classifier
    }

    fn helper_namespace(&self) -> &str {
        &self.options.helper_namespace
    }

    fn source_file(&self) -> SourceRef {
        self.file
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

fn declared_classes(module: &ast::Module) -> HashSet<String> {
    let mut names = HashSet::new();
    for item in &module.body {
        let decl = match item {
            ast::ModuleItem::Stmt(ast::Stmt::Decl(decl)) => decl,
            ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export)) => &export.decl,
            ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultDecl(export)) => {
                if let ast::DefaultDecl::Class(class) = &export.decl {
                    if let Some(ident) = &class.ident {
                        names.insert(ident.sym.to_string());
                    }
                }
                continue;
            }
            _ => continue,
        };
        if let ast::Decl::Class(class) = decl {
            names.insert(class.ident.sym.to_string());
        }
    }
    names
}
