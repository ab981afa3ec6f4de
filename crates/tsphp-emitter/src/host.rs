//! The contract between the printer and rewrite rules.

use swc_ecma_ast as ast;
use tsphp_diagnostics::{Diagnostic, FileId, Span};
use tsphp_types::TypeClassifier;

/// Whether the surrounding position consumes the value of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitHint {
    /// Value position: operands, arguments, initializers, return values.
    Expression,
    /// Statement-like position where the value is discarded.
    Unspecified,
}

/// The file being emitted, for turning SWC spans into diagnostic spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    pub file_id: FileId,
    /// SWC position of the first byte of the file.
    pub start_pos: u32,
}

impl SourceRef {
    pub fn new(file_id: FileId, start_pos: u32) -> Self {
        Self { file_id, start_pos }
    }

    pub fn span(&self, swc_span: swc_common::Span) -> Span {
        tsphp_parser::swc_span_to_span(swc_span, self.file_id, self.start_pos)
    }
}

/// Services a rewrite rule may use while handling one node.
pub trait EmitHost {
    /// Source text of a node, `None` for synthesized nodes.
    fn text_of_node(&self, span: swc_common::Span) -> Option<&str>;

    /// Emit `expr`, offering it to the features first.
    fn emit_with_hint(&mut self, hint: EmitHint, expr: &ast::Expr);

    fn emit_expression(&mut self, expr: &ast::Expr) {
        self.emit_with_hint(EmitHint::Expression, expr);
    }

    /// Comma separated arguments, spreads included.
    fn emit_expression_list(&mut self, args: &[ast::ExprOrSpread]);

    /// Raw output text such as a function name.
    fn write_base(&mut self, text: &str);

    fn write_punctuation(&mut self, text: &str);

    fn type_classifier(&self) -> &dyn TypeClassifier;

    /// Prefix for generated helper calls.
    fn helper_namespace(&self) -> &str;

    fn source_file(&self) -> SourceRef;

    /// Append to the diagnostic sink of the current compilation unit.
    fn report(&mut self, diagnostic: Diagnostic);
}
