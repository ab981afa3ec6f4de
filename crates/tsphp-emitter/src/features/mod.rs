//! Rewrite rules consulted before generic printing.
//!
//! A [`Feature`] inspects one expression and either writes a replacement
//! through the host and returns `true`, or leaves the output untouched and
//! returns `false` so the next feature (and finally the printer) gets a turn.

pub mod method;
pub mod object;

pub use method::NamedHelper;
pub use object::{static_rule, ObjectFeature, RuleEntry};

use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast as ast;
use tsphp_diagnostics::{Diagnostic, DiagnosticCode};

use crate::host::{EmitHint, EmitHost, SourceRef};

pub trait Feature {
    fn name(&self) -> &'static str;

    /// Handle `expr` if this rule recognizes it.
    fn emit(&self, hint: EmitHint, expr: &ast::Expr, host: &mut dyn EmitHost) -> bool;
}

/// Features every transpile run uses, in dispatch order.
pub fn default_features() -> Vec<Box<dyn Feature>> {
    vec![Box::new(ObjectFeature)]
}

/// Error diagnostic pointing at `node` in `file`.
pub fn create_diagnostic(
    node: swc_common::Span,
    file: SourceRef,
    code: DiagnosticCode,
    message: impl Into<String>,
) -> Diagnostic {
    Diagnostic::error(code, message)
        .with_span(file.span(node))
        .build()
}

/// `<what> is not supported.`
pub fn unsupported_message(what: &str) -> String {
    format!("{what} is not supported.")
}

/// Call to a bare PHP function, for output that has no source node.
pub(crate) fn synthesized_call(name: &str, args: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::Call(ast::CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: ast::Callee::Expr(Box::new(ast::Expr::Ident(ast::Ident::new_no_ctxt(
            name.into(),
            DUMMY_SP,
        )))),
        args: args
            .into_iter()
            .map(|expr| ast::ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
    })
}

/// `undefined`, which prints as PHP `null`.
pub(crate) fn synthesized_undefined() -> ast::Expr {
    ast::Expr::Ident(ast::Ident::new_no_ctxt("undefined".into(), DUMMY_SP))
}

/// Property name as written in the source, falling back to the symbol for
/// synthesized nodes.
pub(crate) fn name_text(host: &dyn EmitHost, name: &ast::IdentName) -> String {
    host.text_of_node(name.span)
        .map_or_else(|| name.sym.to_string(), str::to_owned)
}
