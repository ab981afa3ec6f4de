//! Calls to a named PHP helper function.

use swc_ecma_ast as ast;

use crate::host::EmitHost;

/// Rewrites a method call into `<helper namespace><name>(...)`.
///
/// With a receiver, `recv.m(a, b)` becomes `name(recv, a, b)`. Without one,
/// only the call arguments are passed. `max_args` drops arguments past the
/// given count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedHelper {
    name: &'static str,
    include_receiver: bool,
    max_args: Option<usize>,
}

impl NamedHelper {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            include_receiver: true,
            max_args: None,
        }
    }

    pub const fn without_receiver(self) -> Self {
        Self {
            include_receiver: false,
            ..self
        }
    }

    pub const fn with_max_args(self, max_args: usize) -> Self {
        Self {
            max_args: Some(max_args),
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn emit(&self, call: &ast::CallExpr, host: &mut dyn EmitHost) {
        let function = format!("{}{}", host.helper_namespace(), self.name);
        host.write_base(&function);
        host.write_punctuation("(");

        let mut wrote_receiver = false;
        if self.include_receiver {
            if let Some(receiver) = receiver_of(call) {
                host.emit_expression(receiver);
                wrote_receiver = true;
            }
        }

        let args = match self.max_args {
            Some(max) => &call.args[..max.min(call.args.len())],
            None => &call.args[..],
        };
        if !args.is_empty() {
            if wrote_receiver {
                host.write_punctuation(", ");
            }
            host.emit_expression_list(args);
        }

        host.write_punctuation(")");
    }
}

fn receiver_of(call: &ast::CallExpr) -> Option<&ast::Expr> {
    match &call.callee {
        ast::Callee::Expr(callee) => match callee.as_ref() {
            ast::Expr::Member(member) => Some(&member.obj),
            _ => None,
        },
        _ => None,
    }
}
