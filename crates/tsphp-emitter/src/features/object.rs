//! Object model rewrites: `Object.*` statics, `in`, and `hasOwnProperty`.
//!
//! PHP has no prototype objects, so JavaScript objects end up either as class
//! instances or as associative arrays. Existence checks pick the PHP
//! primitive that matches whichever of the two the operand is.

use swc_ecma_ast as ast;
use tsphp_diagnostics::DiagnosticCode;

use super::{
    create_diagnostic, name_text, synthesized_call, synthesized_undefined, unsupported_message,
    Feature, NamedHelper,
};
use crate::host::{EmitHint, EmitHost};

/// How one `Object.<name>(...)` call is rewritten.
#[derive(Debug, Clone, Copy)]
pub enum RuleEntry {
    /// Writes the replacement itself.
    Emit(fn(&ast::CallExpr, &mut dyn EmitHost)),
    /// Delegates to a PHP helper function.
    Helper(NamedHelper),
}

impl RuleEntry {
    pub fn apply(&self, call: &ast::CallExpr, host: &mut dyn EmitHost) {
        match self {
            RuleEntry::Emit(emit) => emit(call, host),
            RuleEntry::Helper(helper) => helper.emit(call, host),
        }
    }
}

const STATIC_RULES: &[(&str, RuleEntry)] = &[
    (
        "assign",
        RuleEntry::Helper(NamedHelper::new("array_merge").without_receiver()),
    ),
    (
        "keys",
        RuleEntry::Helper(
            NamedHelper::new("array_keys")
                .without_receiver()
                .with_max_args(1),
        ),
    ),
    (
        "values",
        RuleEntry::Helper(
            NamedHelper::new("array_values")
                .without_receiver()
                .with_max_args(1),
        ),
    ),
    ("freeze", RuleEntry::Emit(emit_freeze)),
];

/// Rule for `Object.<name>`, if one exists.
pub fn static_rule(name: &str) -> Option<&'static RuleEntry> {
    STATIC_RULES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, rule)| rule)
}

// PHP values carry no frozen state; the argument passes through unchanged.
fn emit_freeze(call: &ast::CallExpr, host: &mut dyn EmitHost) {
    match call.args.first() {
        Some(arg) => host.emit_with_hint(EmitHint::Expression, &arg.expr),
        None => host.write_base("null"),
    }
}

pub struct ObjectFeature;

impl Feature for ObjectFeature {
    fn name(&self) -> &'static str {
        "object"
    }

    fn emit(&self, hint: EmitHint, expr: &ast::Expr, host: &mut dyn EmitHost) -> bool {
        if hint == EmitHint::Expression {
            if let Some((call, member)) = object_static_call(expr) {
                let name = name_text(host, member);
                match static_rule(&name) {
                    Some(rule) => {
                        log::trace!("rewriting Object.{name}");
                        rule.apply(call, host);
                        return true;
                    }
                    None => {
                        let diagnostic = create_diagnostic(
                            call.span,
                            host.source_file(),
                            DiagnosticCode::UnsupportedObjectMethod,
                            unsupported_message(&format!("Object.{name}")),
                        );
                        host.report(diagnostic);
                    }
                }
            }
        }

        if let ast::Expr::Member(member) = expr {
            if let ast::MemberProp::Ident(prop) = &member.prop {
                if name_text(host, prop) == "prototype" {
                    let text = host
                        .text_of_node(member.span)
                        .map_or_else(|| "prototype access".to_string(), str::to_owned);
                    let diagnostic = create_diagnostic(
                        member.span,
                        host.source_file(),
                        DiagnosticCode::PrototypeAccess,
                        unsupported_message(&text),
                    );
                    host.report(diagnostic);
                }
            }
        }

        if hint == EmitHint::Expression {
            if let ast::Expr::Bin(bin) = expr {
                if bin.op == ast::BinaryOp::In {
                    emit_property_exists(&bin.right, &bin.left, host);
                    return true;
                }
            }
        }

        if let ast::Expr::Call(call) = expr {
            if let Some(member) = callee_member(call) {
                if let ast::MemberProp::Ident(prop) = &member.prop {
                    if name_text(host, prop) == "hasOwnProperty" {
                        let undefined;
                        let key = match call.args.first() {
                            Some(arg) => &*arg.expr,
                            None => {
                                undefined = synthesized_undefined();
                                &undefined
                            }
                        };
                        emit_property_exists(&member.obj, key, host);
                        return true;
                    }
                }
            }
        }

        false
    }
}

/// `property_exists($object, $key)` for class instances,
/// `array_key_exists($key, $object)` for everything else.
pub fn emit_property_exists(object: &ast::Expr, key: &ast::Expr, host: &mut dyn EmitHost) {
    let check = if host.type_classifier().is_class_instance(object) {
        synthesized_call("property_exists", vec![object.clone(), key.clone()])
    } else {
        synthesized_call("array_key_exists", vec![key.clone(), object.clone()])
    };
    host.emit_expression(&check);
}

fn callee_member(call: &ast::CallExpr) -> Option<&ast::MemberExpr> {
    match &call.callee {
        ast::Callee::Expr(callee) => match callee.as_ref() {
            ast::Expr::Member(member) => Some(member),
            _ => None,
        },
        _ => None,
    }
}

/// `Object.<name>(...)` with the plain identifier `Object` as receiver.
pub(crate) fn object_static_call(expr: &ast::Expr) -> Option<(&ast::CallExpr, &ast::IdentName)> {
    let ast::Expr::Call(call) = expr else {
        return None;
    };
    let member = callee_member(call)?;
    match (member.obj.as_ref(), &member.prop) {
        (ast::Expr::Ident(object), ast::MemberProp::Ident(prop)) if &*object.sym == "Object" => {
            Some((call, prop))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_keys() {
        assert!(static_rule("assign").is_some());
        assert!(static_rule("keys").is_some());
        assert!(static_rule("values").is_some());
        assert!(static_rule("freeze").is_some());
        assert!(static_rule("entries").is_none());
        assert!(static_rule("Assign").is_none());
    }

    #[test]
    fn test_rule_table_helpers() {
        match static_rule("assign") {
            Some(RuleEntry::Helper(helper)) => assert_eq!(helper.name(), "array_merge"),
            other => panic!("unexpected rule {other:?}"),
        }
        match static_rule("keys") {
            Some(RuleEntry::Helper(helper)) => assert_eq!(helper.name(), "array_keys"),
            other => panic!("unexpected rule {other:?}"),
        }
        assert!(matches!(static_rule("freeze"), Some(RuleEntry::Emit(_))));
    }

    #[test]
    fn test_rule_names_are_unique() {
        for (i, (name, _)) in STATIC_RULES.iter().enumerate() {
            assert!(STATIC_RULES[i + 1..].iter().all(|(other, _)| other != name));
        }
    }
}
