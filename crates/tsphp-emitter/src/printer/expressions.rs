//! Default rendering of expressions, used when no feature claims a node.

use swc_ecma_ast as ast;
use tsphp_diagnostics::DiagnosticCode;

use super::PhpPrinter;
use crate::features::unsupported_message;
use crate::host::{EmitHint, EmitHost};

impl PhpPrinter<'_> {
    pub(super) fn emit_expr_default(&mut self, expr: &ast::Expr) {
        match expr {
            ast::Expr::Ident(ident) => self.emit_ident_value(ident),
            ast::Expr::This(_) => self.writer.write("$this"),
            ast::Expr::Lit(lit) => self.emit_lit(lit),
            ast::Expr::Tpl(tpl) => self.emit_template(tpl),
            ast::Expr::Array(array) => {
                self.writer.write("[");
                for (i, elem) in array.elems.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    match elem {
                        Some(elem) => {
                            if elem.spread.is_some() {
                                self.writer.write("...");
                            }
                            self.emit_expression(&elem.expr);
                        }
                        None => self.writer.write("null"),
                    }
                }
                self.writer.write("]");
            }
            ast::Expr::Object(object) => self.emit_object_literal(object),
            ast::Expr::Paren(paren) => {
                self.writer.write("(");
                self.emit_expression(&paren.expr);
                self.writer.write(")");
            }
            ast::Expr::Member(member) => self.emit_member(member),
            ast::Expr::SuperProp(super_prop) => match &super_prop.prop {
                ast::SuperProp::Ident(prop) => {
                    self.writer.write("parent::");
                    self.writer.write(&prop.sym);
                }
                ast::SuperProp::Computed(_) => {
                    self.unsupported_expr(super_prop.span, "computed super property")
                }
            },
            ast::Expr::Call(call) => self.emit_call(call),
            ast::Expr::New(new) => {
                self.writer.write("new ");
                match new.callee.as_ref() {
                    ast::Expr::Ident(ident) => self.writer.write(&ident.sym),
                    callee => {
                        self.writer.write("(");
                        self.emit_expression(callee);
                        self.writer.write(")");
                    }
                }
                self.writer.write("(");
                if let Some(args) = &new.args {
                    self.emit_expression_list(args);
                }
                self.writer.write(")");
            }
            ast::Expr::Unary(unary) => self.emit_unary(unary),
            ast::Expr::Update(update) => {
                let op = match update.op {
                    ast::UpdateOp::PlusPlus => "++",
                    ast::UpdateOp::MinusMinus => "--",
                };
                if update.prefix {
                    self.writer.write(op);
                    self.emit_expression(&update.arg);
                } else {
                    self.emit_expression(&update.arg);
                    self.writer.write(op);
                }
            }
            ast::Expr::Bin(bin) => self.emit_binary(bin),
            ast::Expr::Assign(assign) => self.emit_assign(assign),
            ast::Expr::Cond(cond) => {
                self.emit_ternary_operand(&cond.test);
                self.writer.write(" ? ");
                self.emit_ternary_operand(&cond.cons);
                self.writer.write(" : ");
                self.emit_ternary_operand(&cond.alt);
            }
            ast::Expr::Arrow(arrow) => self.emit_arrow(arrow),
            ast::Expr::TsAs(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::TsNonNull(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::TsSatisfies(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::TsConstAssertion(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::TsTypeAssertion(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::TsInstantiation(e) => self.emit_with_hint(EmitHint::Expression, &e.expr),
            ast::Expr::Fn(f) => self.unsupported_expr(f.function.span, "function expression"),
            ast::Expr::Class(c) => self.unsupported_expr(c.class.span, "class expression"),
            ast::Expr::Seq(seq) => self.unsupported_expr(seq.span, "comma expression"),
            ast::Expr::OptChain(chain) => self.unsupported_expr(chain.span, "optional chaining"),
            ast::Expr::Await(e) => self.unsupported_expr(e.span, "await"),
            ast::Expr::Yield(e) => self.unsupported_expr(e.span, "yield"),
            ast::Expr::TaggedTpl(e) => self.unsupported_expr(e.span, "tagged template"),
            ast::Expr::MetaProp(e) => self.unsupported_expr(e.span, "meta property"),
            ast::Expr::PrivateName(e) => self.unsupported_expr(e.span, "private name"),
            other => {
                let span = swc_common::Spanned::span(other);
                self.unsupported_expr(span, "this expression")
            }
        }
    }

    /// Report U002 and write `null` in place of the expression.
    fn unsupported_expr(&mut self, span: swc_common::Span, what: &str) {
        self.report_error(
            span,
            DiagnosticCode::UnsupportedExpression,
            unsupported_message(what),
        );
        self.writer.write("null");
    }

    fn emit_ident_value(&mut self, ident: &ast::Ident) {
        match &*ident.sym {
            "undefined" => self.writer.write("null"),
            "NaN" => self.writer.write("NAN"),
            "Infinity" => self.writer.write("INF"),
            name => {
                self.writer.write("$");
                self.writer.write(name);
            }
        }
    }

    fn emit_lit(&mut self, lit: &ast::Lit) {
        match lit {
            ast::Lit::Str(s) => {
                let text = php_string(s.value.as_str().unwrap_or(""));
                self.writer.write(&text);
            }
            ast::Lit::Num(n) => self.writer.write(&php_number(n.value)),
            ast::Lit::Bool(b) => self.writer.write(if b.value { "true" } else { "false" }),
            ast::Lit::Null(_) => self.writer.write("null"),
            ast::Lit::BigInt(big) => self.writer.write(&big.value.to_string()),
            ast::Lit::Regex(re) => self.unsupported_expr(re.span, "regular expression literal"),
            ast::Lit::JSXText(text) => self.unsupported_expr(text.span, "JSX text"),
        }
    }

    /// Templates become concatenation: `"a" . $b . "c"`.
    fn emit_template(&mut self, tpl: &ast::Tpl) {
        let mut wrote_any = false;
        for (i, quasi) in tpl.quasis.iter().enumerate() {
            let raw: &str = quasi.raw.as_ref();
            if !raw.is_empty() {
                if wrote_any {
                    self.writer.write(" . ");
                }
                self.writer.write(&php_string(&unescape_template(raw)));
                wrote_any = true;
            }
            if let Some(expr) = tpl.exprs.get(i) {
                if wrote_any {
                    self.writer.write(" . ");
                }
                self.emit_concat_operand(expr);
                wrote_any = true;
            }
        }
        if !wrote_any {
            self.writer.write("\"\"");
        }
    }

    fn emit_concat_operand(&mut self, expr: &ast::Expr) {
        if needs_parens_as_operand(expr) {
            self.writer.write("(");
            self.emit_expression(expr);
            self.writer.write(")");
        } else {
            self.emit_expression(expr);
        }
    }

    fn emit_object_literal(&mut self, object: &ast::ObjectLit) {
        self.writer.write("[");
        let mut first = true;
        for prop in &object.props {
            match prop {
                ast::PropOrSpread::Spread(spread) => {
                    if !first {
                        self.writer.write(", ");
                    }
                    self.writer.write("...");
                    self.emit_expression(&spread.expr);
                }
                ast::PropOrSpread::Prop(prop) => match prop.as_ref() {
                    ast::Prop::Shorthand(ident) => {
                        if !first {
                            self.writer.write(", ");
                        }
                        self.writer.write(&php_string(&ident.sym));
                        self.writer.write(" => ");
                        self.emit_ident_value(ident);
                    }
                    ast::Prop::KeyValue(kv) => {
                        if !first {
                            self.writer.write(", ");
                        }
                        self.emit_prop_name(&kv.key);
                        self.writer.write(" => ");
                        self.emit_expression(&kv.value);
                    }
                    ast::Prop::Method(method) => {
                        self.report_error(
                            method.function.span,
                            DiagnosticCode::UnsupportedExpression,
                            unsupported_message("object literal method"),
                        );
                        continue;
                    }
                    ast::Prop::Getter(getter) => {
                        self.report_error(
                            getter.span,
                            DiagnosticCode::UnsupportedExpression,
                            unsupported_message("object literal getter"),
                        );
                        continue;
                    }
                    ast::Prop::Setter(setter) => {
                        self.report_error(
                            setter.span,
                            DiagnosticCode::UnsupportedExpression,
                            unsupported_message("object literal setter"),
                        );
                        continue;
                    }
                    ast::Prop::Assign(assign) => {
                        self.report_error(
                            assign.span,
                            DiagnosticCode::UnsupportedExpression,
                            unsupported_message("default value in object literal"),
                        );
                        continue;
                    }
                },
            }
            first = false;
        }
        self.writer.write("]");
    }

    fn emit_prop_name(&mut self, key: &ast::PropName) {
        match key {
            ast::PropName::Ident(ident) => self.writer.write(&php_string(&ident.sym)),
            ast::PropName::Str(s) => {
                self.writer.write(&php_string(s.value.as_str().unwrap_or("")))
            }
            ast::PropName::Num(n) => self.writer.write(&php_number(n.value)),
            ast::PropName::BigInt(big) => self.writer.write(&big.value.to_string()),
            ast::PropName::Computed(computed) => self.emit_expression(&computed.expr),
        }
    }

    /// `Foo::$x` for declared classes, `$o->x` for instances, `$o["x"]` otherwise.
    fn emit_member(&mut self, member: &ast::MemberExpr) {
        if let (ast::Expr::Ident(class), ast::MemberProp::Ident(prop)) =
            (member.obj.as_ref(), &member.prop)
        {
            if self.is_declared_class(&class.sym) {
                self.writer.write(&class.sym);
                self.writer.write("::$");
                self.writer.write(&prop.sym);
                return;
            }
        }

        let instance = self.classifier.is_class_instance(&member.obj);
        self.emit_member_object(&member.obj);
        match &member.prop {
            ast::MemberProp::Ident(prop) if instance => {
                self.writer.write("->");
                self.writer.write(&prop.sym);
            }
            ast::MemberProp::Ident(prop) => {
                self.writer.write("[");
                self.writer.write(&php_string(&prop.sym));
                self.writer.write("]");
            }
            ast::MemberProp::PrivateName(private) => {
                self.writer.write("->");
                self.writer.write(&private.name);
            }
            ast::MemberProp::Computed(computed) if instance => {
                self.writer.write("->{");
                self.emit_expression(&computed.expr);
                self.writer.write("}");
            }
            ast::MemberProp::Computed(computed) => {
                self.writer.write("[");
                self.emit_expression(&computed.expr);
                self.writer.write("]");
            }
        }
    }

    fn emit_member_object(&mut self, obj: &ast::Expr) {
        if needs_parens_as_operand(obj) || matches!(obj, ast::Expr::New(_)) {
            self.writer.write("(");
            self.emit_expression(obj);
            self.writer.write(")");
        } else {
            self.emit_expression(obj);
        }
    }

    fn emit_call(&mut self, call: &ast::CallExpr) {
        match &call.callee {
            ast::Callee::Super(_) => self.writer.write("parent::__construct"),
            ast::Callee::Import(import) => {
                self.unsupported_expr(import.span, "dynamic import");
                return;
            }
            ast::Callee::Expr(callee) => match callee.as_ref() {
                ast::Expr::Ident(ident) => self.writer.write(&ident.sym),
                ast::Expr::Member(member) => self.emit_method_callee(callee, member),
                ast::Expr::Paren(_) => self.emit_expression(callee),
                callee => {
                    self.writer.write("(");
                    self.emit_expression(callee);
                    self.writer.write(")");
                }
            },
        }
        self.writer.write("(");
        self.emit_expression_list(&call.args);
        self.writer.write(")");
    }

    /// Method calls: `Foo::m`, `$o->m`, or a callable stored in an array.
    fn emit_method_callee(&mut self, callee: &ast::Expr, member: &ast::MemberExpr) {
        if let ast::MemberProp::Ident(prop) = &member.prop {
            if let ast::Expr::Ident(class) = member.obj.as_ref() {
                if self.is_declared_class(&class.sym) {
                    self.writer.write(&class.sym);
                    self.writer.write("::");
                    self.writer.write(&prop.sym);
                    return;
                }
            }
            if self.classifier.is_class_instance(&member.obj) {
                self.emit_member_object(&member.obj);
                self.writer.write("->");
                self.writer.write(&prop.sym);
                return;
            }
        }
        self.emit_expression(callee);
    }

    fn emit_unary(&mut self, unary: &ast::UnaryExpr) {
        let op = match unary.op {
            ast::UnaryOp::Minus => "-",
            ast::UnaryOp::Plus => "+",
            ast::UnaryOp::Bang => "!",
            ast::UnaryOp::Tilde => "~",
            ast::UnaryOp::Void if matches!(unary.arg.as_ref(), ast::Expr::Lit(_)) => {
                self.writer.write("null");
                return;
            }
            op @ (ast::UnaryOp::Void | ast::UnaryOp::TypeOf | ast::UnaryOp::Delete) => {
                self.report_error(
                    unary.span,
                    DiagnosticCode::UnsupportedOperator,
                    unsupported_message(&format!("operator `{}`", op.as_str())),
                );
                self.writer.write("null");
                return;
            }
        };
        self.writer.write(op);
        self.emit_concat_operand(&unary.arg);
    }

    fn emit_binary(&mut self, bin: &ast::BinExpr) {
        let op = match bin.op {
            ast::BinaryOp::Add if is_stringish(&bin.left) || is_stringish(&bin.right) => ".",
            ast::BinaryOp::ZeroFillRShift | ast::BinaryOp::In => {
                self.report_error(
                    bin.span,
                    DiagnosticCode::UnsupportedOperator,
                    unsupported_message(&format!("operator `{}`", bin.op.as_str())),
                );
                self.writer.write("null");
                return;
            }
            op => php_binary_op(op),
        };
        self.emit_binary_operand(&bin.left, bin.op);
        self.writer.write(" ");
        self.writer.write(op);
        self.writer.write(" ");
        if bin.op == ast::BinaryOp::InstanceOf {
            if let ast::Expr::Ident(class) = bin.right.as_ref() {
                self.writer.write(&class.sym);
                return;
            }
        }
        self.emit_binary_operand(&bin.right, bin.op);
    }

    // PHP precedence differs from JavaScript around `.`, so nested binaries
    // with a different operator are always parenthesized.
    fn emit_binary_operand(&mut self, operand: &ast::Expr, parent: ast::BinaryOp) {
        let wrap = match operand {
            ast::Expr::Bin(child) => child.op != parent,
            other => needs_parens_as_operand(other),
        };
        if wrap {
            self.writer.write("(");
            self.emit_expression(operand);
            self.writer.write(")");
        } else {
            self.emit_expression(operand);
        }
    }

    // Nested ternaries must be parenthesized in PHP 8.
    fn emit_ternary_operand(&mut self, operand: &ast::Expr) {
        if matches!(operand, ast::Expr::Cond(_) | ast::Expr::Assign(_)) {
            self.writer.write("(");
            self.emit_expression(operand);
            self.writer.write(")");
        } else {
            self.emit_expression(operand);
        }
    }

    fn emit_assign(&mut self, assign: &ast::AssignExpr) {
        let op = match assign.op {
            ast::AssignOp::Assign => "=",
            ast::AssignOp::AddAssign if is_stringish(&assign.right) => ".=",
            ast::AssignOp::AddAssign => "+=",
            ast::AssignOp::SubAssign => "-=",
            ast::AssignOp::MulAssign => "*=",
            ast::AssignOp::DivAssign => "/=",
            ast::AssignOp::ModAssign => "%=",
            ast::AssignOp::ExpAssign => "**=",
            ast::AssignOp::LShiftAssign => "<<=",
            ast::AssignOp::RShiftAssign => ">>=",
            ast::AssignOp::BitOrAssign => "|=",
            ast::AssignOp::BitXorAssign => "^=",
            ast::AssignOp::BitAndAssign => "&=",
            ast::AssignOp::NullishAssign => "??=",
            op @ (ast::AssignOp::ZeroFillRShiftAssign
            | ast::AssignOp::AndAssign
            | ast::AssignOp::OrAssign) => {
                self.report_error(
                    assign.span,
                    DiagnosticCode::UnsupportedOperator,
                    unsupported_message(&format!("operator `{}`", op.as_str())),
                );
                self.writer.write("null");
                return;
            }
        };

        match &assign.left {
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::Ident(ident)) => {
                self.emit_ident_value(&ident.id)
            }
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::Member(member)) => {
                self.emit_expression(&ast::Expr::Member(member.clone()))
            }
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::SuperProp(_)) => {
                self.unsupported_expr(assign.span, "assignment to a super property");
                return;
            }
            ast::AssignTarget::Simple(_) => {
                self.unsupported_expr(assign.span, "this assignment target");
                return;
            }
            ast::AssignTarget::Pat(_) => {
                self.unsupported_expr(assign.span, "destructuring assignment");
                return;
            }
        }
        self.writer.write(" ");
        self.writer.write(op);
        self.writer.write(" ");
        self.emit_expression(&assign.right);
    }

    /// Expression-bodied arrows become PHP short closures, which capture by
    /// value automatically.
    fn emit_arrow(&mut self, arrow: &ast::ArrowExpr) {
        let body = match arrow.body.as_ref() {
            ast::BlockStmtOrExpr::Expr(body) => body,
            ast::BlockStmtOrExpr::BlockStmt(_) => {
                self.unsupported_expr(arrow.span, "arrow function with a block body");
                return;
            }
        };
        if arrow.is_async || arrow.is_generator {
            self.unsupported_expr(arrow.span, "async arrow function");
            return;
        }
        self.writer.write("fn(");
        for (i, param) in arrow.params.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_param_pat(param);
        }
        self.writer.write(") => ");
        self.emit_expression(body);
    }

    /// One function parameter: `$a`, `$a = 1`, or `...$rest`.
    pub(super) fn emit_param_pat(&mut self, pat: &ast::Pat) {
        match pat {
            ast::Pat::Ident(binding) => {
                self.writer.write("$");
                self.writer.write(&binding.id.sym);
            }
            ast::Pat::Assign(assign) => {
                self.emit_param_pat(&assign.left);
                self.writer.write(" = ");
                self.emit_expression(&assign.right);
            }
            ast::Pat::Rest(rest) => {
                self.writer.write("...");
                self.emit_param_pat(&rest.arg);
            }
            other => {
                let span = swc_common::Spanned::span(other);
                self.report_error(
                    span,
                    DiagnosticCode::UnsupportedExpression,
                    unsupported_message("destructuring parameter"),
                );
                self.writer.write("$_");
            }
        }
    }
}

fn php_binary_op(op: ast::BinaryOp) -> &'static str {
    match op {
        ast::BinaryOp::EqEq => "==",
        ast::BinaryOp::NotEq => "!=",
        ast::BinaryOp::EqEqEq => "===",
        ast::BinaryOp::NotEqEq => "!==",
        ast::BinaryOp::Lt => "<",
        ast::BinaryOp::LtEq => "<=",
        ast::BinaryOp::Gt => ">",
        ast::BinaryOp::GtEq => ">=",
        ast::BinaryOp::LShift => "<<",
        ast::BinaryOp::RShift => ">>",
        ast::BinaryOp::ZeroFillRShift => ">>",
        ast::BinaryOp::Add => "+",
        ast::BinaryOp::Sub => "-",
        ast::BinaryOp::Mul => "*",
        ast::BinaryOp::Div => "/",
        ast::BinaryOp::Mod => "%",
        ast::BinaryOp::BitOr => "|",
        ast::BinaryOp::BitXor => "^",
        ast::BinaryOp::BitAnd => "&",
        ast::BinaryOp::LogicalOr => "||",
        ast::BinaryOp::LogicalAnd => "&&",
        ast::BinaryOp::In => "in",
        ast::BinaryOp::InstanceOf => "instanceof",
        ast::BinaryOp::Exp => "**",
        ast::BinaryOp::NullishCoalescing => "??",
    }
}

/// Whether `+` on this operand means string concatenation.
fn is_stringish(expr: &ast::Expr) -> bool {
    match expr {
        ast::Expr::Lit(ast::Lit::Str(_)) | ast::Expr::Tpl(_) => true,
        ast::Expr::Paren(paren) => is_stringish(&paren.expr),
        ast::Expr::Bin(bin) if bin.op == ast::BinaryOp::Add => {
            is_stringish(&bin.left) || is_stringish(&bin.right)
        }
        _ => false,
    }
}

fn needs_parens_as_operand(expr: &ast::Expr) -> bool {
    matches!(
        expr,
        ast::Expr::Bin(_)
            | ast::Expr::Cond(_)
            | ast::Expr::Assign(_)
            | ast::Expr::Arrow(_)
            | ast::Expr::Unary(_)
    )
}

/// PHP double-quoted string literal.
pub(crate) fn php_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{1b}' => out.push_str("\\e"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub(crate) fn php_number(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        let inf = if value > 0.0 { "INF" } else { "-INF" };
        inf.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Resolve the escapes of a raw template chunk.
fn unescape_template(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('$') => result.push('$'),
            Some('`') => result.push('`'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            // Line continuation.
            Some('\n') => {}
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_php_string_escapes() {
        assert_eq!(php_string("plain"), "\"plain\"");
        assert_eq!(php_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(php_string("$name"), "\"\\$name\"");
        assert_eq!(php_string("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(php_string("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(php_string("\u{1}"), "\"\\u{1}\"");
    }

    #[test]
    fn test_php_number() {
        assert_eq!(php_number(42.0), "42");
        assert_eq!(php_number(-3.0), "-3");
        assert_eq!(php_number(0.5), "0.5");
        assert_eq!(php_number(f64::NAN), "NAN");
        assert_eq!(php_number(f64::NEG_INFINITY), "-INF");
    }

    #[test]
    fn test_unescape_template() {
        assert_eq!(unescape_template("a\\nb"), "a\nb");
        assert_eq!(unescape_template("\\`tick\\`"), "`tick`");
        assert_eq!(unescape_template("cost: \\$5"), "cost: $5");
        assert_eq!(unescape_template("\\u0041"), "\\u0041");
    }

    #[test]
    fn test_binary_operator_table() {
        assert_eq!(php_binary_op(ast::BinaryOp::EqEqEq), "===");
        assert_eq!(php_binary_op(ast::BinaryOp::NullishCoalescing), "??");
        assert_eq!(php_binary_op(ast::BinaryOp::Exp), "**");
    }
}
