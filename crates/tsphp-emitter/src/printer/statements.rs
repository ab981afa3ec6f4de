//! Statements and declarations.

use swc_ecma_ast as ast;
use tsphp_diagnostics::{Diagnostic, DiagnosticCode};

use super::PhpPrinter;
use crate::features::object::object_static_call;
use crate::features::unsupported_message;
use crate::host::{EmitHint, EmitHost};

impl PhpPrinter<'_> {
    pub(super) fn emit_module_item(&mut self, item: &ast::ModuleItem) {
        match item {
            ast::ModuleItem::Stmt(stmt) => self.emit_stmt(stmt),
            ast::ModuleItem::ModuleDecl(decl) => self.emit_module_decl(decl),
        }
    }

    fn emit_module_decl(&mut self, decl: &ast::ModuleDecl) {
        match decl {
            ast::ModuleDecl::ExportDecl(export) => self.emit_decl(&export.decl),
            ast::ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                ast::DefaultDecl::Class(class) => match &class.ident {
                    Some(ident) => self.emit_class(ident, &class.class),
                    None => self.report_error(
                        export.span,
                        DiagnosticCode::UnsupportedStatement,
                        unsupported_message("anonymous default export"),
                    ),
                },
                ast::DefaultDecl::Fn(function) => match &function.ident {
                    Some(ident) => self.emit_function(ident, &function.function),
                    None => self.report_error(
                        export.span,
                        DiagnosticCode::UnsupportedStatement,
                        unsupported_message("anonymous default export"),
                    ),
                },
                ast::DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ast::ModuleDecl::Import(import) if import.type_only => {}
            ast::ModuleDecl::Import(import) => self.report_warning(
                import.span,
                DiagnosticCode::UnsupportedStatement,
                "import declarations are not translated; load the dependency yourself"
                    .to_string(),
            ),
            ast::ModuleDecl::ExportNamed(export) if export.type_only => {}
            ast::ModuleDecl::ExportNamed(export) => self.report_warning(
                export.span,
                DiagnosticCode::UnsupportedStatement,
                "export lists are not translated".to_string(),
            ),
            ast::ModuleDecl::ExportAll(export) => self.report_warning(
                export.span,
                DiagnosticCode::UnsupportedStatement,
                "export lists are not translated".to_string(),
            ),
            ast::ModuleDecl::ExportDefaultExpr(export) => self.report_error(
                export.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("default export of an expression"),
            ),
            other => {
                let span = swc_common::Spanned::span(other);
                self.report_error(
                    span,
                    DiagnosticCode::UnsupportedStatement,
                    unsupported_message("this module declaration"),
                );
            }
        }
    }

    pub(super) fn emit_stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::Expr(expr_stmt) => self.emit_expr_stmt(expr_stmt),
            ast::Stmt::Decl(decl) => self.emit_decl(decl),
            ast::Stmt::Return(ret) => {
                self.writer.write("return");
                if let Some(arg) = &ret.arg {
                    self.writer.write(" ");
                    self.emit_expression(arg);
                }
                self.writer.write(";");
                self.writer.write_line();
            }
            ast::Stmt::If(if_stmt) => {
                self.emit_if(if_stmt);
                self.writer.write_line();
            }
            ast::Stmt::While(while_stmt) => {
                self.writer.write("while (");
                self.emit_expression(&while_stmt.test);
                self.writer.write(") ");
                self.emit_body(&while_stmt.body);
                self.writer.write_line();
            }
            ast::Stmt::DoWhile(do_while) => {
                self.writer.write("do ");
                self.emit_body(&do_while.body);
                self.writer.write(" while (");
                self.emit_expression(&do_while.test);
                self.writer.write(");");
                self.writer.write_line();
            }
            ast::Stmt::For(for_stmt) => {
                self.writer.write("for (");
                match &for_stmt.init {
                    Some(ast::VarDeclOrExpr::VarDecl(var)) => self.emit_var_decl_inline(var),
                    Some(ast::VarDeclOrExpr::Expr(expr)) => self.emit_expression(expr),
                    None => {}
                }
                self.writer.write("; ");
                if let Some(test) = &for_stmt.test {
                    self.emit_expression(test);
                }
                self.writer.write("; ");
                if let Some(update) = &for_stmt.update {
                    self.emit_expression(update);
                }
                self.writer.write(") ");
                self.emit_body(&for_stmt.body);
                self.writer.write_line();
            }
            ast::Stmt::ForOf(for_of) => self.emit_for_of(for_of),
            ast::Stmt::Block(block) => {
                self.emit_block(&block.stmts);
                self.writer.write_line();
            }
            ast::Stmt::Throw(throw) => {
                self.writer.write("throw ");
                self.emit_expression(&throw.arg);
                self.writer.write(";");
                self.writer.write_line();
            }
            ast::Stmt::Try(try_stmt) => self.emit_try(try_stmt),
            ast::Stmt::Switch(switch) => self.emit_switch(switch),
            ast::Stmt::Break(brk) if brk.label.is_none() => {
                self.writer.write("break;");
                self.writer.write_line();
            }
            ast::Stmt::Continue(cont) if cont.label.is_none() => {
                self.writer.write("continue;");
                self.writer.write_line();
            }
            ast::Stmt::Empty(_) => {}
            other => {
                let span = swc_common::Spanned::span(other);
                self.report_error(
                    span,
                    DiagnosticCode::UnsupportedStatement,
                    unsupported_message(stmt_kind(other)),
                );
            }
        }
    }

    /// Expression statements discard their value, so features see them with
    /// [`EmitHint::Unspecified`].
    fn emit_expr_stmt(&mut self, expr_stmt: &ast::ExprStmt) {
        if !self.try_features(EmitHint::Unspecified, &expr_stmt.expr) {
            match object_static_call(&expr_stmt.expr) {
                Some((_, name)) if &*name.sym == "assign" => {
                    // array_merge returns a new array; a discarded result loses
                    // the merge.
                    let diagnostic = Diagnostic::error(
                        DiagnosticCode::UnsupportedExpression,
                        unsupported_message("Object.assign as a statement"),
                    )
                    .with_span(self.file.span(expr_stmt.span))
                    .with_help("assign the result instead: `x = Object.assign(x, ...)`")
                    .build();
                    self.report(diagnostic);
                    return;
                }
                // The remaining statics have no side effects to lose; the
                // rewritten value is evaluated and dropped.
                Some(_) => {
                    if !self.try_features(EmitHint::Expression, &expr_stmt.expr) {
                        self.emit_expr_default(&expr_stmt.expr);
                    }
                }
                None => self.emit_expr_default(&expr_stmt.expr),
            }
        }
        self.writer.write(";");
        self.writer.write_line();
    }

    fn emit_decl(&mut self, decl: &ast::Decl) {
        match decl {
            ast::Decl::Var(var) if var.declare => {}
            ast::Decl::Var(var) => {
                for declarator in &var.decls {
                    self.emit_var_declarator(declarator);
                }
            }
            ast::Decl::Fn(function) if function.declare => {}
            ast::Decl::Fn(function) => self.emit_function(&function.ident, &function.function),
            ast::Decl::Class(class) if class.declare => {}
            ast::Decl::Class(class) => self.emit_class(&class.ident, &class.class),
            ast::Decl::TsInterface(_) | ast::Decl::TsTypeAlias(_) => {}
            ast::Decl::TsEnum(e) => self.report_error(
                e.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("enum declaration"),
            ),
            ast::Decl::TsModule(m) if m.declare => {}
            ast::Decl::TsModule(m) => self.report_error(
                m.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("namespace declaration"),
            ),
            ast::Decl::Using(using) => self.report_error(
                using.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("using declaration"),
            ),
        }
    }

    /// `let x = 1;` becomes `$x = 1;`. Declarations without an initializer
    /// become `$x = null;` so the variable exists.
    fn emit_var_declarator(&mut self, declarator: &ast::VarDeclarator) {
        let ast::Pat::Ident(binding) = &declarator.name else {
            self.report_error(
                declarator.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("destructuring declaration"),
            );
            return;
        };
        self.writer.write("$");
        self.writer.write(&binding.id.sym);
        self.writer.write(" = ");
        match &declarator.init {
            Some(init) => self.emit_expression(init),
            None => self.writer.write("null"),
        }
        self.writer.write(";");
        self.writer.write_line();
    }

    /// Declarators in a `for` header: `$i = 0, $j = 10`.
    fn emit_var_decl_inline(&mut self, var: &ast::VarDecl) {
        for (i, declarator) in var.decls.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_param_pat(&declarator.name);
            if let Some(init) = &declarator.init {
                self.writer.write(" = ");
                self.emit_expression(init);
            }
        }
    }

    fn emit_function(&mut self, ident: &ast::Ident, function: &ast::Function) {
        let Some(body) = &function.body else {
            return;
        };
        if function.is_async || function.is_generator {
            self.report_error(
                function.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("async or generator function"),
            );
            return;
        }
        self.writer.write("function ");
        self.writer.write(&ident.sym);
        self.emit_params(function.params.iter().map(|param| &param.pat));
        self.writer.write(" ");
        self.emit_block(&body.stmts);
        self.writer.write_line();
    }

    fn emit_params<'p>(&mut self, params: impl Iterator<Item = &'p ast::Pat>) {
        self.writer.write("(");
        for (i, pat) in params.enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_param_pat(pat);
        }
        self.writer.write(")");
    }

    fn emit_class(&mut self, ident: &ast::Ident, class: &ast::Class) {
        if class.is_abstract {
            self.writer.write("abstract ");
        }
        self.writer.write("class ");
        self.writer.write(&ident.sym);
        if let Some(super_class) = &class.super_class {
            match super_class.as_ref() {
                ast::Expr::Ident(parent) => {
                    self.writer.write(" extends ");
                    self.writer.write(&parent.sym);
                }
                other => {
                    let span = swc_common::Spanned::span(other);
                    self.report_error(
                        span,
                        DiagnosticCode::UnsupportedStatement,
                        unsupported_message("computed base class"),
                    );
                }
            }
        }
        self.writer.write(" {");
        self.writer.write_line();
        self.writer.increase_indent();

        for member in &class.body {
            self.emit_class_member(member);
        }

        self.writer.decrease_indent();
        self.writer.write("}");
        self.writer.write_line();
    }

    fn emit_class_member(&mut self, member: &ast::ClassMember) {
        match member {
            ast::ClassMember::ClassProp(prop) if prop.declare => {}
            ast::ClassMember::ClassProp(prop) => {
                let ast::PropName::Ident(name) = &prop.key else {
                    self.report_error(
                        prop.span,
                        DiagnosticCode::UnsupportedStatement,
                        unsupported_message("computed property name"),
                    );
                    return;
                };
                self.writer.write(visibility(prop.accessibility));
                if prop.is_static {
                    self.writer.write(" static");
                }
                self.writer.write(" $");
                self.writer.write(&name.sym);
                if let Some(value) = &prop.value {
                    self.writer.write(" = ");
                    self.emit_expression(value);
                }
                self.writer.write(";");
                self.writer.write_line();
            }
            ast::ClassMember::PrivateProp(prop) => {
                self.writer.write("private");
                if prop.is_static {
                    self.writer.write(" static");
                }
                self.writer.write(" $");
                self.writer.write(&prop.key.name);
                if let Some(value) = &prop.value {
                    self.writer.write(" = ");
                    self.emit_expression(value);
                }
                self.writer.write(";");
                self.writer.write_line();
            }
            ast::ClassMember::Constructor(ctor) => self.emit_constructor(ctor),
            ast::ClassMember::Method(method) => self.emit_method(method),
            ast::ClassMember::TsIndexSignature(_) | ast::ClassMember::Empty(_) => {}
            other => {
                let span = swc_common::Spanned::span(other);
                self.report_error(
                    span,
                    DiagnosticCode::UnsupportedStatement,
                    unsupported_message("this class member"),
                );
            }
        }
    }

    /// Parameter properties become declared properties assigned at the top
    /// of `__construct`.
    fn emit_constructor(&mut self, ctor: &ast::Constructor) {
        let Some(body) = &ctor.body else {
            return;
        };

        let mut promoted = Vec::new();
        for param in &ctor.params {
            if let ast::ParamOrTsParamProp::TsParamProp(prop) = param {
                let binding = match &prop.param {
                    ast::TsParamPropParam::Ident(binding) => binding,
                    ast::TsParamPropParam::Assign(assign) => match assign.left.as_ref() {
                        ast::Pat::Ident(binding) => binding,
                        _ => continue,
                    },
                };
                self.writer.write(visibility(prop.accessibility));
                self.writer.write(" $");
                self.writer.write(&binding.id.sym);
                self.writer.write(";");
                self.writer.write_line();
                promoted.push(binding.id.sym.clone());
            }
        }

        self.writer.write(visibility(ctor.accessibility));
        self.writer.write(" function __construct");
        self.writer.write("(");
        let mut first = true;
        for param in &ctor.params {
            if !first {
                self.writer.write(", ");
            }
            first = false;
            match param {
                ast::ParamOrTsParamProp::Param(param) => self.emit_param_pat(&param.pat),
                ast::ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    ast::TsParamPropParam::Ident(binding) => {
                        self.writer.write("$");
                        self.writer.write(&binding.id.sym);
                    }
                    ast::TsParamPropParam::Assign(assign) => {
                        self.emit_param_pat(&assign.left);
                        self.writer.write(" = ");
                        self.emit_expression(&assign.right);
                    }
                },
            }
        }
        self.writer.write(") {");
        self.writer.write_line();
        self.writer.increase_indent();
        for name in &promoted {
            self.writer.write(&format!("$this->{name} = ${name};"));
            self.writer.write_line();
        }
        for stmt in &body.stmts {
            self.emit_stmt(stmt);
        }
        self.writer.decrease_indent();
        self.writer.write("}");
        self.writer.write_line();
    }

    fn emit_method(&mut self, method: &ast::ClassMethod) {
        let ast::PropName::Ident(name) = &method.key else {
            self.report_error(
                method.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("computed method name"),
            );
            return;
        };
        if method.kind != ast::MethodKind::Method {
            self.report_error(
                method.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("accessor"),
            );
            return;
        }
        let function = &method.function;
        if function.is_async || function.is_generator {
            self.report_error(
                method.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("async or generator method"),
            );
            return;
        }

        if method.is_abstract {
            self.writer.write("abstract ");
        }
        self.writer.write(visibility(method.accessibility));
        if method.is_static {
            self.writer.write(" static");
        }
        self.writer.write(" function ");
        self.writer.write(&name.sym);
        self.emit_params(function.params.iter().map(|param| &param.pat));
        match &function.body {
            Some(body) => {
                self.writer.write(" ");
                self.emit_block(&body.stmts);
            }
            None => self.writer.write(";"),
        }
        self.writer.write_line();
    }

    fn emit_if(&mut self, if_stmt: &ast::IfStmt) {
        self.writer.write("if (");
        self.emit_expression(&if_stmt.test);
        self.writer.write(") ");
        self.emit_body(&if_stmt.cons);
        if let Some(alt) = &if_stmt.alt {
            self.writer.write(" else");
            match alt.as_ref() {
                ast::Stmt::If(nested) => {
                    self.writer.write("if ");
                    self.emit_if_tail(nested);
                }
                other => {
                    self.writer.write(" ");
                    self.emit_body(other);
                }
            }
        }
    }

    // `elseif (...)`; the leading `if` keyword is already written.
    fn emit_if_tail(&mut self, if_stmt: &ast::IfStmt) {
        self.writer.write("(");
        self.emit_expression(&if_stmt.test);
        self.writer.write(") ");
        self.emit_body(&if_stmt.cons);
        if let Some(alt) = &if_stmt.alt {
            self.writer.write(" else");
            match alt.as_ref() {
                ast::Stmt::If(nested) => {
                    self.writer.write("if ");
                    self.emit_if_tail(nested);
                }
                other => {
                    self.writer.write(" ");
                    self.emit_body(other);
                }
            }
        }
    }

    /// `for (const x of xs)` becomes `foreach ($xs as $x)`.
    fn emit_for_of(&mut self, for_of: &ast::ForOfStmt) {
        let binding = match &for_of.left {
            ast::ForHead::VarDecl(var) if var.decls.len() == 1 => match &var.decls[0].name {
                ast::Pat::Ident(binding) => Some(&binding.id),
                _ => None,
            },
            ast::ForHead::Pat(pat) => match pat.as_ref() {
                ast::Pat::Ident(binding) => Some(&binding.id),
                _ => None,
            },
            _ => None,
        };
        let Some(binding) = binding else {
            self.report_error(
                for_of.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("destructuring in for-of"),
            );
            return;
        };
        if for_of.is_await {
            self.report_error(
                for_of.span,
                DiagnosticCode::UnsupportedStatement,
                unsupported_message("for await"),
            );
            return;
        }
        self.writer.write("foreach (");
        self.emit_expression(&for_of.right);
        self.writer.write(" as $");
        self.writer.write(&binding.sym);
        self.writer.write(") ");
        self.emit_body(&for_of.body);
        self.writer.write_line();
    }

    fn emit_try(&mut self, try_stmt: &ast::TryStmt) {
        self.writer.write("try ");
        self.emit_block(&try_stmt.block.stmts);
        if let Some(handler) = &try_stmt.handler {
            self.writer.write(" catch (\\Throwable");
            match &handler.param {
                Some(ast::Pat::Ident(binding)) => {
                    self.writer.write(" $");
                    self.writer.write(&binding.id.sym);
                }
                Some(other) => {
                    let span = swc_common::Spanned::span(other);
                    self.report_error(
                        span,
                        DiagnosticCode::UnsupportedStatement,
                        unsupported_message("destructuring catch binding"),
                    );
                }
                None => {}
            }
            self.writer.write(") ");
            self.emit_block(&handler.body.stmts);
        }
        if let Some(finalizer) = &try_stmt.finalizer {
            self.writer.write(" finally ");
            self.emit_block(&finalizer.stmts);
        }
        self.writer.write_line();
    }

    fn emit_switch(&mut self, switch: &ast::SwitchStmt) {
        self.writer.write("switch (");
        self.emit_expression(&switch.discriminant);
        self.writer.write(") {");
        self.writer.write_line();
        self.writer.increase_indent();
        for case in &switch.cases {
            match &case.test {
                Some(test) => {
                    self.writer.write("case ");
                    self.emit_expression(test);
                    self.writer.write(":");
                }
                None => self.writer.write("default:"),
            }
            self.writer.write_line();
            self.writer.increase_indent();
            for stmt in &case.cons {
                self.emit_stmt(stmt);
            }
            self.writer.decrease_indent();
        }
        self.writer.decrease_indent();
        self.writer.write("}");
        self.writer.write_line();
    }

    /// `{ ... }` without a trailing newline.
    fn emit_block(&mut self, stmts: &[ast::Stmt]) {
        self.writer.write("{");
        self.writer.write_line();
        self.writer.increase_indent();
        for stmt in stmts {
            self.emit_stmt(stmt);
        }
        self.writer.decrease_indent();
        self.writer.write("}");
    }

    /// Loop and branch bodies are always braced.
    fn emit_body(&mut self, body: &ast::Stmt) {
        match body {
            ast::Stmt::Block(block) => self.emit_block(&block.stmts),
            other => self.emit_block(std::slice::from_ref(other)),
        }
    }
}

fn visibility(accessibility: Option<ast::Accessibility>) -> &'static str {
    match accessibility {
        Some(ast::Accessibility::Private) => "private",
        Some(ast::Accessibility::Protected) => "protected",
        Some(ast::Accessibility::Public) | None => "public",
    }
}

fn stmt_kind(stmt: &ast::Stmt) -> &'static str {
    match stmt {
        ast::Stmt::Labeled(_) => "labeled statement",
        ast::Stmt::Break(_) | ast::Stmt::Continue(_) => "labeled jump",
        ast::Stmt::ForIn(_) => "for-in loop",
        ast::Stmt::With(_) => "with statement",
        ast::Stmt::Debugger(_) => "debugger statement",
        _ => "this statement",
    }
}
