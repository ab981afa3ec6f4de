//! Instance-vs-array classification of expressions.

use crate::{extract_pattern_type, extract_ts_type, Type};
use std::collections::{HashMap, HashSet};
use swc_ecma_ast as ast;

/// Answers whether an expression's static type is a class instance.
///
/// Rewrite rules depend on this one question only, so hosts can plug in
/// anything from a full checker to a fixed answer.
pub trait TypeClassifier {
    fn is_class_instance(&self, expr: &ast::Expr) -> bool;
}

impl<F> TypeClassifier for F
where
    F: Fn(&ast::Expr) -> bool,
{
    fn is_class_instance(&self, expr: &ast::Expr) -> bool {
        self(expr)
    }
}

/// Module-level classifier built from declarations in a single file.
///
/// Bindings are keyed by name, not by scope: a later declaration of the same
/// name in an inner scope overwrites the earlier one.
#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: HashSet<String>,
    bindings: HashMap<String, Type>,
    /// Class property types, keyed by property name across all classes.
    properties: HashMap<String, Type>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_module(module: &ast::Module) -> Self {
        let mut index = Self::new();

        // Class names first, so `new C()` initializers resolve regardless of
        // declaration order.
        for item in &module.body {
            match item {
                ast::ModuleItem::Stmt(stmt) => index.collect_class_names(stmt),
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export)) => {
                    if let ast::Decl::Class(class) = &export.decl {
                        index.add_class(class.ident.sym.to_string());
                    }
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultDecl(export)) => {
                    if let ast::DefaultDecl::Class(class) = &export.decl {
                        if let Some(ident) = &class.ident {
                            index.add_class(ident.sym.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        for item in &module.body {
            match item {
                ast::ModuleItem::Stmt(stmt) => index.visit_stmt(stmt),
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export)) => {
                    index.visit_decl(&export.decl)
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultDecl(export)) => {
                    match &export.decl {
                        ast::DefaultDecl::Class(class) => index.visit_class(&class.class),
                        ast::DefaultDecl::Fn(func) => index.visit_function(&func.function),
                        ast::DefaultDecl::TsInterfaceDecl(_) => {}
                    }
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultExpr(export)) => {
                    index.visit_expr(&export.expr)
                }
                _ => {}
            }
        }

        log::debug!(
            "class index: {} classes, {} bindings, {} properties",
            index.classes.len(),
            index.bindings.len(),
            index.properties.len()
        );
        index
    }

    pub fn add_class(&mut self, name: impl Into<String>) {
        self.classes.insert(name.into());
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: Type) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn binding_type(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    /// A type denotes a class instance when it names a declared class. Unions
    /// qualify when every non-null member does.
    pub fn is_class_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Union(members) => {
                let mut members = members.iter().filter(|t| !t.is_nullish()).peekable();
                members.peek().is_some() && members.all(|t| self.is_class_type(t))
            }
            _ => ty.nominal_name().is_some_and(|name| self.is_class(name)),
        }
    }

    fn collect_class_names(&mut self, stmt: &ast::Stmt) {
        if let ast::Stmt::Decl(ast::Decl::Class(class)) = stmt {
            self.add_class(class.ident.sym.to_string());
        }
    }

    fn visit_stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::Decl(decl) => self.visit_decl(decl),
            ast::Stmt::Block(block) => self.visit_block(block),
            ast::Stmt::Expr(expr) => self.visit_expr(&expr.expr),
            ast::Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            ast::Stmt::If(if_stmt) => {
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            ast::Stmt::While(w) => self.visit_stmt(&w.body),
            ast::Stmt::DoWhile(w) => self.visit_stmt(&w.body),
            ast::Stmt::For(f) => {
                if let Some(ast::VarDeclOrExpr::VarDecl(var)) = &f.init {
                    self.visit_var_decl(var);
                }
                self.visit_stmt(&f.body);
            }
            ast::Stmt::ForIn(f) => self.visit_stmt(&f.body),
            ast::Stmt::ForOf(f) => self.visit_stmt(&f.body),
            ast::Stmt::Labeled(l) => self.visit_stmt(&l.body),
            ast::Stmt::Try(t) => {
                self.visit_block(&t.block);
                if let Some(handler) = &t.handler {
                    self.visit_block(&handler.body);
                }
                if let Some(finalizer) = &t.finalizer {
                    self.visit_block(finalizer);
                }
            }
            ast::Stmt::Switch(s) => {
                for case in &s.cases {
                    for stmt in &case.cons {
                        self.visit_stmt(stmt);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_block(&mut self, block: &ast::BlockStmt) {
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_decl(&mut self, decl: &ast::Decl) {
        match decl {
            ast::Decl::Var(var) => self.visit_var_decl(var),
            ast::Decl::Fn(fn_decl) => self.visit_function(&fn_decl.function),
            ast::Decl::Class(class) => {
                self.add_class(class.ident.sym.to_string());
                self.visit_class(&class.class);
            }
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, var: &ast::VarDecl) {
        for decl in &var.decls {
            if let Some(init) = &decl.init {
                self.visit_expr(init);
            }
            let ast::Pat::Ident(binding) = &decl.name else {
                continue;
            };
            let ty = match (binding.type_ann.is_some(), &decl.init) {
                (true, _) | (false, None) => extract_pattern_type(&decl.name),
                (false, Some(init)) => self.infer_expr_type(init),
            };
            self.bind(binding.id.sym.to_string(), ty);
        }
    }

    fn visit_function(&mut self, function: &ast::Function) {
        for param in &function.params {
            self.bind_param(&param.pat);
        }
        if let Some(body) = &function.body {
            self.visit_block(body);
        }
    }

    fn bind_param(&mut self, pat: &ast::Pat) {
        let name = match pat {
            ast::Pat::Ident(binding) => &binding.id.sym,
            ast::Pat::Assign(assign) => match assign.left.as_ref() {
                ast::Pat::Ident(binding) => &binding.id.sym,
                _ => return,
            },
            _ => return,
        };
        self.bind(name.to_string(), extract_pattern_type(pat));
    }

    fn visit_class(&mut self, class: &ast::Class) {
        for member in &class.body {
            match member {
                ast::ClassMember::ClassProp(prop) => {
                    let ast::PropName::Ident(key) = &prop.key else {
                        continue;
                    };
                    let ty = match (&prop.type_ann, &prop.value) {
                        (Some(ann), _) => extract_ts_type(&ann.type_ann),
                        (None, Some(value)) => self.infer_expr_type(value),
                        (None, None) => Type::Any,
                    };
                    self.properties.insert(key.sym.to_string(), ty);
                }
                ast::ClassMember::Constructor(ctor) => {
                    for param in &ctor.params {
                        match param {
                            ast::ParamOrTsParamProp::Param(param) => self.bind_param(&param.pat),
                            ast::ParamOrTsParamProp::TsParamProp(prop) => {
                                if let ast::TsParamPropParam::Ident(binding) = &prop.param {
                                    let ty = binding
                                        .type_ann
                                        .as_ref()
                                        .map_or(Type::Any, |ann| extract_ts_type(&ann.type_ann));
                                    let name = binding.id.sym.to_string();
                                    self.properties.insert(name.clone(), ty.clone());
                                    self.bind(name, ty);
                                }
                            }
                        }
                    }
                    if let Some(body) = &ctor.body {
                        self.visit_block(body);
                    }
                }
                ast::ClassMember::Method(method) => self.visit_function(&method.function),
                _ => {}
            }
        }
    }

    fn visit_expr(&mut self, expr: &ast::Expr) {
        match expr {
            ast::Expr::Arrow(arrow) => {
                for param in &arrow.params {
                    self.bind_param(param);
                }
                match arrow.body.as_ref() {
                    ast::BlockStmtOrExpr::BlockStmt(block) => self.visit_block(block),
                    ast::BlockStmtOrExpr::Expr(body) => self.visit_expr(body),
                }
            }
            ast::Expr::Fn(func) => self.visit_function(&func.function),
            ast::Expr::Class(class) => {
                if let Some(ident) = &class.ident {
                    self.add_class(ident.sym.to_string());
                }
                self.visit_class(&class.class);
            }
            ast::Expr::Call(call) => {
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
            ast::Expr::Paren(paren) => self.visit_expr(&paren.expr),
            ast::Expr::Assign(assign) => self.visit_expr(&assign.right),
            _ => {}
        }
    }

    /// Best-effort type of an unannotated initializer.
    fn infer_expr_type(&self, expr: &ast::Expr) -> Type {
        match expr {
            ast::Expr::New(new) => match new.callee.as_ref() {
                ast::Expr::Ident(ident) => Type::Named(ident.sym.to_string()),
                _ => Type::Any,
            },
            ast::Expr::TsAs(e) => extract_ts_type(&e.type_ann),
            ast::Expr::TsTypeAssertion(e) => extract_ts_type(&e.type_ann),
            ast::Expr::Paren(e) => self.infer_expr_type(&e.expr),
            ast::Expr::TsNonNull(e) => self.infer_expr_type(&e.expr),
            ast::Expr::Ident(ident) => self
                .binding_type(&ident.sym)
                .cloned()
                .unwrap_or(Type::Any),
            ast::Expr::Object(_) => Type::Record,
            ast::Expr::Array(_) => Type::Array(Box::new(Type::Any)),
            ast::Expr::Lit(ast::Lit::Str(_)) | ast::Expr::Tpl(_) => Type::String,
            ast::Expr::Lit(ast::Lit::Num(_)) => Type::Number,
            ast::Expr::Lit(ast::Lit::Bool(_)) => Type::Boolean,
            ast::Expr::Lit(ast::Lit::Null(_)) => Type::Null,
            _ => Type::Any,
        }
    }
}

impl TypeClassifier for ClassIndex {
    fn is_class_instance(&self, expr: &ast::Expr) -> bool {
        let instance = match expr {
            ast::Expr::This(_) => true,
            ast::Expr::Paren(e) => self.is_class_instance(&e.expr),
            ast::Expr::TsNonNull(e) => self.is_class_instance(&e.expr),
            ast::Expr::TsSatisfies(e) => self.is_class_instance(&e.expr),
            ast::Expr::TsConstAssertion(e) => self.is_class_instance(&e.expr),
            ast::Expr::TsAs(e) => self.is_class_type(&extract_ts_type(&e.type_ann)),
            ast::Expr::TsTypeAssertion(e) => self.is_class_type(&extract_ts_type(&e.type_ann)),
            ast::Expr::New(new) => {
                matches!(new.callee.as_ref(), ast::Expr::Ident(ident) if self.is_class(&ident.sym))
            }
            ast::Expr::Ident(ident) => self
                .binding_type(&ident.sym)
                .is_some_and(|ty| self.is_class_type(ty)),
            ast::Expr::Member(member) => match (member.obj.as_ref(), &member.prop) {
                (ast::Expr::This(_), ast::MemberProp::Ident(prop)) => self
                    .properties
                    .get(&*prop.sym)
                    .is_some_and(|ty| self.is_class_type(ty)),
                _ => false,
            },
            _ => false,
        };
        log::trace!("is_class_instance({:?}) = {instance}", expr_kind(expr));
        instance
    }
}

fn expr_kind(expr: &ast::Expr) -> &'static str {
    match expr {
        ast::Expr::This(_) => "this",
        ast::Expr::Ident(_) => "identifier",
        ast::Expr::Member(_) => "member",
        ast::Expr::New(_) => "new",
        ast::Expr::Call(_) => "call",
        ast::Expr::Lit(_) => "literal",
        ast::Expr::Object(_) => "object",
        ast::Expr::Array(_) => "array",
        _ => "expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsphp_diagnostics::{Diagnostics, SourceCache};
    use tsphp_parser::parse_typescript_with_cache;

    fn index_for(source: &str) -> (ClassIndex, ast::Module) {
        let mut cache = SourceCache::new();
        let mut errors = Diagnostics::new();
        let result = parse_typescript_with_cache(source, "t.ts", &mut cache, &mut errors).unwrap();
        (ClassIndex::from_module(&result.module), result.module)
    }

    /// The expression of the last expression statement in the module.
    fn last_expr(module: &ast::Module) -> &ast::Expr {
        module
            .body
            .iter()
            .rev()
            .find_map(|item| match item {
                ast::ModuleItem::Stmt(ast::Stmt::Expr(stmt)) => Some(stmt.expr.as_ref()),
                _ => None,
            })
            .expect("module has an expression statement")
    }

    #[test]
    fn test_new_initializer_is_instance() {
        let (index, module) = index_for("const u = new User(); class User {}\nu;");
        assert!(index.is_class_instance(last_expr(&module)));
    }

    #[test]
    fn test_annotated_binding() {
        let (index, module) = index_for("class User {}\nlet u: User;\nu;");
        assert!(index.is_class_instance(last_expr(&module)));
    }

    #[test]
    fn test_interface_and_literal_are_not_instances() {
        let (index, module) = index_for(
            "interface Shape { w: number }\nlet s: Shape = { w: 1 };\nconst m = { a: 1 };\ns;",
        );
        assert!(!index.is_class_instance(last_expr(&module)));
        assert_eq!(index.binding_type("m"), Some(&Type::Record));
    }

    #[test]
    fn test_nullable_union_of_class() {
        let (index, module) = index_for("class Node {}\nlet n: Node | null = null;\nn;");
        assert!(index.is_class_instance(last_expr(&module)));
        assert!(!index.is_class_type(&Type::Union(vec![Type::Null])));
    }

    #[test]
    fn test_parameters_and_this_properties() {
        let (index, module) = index_for(
            r#"
            class Repo {}
            class Service {
                private cache: Repo;
                constructor(private repo: Repo) {}
                lookup(key: string) { return this.cache; }
            }
            function run(svc: Service) {}
            this.cache;
        "#,
        );
        assert!(index.is_class_instance(last_expr(&module)));
        assert_eq!(index.binding_type("svc"), Some(&Type::Named("Service".into())));
        assert_eq!(index.binding_type("key"), Some(&Type::String));
        assert_eq!(index.binding_type("repo"), Some(&Type::Named("Repo".into())));
    }

    #[test]
    fn test_shadowing_binding_wins() {
        let (index, module) =
            index_for("class User {}\nlet o: User;\nfunction f(o: any) {}\no;");
        assert_eq!(index.binding_type("o"), Some(&Type::Any));
        assert!(!index.is_class_instance(last_expr(&module)));
    }

    #[test]
    fn test_as_expression_uses_asserted_type() {
        let (index, module) = index_for("class User {}\ndeclare const raw: any;\n(raw as User);");
        assert!(index.is_class_instance(last_expr(&module)));
    }

    #[test]
    fn test_closure_classifier() {
        let always = |_: &ast::Expr| true;
        let (_, module) = index_for("x;");
        assert!(always.is_class_instance(last_expr(&module)));
    }
}
