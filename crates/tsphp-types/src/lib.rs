//! Types for tsphp
//!
//! Only as much of the TypeScript type system as the PHP emitter needs: the
//! annotations written in the source, and the one question rewrite rules ask
//! of them, "is this value an instance of a class?". Class instances become
//! PHP objects; everything else object-like becomes a PHP array.

pub mod classify;

pub use classify::{ClassIndex, TypeClassifier};

use swc_ecma_ast as ast;

/// Type written in a TypeScript annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    /// `T[]` or `Array<T>`
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Union(Vec<Type>),
    /// Inline object literal type, `{ a: T }`
    Record,
    Function,
    Any,
    Unknown,
    Never,
    /// Reference to a class, interface or type alias by name
    Named(String),
    /// Instantiation of a generic named type, e.g. `Box<number>`
    Generic { base: String, type_args: Vec<Type> },
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Void
                | Type::Null
                | Type::Boolean
                | Type::Number
                | Type::BigInt
                | Type::String
                | Type::Symbol
        )
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Type::Void | Type::Null)
    }

    /// Name of the nominal type this refers to, if any.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            Type::Named(name) => Some(name),
            Type::Generic { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// Extract a [`Type`] from an SWC type annotation.
pub fn extract_ts_type(ts_type: &ast::TsType) -> Type {
    use ast::TsKeywordTypeKind::*;
    use ast::TsType::*;

    match ts_type {
        TsKeywordType(kw) => match kw.kind {
            TsNumberKeyword => Type::Number,
            TsStringKeyword => Type::String,
            TsBooleanKeyword => Type::Boolean,
            TsBigIntKeyword => Type::BigInt,
            TsVoidKeyword | TsUndefinedKeyword => Type::Void,
            TsNullKeyword => Type::Null,
            TsUnknownKeyword => Type::Unknown,
            TsNeverKeyword => Type::Never,
            TsSymbolKeyword => Type::Symbol,
            TsObjectKeyword => Type::Record,
            _ => Type::Any,
        },

        TsArrayType(arr) => Type::Array(Box::new(extract_ts_type(&arr.elem_type))),

        TsTupleType(tuple) => Type::Tuple(
            tuple
                .elem_types
                .iter()
                .map(|elem| extract_ts_type(&elem.ty))
                .collect(),
        ),

        TsUnionOrIntersectionType(ast::TsUnionOrIntersectionType::TsUnionType(union)) => {
            Type::Union(union.types.iter().map(|t| extract_ts_type(t)).collect())
        }
        TsUnionOrIntersectionType(ast::TsUnionOrIntersectionType::TsIntersectionType(_)) => {
            Type::Any
        }

        TsTypeRef(type_ref) => {
            let name = entity_name(&type_ref.type_name);
            match &type_ref.type_params {
                Some(params) if name == "Array" && !params.params.is_empty() => {
                    Type::Array(Box::new(extract_ts_type(&params.params[0])))
                }
                Some(params) => Type::Generic {
                    base: name,
                    type_args: params.params.iter().map(|t| extract_ts_type(t)).collect(),
                },
                None => Type::Named(name),
            }
        }

        TsFnOrConstructorType(_) => Type::Function,

        TsLitType(lit) => match &lit.lit {
            ast::TsLit::Number(_) => Type::Number,
            ast::TsLit::Str(_) | ast::TsLit::Tpl(_) => Type::String,
            ast::TsLit::Bool(_) => Type::Boolean,
            ast::TsLit::BigInt(_) => Type::BigInt,
        },

        TsParenthesizedType(paren) => extract_ts_type(&paren.type_ann),
        TsOptionalType(opt) => extract_ts_type(&opt.type_ann),
        TsRestType(rest) => extract_ts_type(&rest.type_ann),
        TsTypeLit(_) | TsMappedType(_) => Type::Record,
        TsTypePredicate(_) => Type::Boolean,

        // typeof, keyof, conditional, indexed access, infer, import(), this
        _ => Type::Any,
    }
}

/// Extract the annotated type of a binding pattern, `Any` when unannotated.
pub fn extract_pattern_type(pat: &ast::Pat) -> Type {
    let ann = match pat {
        ast::Pat::Ident(ident) => ident.type_ann.as_ref(),
        ast::Pat::Array(arr) => arr.type_ann.as_ref(),
        ast::Pat::Rest(rest) => rest.type_ann.as_ref(),
        ast::Pat::Object(obj) => obj.type_ann.as_ref(),
        ast::Pat::Assign(assign) => return extract_pattern_type(&assign.left),
        ast::Pat::Invalid(_) | ast::Pat::Expr(_) => None,
    };
    ann.map_or(Type::Any, |ann| extract_ts_type(&ann.type_ann))
}

fn entity_name(entity: &ast::TsEntityName) -> String {
    match entity {
        ast::TsEntityName::Ident(ident) => ident.sym.to_string(),
        ast::TsEntityName::TsQualifiedName(qname) => {
            format!("{}.{}", entity_name(&qname.left), qname.right.sym)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_name() {
        assert_eq!(Type::Named("User".into()).nominal_name(), Some("User"));
        let generic = Type::Generic {
            base: "Box".into(),
            type_args: vec![Type::Number],
        };
        assert_eq!(generic.nominal_name(), Some("Box"));
        assert_eq!(Type::Record.nominal_name(), None);
    }

    #[test]
    fn test_primitive_and_nullish() {
        assert!(Type::String.is_primitive());
        assert!(!Type::Array(Box::new(Type::Number)).is_primitive());
        assert!(Type::Null.is_nullish());
        assert!(Type::Void.is_nullish());
        assert!(!Type::Any.is_nullish());
    }
}
