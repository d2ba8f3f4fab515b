//! Declared type descriptors.
//!
//! These are the types written in parameter and return positions
//! (`x: int|str`, `-> [int, str]`). Checking a runtime value against a
//! descriptor happens in the evaluator; this module only describes the shape
//! and renders it back in surface syntax for error messages.

use std::fmt;

/// A declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Str,
    Int,
    Float,
    Bool,
    Error,
    /// Matches every value, including null.
    Any,
    /// Matches only "produced no value".
    Void,
    /// Any function value.
    Fn,
    /// `T?`: `null` or `T`.
    Optional(Box<Type>),
    /// `A|B|C`: any member.
    Union(Vec<Type>),
    /// `T[]`. `list` is `List(Any)`.
    List(Box<Type>),
    /// `[A, B]`: list of fixed arity with per-position types.
    Tuple(Vec<Type>),
    /// `{ K: V }`. `map` is `Map(Any, Any)`.
    Map(Box<Type>, Box<Type>),
    /// `{ "a": T, "b"?: U }`: map with a closed key set.
    Struct(Vec<StructField>),
    /// `["a", "b"]`: a string equal to one of the listed values.
    Enum(Vec<String>),
}

/// One key of a [`Type::Struct`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructField {
    pub key: String,
    pub ty: Type,
    /// Key may be absent.
    pub optional: bool,
}

impl Type {
    /// `num`, i.e. `int|float`.
    pub fn num() -> Type {
        Type::Union(vec![Type::Int, Type::Float])
    }

    pub fn any_list() -> Type {
        Type::List(Box::new(Type::Any))
    }

    pub fn any_map() -> Type {
        Type::Map(Box::new(Type::Any), Box::new(Type::Any))
    }

    /// Whether a parameter of this type may be left unbound (binds `null`).
    pub fn accepts_null(&self) -> bool {
        match self {
            Type::Any | Type::Optional(_) => true,
            Type::Union(members) => members.iter().any(Type::accepts_null),
            _ => false,
        }
    }

    /// Return types that do not require an explicit `return`.
    pub fn allows_fallthrough(&self) -> bool {
        matches!(self, Type::Void | Type::Any)
    }

    /// Element type for list-like descriptors, used for variadic parameters.
    pub fn element(&self) -> &Type {
        match self {
            Type::List(elem) => elem,
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Str => f.write_str("str"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::Error => f.write_str("error"),
            Type::Any => f.write_str("any"),
            Type::Void => f.write_str("void"),
            Type::Fn => f.write_str("fn"),
            Type::Optional(inner) => write!(f, "{inner}?"),
            Type::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Type::List(elem) => match elem.as_ref() {
                Type::Any => f.write_str("list"),
                Type::Union(_) => write!(f, "({elem})[]"),
                _ => write!(f, "{elem}[]"),
            },
            Type::Tuple(elems) => {
                f.write_str("[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str("]")
            }
            Type::Map(key, value) => {
                if matches!((key.as_ref(), value.as_ref()), (Type::Any, Type::Any)) {
                    f.write_str("map")
                } else {
                    write!(f, "{{ {key}: {value} }}")
                }
            }
            Type::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", field.key)?;
                    if field.optional {
                        f.write_str("?")?;
                    }
                    write!(f, ": {}", field.ty)?;
                }
                f.write_str(" }")
            }
            Type::Enum(_) => f.write_str("str enum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_surface_syntax() {
        let cases = [
            (Type::Union(vec![Type::Int, Type::Str]), "int|str"),
            (Type::Tuple(vec![Type::Int, Type::Str]), "[int, str]"),
            (Type::Enum(vec!["a".into(), "b".into()]), "str enum"),
            (
                Type::Map(Box::new(Type::Str), Box::new(Type::Int)),
                "{ str: int }",
            ),
            (Type::any_map(), "map"),
            (Type::any_list(), "list"),
            (Type::List(Box::new(Type::Int)), "int[]"),
            (Type::Optional(Box::new(Type::Float)), "float?"),
        ];
        for (ty, expected) in cases {
            assert_eq!(ty.to_string(), expected);
        }
    }

    #[test]
    fn test_struct_rendering_quotes_keys() {
        let ty = Type::Struct(vec![
            StructField {
                key: "name".into(),
                ty: Type::Str,
                optional: false,
            },
            StructField {
                key: "age".into(),
                ty: Type::Int,
                optional: true,
            },
        ]);
        assert_eq!(ty.to_string(), r#"{ "name": str, "age"?: int }"#);
    }

    #[test]
    fn test_accepts_null() {
        assert!(Type::Any.accepts_null());
        assert!(Type::Optional(Box::new(Type::Int)).accepts_null());
        assert!(!Type::Int.accepts_null());
        assert!(!Type::num().accepts_null());
    }
}
