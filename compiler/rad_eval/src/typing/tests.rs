use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rad_ir::{StructField, Type};

use super::*;
use crate::value::RadMap;

fn map(pairs: Vec<(&str, Value)>) -> Value {
    let map = RadMap::new();
    for (k, v) in pairs {
        map.set_str(k, v);
    }
    Value::Map(map)
}

#[test]
fn test_float_accepts_int_and_widens() {
    assert!(is_assignable(&Value::Int(2), &Type::Float));
    assert_eq!(check(Value::Int(2), &Type::Float).ok(), Some(Value::Float(2.0)));
    assert!(matches!(
        check(Value::Int(2), &Type::Float),
        Ok(Value::Float(_))
    ));
}

#[test]
fn test_scientific_int_bounds() {
    assert_eq!(scientific_int(1.2e10), Ok(12_000_000_000));
    assert_eq!(scientific_int(-9.223_372_036_854_775_808e18), Ok(i64::MIN));
    assert_eq!(scientific_int(9.223_372_036_854_775_808e18), Err(NotAnInt::OutOfRange));
    assert_eq!(scientific_int(1e300), Err(NotAnInt::OutOfRange));
    assert_eq!(scientific_int(1.25e1), Err(NotAnInt::Fractional));
    assert_eq!(scientific_int(f64::INFINITY), Err(NotAnInt::Fractional));
}

#[test]
fn test_int_rejects_float() {
    assert!(!is_assignable(&Value::Float(1.5), &Type::Int));
    assert!(!is_assignable(&Value::Float(2.0), &Type::Int));
}

#[test]
fn test_union_with_int_keeps_int() {
    let ty = Type::num();
    assert!(matches!(coerce(Value::Int(3), &ty), Value::Int(3)));
    let float_or_str = Type::Union(vec![Type::Float, Type::Str]);
    assert!(matches!(coerce(Value::Int(3), &float_or_str), Value::Float(_)));
}

#[test]
fn test_list_elements_not_widened() {
    let ty = Type::List(Box::new(Type::Float));
    let list = Value::list(vec![Value::Int(1), Value::Float(2.5)]);
    let checked = check(list, &ty).ok();
    let Some(Value::List(items)) = checked else {
        panic!("expected list");
    };
    assert!(matches!(items.borrow()[0], Value::Int(1)));
}

#[test]
fn test_optional_accepts_null() {
    let ty = Type::Optional(Box::new(Type::Str));
    assert!(is_assignable(&Value::Null, &ty));
    assert!(is_assignable(&Value::str("a"), &ty));
    assert!(!is_assignable(&Value::Int(1), &ty));
}

#[test]
fn test_tuple_requires_exact_arity() {
    let ty = Type::Tuple(vec![Type::Int, Type::Str]);
    assert!(is_assignable(
        &Value::list(vec![Value::Int(1), Value::str("a")]),
        &ty
    ));
    assert!(!is_assignable(&Value::list(vec![Value::Int(1)]), &ty));
}

#[test]
fn test_struct_has_closed_key_set() {
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
    assert!(is_assignable(&map(vec![("name", Value::str("a"))]), &ty));
    assert!(is_assignable(
        &map(vec![("name", Value::str("a")), ("age", Value::Int(3))]),
        &ty
    ));
    assert!(!is_assignable(
        &map(vec![("name", Value::str("a")), ("extra", Value::Int(3))]),
        &ty
    ));
    assert!(!is_assignable(&map(vec![("age", Value::Int(3))]), &ty));
}

#[test]
fn test_enum_matches_listed_strings() {
    let ty = Type::Enum(vec!["a".into(), "b".into()]);
    assert!(is_assignable(&Value::str("b"), &ty));
    assert!(!is_assignable(&Value::str("c"), &ty));
}

#[test]
fn test_mismatch_message() {
    let err = check(Value::str("2"), &Type::Float).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("Value '\"2\"' (str) is not compatible with expected type 'float'".to_string())
    );
}

#[test]
fn test_error_is_not_str() {
    assert!(!is_assignable(&Value::error("x"), &Type::Str));
    assert!(is_assignable(&Value::error("x"), &Type::Error));
}

#[test]
fn test_wants_int_only() {
    assert!(wants_int_only(&Type::Int));
    assert!(wants_int_only(&Type::Optional(Box::new(Type::Int))));
    assert!(!wants_int_only(&Type::num()));
    assert!(!wants_int_only(&Type::Any));
}

proptest! {
    #[test]
    fn test_any_accepts_every_int(i in any::<i64>()) {
        prop_assert!(is_assignable(&Value::Int(i), &Type::Any));
        prop_assert!(is_assignable(&Value::Int(i), &Type::Float));
    }
}
