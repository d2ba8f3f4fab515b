use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn map(pairs: &[(&str, Value)]) -> RadMap {
    let map = RadMap::new();
    for (k, v) in pairs {
        map.set_str(k, v.clone());
    }
    map
}

#[test]
fn test_lists_alias_on_clone() {
    let a = Value::list(vec![Value::Int(1), Value::Int(2)]);
    let b = a.clone();
    if let Value::List(list) = &b {
        list.borrow_mut()[0] = Value::Int(9);
    }
    assert_eq!(a.repr(false), "[ 9, 2 ]");
}

#[test]
fn test_shallow_copy_detaches_map() {
    let original = map(&[("a", Value::Int(1))]);
    let copy = original.shallow_copy();
    copy.set_str("b", Value::Int(2));
    assert_eq!(original.len(), 1);
    assert_eq!(copy.len(), 2);
    assert!(!original.ptr_eq(&copy));
}

#[test]
fn test_map_keeps_insertion_order() {
    let m = map(&[("z", Value::Int(1)), ("a", Value::Int(2)), ("m", Value::Int(3))]);
    m.set_str("z", Value::Int(10));
    assert_eq!(
        Value::Map(m.clone()).repr(false),
        r#"{ "z": 10, "a": 2, "m": 3 }"#
    );
    m.remove(&Value::str("a"));
    assert_eq!(m.keys(), vec![Value::str("z"), Value::str("m")]);
}

#[test]
fn test_unhashable_keys_are_rejected() {
    let m = RadMap::new();
    assert!(!m.insert(Value::list(Vec::new()), Value::Null));
    assert!(m.insert(Value::Int(1), Value::Null));
    assert!(RadMap::from_pairs([(Value::Null, Value::Int(1))]).is_err());
}

#[test]
fn test_equality_crosses_numeric_kinds_only() {
    assert_eq!(Value::Int(2), Value::Float(2.0));
    assert_ne!(Value::Int(1), Value::Bool(true));
    assert_ne!(Value::str("1"), Value::Int(1));
    assert_eq!(Value::error("boom"), Value::str("boom"));
    assert_eq!(
        Value::list(vec![Value::Int(1)]),
        Value::list(vec![Value::Float(1.0)])
    );
}

#[test]
fn test_truthiness() {
    for falsy in [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(0.0),
        Value::str(""),
        Value::list(Vec::new()),
        Value::Map(RadMap::new()),
    ] {
        assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
    }
    assert!(Value::error("").is_truthy());
    assert!(Value::str("0").is_truthy());
}

#[test]
fn test_printable_forms() {
    let nested = Value::list(vec![
        Value::str("a\"b"),
        Value::Float(2.0),
        Value::Map(map(&[("k", Value::Null)])),
    ]);
    assert_eq!(nested.repr(false), r#"[ "a\"b", 2, { "k": null } ]"#);
    assert_eq!(Value::str("raw").to_printable(false), "raw");
    assert_eq!(Value::Float(0.5).to_printable(false), "0.5");
    assert_eq!(nested.cell_text(), r#"[a"b, 2, { k: null }]"#);
}

#[test]
fn test_attributes_survive_concat_and_slice() {
    let red = TextAttrs {
        color: Some(Color::Red),
        ..TextAttrs::default()
    };
    let s = RadString::styled("ab", red).concat(&RadString::new("cd"));
    assert_eq!(s.plain(), "abcd");
    assert_eq!(s.segments().len(), 2);
    assert_eq!(s.render(true), "\x1b[31mab\x1b[0mcd");
    assert_eq!(s.render(false), "abcd");

    let middle = s.char_slice(1, 3);
    assert_eq!(middle.plain(), "bc");
    assert_eq!(middle.segments()[0].attrs, red);
    assert!(!middle.char_slice(1, 2).has_attrs());
}

#[test]
fn test_color_names_round_trip() {
    for color in Color::ALL {
        assert_eq!(Color::from_name(color.name()), Some(color));
    }
    assert_eq!(Color::from_name("mauve"), None);
}

#[test]
fn test_display_width_skips_escapes() {
    assert_eq!(display_width("\x1b[1;31mhey\x1b[0m"), 3);
    assert_eq!(display_width("héllo"), 5);
}

proptest! {
    #[test]
    fn test_char_slice_matches_plain_chars(text in "[a-zé ]{0,16}", a in 0usize..20, b in 0usize..20) {
        let (start, end) = (a.min(b), a.max(b));
        let s = RadString::new(text.as_str());
        let expected: String = text.chars().skip(start).take(end.saturating_sub(start)).collect();
        prop_assert_eq!(s.char_slice(start, end).plain().into_owned(), expected);
    }

    #[test]
    fn test_equals_is_symmetric(a in -5i64..5, b in -5.0f64..5.0) {
        let (x, y) = (Value::Int(a), Value::Float(b));
        prop_assert_eq!(x.equals(&y), y.equals(&x));
    }
}
