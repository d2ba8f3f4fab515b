#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rad_ir::ast::{ExprKind, StmtKind};

use super::*;

fn params(sig: &str) -> Vec<Param> {
    let output = rad_parse::parse(&format!("fn f{sig}:\n    pass\n"));
    assert!(!output.has_errors(), "{:?}", output.errors);
    let StmtKind::FnDef(def) = &output.program.stmts[0].kind else {
        panic!("expected fn");
    };
    def.params.clone()
}

fn pos(values: Vec<Value>) -> Vec<ArgValue> {
    (10u32..)
        .step_by(3)
        .zip(values)
        .map(|(start, v)| ArgValue::new(v, Span::new(start, start + 1)))
        .collect()
}

fn named(pairs: Vec<(&str, Value)>) -> Vec<NamedArgValue> {
    pairs
        .into_iter()
        .map(|(name, value)| NamedArgValue {
            name: Ident::new(name, Span::new(40, 41)),
            arg: ArgValue::new(value, Span::new(42, 43)),
        })
        .collect()
}

fn literal_defaults(_: &Param, expr: &Expr) -> EvalResult<Value> {
    Ok(match &expr.kind {
        ExprKind::Int(i) => Value::Int(*i),
        ExprKind::Float { value, .. } => Value::Float(*value),
        ExprKind::Bool(b) => Value::Bool(*b),
        _ => Value::str("default"),
    })
}

const CALL: Span = Span::new(0, 20);

fn bind(sig: &str, positional: Vec<Value>, named_args: Vec<(&str, Value)>) -> EvalResult<BoundArgs> {
    bind_args(&params(sig), pos(positional), named(named_args), CALL, literal_defaults)
}

fn bind_err(sig: &str, positional: Vec<Value>, named_args: Vec<(&str, Value)>) -> (String, Option<Span>) {
    let err = bind(sig, positional, named_args).err().unwrap();
    (err.message, err.span)
}

#[test]
fn test_positional_binding_widens_to_float() {
    let bound = bind("(x: float, y: float)", vec![Value::Int(1), Value::Int(2)], vec![]).unwrap();
    assert!(matches!(bound.get("x"), Value::Float(_)));
    assert_eq!(bound.get("y"), Value::Float(2.0));
}

#[test]
fn test_variadic_collects_rest() {
    let bound = bind(
        "(first, *rest: int, sep: str = \" \")",
        vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        vec![],
    )
    .unwrap();
    assert_eq!(bound.get("first"), Value::Int(1));
    assert_eq!(
        bound.get("rest"),
        Value::list(vec![Value::Int(2), Value::Int(3)])
    );
    assert_eq!(bound.get("sep"), Value::str("default"));
}

#[test]
fn test_variadic_without_args_is_empty_list() {
    let bound = bind("(*items)", vec![], vec![]).unwrap();
    assert_eq!(bound.get("items"), Value::list(vec![]));
}

#[test]
fn test_variadic_element_type_checked() {
    let (msg, span) = bind_err("(*items: int)", vec![Value::Int(1), Value::str("x")], vec![]);
    assert_eq!(
        msg,
        "Value '\"x\"' (str) is not compatible with expected type 'int'"
    );
    assert_eq!(span, Some(Span::new(13, 14)));
}

#[test]
fn test_too_many_positional() {
    let (msg, span) = bind_err(
        "(x: float, y: float)",
        vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        vec![],
    );
    assert_eq!(msg, "Expected at most 2 args, but was invoked with 3");
    assert_eq!(span, Some(CALL));
}

#[test]
fn test_too_many_positional_named_only_remaining() {
    let (msg, span) = bind_err(
        "(x: float, y: float, *, z: float)",
        vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        vec![],
    );
    assert_eq!(
        msg,
        "Too many positional args, remaining args are named-only."
    );
    assert_eq!(span, Some(Span::new(16, 17)));
}

#[test]
fn test_named_errors() {
    assert_eq!(
        bind_err("(x, y)", vec![Value::Int(1)], vec![("x", Value::Int(2))]).0,
        "Argument 'x' already specified."
    );
    assert_eq!(
        bind_err(
            "(x, y?)",
            vec![Value::Int(1)],
            vec![("y", Value::Int(2)), ("y", Value::Int(3))]
        )
        .0,
        "Duplicate named argument: y"
    );
    assert_eq!(
        bind_err("(_x)", vec![], vec![("_x", Value::Int(1))]).0,
        "Argument '_x' cannot be passed as named arg, only positionally."
    );
    let (msg, span) = bind_err("(x)", vec![Value::Int(1)], vec![("z", Value::Int(3))]);
    assert_eq!(msg, "Unknown named argument 'z'");
    assert_eq!(span, Some(Span::new(40, 41)));
}

#[test]
fn test_missing_required_points_at_call() {
    let (msg, span) = bind_err("(x: float, y: float)", vec![], vec![("x", Value::Int(1))]);
    assert_eq!(msg, "Missing required argument 'y'");
    assert_eq!(span, Some(CALL));
}

#[test]
fn test_optional_binds_null() {
    let bound = bind("(x, *, y?)", vec![Value::Int(1)], vec![]).unwrap();
    assert_eq!(bound.get("y"), Value::Null);
    assert!(bound.opt("y").is_none());
}

#[test]
fn test_default_type_checked_at_default_span() {
    let err = bind("(y: int = \"2\")", vec![], vec![]).err().unwrap();
    assert_eq!(
        err.message,
        "Value '\"default\"' (str) is not compatible with expected type 'int'"
    );
}

#[test]
fn test_scientific_literal_for_int() {
    let params = params("(n: int)");
    let sci = |value: f64| {
        vec![ArgValue {
            value: Value::Float(value),
            span: Span::new(2, 5),
            scientific: true,
        }]
    };
    let bound = bind_args(&params, sci(1e6), vec![], CALL, literal_defaults).unwrap();
    assert!(matches!(bound.get("n"), Value::Int(1_000_000)));

    let err = bind_args(&params, sci(1e-5), vec![], CALL, literal_defaults)
        .err()
        .unwrap();
    assert_eq!(err.code(), rad_diagnostic::ErrorCode::ScientificNotationNotWholeNumber);

    let err = bind_args(&params, sci(1e300), vec![], CALL, literal_defaults)
        .err()
        .unwrap();
    assert_eq!(err.code(), rad_diagnostic::ErrorCode::NumInvalidRange);
}

#[test]
fn test_scientific_literal_for_float_stays_float() {
    let args = vec![ArgValue {
        value: Value::Float(2.5e-3),
        span: Span::new(2, 5),
        scientific: true,
    }];
    let bound = bind_args(&params("(n: float)"), args, vec![], CALL, literal_defaults).unwrap();
    assert_eq!(bound.get("n"), Value::Float(2.5e-3));
}

proptest! {
    #[test]
    fn test_named_binding_is_commutative(x in -1000i64..1000, y in -1000i64..1000) {
        let sig = "(x: int, y: int)";
        let positional = bind(sig, vec![Value::Int(x), Value::Int(y)], vec![]).unwrap();
        let named_xy = bind(sig, vec![], vec![("x", Value::Int(x)), ("y", Value::Int(y))]).unwrap();
        let named_yx = bind(sig, vec![], vec![("y", Value::Int(y)), ("x", Value::Int(x))]).unwrap();
        for bound in [&named_xy, &named_yx] {
            prop_assert_eq!(bound.get("x"), positional.get("x"));
            prop_assert_eq!(bound.get("y"), positional.get("y"));
        }
    }

    #[test]
    fn test_scientific_integrality(mantissa in -9i64..10, exp in -3i32..4) {
        #[expect(clippy::cast_precision_loss, reason = "small test values")]
        let value = mantissa as f64 * 10f64.powi(exp);
        let args = vec![ArgValue { value: Value::Float(value), span: Span::new(0, 1), scientific: true }];
        let result = bind_args(&params("(n: int)"), args, vec![], CALL, literal_defaults);
        prop_assert_eq!(result.is_ok(), value.fract() == 0.0);
    }
}
