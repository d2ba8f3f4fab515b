#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use rad_ir::Type;

use super::*;

fn noop(_: &mut Interpreter<'_>, _: &CallCtx, _: &BoundArgs) -> EvalResult<Option<Value>> {
    Ok(None)
}

#[test]
fn test_every_standard_signature_parses() {
    let mut registry = BuiltinRegistry::empty();
    for (signature, func) in standard_entries() {
        if let Err(err) = registry.register(signature, func) {
            panic!("{err}");
        }
    }
    assert_eq!(registry.len(), standard_entries().count());
    assert_eq!(BuiltinRegistry::new().len(), registry.len());
}

#[test]
fn test_signature_shape() {
    let registry = BuiltinRegistry::new();
    let print = registry.get("print").unwrap();
    assert_eq!(print.name(), "print");
    assert!(print.params[0].variadic);
    assert!(print.params[1].named_only);
    assert_eq!(print.return_type, Some(Type::Void));

    let len = registry.get("len").unwrap();
    assert_eq!(len.params.len(), 1);
    assert_eq!(len.return_type, Some(Type::Int));
}

#[test]
fn test_lookup_and_names() {
    let registry = BuiltinRegistry::new();
    assert!(registry.contains("upper"));
    assert!(!registry.contains("no_such_builtin"));
    assert!(registry.get("no_such_builtin").is_none());

    let names = registry.names();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn test_register_replaces_and_rejects() {
    let mut registry = BuiltinRegistry::empty();
    assert!(registry.is_empty());
    registry.register("custom(x: int) -> int", noop).unwrap();
    registry.register("custom(x: str, y: str) -> str", noop).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("custom").unwrap().params.len(), 2);

    let err = registry.register("custom(x: int", noop).unwrap_err();
    assert_eq!(err.signature, "custom(x: int");
    assert!(registry.register("not a header", noop).is_err());
}
