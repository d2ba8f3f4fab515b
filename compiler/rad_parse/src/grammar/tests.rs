use pretty_assertions::assert_eq;
use rad_diagnostic::ErrorCode;
use rad_ir::ast::{
    Align, ArgConstraint, ArgScalar, BinaryOp, ColumnOp, ExprKind, FnBody, JsonIndex, JsonKey,
    Program, RangeBound, StmtKind, StringPart, SwitchBody, TableKind,
};
use rad_ir::{Span, Type};

use crate::parse;

fn parse_ok(source: &str) -> Program {
    let output = parse(source);
    assert_eq!(output.errors, vec![], "unexpected parse errors");
    output.program
}

fn only_expr(source: &str) -> ExprKind {
    let program = parse_ok(source);
    match program.stmts.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::Expr { expr, .. }) => expr.kind,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn test_precedence_mul_over_add() {
    let ExprKind::Binary { op, right, .. } = only_expr("1 + 2 * 3") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let ExprKind::Unary { operand, .. } = only_expr("not a == b") else {
        panic!("expected unary");
    };
    assert!(matches!(operand.kind, ExprKind::Binary { op: BinaryOp::Eq, .. }));
}

#[test]
fn test_not_in() {
    assert!(matches!(
        only_expr("a not in b"),
        ExprKind::Binary {
            op: BinaryOp::NotIn,
            ..
        }
    ));
}

#[test]
fn test_catch_wraps_whole_ternary() {
    let program = parse_ok("a = catch true ? foo(1) : foo(2)");
    let StmtKind::Assign { value, .. } = &program.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Catch(inner) = &value.kind else {
        panic!("expected catch");
    };
    assert!(matches!(inner.kind, ExprKind::Ternary { .. }));
}

#[test]
fn test_fallback_chains_left() {
    let ExprKind::Fallback { left, .. } = only_expr("a ?? b ?? c") else {
        panic!("expected fallback");
    };
    assert!(matches!(left.kind, ExprKind::Fallback { .. }));
}

#[test]
fn test_named_call_arguments() {
    let ExprKind::Call { args, named, .. } = only_expr("foo(1, y=2, z=3)") else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    let names: Vec<_> = named.iter().map(|n| n.name.name.as_str()).collect();
    assert_eq!(names, ["y", "z"]);
}

#[test]
fn test_positional_after_named_is_an_error() {
    let output = parse("foo(y=2, 1)");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].code, ErrorCode::InvalidSyntax);
}

#[test]
fn test_method_call_and_slice() {
    let ExprKind::MethodCall {
        receiver, method, ..
    } = only_expr("xs[1:].upper()")
    else {
        panic!("expected method call");
    };
    assert_eq!(method.name, "upper");
    assert!(matches!(
        receiver.kind,
        ExprKind::Slice {
            start: Some(_),
            end: None,
            ..
        }
    ));
}

#[test]
fn test_list_comprehension() {
    let ExprKind::ListComp(comp) = only_expr("[x * 2 for x in xs with ctx if x > 1]") else {
        panic!("expected comprehension");
    };
    assert_eq!(comp.vars.len(), 1);
    assert_eq!(comp.context.map(|c| c.name), Some("ctx".to_owned()));
    assert!(comp.cond.is_some());
}

#[test]
fn test_multiline_map_literal() {
    let ExprKind::Map(entries) = only_expr("{\n    \"a\": 1,\n    \"b\": [1,\n 2],\n}") else {
        panic!("expected map");
    };
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_string_interpolation_spans() {
    let source = r#"print("hi {name:<8}!")"#;
    let ExprKind::Call { args, .. } = only_expr(source) else {
        panic!("expected call");
    };
    let ExprKind::Str(parts) = &args[0].kind else {
        panic!("expected string");
    };
    assert_eq!(parts.len(), 3);
    let StringPart::Interp { expr, format } = &parts[1] else {
        panic!("expected interpolation");
    };
    let name_at = u32::try_from(source.find("name").unwrap_or(0)).unwrap_or(0);
    assert_eq!(expr.span, Span::new(name_at, name_at + 4));
    assert_eq!(format.map(|f| (f.align, f.width)), Some((Align::Left, Some(8))));
}

#[test]
fn test_string_escapes() {
    let ExprKind::Str(parts) = only_expr(r#""a\tb\{c\}\"""#) else {
        panic!("expected string");
    };
    assert_eq!(parts, vec![StringPart::Text("a\tb{c\\}\"".to_owned())]);
}

#[test]
fn test_if_with_pre_statements() {
    let program = parse_ok("if a += 3; a > 4:\n    print(1)\nelse if a > 6:\n    print(2)\nelse:\n    print(3)\n");
    let StmtKind::If {
        branches,
        otherwise,
    } = &program.stmts[0].kind
    else {
        panic!("expected if");
    };
    assert_eq!(branches.len(), 2);
    assert!(branches[0].pre.is_some());
    assert!(branches[1].pre.is_none());
    assert!(otherwise.is_some());
}

#[test]
fn test_for_with_two_vars_and_context() {
    let program = parse_ok("for k, v in m with loop:\n    print(k)\n");
    let StmtKind::For(for_loop) = &program.stmts[0].kind else {
        panic!("expected for");
    };
    assert_eq!(for_loop.vars.len(), 2);
    assert_eq!(
        for_loop.context.as_ref().map(|c| c.name.as_str()),
        Some("loop")
    );
}

#[test]
fn test_switch_expression_with_block_case() {
    let source = "x = switch y:\n    case 1, 2 -> \"low\"\n    case 3:\n        yield \"three\"\n    default -> \"other\"\nprint(x)\n";
    let program = parse_ok(source);
    assert_eq!(program.stmts.len(), 2);
    let StmtKind::Assign { value, .. } = &program.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Switch(switch) = &value.kind else {
        panic!("expected switch");
    };
    assert_eq!(switch.cases.len(), 2);
    assert_eq!(switch.cases[0].keys.len(), 2);
    assert!(matches!(switch.cases[1].body, SwitchBody::Block(_)));
    assert!(matches!(switch.default, Some(SwitchBody::Values(_))));
}

#[test]
fn test_fn_def_params() {
    let program = parse_ok("fn foo(x: int, y?, *rest: str, *, z: float = 1.0) -> int|str:\n    return x\n");
    let StmtKind::FnDef(def) = &program.stmts[0].kind else {
        panic!("expected fn");
    };
    let flags: Vec<_> = def
        .params
        .iter()
        .map(|p| (p.name.name.as_str(), p.optional, p.variadic, p.named_only))
        .collect();
    assert_eq!(
        flags,
        [
            ("x", false, false, false),
            ("y", true, false, false),
            ("rest", false, true, false),
            ("z", false, false, true),
        ]
    );
    assert_eq!(def.return_type, Some(Type::Union(vec![Type::Int, Type::Str])));
}

#[test]
fn test_complex_types() {
    let program = parse_ok("fn f(a: [\"x\", \"y\"], b: { \"k\"?: int }, c: {str: int[]}, d: [int, str]?) a\n");
    let StmtKind::FnDef(def) = &program.stmts[0].kind else {
        panic!("expected fn");
    };
    let rendered: Vec<_> = def
        .params
        .iter()
        .filter_map(|p| p.ty.as_ref().map(ToString::to_string))
        .collect();
    assert_eq!(
        rendered,
        ["str enum", "{ \"k\"?: int }", "{ str: int[] }", "[int, str]?"]
    );
    assert!(def.params[3].optional);
}

#[test]
fn test_lambda_block_assignment() {
    let program = parse_ok("f = fn(x):\n    return x * 2\nprint(f(2))\n");
    assert_eq!(program.stmts.len(), 2);
    let StmtKind::Assign { value, .. } = &program.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Lambda(def) = &value.kind else {
        panic!("expected lambda");
    };
    assert!(matches!(def.body, FnBody::Block(_)));
}

#[test]
fn test_catch_block_suffix() {
    let program = parse_ok("a = foo() catch:\n    print(\"failed\")\n    return\nprint(a)\n");
    let StmtKind::Assign { catch, .. } = &program.stmts[0].kind else {
        panic!("expected assignment");
    };
    assert_eq!(catch.as_ref().map(|b| b.stmts.len()), Some(2));
}

#[test]
fn test_defer_forms() {
    let program = parse_ok("defer print(1)\nerrdefer:\n    print(2)\n");
    assert!(matches!(
        program.stmts[0].kind,
        StmtKind::Defer {
            on_error_only: false,
            ..
        }
    ));
    assert!(matches!(
        program.stmts[1].kind,
        StmtKind::Defer {
            on_error_only: true,
            ..
        }
    ));
}

#[test]
fn test_shell_statements() {
    let program = parse_ok("code, out = quiet $\"ls {dir}\"\n$cmd catch:\n    pass\n");
    let StmtKind::Shell(shell) = &program.stmts[0].kind else {
        panic!("expected shell");
    };
    assert_eq!(shell.targets.len(), 2);
    assert!(shell.quiet);
    let StmtKind::Shell(bare) = &program.stmts[1].kind else {
        panic!("expected shell");
    };
    assert!(bare.targets.is_empty());
    assert!(bare.catch.is_some());
}

#[test]
fn test_compound_and_incr_targets() {
    let program = parse_ok("a[0].b += 1\ni++\ndel m[\"k\"], x\n");
    let StmtKind::CompoundAssign { target, op, .. } = &program.stmts[0].kind else {
        panic!("expected compound assignment");
    };
    assert_eq!(target.root.name, "a");
    assert_eq!(target.segments.len(), 2);
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        program.stmts[1].kind,
        StmtKind::IncrDecr {
            increment: true,
            ..
        }
    ));
    assert!(matches!(&program.stmts[2].kind, StmtKind::Del(t) if t.len() == 2));
}

#[test]
fn test_args_block() {
    let source = "---\nDoes a thing.\n---\nargs:\n    name \"user\" n str # who to greet\n    times t int = 1\n    *files str\n    verbose v bool\n    age float?\n    name enum [\"alice\", \"bob\"]\n    age range (0, 100]\n    verbose mutually excludes age\nprint(name)\n";
    let program = parse_ok(source);
    assert_eq!(program.description.as_deref(), Some("Does a thing."));
    let args = program.args.unwrap_or_else(|| panic!("missing args block"));
    assert_eq!(args.decls.len(), 5);

    let name = &args.decls[0];
    assert_eq!(name.flag_name(), "user");
    assert_eq!(name.short, Some('n'));
    assert_eq!(name.comment.as_deref(), Some("who to greet"));
    assert!(args.decls[1].default.is_some());
    assert!(args.decls[2].variadic);
    assert_eq!(args.decls[3].ty.scalar, ArgScalar::Bool);
    assert!(args.decls[4].optional);

    assert_eq!(args.constraints.len(), 3);
    assert!(matches!(
        &args.constraints[1],
        ArgConstraint::Range {
            min: Some(RangeBound {
                inclusive: false,
                ..
            }),
            max: Some(RangeBound {
                inclusive: true,
                ..
            }),
            ..
        }
    ));
    assert!(matches!(
        &args.constraints[2],
        ArgConstraint::Excludes { mutual: true, .. }
    ));
    assert_eq!(program.stmts.len(), 1);
}

#[test]
fn test_open_range() {
    let program = parse_ok("args:\n    age int\n    age range (, 200]\n");
    let args = program.args.unwrap_or_else(|| panic!("missing args block"));
    assert!(matches!(
        &args.constraints[0],
        ArgConstraint::Range { min: None, max: Some(_), .. }
    ));
}

#[test]
fn test_display_block() {
    let source = "display:\n    fields ages, names\n    sort ages desc\n    ages:\n        filter fn(a) a >= 18\n        map a -> a * 12\n";
    let program = parse_ok(source);
    let StmtKind::Display(display) = &program.stmts[0].kind else {
        panic!("expected display");
    };
    assert!(display.source.is_none());
    assert_eq!(display.fields.len(), 2);
    assert_eq!(display.sorts.len(), 1);
    assert!(display.sorts[0].descending);
    let ops = &display.modifiers[0].ops;
    assert!(matches!(ops[0], ColumnOp::Filter(_)));
    assert!(matches!(&ops[1], ColumnOp::Map(e) if matches!(e.kind, ExprKind::Lambda(_))));
}

#[test]
fn test_rad_and_request_blocks() {
    let program = parse_ok("rad url:\n    fields Name\nrequest \"http://x\":\n    fields Name\n    sort\n");
    let kinds: Vec<_> = program
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Display(display) => (display.kind, display.source.is_some()),
            other => panic!("expected a table block, got {other:?}"),
        })
        .collect();
    assert_eq!(kinds, [(TableKind::Rad, true), (TableKind::Request, true)]);
}

#[test]
fn test_table_keywords_as_variables() {
    let program = parse_ok("request = 1\nrad = request + 1\nprint(rad)\n");
    assert_eq!(program.stmts.len(), 3);
    assert!(matches!(program.stmts[1].kind, StmtKind::Assign { .. }));
}

#[test]
fn test_json_field_paths() {
    let program = parse_ok("Name = json.results[].name\nKey = json.*\nFirst = json.*.ids[0]\nAll = json\n");
    let paths: Vec<_> = program
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::JsonField { name, path } => (name.name.as_str(), path),
            other => panic!("expected a JSON field, got {other:?}"),
        })
        .collect();

    let (name, path) = paths[0];
    assert_eq!(name, "Name");
    let keys: Vec<_> = path.segments.iter().map(|s| s.key.clone()).collect();
    assert_eq!(
        keys,
        [
            JsonKey::Root,
            JsonKey::Name("results".into()),
            JsonKey::Name("name".into())
        ]
    );
    assert!(matches!(&path.segments[1].indexes[..], [JsonIndex::Each]));

    assert_eq!(paths[1].1.segments[1].key, JsonKey::AnyKey);
    assert!(matches!(
        &paths[2].1.segments[2].indexes[..],
        [JsonIndex::At(e)] if matches!(e.kind, ExprKind::Int(0))
    ));
    assert_eq!(paths[3].1.segments.len(), 1);
}

#[test]
fn test_json_field_needs_a_key_after_dot() {
    let output = parse("Name = json.[0]\n");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].code, ErrorCode::MissingIdentifier);
}

#[test]
fn test_display_as_variable_name() {
    let program = parse_ok("display = 1\nprint(display)\n");
    assert!(matches!(program.stmts[0].kind, StmtKind::Assign { .. }));
}

#[test]
fn test_recovery_reports_multiple_errors() {
    let output = parse("a = 1 +\nb = 2\nif x\n    print(1)\nc = ]\nd = 4\n");
    assert_eq!(output.errors.len(), 3);
    assert_eq!(output.errors[1].code, ErrorCode::MissingColon);
    let names: Vec<_> = output
        .program
        .stmts
        .iter()
        .filter_map(|s| match &s.kind {
            StmtKind::Assign { targets, .. } => Some(targets[0].root.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["b", "d"]);
}

#[test]
fn test_scientific_literal_is_marked() {
    let program = parse_ok("x = 1e6");
    let StmtKind::Assign { value, .. } = &program.stmts[0].kind else {
        panic!("expected assignment");
    };
    assert!(value.is_scientific_literal());
}
