use pretty_assertions::assert_eq;

use super::*;

fn block(lines: &str) -> ArgBlock {
    let source = format!("args:\n{lines}pass\n");
    let output = rad_parse::parse(&source);
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output
        .program
        .args
        .unwrap_or_else(|| panic!("no args block in {source:?}"))
}

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

fn bound(lines: &str, args: &[&str]) -> ScriptArgs {
    match bind(Some(&block(lines)), &argv(args)) {
        Ok(Binding::Args(args)) => args,
        other => panic!("expected bound args, got {other:?}"),
    }
}

fn bind_err(lines: &str, args: &[&str]) -> ArgError {
    match bind(Some(&block(lines)), &argv(args)) {
        Err(err) => err,
        Ok(other) => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn test_positionals_and_flags_in_any_order() {
    let lines = "    name str\n    times t int = 1\n    loud bool\n";
    let args = bound(lines, &["--loud", "bob", "-t", "3"]);
    assert_eq!(args.get("name"), Some(&Value::str("bob")));
    assert_eq!(args.get("times"), Some(&Value::Int(3)));
    assert_eq!(args.get("loud"), Some(&Value::Bool(true)));
}

#[test]
fn test_inline_values_and_defaults() {
    let lines = "    name str\n    times int = 2\n    ratio float = 1\n    quiet q bool\n";
    let args = bound(lines, &["--name=alice"]);
    assert_eq!(args.get("name"), Some(&Value::str("alice")));
    assert_eq!(args.get("times"), Some(&Value::Int(2)));
    assert_eq!(args.get("ratio"), Some(&Value::Float(1.0)));
    assert_eq!(args.get("quiet"), Some(&Value::Bool(false)));
}

#[test]
fn test_optional_binds_null_and_missing_required_errors() {
    let lines = "    a str\n    b int\n    c str?\n";
    let args = bound(lines, &["x", "1"]);
    assert_eq!(args.get("c"), Some(&Value::Null));

    let err = bind_err(lines, &[]);
    assert_eq!(err, ArgError::MissingRequired(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(err.to_string(), "Missing required arguments: [a, b]");
}

#[test]
fn test_variadic_takes_its_run() {
    let lines = "    cmd str\n    *files str\n    verbose v bool\n";
    let args = bound(lines, &["build", "a.txt", "b.txt", "-v"]);
    assert_eq!(args.get("cmd"), Some(&Value::str("build")));
    assert_eq!(
        args.get("files"),
        Some(&Value::list(vec![Value::str("a.txt"), Value::str("b.txt")]))
    );
    let args = bound(lines, &["build"]);
    assert_eq!(args.get("files"), Some(&Value::list(Vec::new())));
}

#[test]
fn test_list_args_split_on_commas() {
    let args = bound("    ids int[]\n", &["--ids", "1,2", "--ids", "3"]);
    assert_eq!(
        args.get("ids"),
        Some(&Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
    );
}

#[test]
fn test_negative_numbers_are_values() {
    let args = bound("    offset int\n", &["-5"]);
    assert_eq!(args.get("offset"), Some(&Value::Int(-5)));
}

#[test]
fn test_conversion_failure_is_user_input() {
    let err = bind_err("    times int\n", &["many"]);
    assert_eq!(err.code(), ErrorCode::UserInput);
    assert_eq!(err.to_string(), "invalid int value for times: many");
}

#[test]
fn test_scientific_defaults_for_int_args() {
    for (literal, expected) in [("1e6", 1_000_000), ("1000e-2", 10), ("1.2e10", 12_000_000_000)] {
        let args = bound(&format!("    num int = {literal}\n"), &[]);
        assert_eq!(args.get("num"), Some(&Value::Int(expected)), "{literal}");
    }
    let args = bound("    num float = 1e-5\n", &[]);
    assert_eq!(args.get("num"), Some(&Value::Float(1e-5)));
    let args = bound("    num int = -2e3\n", &[]);
    assert_eq!(args.get("num"), Some(&Value::Int(-2000)));
}

#[test]
fn test_fractional_scientific_default_for_int_arg() {
    for literal in ["1e-5", "1.25e1"] {
        let err = bind_err(&format!("    num int = {literal}\n"), &[]);
        assert_eq!(err.code(), ErrorCode::ScientificNotationNotWholeNumber, "{literal}");
        assert!(err
            .to_string()
            .starts_with("Scientific notation value does not evaluate to a whole number"));
    }
}

#[test]
fn test_huge_scientific_default_for_int_arg() {
    let err = bind_err("    num int = 1e300\n", &[]);
    assert_eq!(err.code(), ErrorCode::NumInvalidRange);
    assert_eq!(
        bind_err("    num int = 1.5\n", &[]),
        ArgError::InvalidDefault("num".to_string())
    );
}

#[test]
fn test_unknown_flag_and_extra_positional() {
    assert_eq!(
        bind_err("    a str\n", &["x", "--nope"]),
        ArgError::UnknownFlag("--nope".to_string())
    );
    assert_eq!(
        bind_err("    a str\n", &["x", "y"]),
        ArgError::UnexpectedPositional("y".to_string())
    );
}

#[test]
fn test_help_unless_claimed() {
    assert_eq!(bind(Some(&block("    a str\n")), &argv(&["--help"])), Ok(Binding::Help));
    assert_eq!(bind(None, &argv(&["-h"])), Ok(Binding::Help));
    let args = bound("    host h str\n", &["-h", "example.com"]);
    assert_eq!(args.get("host"), Some(&Value::str("example.com")));
}

#[test]
fn test_enum_and_regex_constraints() {
    let lines = "    color str\n    color enum [\"red\", \"blue\"]\n";
    assert!(bind(Some(&block(lines)), &argv(&["red"])).is_ok());
    let err = bind_err(lines, &["green"]);
    assert_eq!(err.code(), ErrorCode::ArgsContradict);
    assert_eq!(err.to_string(), "Invalid 'color' value: green (valid values: red, blue)");

    let lines = "    id str\n    id regex \"^[a-z]+$\"\n";
    let err = bind_err(lines, &["A1"]);
    assert_eq!(err.to_string(), "Invalid 'id' value: A1 (must match regex: ^[a-z]+$)");
}

#[test]
fn test_range_bounds() {
    let lines = "    age int\n    age range (0, 100]\n";
    assert!(bind(Some(&block(lines)), &argv(&["100"])).is_ok());
    assert_eq!(
        bind_err(lines, &["0"]).to_string(),
        "'age' value 0 is <= minimum (exclusive) 0"
    );
    assert_eq!(
        bind_err(lines, &["101"]).to_string(),
        "'age' value 101 is > maximum 100"
    );
}

#[test]
fn test_requires_and_excludes() {
    let lines = "    a bool\n    b bool\n    a requires b\n";
    assert_eq!(
        bind_err(lines, &["--a"]).to_string(),
        "Invalid args: 'a' requires 'b', but 'b' was not given"
    );
    assert!(bind(Some(&block(lines)), &argv(&["--b"])).is_ok());

    let lines = "    a bool\n    b bool\n    a mutually requires b\n";
    assert_eq!(
        bind_err(lines, &["--b"]).to_string(),
        "Invalid args: 'b' requires 'a', but 'a' was not given"
    );

    let lines = "    a bool\n    b bool\n    a excludes b\n";
    let err = bind_err(lines, &["--a", "--b"]);
    assert_eq!(err.code(), ErrorCode::MutualExclArgs);
    assert_eq!(err.to_string(), "Invalid args: 'a' excludes 'b', but 'b' was set");
}

#[test]
fn test_usage_lists_every_argument() {
    let block = block("    name n str # who to greet\n    loud bool\n    *rest str\n");
    let text = usage("greet.rad", Some("Greets people."), Some(&block));
    assert!(text.starts_with("Greets people.\n\nUsage:\n  greet.rad <name> [--loud] [rest...]\n"));
    assert!(text.contains("-n, --name str"));
    assert!(text.contains("who to greet"));
}
