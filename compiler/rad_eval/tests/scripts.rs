//! Whole-script tests.
//!
//! Each test parses a script, binds its command-line arguments, and runs it
//! against mocked shell and HTTP collaborators, then checks what it printed
//! and how it exited.

use pretty_assertions::assert_eq;
use rad_diagnostic::ErrorCode;
use rad_eval::args::{self, Binding};
use rad_eval::collab::{MockHttpClient, MockResponse, MockShell};
use rad_eval::{
    buffer_handler, BuiltinRegistry, EvalError, InterpreterBuilder, InterpreterConfig,
};

/// What a script run left behind.
struct ScriptRun {
    stdout: String,
    stderr: String,
    exit_code: i32,
    errors: Vec<EvalError>,
}

impl ScriptRun {
    fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(EvalError::code).collect()
    }
}

struct TestHarness {
    shell: MockShell,
    mocks: Vec<MockResponse>,
    config: InterpreterConfig,
}

impl TestHarness {
    fn new() -> Self {
        TestHarness {
            shell: MockShell::new(),
            mocks: Vec::new(),
            config: InterpreterConfig {
                script_name: "test.rad".to_string(),
                ..InterpreterConfig::default()
            },
        }
    }

    fn shell(mut self, shell: MockShell) -> Self {
        self.shell = shell;
        self
    }

    fn mock(mut self, pattern: &str, body: &str) -> Self {
        match MockResponse::inline(pattern, body) {
            Ok(mock) => self.mocks.push(mock),
            Err(err) => panic!("bad mock {pattern:?}: {err}"),
        }
        self
    }

    fn run(self, source: &str, argv: &[&str]) -> ScriptRun {
        let parsed = rad_parse::parse(source);
        assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
        let argv: Vec<String> = argv.iter().map(ToString::to_string).collect();
        let script_args = match args::bind(parsed.program.args.as_ref(), &argv) {
            Ok(Binding::Args(bound)) => bound,
            other => panic!("argument binding failed: {other:?}"),
        };

        let builtins = BuiltinRegistry::new();
        let print = buffer_handler();
        let mut interp = InterpreterBuilder::new(&builtins)
            .config(self.config)
            .print_handler(print.clone())
            .shell(Box::new(self.shell))
            .http_client(Box::new(MockHttpClient::new(self.mocks)))
            .build();
        let outcome = interp.run(&parsed.program, &script_args);
        ScriptRun {
            stdout: print.get_output(),
            stderr: print.get_error_output(),
            exit_code: outcome.exit_code,
            errors: outcome.errors,
        }
    }
}

fn run(source: &str) -> ScriptRun {
    TestHarness::new().run(source, &[])
}

#[test]
fn test_http_json_pipeline() {
    let source = r#"resp = http_get("https://api.example.com/users")
if not resp.success:
    exit(1)
users = parse_json(resp.body)
names = [u.name for u in users if u.active]
print(join(names, ", "))
print(resp.status_code)
"#;
    let body = r#"[{"name": "al", "active": true}, {"name": "bo", "active": false}, {"name": "cy", "active": true}]"#;
    let ran = TestHarness::new()
        .mock("api\\.example\\.com/users", body)
        .run(source, &[]);
    assert_eq!(ran.stdout, "al, cy\n200\n");
    assert_eq!(ran.exit_code, 0);
}

#[test]
fn test_arguments_drive_the_script() {
    let source = "args:\n    name str\n    times t int = 2\n    loud bool\nfor i in range(times):\n    print(loud ? upper(name) : name)\n";
    let ran = TestHarness::new().run(source, &["bob", "-t", "3", "--loud"]);
    assert_eq!(ran.stdout, "BOB\nBOB\nBOB\n");

    let ran = TestHarness::new().run(source, &["bob"]);
    assert_eq!(ran.stdout, "bob\nbob\n");
}

#[test]
fn test_scientific_default_binds_as_int() {
    let source = "args:\n    num int = 1.2e10\n    ratio float = 1e-5\nprint(\"{num} {ratio}\")\nprint(type_of(num))\n";
    let ran = run(source);
    assert_eq!(ran.stdout, "12000000000 0.00001\nint\n");

    let ran = TestHarness::new().run(source, &["--num", "7"]);
    assert_eq!(ran.stdout, "7 0.00001\nint\n");
}

#[test]
fn test_help_is_reported_to_the_caller() {
    let parsed = rad_parse::parse("args:\n    name str\nprint(name)\n");
    let binding = args::bind(parsed.program.args.as_ref(), &["--help".to_string()]);
    assert_eq!(binding, Ok(Binding::Help));
}

#[test]
fn test_function_shadowing_an_argument_fails() {
    let source = "args:\n    greet str\nfn greet():\n    pass\nprint(\"never\")\n";
    let ran = TestHarness::new().run(source, &["x"]);
    assert_eq!(ran.codes(), vec![ErrorCode::HoistedFunctionShadowsArgument]);
    assert_eq!(ran.stdout, "");
}

#[test]
fn test_display_from_list_of_maps() {
    let source = r#"people = [{"name": "al", "age": 30}, {"name": "bo", "age": 12}]
display people:
    fields name, age
    age:
        filter fn(a) a >= 18
"#;
    let ran = run(source);
    assert_eq!(ran.exit_code, 0);
    let lines: Vec<&str> = ran.stdout.lines().collect();
    assert_eq!(lines, vec!["name  age", "al    30"]);
}

#[test]
fn test_defer_in_function_runs_at_script_end() {
    let source = "fn f():\n    defer print(\"deferred\")\n    print(\"in f\")\nf()\nprint(\"after\")\n";
    assert_eq!(run(source).stdout, "in f\nafter\ndeferred\n");
}

#[test]
fn test_every_failure_is_reported() {
    let ran = run("defer:\n    x = 1 / 0\nprint(missing)\n");
    assert_eq!(
        ran.codes(),
        vec![ErrorCode::UndefinedVariable, ErrorCode::DivisionByZero]
    );
    assert_eq!(ran.exit_code, 1);
}

#[test]
fn test_interpolation_formats() {
    let source = "x = 3.14159\ns = \"ab\"\nprint(\"{x:.2}|{s:>4}|{s:<4}|\")\n";
    assert_eq!(run(source).stdout, "3.14|  ab|ab  |\n");
}

#[test]
fn test_comprehension_and_ufcs() {
    let source = "print([x * 2 for x in range(5) if x % 2 == 0])\nm = {\"f\": fn(x) x + 1}\nprint(m.f(1))\nprint([3, 1, 2].sort(reverse=true))\n";
    assert_eq!(run(source).stdout, "[ 0, 4, 8 ]\n2\n[ 3, 2, 1 ]\n");
}

#[test]
fn test_runtime_error_carries_backtrace() {
    let ran = run("fn inner():\n    return 1 / 0\nfn outer():\n    return inner()\nouter()\n");
    assert_eq!(ran.codes(), vec![ErrorCode::DivisionByZero]);
    let Some(backtrace) = &ran.errors[0].backtrace else {
        panic!("expected a backtrace");
    };
    let names: Vec<&str> = backtrace.frames().iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"inner"), "{names:?}");
    assert!(names.contains(&"outer"), "{names:?}");
}

#[test]
fn test_shell_output_feeds_the_script() {
    let shell = MockShell::new().respond("git branch --show-current", 0, "main\n", "");
    let source = "code, branch = quiet $\"git branch --show-current\"\nprint(\"on {branch.trim()} ({code})\")\n";
    let ran = TestHarness::new().shell(shell).run(source, &[]);
    assert_eq!(ran.stdout, "on main (0)\n");
    assert_eq!(ran.stderr, "");
}

fn table_lines(stdout: &str) -> Vec<&str> {
    stdout.lines().map(str::trim_end).collect()
}

#[test]
fn test_rad_block_tabulates_json_fields() {
    let source = r#"url = "https://api.example.com/people"
Name = json.results.*
Age = json.results.*.age
Hometown = json.results.*.hometown
rad url:
    fields Name, Age, Hometown
"#;
    let body = r#"{"results": {"Bob": {"age": 40, "hometown": "Los Angeles"}, "Alice": {"age": 30, "hometown": "New York"}}}"#;
    let ran = TestHarness::new().mock(".*", body).run(source, &[]);
    assert_eq!(ran.codes(), vec![]);
    assert_eq!(
        table_lines(&ran.stdout),
        vec!["Name   Age  Hometown", "Alice  30   New York", "Bob    40   Los Angeles"]
    );
    assert_eq!(
        ran.stderr,
        "Mocking response for url (matched \".*\"): https://api.example.com/people\n"
    );
}

#[test]
fn test_request_block_only_binds_fields() {
    let source = r#"Id = json.id
Names = json.names[]
request "https://api.example.com/team":
    fields Id, Names
    sort Names desc
print(Id[0])
print(Names)
"#;
    let body = r#"{"id": 1, "names": ["Alice", "Charlie", "Bob"]}"#;
    let ran = TestHarness::new().mock("example", body).run(source, &[]);
    assert_eq!(ran.codes(), vec![]);
    assert_eq!(ran.stdout, "1\n[ \"Charlie\", \"Bob\", \"Alice\" ]\n");
}

#[test]
fn test_rad_block_field_modifiers_apply_to_fetched_rows() {
    let source = r#"Name = json[].name
Age = json[].age
rad "https://api.example.com/people":
    fields Name, Age
    sort Age
    Age:
        filter a -> a >= 18
        map a -> a * 12
"#;
    let body = r#"[{"name": "al", "age": 30}, {"name": "bo", "age": 12}, {"name": "cy", "age": 20}]"#;
    let ran = TestHarness::new().mock(".*", body).run(source, &[]);
    assert_eq!(ran.codes(), vec![]);
    assert_eq!(table_lines(&ran.stdout), vec!["Name  Age", "cy    240", "al    360"]);
}

#[test]
fn test_json_field_index_is_evaluated_at_declaration() {
    let source = r#"i = 0
First = json.*.ids[i]
i = 1
Key = json.*
request "https://api.example.com/ids":
    fields Key, First
print(Key)
print(First)
"#;
    let body = r#"{"b": {"ids": [3, 4]}, "a": {"ids": [1, 2]}}"#;
    let ran = TestHarness::new().mock(".*", body).run(source, &[]);
    assert_eq!(ran.codes(), vec![]);
    assert_eq!(ran.stdout, "[ \"a\", \"b\" ]\n[ 1, 3 ]\n");
}

#[test]
fn test_rad_block_reports_extraction_failures() {
    let source = "Name = json.people[].name\nrad \"https://api.example.com\":\n    fields Name\nprint(\"never\")\n";
    let ran = TestHarness::new()
        .mock(".*", r#"{"users": []}"#)
        .run(source, &[]);
    assert_eq!(ran.codes(), vec![ErrorCode::KeyNotFound]);
    assert_eq!(ran.errors[0].message, "Key not found in JSON: json.people");
    assert_eq!(ran.stdout, "");
    assert_eq!(ran.exit_code, 1);
}

#[test]
fn test_rad_block_needs_declared_json_fields() {
    let source = "Name = [\"x\"]\nrad \"https://api.example.com\":\n    fields Name\n";
    let ran = TestHarness::new().mock(".*", "{}").run(source, &[]);
    assert_eq!(ran.codes(), vec![ErrorCode::UndefinedVariable]);
}

#[test]
fn test_rad_block_rejects_invalid_json() {
    let source = "Name = json.name\nrad \"https://api.example.com\":\n    fields Name\n";
    let ran = TestHarness::new().mock(".*", "<html>").run(source, &[]);
    assert_eq!(ran.codes(), vec![ErrorCode::ParseJson]);
}
