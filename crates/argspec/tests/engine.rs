use std::sync::{Arc, Mutex};

use argspec::{
    CommandSpec, ExtraSpec, GroupSpec, Invocation, OptionSpec, OptionValue, ParseErrorKind,
    Parsed, PositionalSpec, Registered, Signal, SpecError, Value, ValueParser,
};

fn argv(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn failure_kind<T: std::fmt::Debug>(result: Result<T, Signal>) -> ParseErrorKind {
    match result {
        Err(Signal::Failure(f)) => f.kind().clone(),
        other => panic!("expected failure, got: {other:?}"),
    }
}

fn collect(spec: CommandSpec) -> Registered<(), Parsed> {
    spec.build(|parsed, _| parsed)
}

#[derive(Debug, Clone, PartialEq)]
struct AppContext {
    cwd: Option<String>,
}

type Calls = Arc<Mutex<Vec<(String, String, AppContext)>>>;

/// `app [-C dir] copy <source> <destination>` returning 42 on success.
fn sample_app(calls: Calls) -> Registered<(), i32> {
    let copy = CommandSpec::new("Copy a file")
        .enable_help()
        .positional(PositionalSpec::new("source", "The source file"))
        .unwrap()
        .positional(PositionalSpec::new("destination", "The destination file"))
        .unwrap()
        .build(move |parsed, inv: Invocation<AppContext, i32>| {
            calls.lock().unwrap().push((
                parsed.positional("source").unwrap().to_string(),
                parsed.positional("destination").unwrap().to_string(),
                inv.context.clone(),
            ));
            42
        });

    GroupSpec::new("Sample app")
        .enable_help()
        .command("copy", copy)
        .unwrap()
        .option(OptionSpec::scalar("cwd", "change directory").short('C'))
        .unwrap()
        .build(|parsed, _: Invocation<(), i32>| AppContext {
            cwd: parsed.scalar("cwd").map(|v| v.to_string()),
        })
}

#[test]
fn duplicate_names_fail_at_definition() {
    let spec = CommandSpec::new("t")
        .option(OptionSpec::flag("force", "").short('f'))
        .unwrap();
    assert_eq!(
        spec.clone().option(OptionSpec::flag("force", "")).unwrap_err(),
        SpecError::DuplicateLong("force".to_string())
    );
    assert_eq!(
        spec.option(OptionSpec::flag("fast", "").short('f')).unwrap_err(),
        SpecError::DuplicateShort('f')
    );
}

#[test]
fn boolean_given_twice() {
    let spec = CommandSpec::new("t")
        .option(OptionSpec::flag("force", "").short('f'))
        .unwrap();

    assert_eq!(
        failure_kind(collect(spec.clone()).run(&argv(&["--force", "-f"]), (), "t", "t")),
        ParseErrorKind::Duplicate {
            long: "force".to_string(),
            short: Some('f'),
        }
    );

    let parsed = collect(spec.allow_duplicate_options())
        .run(&argv(&["--force", "-f"]), (), "t", "t")
        .unwrap();
    assert_eq!(parsed.option("force"), Some(&OptionValue::Flag));
}

#[test]
fn list_option_keeps_every_occurrence_in_order() {
    let command = collect(
        CommandSpec::new("t")
            .option(OptionSpec::list("cwd", "").short('C'))
            .unwrap(),
    );
    let parsed = command
        .run(&argv(&["-C", "a", "--cwd=b", "-Cc", "--cwd", "d"]), (), "t", "t")
        .unwrap();
    assert_eq!(
        parsed.list("cwd"),
        &[
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
            Value::from("d"),
        ]
    );
}

#[test]
fn separator_passes_everything_through() {
    let command = collect(CommandSpec::new("t").extra(ExtraSpec::new("rest", "")).unwrap());
    let parsed = command.run(&argv(&["--", "x", "-y", "--z"]), (), "t", "t").unwrap();
    assert_eq!(
        parsed.extra(),
        &[Value::from("x"), Value::from("-y"), Value::from("--z")]
    );
}

#[test]
fn group_context_reaches_the_subcommand() {
    let calls = Calls::default();
    let app = sample_app(Arc::clone(&calls));

    assert_eq!(
        argspec::run(&app, &argv(&["-C", "dir", "copy", "a", "b"]), (), "app").unwrap(),
        42
    );
    assert_eq!(
        argspec::run(&app, &argv(&["-Cdir", "copy", "a", "b"]), (), "app").unwrap(),
        42
    );

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(
        calls[0],
        (
            "a".to_string(),
            "b".to_string(),
            AppContext {
                cwd: Some("dir".to_string())
            }
        )
    );
}

#[test]
fn missing_positional_is_bound_to_the_subcommand_help() {
    let app = sample_app(Calls::default());
    match argspec::run(&app, &argv(&["copy", "a"]), (), "app") {
        Err(Signal::Failure(f)) => {
            assert_eq!(
                f.kind(),
                &ParseErrorKind::MissingPositional {
                    required: 2,
                    given: 1
                }
            );
            assert_eq!(f.full_name(), "app copy");
            assert!(f.help().contains("Usage: app copy [options] <source> <destination>"));
            assert!(f.report().starts_with("error: required positional parameters not given"));
        }
        other => panic!("expected failure, got: {other:?}"),
    }
}

#[test]
fn unknown_subcommand_never_runs_anything() {
    let calls = Calls::default();
    let app = sample_app(Arc::clone(&calls));
    match argspec::run(&app, &argv(&["move", "a", "b"]), (), "app") {
        Err(Signal::Failure(f)) => {
            assert_eq!(f.to_string(), "subcommand move not found in group app");
            assert!(f.help().contains("Commands:\n  copy  Copy a file"));
        }
        other => panic!("expected failure, got: {other:?}"),
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn help_inside_group_describes_the_subcommand() {
    let app = sample_app(Calls::default());
    match argspec::run(&app, &argv(&["copy", "--help"]), (), "app") {
        Err(Signal::Help(text)) => {
            assert!(text.starts_with("copy\n\nCopy a file"));
            assert!(text.contains("Usage: app copy"));
        }
        other => panic!("expected help, got: {other:?}"),
    }
}

#[test]
fn parsing_is_repeatable() {
    let command = collect(
        CommandSpec::new("t")
            .positional(PositionalSpec::new("n", "").parser(ValueParser::integer()))
            .unwrap()
            .option(OptionSpec::list("tag", "").short('t'))
            .unwrap(),
    );
    let args = argv(&["-t", "x", "-ty", "7"]);
    let first = command.run(&args, (), "t", "t").unwrap();
    let second = command.run(&args, (), "t", "t").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.positional("n"), Some(&Value::Integer(7)));
}

#[test]
fn invalid_value_names_its_target() {
    let command = collect(
        CommandSpec::new("t")
            .option(OptionSpec::scalar("jobs", "").parser(ValueParser::integer()))
            .unwrap(),
    );
    match failure_kind(command.run(&argv(&["--jobs", "many"]), (), "t", "t")) {
        ParseErrorKind::InvalidValue { target, value, .. } => {
            assert_eq!(target, "--jobs");
            assert_eq!(value, "many");
        }
        other => panic!("expected invalid value, got: {other:?}"),
    }
}

#[test]
fn rerun_uses_the_same_command() {
    let command = CommandSpec::new("t")
        .extra(ExtraSpec::new("rest", ""))
        .unwrap()
        .build(|parsed, inv: Invocation<u32, usize>| {
            if inv.context > 0 {
                let shorter = inv.args[1..].to_vec();
                return inv.rerun(&shorter, inv.context - 1).unwrap_or(usize::MAX);
            }
            parsed.extra().len()
        });
    assert_eq!(command.run(&argv(&["a", "b", "c"]), 2, "t", "t").unwrap(), 1);
}
