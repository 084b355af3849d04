use anyhow::{Result, bail};
use argspec::{CommandSpec, ExtraSpec, Invocation, OptionSpec, Parsed, PositionalSpec, Registered};
use serde_json::json;
use std::path::PathBuf;

/// Context every subcommand runs with, derived from the group options.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub cwd: PathBuf,
}

pub type Outcome = Result<i32>;

pub fn echo() -> Result<Registered<AppContext, Outcome>> {
    let command = CommandSpec::new("Shell echo replacement")
        .enable_help()
        .extra(ExtraSpec::new("messages", "messages to print"))?
        .option(
            OptionSpec::flag("no-trailing-newline", "Do not print a trailing newline").short('n'),
        )?
        .option(OptionSpec::flag("escape", "Escape special characters").short('e'))?
        .option(OptionSpec::flag("no-escape", "Do not escape special characters").short('E'))?
        .option(OptionSpec::flag("dump", "Dump parsed arguments"))?
        .option(OptionSpec::list("cwd", "cwd list for expansion for -e").short('C'))?
        .option(OptionSpec::flag("dummy", "Dummy option").short('d'))?
        .option(OptionSpec::flag("bool", "Dummy boolean option").short('b'))?
        .option(OptionSpec::scalar("join-with", "Join with").short('j'))?
        .build(run_echo);
    Ok(command)
}

fn run_echo(parsed: Parsed, inv: Invocation<AppContext, Outcome>) -> Outcome {
    let escape = parsed.flag("escape");
    if escape && parsed.flag("no-escape") {
        bail!("cannot use both -e and -E");
    }
    if escape || parsed.flag("no-trailing-newline") {
        bail!("-e and -n are not implemented");
    }

    if parsed.flag("dump") {
        let dump = json!({
            "command": inv.full_name,
            "cwd": inv.context.cwd,
            "parsed": parsed,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(0);
    }

    let separator = parsed
        .scalar("join-with")
        .map(|v| v.to_string())
        .unwrap_or_else(|| " ".to_string());
    let messages: Vec<String> = parsed.extra().iter().map(|v| v.to_string()).collect();
    println!("{}", messages.join(&separator));
    Ok(0)
}

pub fn copy() -> Result<Registered<AppContext, Outcome>> {
    let command = CommandSpec::new("Copy a file")
        .enable_help()
        .positional(PositionalSpec::new("source", "The source file"))?
        .positional(PositionalSpec::new("destination", "The destination file"))?
        .extra(ExtraSpec::new("more-destinations", "The destination files"))?
        .option(OptionSpec::flag("force", "Force overwrite").short('f'))?
        .option(OptionSpec::flag("recursive", "Copy recursively").short('r'))?
        .option(OptionSpec::flag("dry-run", "Dry run"))?
        .build(run_copy);
    Ok(command)
}

fn run_copy(parsed: Parsed, inv: Invocation<AppContext, Outcome>) -> Outcome {
    let source = parsed.positional("source").map(|v| v.to_string()).unwrap_or_default();
    let destination = parsed
        .positional("destination")
        .map(|v| v.to_string())
        .unwrap_or_default();
    let force = parsed.flag("force");
    let recursive = parsed.flag("recursive");

    tracing::debug!(
        command = %inv.full_name,
        cwd = %inv.context.cwd.display(),
        more = parsed.extra().len(),
        "copy requested"
    );

    let mut line = format!("Copying {source} to {destination}");
    if force || recursive {
        line.push(',');
        if force {
            line.push_str(" force");
        }
        if recursive {
            line.push_str(" recursive");
        }
    }
    println!("{line}");

    if !parsed.flag("dry-run") {
        bail!("without dry-run is not implemented");
    }
    Ok(0)
}
