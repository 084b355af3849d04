mod commands;

use anyhow::{Context, Result};
use argspec::{GroupSpec, Host, Invocation, OptionSpec, Parsed, Registered};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::{AppContext, Outcome};

const PROGRAM_NAME: &str = "app";

/// Context supplied by the process before any parsing happens.
#[derive(Debug)]
struct OuterContext {
    current_dir: PathBuf,
}

/// Prints what the engine hands back and terminates the process.
struct ProcessHost;

impl Host for ProcessHost {
    fn on_error(&self, text: String) -> ! {
        eprintln!("{text}");
        std::process::exit(1);
    }

    fn on_help(&self, text: String) -> ! {
        println!("{text}");
        std::process::exit(0);
    }

    fn on_version(&self, text: Option<String>) -> ! {
        if let Some(text) = text {
            println!("{text}");
        }
        std::process::exit(0);
    }
}

fn main() -> Result<()> {
    init_tracing();
    let app = build_app()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outer = OuterContext {
        current_dir: std::env::current_dir().context("failed to read current directory")?,
    };

    match argspec::run_with_host(&app, &args, outer, PROGRAM_NAME, &ProcessHost) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn build_app() -> Result<Registered<OuterContext, Outcome>> {
    let copy = commands::copy()?;
    let app = GroupSpec::new("Sample app")
        .version("0.0.0")
        .enable_help()
        .enable_version()
        .command("echo", commands::echo()?)?
        .command("copy", copy.clone())?
        .command("cp", copy)?
        .option(OptionSpec::scalar("cwd", "change directory").short('C'))?
        .build(app_context);
    Ok(app)
}

fn app_context(parsed: Parsed, inv: Invocation<OuterContext, Outcome>) -> AppContext {
    let cwd = match parsed.scalar("cwd") {
        Some(dir) => inv.context.current_dir.join(dir.to_string()),
        None => inv.context.current_dir,
    };
    tracing::debug!(cwd = %cwd.display(), args = ?inv.args, "resolved app context");
    AppContext { cwd }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
