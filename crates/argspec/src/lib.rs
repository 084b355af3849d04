//! Declarative command specifications and a strict argv parser.
//!
//! A [`CommandSpec`] describes positionals, an optional variadic sink and
//! options; a [`GroupSpec`] describes a set of named subcommands plus its own
//! options. Building either with an action yields a [`Registered`] value that
//! parses argument vectors into [`Parsed`] values and runs the action.
//!
//! The engine never prints or exits. Failures and help/version requests come
//! back as a [`Signal`]; the host decides what to do with them (see [`Host`]).
//!
//! ```
//! use argspec::{CommandSpec, GroupSpec, OptionSpec, PositionalSpec};
//!
//! # fn main() -> Result<(), argspec::SpecError> {
//! let copy = CommandSpec::new("Copy a file")
//!     .positional(PositionalSpec::new("source", "The source file"))?
//!     .positional(PositionalSpec::new("destination", "The destination file"))?
//!     .build(|parsed, inv: argspec::Invocation<Option<String>, String>| {
//!         format!(
//!             "{} -> {} in {}",
//!             parsed.positional("source").unwrap(),
//!             parsed.positional("destination").unwrap(),
//!             inv.context.as_deref().unwrap_or("."),
//!         )
//!     });
//!
//! let app = GroupSpec::new("Sample app")
//!     .command("copy", copy)?
//!     .option(OptionSpec::scalar("cwd", "change directory").short('C'))?
//!     .build(|parsed, _: argspec::Invocation<(), String>| {
//!         parsed.scalar("cwd").map(|v| v.to_string())
//!     });
//!
//! let args: Vec<String> = ["-C", "dir", "copy", "a", "b"].map(String::from).to_vec();
//! assert_eq!(argspec::run(&app, &args, (), "app").ok().as_deref(), Some("a -> b in dir"));
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
mod group;
mod help;
mod invocation;
mod parsed;
mod positional;
mod scan;
mod spec;
mod value;

pub use command::CommandSpec;
pub use error::{ParseErrorKind, ParseFailure, Signal, SpecError};
pub use group::GroupSpec;
pub use invocation::{Invocation, Registered};
pub use parsed::{OptionValue, Parsed};
pub use spec::{ExtraSpec, OptionKind, OptionSpec, ParseFlags, PositionalSpec};
pub use value::{Value, ValueParser};

/// Run a built command or group against `args` (program path already stripped).
///
/// `program_name` is both the name and the full name of the top level.
/// A missing subcommand is reported as a help request for the group it is
/// missing from; every other parse failure stays a [`Signal::Failure`].
pub fn run<C, T>(
    command: &Registered<C, T>,
    args: &[String],
    context: C,
    program_name: &str,
) -> Result<T, Signal> {
    command
        .run(args, context, program_name, program_name)
        .map_err(|signal| match signal {
            Signal::Failure(failure) if matches!(failure.kind(), ParseErrorKind::NoSubcommand(_)) => {
                Signal::Help(failure.help())
            }
            other => other,
        })
}

/// Process-side handlers for the signals a run can end with.
///
/// Implementations are expected to terminate (typically exit 1 for errors and
/// 0 for help/version), which is why none of them return.
pub trait Host {
    /// `text` is the failure message followed by the contextual help.
    fn on_error(&self, text: String) -> !;

    fn on_help(&self, text: String) -> !;

    /// `None` when no version string was registered.
    fn on_version(&self, text: Option<String>) -> !;
}

/// [`run`], handing any signal to exactly one `host` handler.
pub fn run_with_host<C, T, H>(
    command: &Registered<C, T>,
    args: &[String],
    context: C,
    program_name: &str,
    host: &H,
) -> T
where
    H: Host + ?Sized,
{
    match run(command, args, context, program_name) {
        Ok(value) => value,
        Err(Signal::Failure(failure)) => host.on_error(failure.report()),
        Err(Signal::Help(text)) => host.on_help(text),
        Err(Signal::Version(text)) => host.on_version(text),
    }
}
