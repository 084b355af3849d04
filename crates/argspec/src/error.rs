use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A mistake in how a specification was assembled.
///
/// These surface from the builder call that introduced them, never at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("short option {0:?} must be a single letter from A-Z, a-z, 0-9, _")]
    InvalidShort(char),
    #[error("short option -{0} is already defined")]
    DuplicateShort(char),
    #[error("long option must be a non-empty string")]
    EmptyLong,
    #[error("long option {0:?} must be a string of letters from A-Z, a-z, 0-9, _, -")]
    InvalidLong(String),
    #[error("long option --{0} is already defined")]
    DuplicateLong(String),
    #[error("boolean option --{0} does not take a value parser")]
    BooleanParser(String),
    #[error("positional parameter {0} is already declared")]
    DuplicatePositional(String),
    #[error("required positional parameter {0} cannot be after optional positional parameters")]
    RequiredAfterOptional(String),
    #[error("optional positional parameter {0} and extra positional parameters cannot be used together")]
    OptionalWithExtra(String),
    #[error("extra positional parameters already registered")]
    DuplicateExtra,
    #[error("extra positional parameters cannot be used with optional positional parameters")]
    ExtraAfterOptional,
    #[error("subcommand name {0:?} must be non-empty and must not start with '-' unless it is exactly '-'")]
    InvalidCommandName(String),
    #[error("subcommand {0} is already registered")]
    DuplicateCommand(String),
}

/// What went wrong while scanning one argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unknown option --{0} given")]
    UnknownOption(String),
    #[error("unknown short option -{0} given")]
    UnknownShortOption(char),
    #[error("boolean option --{0} does not take a value")]
    UnexpectedValue(String),
    #[error("option {} requires a value", option_label(.long, .short))]
    MissingValue { long: String, short: Option<char> },
    #[error("option {} given multiple times", option_label(.long, .short))]
    Duplicate { long: String, short: Option<char> },
    #[error("invalid value {value:?} for {target}: {reason}")]
    InvalidValue {
        target: String,
        value: String,
        reason: String,
    },
    #[error("single dash '-' is invalid unless after `--`")]
    SingleDash,
    #[error("extra positional argument {0:?} given")]
    ExtraPositional(String),
    #[error("required positional parameters not given (expected {required}, got {given})")]
    MissingPositional { required: usize, given: usize },
    #[error("no subcommand given in group {0}")]
    NoSubcommand(String),
    #[error("subcommand {name} not found in group {group}")]
    UnknownSubcommand { name: String, group: String },
}

fn option_label(long: &str, short: &Option<char>) -> String {
    match short {
        Some(c) => format!("--{long} (-{c})"),
        None => format!("--{long}"),
    }
}

pub(crate) type HelpFn = Arc<dyn Fn() -> String + Send + Sync>;

/// A parse failure bound to the command or group it happened in.
#[derive(Clone, Error)]
#[error("{kind}")]
pub struct ParseFailure {
    kind: ParseErrorKind,
    full_name: String,
    help: HelpFn,
}

impl ParseFailure {
    pub(crate) fn new(kind: ParseErrorKind, full_name: impl Into<String>, help: HelpFn) -> Self {
        Self {
            kind,
            full_name: full_name.into(),
            help,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Space-separated path of the command or group that rejected the input.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Help text of the command or group that rejected the input.
    pub fn help(&self) -> String {
        (self.help)()
    }

    /// Message followed by the contextual help, as a host would print it.
    pub fn report(&self) -> String {
        format!("error: {}\n\n{}", self.kind, self.help())
    }
}

impl fmt::Debug for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseFailure")
            .field("kind", &self.kind)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

/// Early exit from a run: a failure, or an explicit help/version request.
///
/// The engine never prints or exits; the entry point decides what each
/// signal means for the process.
#[derive(Debug, Clone, Error)]
pub enum Signal {
    #[error(transparent)]
    Failure(#[from] ParseFailure),
    #[error("help requested")]
    Help(String),
    #[error("version requested")]
    Version(Option<String>),
}
