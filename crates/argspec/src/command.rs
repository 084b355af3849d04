//! Single-command specifications and their runner.

use crate::error::{HelpFn, ParseErrorKind, ParseFailure, Signal, SpecError};
use crate::help;
use crate::invocation::{Invocation, Registered, Runner};
use crate::parsed::Parsed;
use crate::positional::PositionalResolver;
use crate::scan::{Cursor, OptionResolver, Token, classify};
use crate::spec::{
    ExtraSpec, HELP_LONG, OptionSpec, OptionTable, ParseFlags, PositionalSpec, VERSION_LONG,
};
use std::sync::Arc;

/// Declarative description of one command.
///
/// Builder calls consume the spec and return the extended one; clone first to
/// branch. Structural mistakes are reported by the call that makes them.
///
/// ```
/// use argspec::{CommandSpec, OptionSpec, PositionalSpec, ValueParser};
///
/// # fn main() -> Result<(), argspec::SpecError> {
/// let add = CommandSpec::new("Add two numbers")
///     .positional(PositionalSpec::new("a", "first").parser(ValueParser::integer()))?
///     .positional(PositionalSpec::new("b", "second").parser(ValueParser::integer()))?
///     .option(OptionSpec::flag("verbose", "Print the sum").short('v'))?
///     .build(|parsed, _| {
///         let a = parsed.positional("a").and_then(|v| v.as_i64()).unwrap_or(0);
///         let b = parsed.positional("b").and_then(|v| v.as_i64()).unwrap_or(0);
///         a + b
///     });
///
/// let args = vec!["2".to_string(), "3".to_string()];
/// assert_eq!(argspec::run(&add, &args, (), "add").ok(), Some(5));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    description: String,
    name: Option<String>,
    version: Option<String>,
    positionals: Vec<PositionalSpec>,
    extra: Option<ExtraSpec>,
    options: OptionTable,
    flags: ParseFlags,
}

impl CommandSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            name: None,
            version: None,
            positionals: Vec::new(),
            extra: None,
            options: OptionTable::default(),
            flags: ParseFlags::default(),
        }
    }

    /// Name shown in help and version text instead of the invoked name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replace all parse-mode flags at once.
    pub fn flags(mut self, flags: ParseFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn allow_option_after_positional(mut self) -> Self {
        self.flags.allow_option_after_positional = true;
        self
    }

    pub fn allow_duplicate_options(mut self) -> Self {
        self.flags.allow_duplicate_options = true;
        self
    }

    pub fn allow_single_dash_as_positional(mut self) -> Self {
        self.flags.allow_single_dash_as_positional = true;
        self
    }

    pub fn enable_help(mut self) -> Self {
        self.flags.enable_help = true;
        self
    }

    pub fn enable_version(mut self) -> Self {
        self.flags.enable_version = true;
        self
    }

    pub fn positional(mut self, positional: PositionalSpec) -> Result<Self, SpecError> {
        let name = positional.name().to_string();
        if self.positionals.iter().any(|p| p.name() == name) {
            return Err(SpecError::DuplicatePositional(name));
        }
        if positional.is_required() {
            if self.positionals.iter().any(|p| !p.is_required()) {
                return Err(SpecError::RequiredAfterOptional(name));
            }
        } else if self.extra.is_some() {
            return Err(SpecError::OptionalWithExtra(name));
        }
        self.positionals.push(positional);
        Ok(self)
    }

    pub fn option(mut self, option: OptionSpec) -> Result<Self, SpecError> {
        self.options.insert(option)?;
        Ok(self)
    }

    /// Declare the sink for positionals past the declared list.
    pub fn extra(mut self, extra: ExtraSpec) -> Result<Self, SpecError> {
        if self.extra.is_some() {
            return Err(SpecError::DuplicateExtra);
        }
        if self.positionals.iter().any(|p| !p.is_required()) {
            return Err(SpecError::ExtraAfterOptional);
        }
        self.extra = Some(extra);
        Ok(self)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parse_flags(&self) -> &ParseFlags {
        &self.flags
    }

    pub fn help(&self, name: &str, full_name: &str) -> String {
        let display = self.name.as_deref().unwrap_or(name);
        let mut out = help::header(display, self.version.as_deref(), &self.description);
        out.push_str("\n\n");
        out.push_str(&help::command_usage(
            full_name,
            &self.options,
            &self.positionals,
            self.extra.as_ref(),
        ));
        help::push_section(
            &mut out,
            "Positional parameters",
            &help::positional_rows(&self.positionals, self.extra.as_ref()),
        );
        help::push_section(&mut out, "Options", &help::option_rows(&self.options));
        out
    }

    pub fn version_text(&self, name: &str) -> Option<String> {
        let display = self.name.as_deref().unwrap_or(name);
        help::version_text(display, self.version.as_deref())
    }

    /// Attach the action and freeze the spec.
    pub fn build<C, T, F>(mut self, action: F) -> Registered<C, T>
    where
        C: 'static,
        T: 'static,
        F: Fn(Parsed, Invocation<C, T>) -> T + Send + Sync + 'static,
    {
        let builtin_help = self.flags.enable_help && !self.options.contains_long(HELP_LONG);
        let builtin_version =
            self.flags.enable_version && !self.options.contains_long(VERSION_LONG);
        self.options = self.options.with_builtins(&self.flags);

        Registered::new(Arc::new(CommandRunner {
            spec: Arc::new(self),
            builtin_help,
            builtin_version,
            action: Box::new(action),
        }))
    }
}

type Action<C, T> = Box<dyn Fn(Parsed, Invocation<C, T>) -> T + Send + Sync>;

struct CommandRunner<C, T> {
    spec: Arc<CommandSpec>,
    builtin_help: bool,
    builtin_version: bool,
    action: Action<C, T>,
}

impl<C, T> CommandRunner<C, T> {
    fn scan(
        &self,
        args: &[String],
        options: &mut OptionResolver<'_>,
        positionals: &mut PositionalResolver<'_>,
    ) -> Result<(), ParseErrorKind> {
        let flags = &self.spec.flags;
        let mut cursor = Cursor::new(args);
        let mut accepting_options = true;

        while let Some(arg) = cursor.next() {
            tracing::trace!(token = arg, accepting_options, "scanning token");
            match classify(arg, accepting_options) {
                Token::Separator => accepting_options = false,
                Token::Dash if !flags.allow_single_dash_as_positional => {
                    return Err(ParseErrorKind::SingleDash);
                }
                Token::Dash | Token::Value(_) => {
                    positionals.push(arg)?;
                    if !flags.allow_option_after_positional {
                        accepting_options = false;
                    }
                }
                Token::Long { name, value } => options.long(name, value, &mut cursor)?,
                Token::Shorts(cluster) => options.shorts(cluster, &mut cursor)?,
            }
        }
        Ok(())
    }

    fn failure(&self, kind: ParseErrorKind, name: &str, full_name: &str) -> Signal {
        tracing::debug!(command = full_name, error = %kind, "parse failed");
        let spec = Arc::clone(&self.spec);
        let (name_owned, full_owned) = (name.to_string(), full_name.to_string());
        let help: HelpFn = Arc::new(move || spec.help(&name_owned, &full_owned));
        Signal::Failure(ParseFailure::new(kind, full_name, help))
    }
}

impl<C, T> Runner<C, T> for CommandRunner<C, T> {
    fn run(
        &self,
        this: &Registered<C, T>,
        args: &[String],
        context: C,
        name: &str,
        full_name: &str,
    ) -> Result<T, Signal> {
        let spec = &self.spec;
        let mut options = OptionResolver::new(&spec.options, spec.flags.allow_duplicate_options);
        let mut positionals = PositionalResolver::new(&spec.positionals, spec.extra.as_ref());
        let scanned = self.scan(args, &mut options, &mut positionals);

        // A help or version request wins over anything wrong with the rest.
        if self.builtin_help && options.is_present(HELP_LONG) {
            return Err(Signal::Help(spec.help(name, full_name)));
        }
        if self.builtin_version && options.is_present(VERSION_LONG) {
            return Err(Signal::Version(spec.version_text(name)));
        }

        let (values, extra) = scanned
            .and_then(|()| positionals.finish())
            .map_err(|kind| self.failure(kind, name, full_name))?;
        let parsed = Parsed::new(values, extra, options.into_values());

        tracing::debug!(command = full_name, "invoking action");
        let invocation = Invocation::new(name, full_name, args, context, this);
        Ok((self.action)(parsed, invocation))
    }

    fn help(&self, name: &str, full_name: &str) -> String {
        self.spec.help(name, full_name)
    }

    fn version(&self, name: &str) -> Option<String> {
        self.spec.version_text(name)
    }

    fn description(&self) -> &str {
        &self.spec.description
    }
}
