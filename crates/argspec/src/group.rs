//! Command groups: own options, then dispatch to a named subcommand.

use crate::error::{HelpFn, ParseErrorKind, ParseFailure, Signal, SpecError};
use crate::help;
use crate::invocation::{Invocation, Registered, Runner};
use crate::parsed::Parsed;
use crate::scan::{Cursor, OptionResolver, Token, classify};
use crate::spec::{HELP_LONG, OptionSpec, OptionTable, ParseFlags, VERSION_LONG};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Declarative description of a command group.
///
/// `C` is the context handed to every subcommand and `T` their shared result.
/// The group itself is built with a mapper that derives `C` from the caller's
/// outer context and the group-level options.
pub struct GroupSpec<C, T> {
    description: String,
    name: Option<String>,
    version: Option<String>,
    commands: IndexMap<String, Registered<C, T>>,
    options: OptionTable,
    flags: ParseFlags,
}

impl<C, T> GroupSpec<C, T> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            name: None,
            version: None,
            commands: IndexMap::new(),
            options: OptionTable::default(),
            flags: ParseFlags::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replace all parse-mode flags at once.
    ///
    /// `allow_option_after_positional` has no effect on a group: its scan
    /// always ends at the subcommand name.
    pub fn flags(mut self, flags: ParseFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn allow_duplicate_options(mut self) -> Self {
        self.flags.allow_duplicate_options = true;
        self
    }

    /// Accept a lone `-` as the subcommand name.
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

    /// Register a built command or group under `name`.
    ///
    /// The same built value may be registered under several names. A lone
    /// `-` is a valid name, reachable with `allow_single_dash_as_positional`
    /// or after `--`.
    pub fn command(
        mut self,
        name: impl Into<String>,
        command: Registered<C, T>,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        if name.is_empty() || (name.starts_with('-') && name != "-") {
            return Err(SpecError::InvalidCommandName(name));
        }
        if self.commands.contains_key(&name) {
            return Err(SpecError::DuplicateCommand(name));
        }
        self.commands.insert(name, command);
        Ok(self)
    }

    pub fn option(mut self, option: OptionSpec) -> Result<Self, SpecError> {
        self.options.insert(option)?;
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
        out.push_str(&help::group_usage(full_name, &self.options));
        let rows: Vec<(String, String)> = self
            .commands
            .iter()
            .map(|(name, command)| (name.clone(), command.description().trim().to_string()))
            .collect();
        help::push_section(&mut out, "Commands", &rows);
        help::push_section(&mut out, "Options", &help::option_rows(&self.options));
        out
    }

    pub fn version_text(&self, name: &str) -> Option<String> {
        let display = self.name.as_deref().unwrap_or(name);
        help::version_text(display, self.version.as_deref())
    }

    /// Attach the context mapper and freeze the group.
    ///
    /// `map_context` receives the group-level option values and the group's
    /// invocation (whose `args` are the tokens forwarded to the subcommand)
    /// and returns the context for the subcommand.
    pub fn build<O, F>(mut self, map_context: F) -> Registered<O, T>
    where
        O: 'static,
        C: 'static,
        T: 'static,
        F: Fn(Parsed, Invocation<O, T>) -> C + Send + Sync + 'static,
    {
        let builtin_help = self.flags.enable_help && !self.options.contains_long(HELP_LONG);
        let builtin_version =
            self.flags.enable_version && !self.options.contains_long(VERSION_LONG);
        self.options = self.options.with_builtins(&self.flags);

        Registered::new(Arc::new(GroupRunner {
            spec: Arc::new(self),
            builtin_help,
            builtin_version,
            map_context: Box::new(map_context),
        }))
    }
}

impl<C, T> Clone for GroupSpec<C, T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            commands: self.commands.clone(),
            options: self.options.clone(),
            flags: self.flags,
        }
    }
}

impl<C, T> fmt::Debug for GroupSpec<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSpec")
            .field("description", &self.description)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .field("flags", &self.flags)
            .finish()
    }
}

type ContextMapper<O, C, T> = Box<dyn Fn(Parsed, Invocation<O, T>) -> C + Send + Sync>;

struct GroupRunner<O, C, T> {
    spec: Arc<GroupSpec<C, T>>,
    builtin_help: bool,
    builtin_version: bool,
    map_context: ContextMapper<O, C, T>,
}

impl<O, C, T> GroupRunner<O, C, T>
where
    C: 'static,
    T: 'static,
{
    /// Consume group options up to the subcommand name.
    ///
    /// Returns the name and the tokens after it, or `None` if the vector ran out.
    fn scan<'a>(
        &self,
        args: &'a [String],
        options: &mut OptionResolver<'_>,
    ) -> Result<Option<(&'a str, &'a [String])>, ParseErrorKind> {
        let mut cursor = Cursor::new(args);
        while let Some(arg) = cursor.next() {
            tracing::trace!(token = arg, "scanning group token");
            match classify(arg, true) {
                Token::Separator => {
                    return Ok(cursor.next().map(|name| (name, cursor.remaining())));
                }
                Token::Dash if !self.spec.flags.allow_single_dash_as_positional => {
                    return Err(ParseErrorKind::SingleDash);
                }
                Token::Dash | Token::Value(_) => return Ok(Some((arg, cursor.remaining()))),
                Token::Long { name, value } => options.long(name, value, &mut cursor)?,
                Token::Shorts(cluster) => options.shorts(cluster, &mut cursor)?,
            }
        }
        Ok(None)
    }

    fn failure(&self, kind: ParseErrorKind, name: &str, full_name: &str) -> Signal {
        tracing::debug!(group = full_name, error = %kind, "parse failed");
        let spec = Arc::clone(&self.spec);
        let (name_owned, full_owned) = (name.to_string(), full_name.to_string());
        let help: HelpFn = Arc::new(move || spec.help(&name_owned, &full_owned));
        Signal::Failure(ParseFailure::new(kind, full_name, help))
    }
}

impl<O, C, T> Runner<O, T> for GroupRunner<O, C, T>
where
    C: 'static,
    T: 'static,
{
    fn run(
        &self,
        this: &Registered<O, T>,
        args: &[String],
        context: O,
        name: &str,
        full_name: &str,
    ) -> Result<T, Signal> {
        let spec = &self.spec;
        let mut options = OptionResolver::new(&spec.options, spec.flags.allow_duplicate_options);
        let scanned = self.scan(args, &mut options);

        if self.builtin_help && options.is_present(HELP_LONG) {
            return Err(Signal::Help(spec.help(name, full_name)));
        }
        if self.builtin_version && options.is_present(VERSION_LONG) {
            return Err(Signal::Version(spec.version_text(name)));
        }

        let (subcommand, rest) = scanned
            .map_err(|kind| self.failure(kind, name, full_name))?
            .ok_or_else(|| {
                self.failure(
                    ParseErrorKind::NoSubcommand(full_name.to_string()),
                    name,
                    full_name,
                )
            })?;
        let command = spec.commands.get(subcommand).ok_or_else(|| {
            self.failure(
                ParseErrorKind::UnknownSubcommand {
                    name: subcommand.to_string(),
                    group: full_name.to_string(),
                },
                name,
                full_name,
            )
        })?;

        let parsed = Parsed::new(IndexMap::new(), Vec::new(), options.into_values());
        let invocation = Invocation::new(name, full_name, rest, context, this);
        let inner = (self.map_context)(parsed, invocation);

        let sub_full_name = format!("{full_name} {subcommand}");
        tracing::debug!(group = full_name, subcommand, "dispatching");
        command.run(rest, inner, subcommand, &sub_full_name)
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
