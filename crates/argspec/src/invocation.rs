use crate::error::Signal;
use std::fmt;
use std::sync::Arc;

/// Entry point shared by built commands and groups.
pub(crate) trait Runner<C, T>: Send + Sync {
    fn run(
        &self,
        this: &Registered<C, T>,
        args: &[String],
        context: C,
        name: &str,
        full_name: &str,
    ) -> Result<T, Signal>;

    fn help(&self, name: &str, full_name: &str) -> String;

    fn version(&self, name: &str) -> Option<String>;

    fn description(&self) -> &str;
}

/// A built command or group, ready to run any number of times.
///
/// `C` is the context the caller supplies; `T` is what the action returns.
pub struct Registered<C, T> {
    runner: Arc<dyn Runner<C, T>>,
}

impl<C, T> Registered<C, T> {
    pub(crate) fn new(runner: Arc<dyn Runner<C, T>>) -> Self {
        Self { runner }
    }

    /// Parse `args` and run the action.
    ///
    /// `name` is the last path segment, `full_name` the space-separated path
    /// used in usage lines.
    pub fn run(&self, args: &[String], context: C, name: &str, full_name: &str) -> Result<T, Signal> {
        self.runner.run(self, args, context, name, full_name)
    }

    pub fn help(&self, name: &str, full_name: &str) -> String {
        self.runner.help(name, full_name)
    }

    pub fn version(&self, name: &str) -> Option<String> {
        self.runner.version(name)
    }

    /// Listed next to the subcommand name in a parent group's help.
    pub fn description(&self) -> &str {
        self.runner.description()
    }
}

impl<C, T> Clone for Registered<C, T> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<C, T> fmt::Debug for Registered<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registered")
            .field("description", &self.description())
            .finish_non_exhaustive()
    }
}

/// What an action (or a group's context mapper) learns about its invocation.
pub struct Invocation<C, T> {
    pub name: String,
    pub full_name: String,
    /// For a command, the tokens it was given. For a group, the tokens
    /// forwarded to the subcommand.
    pub args: Vec<String>,
    pub context: C,
    command: Registered<C, T>,
}

impl<C, T> Invocation<C, T> {
    pub(crate) fn new(
        name: &str,
        full_name: &str,
        args: &[String],
        context: C,
        command: &Registered<C, T>,
    ) -> Self {
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            args: args.to_vec(),
            context,
            command: command.clone(),
        }
    }

    pub fn help(&self) -> String {
        self.command.help(&self.name, &self.full_name)
    }

    pub fn version(&self) -> Option<String> {
        self.command.version(&self.name)
    }

    /// Run the same command again under the same names.
    pub fn rerun(&self, args: &[String], context: C) -> Result<T, Signal> {
        self.command.run(args, context, &self.name, &self.full_name)
    }
}

impl<C: fmt::Debug, T> fmt::Debug for Invocation<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("name", &self.name)
            .field("full_name", &self.full_name)
            .field("args", &self.args)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
