//! Specification records shared by commands and groups.

use crate::error::SpecError;
use crate::value::ValueParser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub(crate) const HELP_LONG: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const VERSION_LONG: &str = "version";
pub(crate) const VERSION_SHORT: char = 'V';

/// Option cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// Present or absent; never takes a value.
    Boolean,
    /// One value. Repeats fail unless duplicates are allowed, then the last wins.
    Scalar,
    /// Every occurrence appends a value.
    List,
}

impl OptionKind {
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

/// A named option (`--long`, optionally `-s`).
#[derive(Debug, Clone)]
pub struct OptionSpec {
    long: String,
    short: Option<char>,
    kind: OptionKind,
    parser: Option<ValueParser>,
    description: String,
}

impl OptionSpec {
    fn new(kind: OptionKind, long: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            kind,
            parser: None,
            description: description.into(),
        }
    }

    /// Boolean option: `--long`.
    pub fn flag(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::Boolean, long, description)
    }

    /// Single-valued option: `--long value` or `--long=value`.
    pub fn scalar(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::Scalar, long, description)
    }

    /// Accumulating option; each occurrence appends.
    pub fn list(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::List, long, description)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Conversion for scalar and list options. Rejected for boolean options.
    pub fn parser(mut self, parser: ValueParser) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn long_name(&self) -> &str {
        &self.long
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn convert(&self, raw: &str) -> Result<crate::Value, String> {
        match &self.parser {
            Some(p) => p.parse(raw),
            None => ValueParser::string().parse(raw),
        }
    }
}

/// A positional parameter, matched by position.
#[derive(Debug, Clone)]
pub struct PositionalSpec {
    name: String,
    description: String,
    parser: ValueParser,
    required: bool,
}

impl PositionalSpec {
    /// A required string positional.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parser: ValueParser::string(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn parser(mut self, parser: ValueParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn value_parser(&self) -> &ValueParser {
        &self.parser
    }
}

/// The variadic sink collecting positionals past the declared list.
#[derive(Debug, Clone)]
pub struct ExtraSpec {
    name: String,
    description: String,
    parser: ValueParser,
}

impl ExtraSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parser: ValueParser::string(),
        }
    }

    pub fn parser(mut self, parser: ValueParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn value_parser(&self) -> &ValueParser {
        &self.parser
    }
}

/// Parse-mode policy shared by commands and groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParseFlags {
    /// Keep recognizing options after the first positional.
    pub allow_option_after_positional: bool,
    /// Repeated boolean/scalar options are accepted instead of rejected.
    pub allow_duplicate_options: bool,
    /// A lone `-` is a positional value (commonly stdin) instead of an error.
    pub allow_single_dash_as_positional: bool,
    /// Register `-h/--help` and answer it with a help request.
    pub enable_help: bool,
    /// Register `-V/--version` and answer it with a version request.
    pub enable_version: bool,
}

/// Options by long name (declaration order) plus the short-alias table.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionTable {
    by_long: IndexMap<String, OptionSpec>,
    by_short: HashMap<char, String>,
}

impl OptionTable {
    pub(crate) fn insert(&mut self, option: OptionSpec) -> Result<(), SpecError> {
        if let Some(short) = option.short {
            if !is_short_allowed(short) {
                return Err(SpecError::InvalidShort(short));
            }
            if self.by_short.contains_key(&short) {
                return Err(SpecError::DuplicateShort(short));
            }
        }
        if option.long.is_empty() {
            return Err(SpecError::EmptyLong);
        }
        if !option.long.chars().all(is_long_allowed) {
            return Err(SpecError::InvalidLong(option.long));
        }
        if self.by_long.contains_key(&option.long) {
            return Err(SpecError::DuplicateLong(option.long));
        }
        if option.kind == OptionKind::Boolean && option.parser.is_some() {
            return Err(SpecError::BooleanParser(option.long));
        }
        self.push(option);
        Ok(())
    }

    fn push(&mut self, option: OptionSpec) {
        if let Some(short) = option.short {
            self.by_short.insert(short, option.long.clone());
        }
        self.by_long.insert(option.long.clone(), option);
    }

    pub(crate) fn get(&self, long: &str) -> Option<&OptionSpec> {
        self.by_long.get(long)
    }

    pub(crate) fn by_short(&self, short: char) -> Option<&OptionSpec> {
        self.by_short.get(&short).and_then(|long| self.by_long.get(long))
    }

    pub(crate) fn contains_long(&self, long: &str) -> bool {
        self.by_long.contains_key(long)
    }

    pub(crate) fn contains_short(&self, short: char) -> bool {
        self.by_short.contains_key(&short)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.by_long.values()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_long.is_empty()
    }

    /// Copy with the built-in help/version flags added where `flags` asks for
    /// them and the caller has not claimed the names already.
    pub(crate) fn with_builtins(&self, flags: &ParseFlags) -> OptionTable {
        let mut table = self.clone();
        if flags.enable_help {
            table.insert_builtin(HELP_LONG, HELP_SHORT, "Show help information");
        }
        if flags.enable_version {
            table.insert_builtin(VERSION_LONG, VERSION_SHORT, "Show version information");
        }
        table
    }

    fn insert_builtin(&mut self, long: &str, short: char, description: &str) {
        if self.contains_long(long) {
            return;
        }
        let mut option = OptionSpec::flag(long, description);
        if !self.contains_short(short) {
            option = option.short(short);
        }
        self.push(option);
    }
}

fn is_short_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_long_allowed(c: char) -> bool {
    is_short_allowed(c) || c == '-'
}

#[cfg(test)]
mod tests {
    use super::{OptionSpec, OptionTable, ParseFlags};
    use crate::error::SpecError;
    use crate::value::ValueParser;

    #[test]
    fn rejects_bad_and_duplicate_names() {
        let mut table = OptionTable::default();
        table
            .insert(OptionSpec::flag("force", "").short('f'))
            .unwrap();

        assert_eq!(
            table.insert(OptionSpec::flag("other", "").short('f')),
            Err(SpecError::DuplicateShort('f'))
        );
        assert_eq!(
            table.insert(OptionSpec::flag("force", "")),
            Err(SpecError::DuplicateLong("force".to_string()))
        );
        assert_eq!(
            table.insert(OptionSpec::flag("", "")),
            Err(SpecError::EmptyLong)
        );
        assert_eq!(
            table.insert(OptionSpec::flag("dry run", "")),
            Err(SpecError::InvalidLong("dry run".to_string()))
        );
        assert_eq!(
            table.insert(OptionSpec::flag("x", "").short('-')),
            Err(SpecError::InvalidShort('-'))
        );
        assert_eq!(
            table.insert(OptionSpec::flag("quiet", "").parser(ValueParser::integer())),
            Err(SpecError::BooleanParser("quiet".to_string()))
        );
    }

    #[test]
    fn builtins_respect_caller_names() {
        let mut table = OptionTable::default();
        table
            .insert(OptionSpec::scalar("host", "").short('h'))
            .unwrap();
        let flags = ParseFlags {
            enable_help: true,
            enable_version: true,
            ..Default::default()
        };
        let table = table.with_builtins(&flags);

        let help = table.get("help").unwrap();
        assert_eq!(help.short_name(), None);
        assert_eq!(table.by_short('h').unwrap().long_name(), "host");
        assert_eq!(table.by_short('V').unwrap().long_name(), "version");
    }

    #[test]
    fn flags_deserialize_with_defaults() {
        let flags: ParseFlags =
            serde_json::from_str(r#"{"allow-duplicate-options": true}"#).unwrap();
        assert!(flags.allow_duplicate_options);
        assert!(!flags.enable_help);
    }
}
