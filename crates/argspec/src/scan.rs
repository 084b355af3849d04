//! Token classification and option resolution.
//!
//! Shared by the command and group runners; a group simply stops at the first
//! token that is not an option.

use crate::error::ParseErrorKind;
use crate::parsed::OptionValue;
use crate::spec::{OptionKind, OptionSpec, OptionTable};
use indexmap::IndexMap;

/// One raw argument, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `--`
    Separator,
    /// A lone `-`.
    Dash,
    /// `--name` or `--name=value`.
    Long {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// `-abc`, without the leading dash.
    Shorts(&'a str),
    Value(&'a str),
}

/// Classify `arg`. Once options are no longer accepted everything is a value.
pub(crate) fn classify(arg: &str, accepting_options: bool) -> Token<'_> {
    if !accepting_options {
        return Token::Value(arg);
    }
    if arg == "--" {
        return Token::Separator;
    }
    if arg == "-" {
        return Token::Dash;
    }
    if let Some(rest) = arg.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, value)) => Token::Long {
                name,
                value: Some(value),
            },
            None => Token::Long {
                name: rest,
                value: None,
            },
        };
    }
    if let Some(cluster) = arg.strip_prefix('-') {
        return Token::Shorts(cluster);
    }
    Token::Value(arg)
}

/// Left-to-right position in the argument vector.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }

    /// Tokens not consumed yet.
    pub(crate) fn remaining(&self) -> &'a [String] {
        &self.args[self.pos..]
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let arg = self.args.get(self.pos)?;
        self.pos += 1;
        Some(arg.as_str())
    }
}

/// Accumulates option values against one option table.
#[derive(Debug)]
pub(crate) struct OptionResolver<'s> {
    table: &'s OptionTable,
    allow_duplicates: bool,
    values: IndexMap<String, OptionValue>,
}

impl<'s> OptionResolver<'s> {
    pub(crate) fn new(table: &'s OptionTable, allow_duplicates: bool) -> Self {
        Self {
            table,
            allow_duplicates,
            values: IndexMap::new(),
        }
    }

    /// Resolve `--name[=value]`, taking the next token as the value if needed.
    pub(crate) fn long(
        &mut self,
        name: &str,
        inline: Option<&str>,
        cursor: &mut Cursor<'_>,
    ) -> Result<(), ParseErrorKind> {
        let table = self.table;
        let option = table
            .get(name)
            .ok_or_else(|| ParseErrorKind::UnknownOption(name.to_string()))?;

        if !option.kind().takes_value() {
            if inline.is_some() {
                return Err(ParseErrorKind::UnexpectedValue(name.to_string()));
            }
            return self.set_flag(option);
        }

        let raw = match inline {
            Some(value) => value,
            None => cursor.next().ok_or_else(|| missing_value(option))?,
        };
        self.set_value(option, raw)
    }

    /// Resolve a short cluster such as `-vf` or `-Cdir`.
    ///
    /// A value-taking letter swallows the rest of the cluster as its value,
    /// or the next token when it is the last letter.
    pub(crate) fn shorts(
        &mut self,
        cluster: &str,
        cursor: &mut Cursor<'_>,
    ) -> Result<(), ParseErrorKind> {
        let table = self.table;
        for (idx, letter) in cluster.char_indices() {
            let option = table
                .by_short(letter)
                .ok_or(ParseErrorKind::UnknownShortOption(letter))?;

            if !option.kind().takes_value() {
                self.set_flag(option)?;
                continue;
            }

            let rest = &cluster[idx + letter.len_utf8()..];
            let raw = if rest.is_empty() {
                cursor.next().ok_or_else(|| missing_value(option))?
            } else {
                rest
            };
            return self.set_value(option, raw);
        }
        Ok(())
    }

    pub(crate) fn is_present(&self, long: &str) -> bool {
        self.values.contains_key(long)
    }

    pub(crate) fn into_values(self) -> IndexMap<String, OptionValue> {
        self.values
    }

    fn set_flag(&mut self, option: &OptionSpec) -> Result<(), ParseErrorKind> {
        if self.is_present(option.long_name()) && !self.allow_duplicates {
            return Err(duplicate(option));
        }
        self.values
            .insert(option.long_name().to_string(), OptionValue::Flag);
        Ok(())
    }

    fn set_value(&mut self, option: &OptionSpec, raw: &str) -> Result<(), ParseErrorKind> {
        let value = option
            .convert(raw)
            .map_err(|reason| ParseErrorKind::InvalidValue {
                target: format!("--{}", option.long_name()),
                value: raw.to_string(),
                reason,
            })?;

        match option.kind() {
            OptionKind::List => {
                let entry = self
                    .values
                    .entry(option.long_name().to_string())
                    .or_insert_with(|| OptionValue::List(Vec::new()));
                if let OptionValue::List(values) = entry {
                    values.push(value);
                }
            }
            _ => {
                if self.is_present(option.long_name()) && !self.allow_duplicates {
                    return Err(duplicate(option));
                }
                self.values
                    .insert(option.long_name().to_string(), OptionValue::Scalar(value));
            }
        }
        Ok(())
    }
}

fn missing_value(option: &OptionSpec) -> ParseErrorKind {
    ParseErrorKind::MissingValue {
        long: option.long_name().to_string(),
        short: option.short_name(),
    }
}

fn duplicate(option: &OptionSpec) -> ParseErrorKind {
    ParseErrorKind::Duplicate {
        long: option.long_name().to_string(),
        short: option.short_name(),
    }
}
