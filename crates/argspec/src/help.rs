//! Help and version text.
//!
//! Everything here is a pure function of a command or group definition.

use crate::spec::{ExtraSpec, OptionSpec, OptionTable, PositionalSpec};

/// `"<name> version <version>"`, only when a version was registered.
pub(crate) fn version_text(display_name: &str, version: Option<&str>) -> Option<String> {
    version.map(|v| format!("{display_name} version {v}"))
}

pub(crate) fn header(display_name: &str, version: Option<&str>, description: &str) -> String {
    let mut out = version_text(display_name, version).unwrap_or_else(|| display_name.to_string());
    if !description.trim().is_empty() {
        out.push_str("\n\n");
        out.push_str(description.trim());
    }
    out
}

fn positional_label(positional: &PositionalSpec) -> String {
    if positional.is_required() {
        format!("<{}>", positional.name())
    } else {
        format!("[{}]", positional.name())
    }
}

fn extra_label(extra: &ExtraSpec) -> String {
    format!("[...{}]", extra.name())
}

/// Usage line for a single command.
pub(crate) fn command_usage(
    full_name: &str,
    options: &OptionTable,
    positionals: &[PositionalSpec],
    extra: Option<&ExtraSpec>,
) -> String {
    let mut out = format!("Usage: {full_name}");
    if !options.is_empty() {
        out.push_str(" [options]");
    }
    for positional in positionals {
        out.push(' ');
        out.push_str(&positional_label(positional));
    }
    if let Some(extra) = extra {
        out.push(' ');
        out.push_str(&extra_label(extra));
    }
    out
}

/// Usage line for a group.
pub(crate) fn group_usage(full_name: &str, options: &OptionTable) -> String {
    if options.is_empty() {
        format!("Usage: {full_name} <command> [...args]")
    } else {
        format!("Usage: {full_name} [options] <command> [...args]")
    }
}

pub(crate) fn positional_rows(
    positionals: &[PositionalSpec],
    extra: Option<&ExtraSpec>,
) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = positionals
        .iter()
        .map(|p| (positional_label(p), p.description().trim().to_string()))
        .collect();
    if let Some(extra) = extra {
        rows.push((extra_label(extra), extra.description().trim().to_string()));
    }
    rows
}

fn option_left(option: &OptionSpec) -> String {
    let mut out = match option.short_name() {
        Some(c) => format!("-{c}, --{}", option.long_name()),
        None => format!("    --{}", option.long_name()),
    };
    if option.kind().takes_value() {
        out.push_str(" <value>");
    }
    out
}

/// Option rows, sorted by long name.
pub(crate) fn option_rows(options: &OptionTable) -> Vec<(String, String)> {
    let mut sorted: Vec<&OptionSpec> = options.iter().collect();
    sorted.sort_by(|a, b| a.long_name().cmp(b.long_name()));
    sorted
        .into_iter()
        .map(|o| (option_left(o), o.description().trim().to_string()))
        .collect()
}

/// Append a titled block whose descriptions start two columns past the
/// longest label.
pub(crate) fn push_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    out.push_str("\n\n");
    out.push_str(title);
    out.push(':');
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, help) in rows {
        out.push('\n');
        if help.is_empty() {
            out.push_str(&format!("  {left}"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}"));
        }
    }
}
