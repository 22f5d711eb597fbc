//! Command-line argument reader.
//!
//! Only long-form `--name=value` (or `-name=value`) tokens are understood.
//! Anything that does not start with a dash is ignored, and a flag without
//! `=` carries an empty value rather than an implied `true`.

use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;

/// Outcome of reading the argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedArgs {
    /// Normalised flag name to raw value.
    Flags(HashMap<String, String>),
    /// `--help` or `-h` was present; no values were collected.
    HelpRequested,
}

/// Read flags from `args` (program name already removed).
///
/// Flag names are lower-cased and stripped of every `-`, so `--Web-Port=80`
/// and `--webport=80` both land under `webport`. When a flag repeats, the
/// last occurrence wins.
pub fn parse_os_args<I, S>(args: I) -> ConfigResult<ParsedArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = HashMap::new();

    for arg in args {
        let s = arg.as_ref();
        if s.len() < 2 || !s.starts_with('-') {
            continue;
        }

        let dashes = if s.starts_with("--") { 2 } else { 1 };
        if s == "--" {
            continue;
        }

        let body = &s[dashes..];
        if body.is_empty() || body.starts_with(['-', '=']) {
            return Err(ConfigError::FlagSyntax(s.to_string()));
        }

        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, value),
            None => (body, ""),
        };
        let name = name.to_lowercase();

        if name == "help" || name == "h" {
            return Ok(ParsedArgs::HelpRequested);
        }

        flags.insert(name.replace('-', ""), value.to_string());
    }

    Ok(ParsedArgs::Flags(flags))
}
