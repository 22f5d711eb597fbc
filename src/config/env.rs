//! Environment variable reader.

use std::collections::HashMap;

/// Normalise a prefix into the form used for variable names: `tgs_api`
/// becomes `TGS_API`. Only the case changes.
pub fn env_prefix(prefix: &str) -> String {
    prefix.to_uppercase()
}

/// Collect every `<PREFIX>_*` variable from `environ`.
///
/// The prefix and its underscore are stripped; the rest is lower-cased with
/// underscores removed so it matches canonical field names
/// (`APP_WEB_PORT` becomes `webport`). An empty prefix takes every variable
/// as-is. Variables outside the prefix are dropped.
pub fn parse_env_args<I, K, V>(environ: I, prefix: &str) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let namespace = match env_prefix(prefix) {
        p if p.is_empty() => String::new(),
        p => format!("{}_", p),
    };

    environ
        .into_iter()
        .filter_map(|(name, value)| {
            let rest = name.as_ref().strip_prefix(namespace.as_str())?;
            let key = rest.to_lowercase().replace('_', "");
            if key.is_empty() {
                return None;
            }
            Some((key, value.into()))
        })
        .collect()
}
