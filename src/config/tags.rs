//! Field tag grammar.
//!
//! A tag is a comma-separated list of tokens. Each token is either a bare
//! keyword (`required`, `noPrint`, `mask`) or a `key:value` pair (`default`,
//! `env`, `flag`, `help`, `short`, `secret`). Unknown keywords and keys are
//! ignored so that tags written for newer versions still parse.

/// Options attached to a single field by its tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// The field must end up with a non-empty value.
    pub required: bool,
    /// Lowest-precedence value, used when no other source supplies one.
    pub default_val: String,
    /// Replacement for the env key fragments (prefix still applies).
    pub env_name: String,
    /// Replacement for the flag key fragments.
    pub flag_name: String,
    /// One-letter alias for the long flag.
    pub short_flag_name: Option<char>,
    /// Description shown in the usage text.
    pub help: String,
    /// Keep the field out of rendered output.
    pub no_print: bool,
    /// Hide the value when rendered.
    pub mask: bool,
    /// Key looked up by secret-store providers.
    pub secret_name: String,
}

/// Parse a tag string into [`FieldOptions`].
///
/// Returns a human-readable reason on failure; the caller attaches the field
/// name.
pub fn parse_tag(tag: &str) -> Result<FieldOptions, String> {
    let mut opts = FieldOptions::default();
    if tag.is_empty() {
        return Ok(opts);
    }

    for part in tag.split(',') {
        match part.split_once(':') {
            None => match part.trim() {
                "required" => opts.required = true,
                "noPrint" => opts.no_print = true,
                "mask" => opts.mask = true,
                _ => {}
            },
            Some((key, value)) => {
                let key = key.trim();
                let value = value.trim();
                if value.is_empty() {
                    return Err(format!("tag {:?} missing a value", key));
                }
                match key {
                    "default" => opts.default_val = value.to_string(),
                    "env" => opts.env_name = value.to_string(),
                    "flag" => opts.flag_name = value.to_string(),
                    "help" => opts.help = value.to_string(),
                    "secret" => opts.secret_name = value.to_string(),
                    "short" => {
                        let mut chars = value.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => opts.short_flag_name = Some(c),
                            _ => {
                                return Err(format!(
                                    "short value must be a single character, got {:?}",
                                    value
                                ));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(opts)
}
