//! Field extraction.
//!
//! A configuration struct describes itself by implementing [`Configure`]:
//! it hands every member to a [`FieldSet`], in declaration order, together
//! with a tag string. The set flattens nested and embedded structs into a
//! list of leaf [`Field`]s, each holding a live `&mut` into the struct, so
//! resolution writes straight into the caller's value.

use super::tags::{FieldOptions, parse_tag};
use super::values::{FieldKind, FieldValue};
use crate::error::{ConfigError, ConfigResult};
use heck::ToSnakeCase;
use std::collections::HashSet;

/// Implemented by every struct the engine can populate.
pub trait Configure {
    /// Register each member with `fields`, in declaration order.
    fn configure<'a>(&'a mut self, fields: &mut FieldSet<'a>) -> ConfigResult<()>;
}

/// A leaf configuration slot.
pub struct Field<'a> {
    name: String,
    flag_key: Vec<String>,
    env_key: Vec<String>,
    options: FieldOptions,
    value: &'a mut dyn FieldValue,
}

impl<'a> Field<'a> {
    /// Canonical lookup name: every key fragment from the root, lower-cased
    /// and concatenated (`web.read_timeout` is `webreadtimeout`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flag_key(&self) -> &[String] {
        &self.flag_key
    }

    pub fn env_key(&self) -> &[String] {
        &self.env_key
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// Long flag as typed on the command line, without dashes: `web-read-timeout`.
    pub fn flag_name(&self) -> String {
        self.flag_key.join("-").to_lowercase()
    }

    /// Environment variable name under `prefix`: `APP_WEB_READ_TIMEOUT`.
    pub fn env_var(&self, prefix: &str) -> String {
        let key = self.env_key.join("_").to_uppercase();
        if prefix.is_empty() {
            key
        } else {
            format!("{}_{}", prefix, key)
        }
    }

    /// Key under which the argument reader files this field's long flag.
    pub fn flag_lookup_key(&self) -> String {
        self.flag_key.concat().to_lowercase().replace('-', "")
    }

    /// Key under which the environment reader files this field's variable.
    pub fn env_lookup_key(&self) -> String {
        self.env_key.concat().to_lowercase().replace('_', "")
    }

    /// Key under which the argument reader files the short alias, if any.
    pub fn short_lookup_key(&self) -> Option<String> {
        self.options
            .short_flag_name
            .map(|c| c.to_lowercase().collect())
    }

    /// Coerce `raw` and write it into the struct.
    pub fn set(&mut self, raw: &str) -> ConfigResult<()> {
        self.value
            .assign(raw)
            .map_err(|reason| ConfigError::coercion(&self.name, raw, reason))
    }

    /// Current value, rendered the way `set` accepts it.
    pub fn current(&self) -> String {
        self.value.render()
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("flag_key", &self.flag_key)
            .field("env_key", &self.env_key)
            .field("kind", &self.kind())
            .field("options", &self.options)
            .finish()
    }
}

/// Collects the leaf fields of a struct while it describes itself.
pub struct FieldSet<'a> {
    prefix: Vec<String>,
    fields: Vec<Field<'a>>,
}

impl<'a> FieldSet<'a> {
    fn new() -> Self {
        Self {
            prefix: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Register a leaf value.
    pub fn leaf<T: FieldValue>(&mut self, name: &str, tag: &str, slot: &'a mut T) -> ConfigResult<()> {
        if tag == "-" {
            return Ok(());
        }
        let options = parse_tag(tag).map_err(|reason| ConfigError::tag(name, reason))?;

        let mut key = self.prefix.clone();
        key.extend(key_fragments(name)?);

        let flag_key = if options.flag_name.is_empty() {
            key.clone()
        } else {
            vec![options.flag_name.clone()]
        };
        let env_key = if options.env_name.is_empty() {
            key.clone()
        } else {
            vec![options.env_name.clone()]
        };

        self.fields.push(Field {
            name: key.concat().to_lowercase(),
            flag_key,
            env_key,
            options,
            value: slot,
        });
        Ok(())
    }

    /// Register a named nested struct; its name prefixes every descendant key.
    pub fn nested<C: Configure>(&mut self, name: &str, tag: &str, child: &'a mut C) -> ConfigResult<()> {
        if tag == "-" {
            return Ok(());
        }
        parse_tag(tag).map_err(|reason| ConfigError::tag(name, reason))?;

        let depth = self.prefix.len();
        self.prefix.extend(key_fragments(name)?);
        let result = child.configure(self);
        self.prefix.truncate(depth);
        result
    }

    /// Register an embedded struct; its descendants keep the current prefix.
    pub fn embed<C: Configure>(&mut self, name: &str, tag: &str, child: &'a mut C) -> ConfigResult<()> {
        if tag == "-" {
            return Ok(());
        }
        parse_tag(tag).map_err(|reason| ConfigError::tag(name, reason))?;
        child.configure(self)
    }

    /// Register an optional nested struct, allocating a default one if absent.
    pub fn optional<C: Configure + Default>(
        &mut self,
        name: &str,
        tag: &str,
        child: &'a mut Option<C>,
    ) -> ConfigResult<()> {
        if tag == "-" {
            return Ok(());
        }
        let child = child.get_or_insert_with(C::default);
        self.nested(name, tag, child)
    }
}

/// Flag lookup keys the argument reader claims for the help request.
const HELP_FLAGS: [&str; 2] = ["help", "h"];

/// Walk `target` and return its leaf fields in declaration order.
///
/// Fails with a structure error when a member name has no usable key
/// fragment, or when two leaves collapse onto the same canonical name, flag
/// (long or short) or environment variable. `--help` and `-h` are reserved.
pub fn extract_fields<C: Configure>(target: &mut C) -> ConfigResult<Vec<Field<'_>>> {
    let mut set = FieldSet::new();
    target.configure(&mut set)?;
    check_unique(&set.fields)?;
    Ok(set.fields)
}

fn check_unique(fields: &[Field<'_>]) -> ConfigResult<()> {
    let mut names = HashSet::new();
    let mut flags: HashSet<String> = HELP_FLAGS.iter().map(|f| f.to_string()).collect();
    let mut env_keys = HashSet::new();

    for field in fields {
        if !names.insert(field.name.as_str()) {
            return Err(ConfigError::structure(format!(
                "two fields resolve to the key {:?}",
                field.name
            )));
        }

        let short = field.short_lookup_key();
        for flag in std::iter::once(field.flag_lookup_key()).chain(short) {
            if !flags.insert(flag.clone()) {
                return Err(ConfigError::structure(format!(
                    "flag {:?} of field {} is already taken",
                    flag, field.name
                )));
            }
        }

        let env_key = field.env_lookup_key();
        if !env_keys.insert(env_key.clone()) {
            return Err(ConfigError::structure(format!(
                "environment key {:?} of field {} is already taken",
                env_key, field.name
            )));
        }
    }
    Ok(())
}

/// Split a declared member name into lower-case words.
///
/// Handles snake_case (`read_timeout`) and CamelCase (`ReadTimeout`,
/// `UserPoolID`) alike.
pub fn key_fragments(name: &str) -> ConfigResult<Vec<String>> {
    let fragments: Vec<String> = name
        .to_snake_case()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if fragments.is_empty() {
        return Err(ConfigError::structure(format!(
            "member name {:?} has no usable key",
            name
        )));
    }
    Ok(fragments)
}

/// Implement [`Configure`] from a compact member list.
///
/// Each entry is `<kind> <member>` with an optional `: "<tag>"`, where kind
/// is one of `leaf`, `nested`, `embed` or `optional`.
///
/// ```
/// use std::time::Duration;
/// use tgs_conf::impl_configure;
///
/// #[derive(Default)]
/// struct Web {
///     api_host: String,
///     read_timeout: Duration,
/// }
///
/// impl_configure!(Web {
///     leaf api_host: "default:0.0.0.0:3000",
///     leaf read_timeout: "default:5s",
/// });
/// ```
#[macro_export]
macro_rules! impl_configure {
    ($ty:ty { $($kind:ident $member:ident $(: $tag:literal)?),* $(,)? }) => {
        impl $crate::config::Configure for $ty {
            fn configure<'a>(
                &'a mut self,
                fields: &mut $crate::config::FieldSet<'a>,
            ) -> $crate::error::ConfigResult<()> {
                $(
                    fields.$kind(stringify!($member), concat!("" $(, $tag)?), &mut self.$member)?;
                )*
                Ok(())
            }
        }
    };
}
