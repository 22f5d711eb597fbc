//! Configuration loader.
//!
//! Ties the readers, the resolver and the usage generator together. Sources
//! are layered lowest to highest priority:
//! 1. **Default** - `default:` in the field tag
//! 2. **Environment** - `<PREFIX>_<KEY>` variables
//! 3. **Flag** - `--key=value` on the command line
//!
//! Registering any provider replaces all three with the providers.

use super::args::{ParsedArgs, parse_os_args};
use super::env::parse_env_args;
use super::fields::{Configure, extract_fields};
use super::provider::Provider;
use super::render::{RenderedField, render as render_lines, rendered_fields};
use super::resolve::resolve;
use super::usage::usage_text;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

const FALLBACK_PROGRAM: &str = "app";

/// Builder for one configuration parse.
///
/// Arguments and environment default to the running process; tests and
/// embedders can inject their own.
pub struct Loader<'p> {
    prefix: String,
    program: Option<String>,
    args: Option<Vec<String>>,
    environ: Option<Vec<(String, String)>>,
    providers: Vec<Box<dyn Provider + 'p>>,
}

impl<'p> Loader<'p> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            program: None,
            args: None,
            environ: None,
            providers: Vec::new(),
        }
    }

    /// Use `args` instead of the process arguments. The program name must
    /// not be included.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Use `environ` instead of the process environment.
    pub fn with_env<I, K, V>(mut self, environ: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environ = Some(
            environ
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Program name shown in the usage header.
    pub fn with_program_name(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Append a provider. Providers run in registration order.
    pub fn with_provider(mut self, provider: impl Provider + 'p) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Populate `target`.
    ///
    /// A `--help`/`-h` argument stops before any field is touched and
    /// returns [`ConfigError::HelpRequested`] with the usage text.
    pub fn parse<C: Configure>(&self, target: &mut C) -> ConfigResult<()> {
        let args = self.args();
        let flags = match parse_os_args(&args)? {
            ParsedArgs::HelpRequested => {
                return Err(ConfigError::HelpRequested {
                    usage: self.usage(target)?,
                });
            }
            ParsedArgs::Flags(flags) => flags,
        };

        let env = if self.providers.is_empty() {
            parse_env_args(self.environ(), &self.prefix)
        } else {
            HashMap::new()
        };
        let providers: Vec<&dyn Provider> = self.providers.iter().map(|p| &**p as &dyn Provider).collect();

        let mut fields = extract_fields(target)?;
        debug!(
            prefix = %self.prefix,
            fields = fields.len(),
            flags = flags.len(),
            env = env.len(),
            providers = providers.len(),
            "Resolving configuration"
        );
        resolve(&mut fields, &flags, &env, &providers)
    }

    /// Usage text for `target`.
    pub fn usage<C: Configure>(&self, target: &mut C) -> ConfigResult<String> {
        usage_text(&self.program(), &self.prefix, target)
    }

    /// `flag=value` lines for the current contents of `target`.
    pub fn render<C: Configure>(&self, target: &mut C) -> ConfigResult<String> {
        render_lines(target)
    }

    /// Printable fields of `target`, with environment names under this prefix.
    pub fn rendered_fields<C: Configure>(&self, target: &mut C) -> ConfigResult<Vec<RenderedField>> {
        rendered_fields(&self.prefix, target)
    }

    fn args(&self) -> Vec<String> {
        match &self.args {
            Some(args) => args.clone(),
            None => std::env::args_os()
                .skip(1)
                .filter_map(|arg| match arg.into_string() {
                    Ok(arg) => Some(arg),
                    Err(arg) => {
                        warn!(?arg, "Ignoring non UTF-8 argument");
                        None
                    }
                })
                .collect(),
        }
    }

    fn environ(&self) -> Vec<(String, String)> {
        match &self.environ {
            Some(environ) => environ.clone(),
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    fn program(&self) -> String {
        if let Some(program) = &self.program {
            return program.clone();
        }
        std::env::args_os()
            .next()
            .and_then(|argv0| {
                Path::new(&argv0)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_PROGRAM.to_string())
    }
}

impl std::fmt::Debug for Loader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("prefix", &self.prefix)
            .field("program", &self.program)
            .field("args", &self.args)
            .field("environ", &self.environ.as_ref().map(Vec::len))
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Populate `target` from the process arguments and environment.
pub fn parse<C: Configure>(target: &mut C, prefix: &str) -> ConfigResult<()> {
    Loader::new(prefix).parse(target)
}

/// Usage text for `target` under `prefix`.
pub fn usage_info<C: Configure>(prefix: &str, target: &mut C) -> ConfigResult<String> {
    Loader::new(prefix).usage(target)
}
