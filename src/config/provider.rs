//! Pluggable value providers.
//!
//! When at least one provider is registered, resolution hands every field to
//! the providers instead of consulting flags and environment variables.
//! Providers own default and required handling in that mode.

use super::fields::Field;
use crate::error::ProviderError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source that can supply a value for any field.
pub trait Provider {
    /// Return the raw value for `field`, or `None` to leave it untouched.
    fn provide(&self, field: &Field<'_>) -> Result<Option<String>, ProviderError>;
}

/// Where a secret store gets its flat key/value map from.
pub trait SecretSource {
    fn fetch(&self) -> Result<HashMap<String, String>, ProviderError>;
}

impl SecretSource for HashMap<String, String> {
    fn fetch(&self) -> Result<HashMap<String, String>, ProviderError> {
        Ok(self.clone())
    }
}

/// Secrets kept in a flat JSON or YAML mapping on disk.
///
/// Files ending in `.json` are read as JSON, anything else as YAML. Scalar
/// values (numbers, booleans) are accepted and stringified.
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretSource for SecretsFile {
    fn fetch(&self) -> Result<HashMap<String, String>, ProviderError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            format!("can't read secrets file {}: {}", self.path.display(), e)
        })?;

        let is_json = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let raw: HashMap<String, serde_json::Value> = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| format!("invalid JSON in {}: {}", self.path.display(), e))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| format!("invalid YAML in {}: {}", self.path.display(), e))?
        };

        let mut secrets = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => continue,
                _ => {
                    return Err(format!(
                        "secret {:?} in {} must be a scalar",
                        key,
                        self.path.display()
                    )
                    .into());
                }
            };
            secrets.insert(key, value);
        }
        Ok(secrets)
    }
}

/// Provider backed by a secret store fetched once at construction.
///
/// Each field is looked up under its `secret:` tag name first, then under its
/// canonical name (`dbuser`). Absent secrets fall back to the field's
/// default; a required field with neither is an error.
#[derive(Debug, Clone)]
pub struct SecretStore {
    secrets: HashMap<String, String>,
}

impl SecretStore {
    /// Fetch every secret from `source`.
    pub fn load<S: SecretSource>(source: &S) -> Result<Self, ProviderError> {
        let secrets = source.fetch()?;
        debug!(count = secrets.len(), "Fetched secrets");
        Ok(Self { secrets })
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    fn lookup(&self, field: &Field<'_>) -> Option<&String> {
        let secret_name = field.options().secret_name.as_str();
        let by_secret_name = if secret_name.is_empty() {
            None
        } else {
            self.secrets.get(secret_name)
        };
        by_secret_name.or_else(|| self.secrets.get(field.name()))
    }
}

impl Provider for SecretStore {
    fn provide(&self, field: &Field<'_>) -> Result<Option<String>, ProviderError> {
        if let Some(value) = self.lookup(field) {
            return Ok(Some(value.clone()));
        }

        let options = field.options();
        if !options.default_val.is_empty() {
            return Ok(Some(options.default_val.clone()));
        }
        if options.required {
            return Err(format!(
                "required field {:?} not present in the secret store",
                field.name()
            )
            .into());
        }
        Ok(None)
    }
}
