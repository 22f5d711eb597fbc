//! Structured error types for configuration resolution.

use thiserror::Error;

/// Error surfaced by a custom [`Provider`](crate::config::Provider).
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a parse can fail, plus the help sentinel.
///
/// Anything other than [`ConfigError::HelpRequested`] must be treated as
/// fatal to start-up: the target struct is left in an undefined state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target struct is not shaped the way the engine needs.
    #[error("invalid configuration structure: {0}")]
    Structure(String),

    /// A field tag could not be parsed.
    #[error("can't parse the tag of field {field}: {reason}")]
    TagGrammar { field: String, reason: String },

    /// A command-line token is not a valid `--name=value` flag.
    #[error("bad flag syntax: {0}")]
    FlagSyntax(String),

    /// A required field ended up without a value.
    #[error("required field {0} is missing a value")]
    RequiredFieldMissing(String),

    /// A raw string could not be converted into the field's type.
    #[error("can't set field {field} from {value:?}: {reason}")]
    TypeCoercion {
        field: String,
        value: String,
        reason: String,
    },

    /// A custom provider refused the field.
    #[error("provider error on field {field}: {source}")]
    Provider {
        field: String,
        #[source]
        source: ProviderError,
    },

    /// `--help` or `-h` was passed; carries the usage text to print.
    #[error("help requested")]
    HelpRequested { usage: String },
}

impl ConfigError {
    // Convenience constructors

    pub fn structure(reason: impl Into<String>) -> Self {
        Self::Structure(reason.into())
    }

    pub fn tag(field: &str, reason: impl Into<String>) -> Self {
        Self::TagGrammar {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::RequiredFieldMissing(field.to_string())
    }

    pub fn coercion(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::TypeCoercion {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn provider(field: &str, source: ProviderError) -> Self {
        Self::Provider {
            field: field.to_string(),
            source,
        }
    }

    /// True for the help sentinel, which is a control signal and not a failure.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::HelpRequested { .. })
    }

    /// Usage text carried by the help sentinel.
    pub fn usage(&self) -> Option<&str> {
        match self {
            Self::HelpRequested { usage } => Some(usage),
            _ => None,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
