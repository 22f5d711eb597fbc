//! Layered configuration resolution.
//!
//! A struct implementing [`Configure`] is flattened into leaf [`Field`]s,
//! then each field is filled from the highest-priority source that has a
//! value:
//! 1. **Default** - `default:` in the field tag
//! 2. **Environment** - `$<PREFIX>_<KEY>`, e.g. `APP_WEB_READ_TIMEOUT`
//! 3. **Flag** - `--<key>=<value>`, e.g. `--web-read-timeout=10s`
//!
//! When providers are registered they replace all three.
//!
//! ## Field tags
//! Comma-separated `key:value` pairs and bare words:
//! - `default:VALUE`, `env:NAME`, `flag:NAME`, `short:C`, `help:TEXT`,
//!   `secret:NAME`
//! - `required`, `noPrint`, `mask`
//! - `-` skips the member entirely

mod args;
mod env;
mod fields;
mod loader;
mod provider;
mod render;
mod resolve;
mod tags;
mod usage;
mod values;

pub use args::{ParsedArgs, parse_os_args};
pub use env::{env_prefix, parse_env_args};
pub use fields::{Configure, Field, FieldSet, extract_fields, key_fragments};
pub use loader::{Loader, parse, usage_info};
pub use provider::{Provider, SecretSource, SecretStore, SecretsFile};
pub use render::{RenderedField, render, rendered_fields};
pub use resolve::{Source, pick_value, resolve};
pub use tags::{FieldOptions, parse_tag};
pub use usage::{type_and_help, usage_text};
pub use values::{FieldKind, FieldValue, Kind, format_duration, parse_bool, parse_duration, parse_int, parse_uint};
