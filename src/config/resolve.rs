//! Precedence resolution.
//!
//! Without providers, each field takes the highest-precedence value among
//! its tag default, its environment variable and its flag. With providers,
//! the providers alone decide.

use super::fields::Field;
use super::provider::Provider;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use tracing::debug;

/// Where a field's value came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    /// `default:` in the field tag
    Default = 0,
    /// `<PREFIX>_<KEY>` environment variable
    Environment = 1,
    /// `--key=value` command-line flag
    Flag = 2,
    /// A registered provider
    Provider = 3,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::Environment => write!(f, "env"),
            Source::Flag => write!(f, "flag"),
            Source::Provider => write!(f, "provider"),
        }
    }
}

/// Pick the winning raw value for one field, if any source has one.
pub fn pick_value(
    field: &Field<'_>,
    flags: &HashMap<String, String>,
    env: &HashMap<String, String>,
) -> Option<(String, Source)> {
    let mut picked = None;

    let default_val = &field.options().default_val;
    if !default_val.is_empty() {
        picked = Some((default_val.clone(), Source::Default));
    }

    if let Some(value) = env.get(&field.env_lookup_key()) {
        picked = Some((value.clone(), Source::Environment));
    }

    let flag = flags.get(&field.flag_lookup_key()).or_else(|| {
        field
            .short_lookup_key()
            .and_then(|short| flags.get(&short))
    });
    if let Some(value) = flag {
        picked = Some((value.clone(), Source::Flag));
    }

    picked
}

/// Resolve and assign every field.
///
/// Fails on the first field that is required but empty, that can't be
/// coerced, or that a provider rejects. Earlier fields may already have been
/// written when that happens.
pub fn resolve(
    fields: &mut [Field<'_>],
    flags: &HashMap<String, String>,
    env: &HashMap<String, String>,
    providers: &[&dyn Provider],
) -> ConfigResult<()> {
    if !providers.is_empty() {
        return resolve_with_providers(fields, providers);
    }

    for field in fields.iter_mut() {
        let picked = pick_value(field, flags, env);

        if field.options().required && picked.as_ref().is_none_or(|(value, _)| value.is_empty()) {
            return Err(ConfigError::missing_field(field.name()));
        }

        if let Some((raw, source)) = picked {
            field.set(&raw)?;
            debug!(field = %field.name(), %source, "Resolved config field");
        }
    }

    Ok(())
}

fn resolve_with_providers(fields: &mut [Field<'_>], providers: &[&dyn Provider]) -> ConfigResult<()> {
    for field in fields.iter_mut() {
        for (index, provider) in providers.iter().enumerate() {
            let raw = provider
                .provide(field)
                .map_err(|e| ConfigError::provider(field.name(), e))?;
            if let Some(raw) = raw {
                field.set(&raw)?;
                debug!(
                    field = %field.name(),
                    source = %Source::Provider,
                    provider = index,
                    "Resolved config field"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fields::extract_fields;
    use crate::error::ProviderError;
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Web {
        read_timeout: Duration,
        host: String,
        debug: bool,
    }

    crate::impl_configure!(Web {
        leaf read_timeout: "default:5s,short:r",
        leaf host: "required",
        leaf debug,
    });

    #[derive(Debug, Default)]
    struct App {
        web: Web,
    }

    crate::impl_configure!(App { nested web });

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(flags: &[(&str, &str)], env: &[(&str, &str)]) -> ConfigResult<App> {
        let mut app = App::default();
        {
            let mut fields = extract_fields(&mut app)?;
            resolve(&mut fields, &map(flags), &map(env), &[])?;
        }
        Ok(app)
    }

    #[test]
    fn test_flag_beats_env_beats_default() {
        let host = ("webhost", "h");

        let app = run(&[host, ("webreadtimeout", "20s")], &[("webreadtimeout", "10s")]).unwrap();
        assert_eq!(app.web.read_timeout, Duration::from_secs(20));

        let app = run(&[host], &[("webreadtimeout", "10s")]).unwrap();
        assert_eq!(app.web.read_timeout, Duration::from_secs(10));

        let app = run(&[host], &[]).unwrap();
        assert_eq!(app.web.read_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_short_alias_is_a_flag() {
        let app = run(&[("webhost", "h"), ("r", "1m")], &[("webreadtimeout", "10s")]).unwrap();
        assert_eq!(app.web.read_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_required_field_missing() {
        let err = run(&[], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::RequiredFieldMissing(ref name) if name == "webhost"));

        let err = run(&[("webhost", "")], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::RequiredFieldMissing(_)));
    }

    #[test]
    fn test_absent_values_leave_field_untouched() {
        let app = run(&[("webhost", "h")], &[]).unwrap();
        assert!(!app.web.debug);
    }

    #[test]
    fn test_bare_bool_flag_is_a_coercion_error() {
        let err = run(&[("webhost", "h"), ("webdebug", "")], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::TypeCoercion { ref field, .. } if field == "webdebug"));
    }

    #[test]
    fn test_source_ordering() {
        assert!(Source::Default < Source::Environment);
        assert!(Source::Environment < Source::Flag);
        assert!(Source::Flag < Source::Provider);
        assert_eq!(Source::Environment.to_string(), "env");
        assert_eq!(Source::Provider.to_string(), "provider");
    }

    struct Fixed(&'static str);

    impl Provider for Fixed {
        fn provide(&self, _field: &Field<'_>) -> Result<Option<String>, ProviderError> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct Recorder(RefCell<Vec<String>>);

    impl Provider for Recorder {
        fn provide(&self, field: &Field<'_>) -> Result<Option<String>, ProviderError> {
            self.0.borrow_mut().push(field.name().to_string());
            Ok(None)
        }
    }

    struct Failing;

    impl Provider for Failing {
        fn provide(&self, _field: &Field<'_>) -> Result<Option<String>, ProviderError> {
            Err("vault sealed".into())
        }
    }

    #[derive(Default)]
    struct Names {
        first: String,
        last: String,
    }

    crate::impl_configure!(Names {
        leaf first: "required",
        leaf last,
    });

    #[test]
    fn test_providers_replace_flags_and_env() {
        let mut names = Names::default();
        let recorder = Recorder(RefCell::new(Vec::new()));
        {
            let mut fields = extract_fields(&mut names).unwrap();
            let flags = map(&[("first", "from-flag")]);
            resolve(&mut fields, &flags, &HashMap::new(), &[&Fixed("a"), &recorder, &Fixed("b")]).unwrap();
        }
        assert_eq!(names.first, "b");
        assert_eq!(names.last, "b");
        assert_eq!(*recorder.0.borrow(), vec!["first", "last"]);
    }

    #[test]
    fn test_provider_error_aborts() {
        let mut names = Names::default();
        let mut fields = extract_fields(&mut names).unwrap();
        let err = resolve(&mut fields, &HashMap::new(), &HashMap::new(), &[&Failing]).unwrap_err();
        match err {
            ConfigError::Provider { field, source } => {
                assert_eq!(field, "first");
                assert_eq!(source.to_string(), "vault sealed");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
