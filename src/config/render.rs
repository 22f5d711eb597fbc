//! Printable view of a resolved configuration.

use super::env::env_prefix;
use super::fields::{Configure, Field, extract_fields};
use crate::error::ConfigResult;
use serde::Serialize;

const MASK: &str = "xxxxxx";

/// One printable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    /// Long flag name, e.g. `web-api-host`.
    pub flag: String,
    /// Environment variable, e.g. `APP_WEB_API_HOST`.
    pub env: String,
    pub value: String,
}

/// Current values of every printable field, in declaration order.
///
/// `noPrint` fields are left out and non-empty `mask` fields are replaced
/// with `xxxxxx`.
pub fn rendered_fields<C: Configure>(prefix: &str, target: &mut C) -> ConfigResult<Vec<RenderedField>> {
    let prefix = env_prefix(prefix);
    let fields = extract_fields(target)?;
    Ok(fields
        .iter()
        .filter(|field| !field.options().no_print)
        .map(|field| RenderedField {
            flag: field.flag_name(),
            env: field.env_var(&prefix),
            value: printable_value(field),
        })
        .collect())
}

/// `flag=value` lines for [`rendered_fields`].
pub fn render<C: Configure>(target: &mut C) -> ConfigResult<String> {
    let mut out = String::new();
    for field in rendered_fields("", target)? {
        out.push_str(&field.flag);
        out.push('=');
        out.push_str(&field.value);
        out.push('\n');
    }
    Ok(out)
}

fn printable_value(field: &Field<'_>) -> String {
    let value = field.current();
    if field.options().mask && !value.is_empty() {
        MASK.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Stripe {
        key: String,
        webhook: String,
    }

    crate::impl_configure!(Stripe {
        leaf key: "mask",
        leaf webhook: "mask",
    });

    #[derive(Default)]
    struct App {
        host: String,
        timeout: Duration,
        password: String,
        stripe: Stripe,
    }

    crate::impl_configure!(App {
        leaf host,
        leaf timeout,
        leaf password: "noPrint",
        nested stripe,
    });

    fn app() -> App {
        App {
            host: "0.0.0.0:3000".to_string(),
            timeout: Duration::from_millis(1500),
            password: "hunter2".to_string(),
            stripe: Stripe {
                key: "sk_live_123".to_string(),
                webhook: String::new(),
            },
        }
    }

    #[test]
    fn test_render_lines() {
        let mut app = app();
        assert_eq!(
            render(&mut app).unwrap(),
            "host=0.0.0.0:3000\ntimeout=1.5s\nstripe-key=xxxxxx\nstripe-webhook=\n"
        );
    }

    #[test]
    fn test_no_print_fields_are_omitted() {
        let mut app = app();
        let fields = rendered_fields("app", &mut app).unwrap();
        assert!(fields.iter().all(|f| f.flag != "password"));
        assert_eq!(fields[0].env, "APP_HOST");
    }

    #[test]
    fn test_serializes_as_json() {
        let mut app = app();
        let fields = rendered_fields("app", &mut app).unwrap();
        let json = serde_json::to_value(&fields[2]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"flag": "stripe-key", "env": "APP_STRIPE_KEY", "value": "xxxxxx"})
        );
    }
}
