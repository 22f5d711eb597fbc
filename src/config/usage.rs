//! Usage text generation.
//!
//! One row per field: flag and environment variable names, a type token in
//! angle brackets, and a parenthesised list of options, followed by an
//! indented help line when the field has one.

use super::env::env_prefix;
use super::fields::{Configure, Field, extract_fields};
use super::values::{FieldKind, Kind};
use crate::error::ConfigResult;

const HELP_TEXT: &str = "display this help message";

struct Row {
    names: String,
    type_token: String,
    options: String,
    help: String,
}

/// Build the usage text for `target`.
///
/// The field list is extracted afresh, and a synthetic `--help`/`-h` row is
/// appended.
pub fn usage_text<C: Configure>(program: &str, prefix: &str, target: &mut C) -> ConfigResult<String> {
    let fields = extract_fields(target)?;
    let prefix = env_prefix(prefix);

    let mut rows: Vec<Row> = fields.iter().map(|field| field_row(field, &prefix)).collect();
    rows.push(Row {
        names: "-h, --help".to_string(),
        type_token: String::new(),
        options: String::new(),
        help: HELP_TEXT.to_string(),
    });

    Ok(format_rows(program, &rows))
}

fn field_row(field: &Field<'_>, prefix: &str) -> Row {
    let mut names = String::new();
    if let Some(short) = field.options().short_flag_name {
        names.push_str(&format!("-{}, ", short));
    }
    names.push_str(&format!("--{}/${}", field.flag_name(), field.env_var(prefix)));

    let kind = field.kind();
    let (type_name, help) = type_and_help(&field.options().help, kind);
    let type_token = if kind.is_bool() {
        String::new()
    } else {
        type_token(&type_name, kind)
    };

    Row {
        names,
        type_token,
        options: option_summary(field),
        help,
    }
}

/// Split an explicit `'type'` out of the help text, or infer one from the kind.
///
/// The quotes are dropped from the returned help text.
pub fn type_and_help(help: &str, kind: FieldKind) -> (String, String) {
    if let Some(open) = help.find('\'') {
        if let Some(len) = help[open + 1..].find('\'') {
            let name = &help[open + 1..open + 1 + len];
            let rest = &help[open + 2 + len..];
            return (name.to_string(), format!("{}{}{}", &help[..open], name, rest));
        }
    }

    let name = match kind.scalar() {
        Kind::Bool => "bool",
        Kind::Float(_) => "float",
        Kind::Int(_) => "int",
        Kind::Duration => "duration",
        Kind::String => "string",
        Kind::Uint(_) => "uint",
        Kind::Other => "value",
    };
    (name.to_string(), help.to_string())
}

fn type_token(name: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::List(_) => format!("<{}>,[{}...]", name, name),
        FieldKind::Scalar(_) => format!("<{}>", name),
    }
}

fn option_summary(field: &Field<'_>) -> String {
    let options = field.options();
    let mut parts = Vec::new();
    if options.required {
        parts.push("required".to_string());
    }
    if options.no_print {
        parts.push("noprint".to_string());
    }
    if !options.default_val.is_empty() {
        parts.push(format!("default: {}", options.default_val));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("({})", parts.join(","))
    }
}

fn format_rows(program: &str, rows: &[Row]) -> String {
    let names_width = rows.iter().map(|r| r.names.chars().count()).max().unwrap_or(0);
    let type_width = rows.iter().map(|r| r.type_token.chars().count()).max().unwrap_or(0);

    let mut out = format!("Usage: {} [options] [arguments]\n\nOPTIONS\n", program);
    for row in rows {
        let line = format!(
            "  {:<nw$}  {:<tw$}  {}",
            row.names,
            row.type_token,
            row.options,
            nw = names_width,
            tw = type_width
        );
        out.push_str(line.trim_end());
        out.push('\n');
        if !row.help.is_empty() {
            out.push_str(&format!("      {}\n", row.help));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Web {
        api_host: String,
        read_timeout: Duration,
        debug: bool,
        origins: Vec<String>,
        password: String,
        max_conns: u32,
    }

    crate::impl_configure!(Web {
        leaf api_host: "default:0.0.0.0:3000,help:address the API listens on",
        leaf read_timeout: "default:5s,short:r",
        leaf debug: "help:enable debug routes",
        leaf origins: "help:allowed CORS origins",
        leaf password: "required,noPrint,mask",
        leaf max_conns: "help:upper bound of 'connections' kept open",
    });

    #[derive(Default)]
    struct App {
        web: Web,
    }

    crate::impl_configure!(App { nested web });

    fn usage() -> String {
        let mut app = App::default();
        usage_text("tgs-api", "app", &mut app).unwrap()
    }

    fn line_for<'u>(usage: &'u str, needle: &str) -> &'u str {
        usage
            .lines()
            .find(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {:?} in\n{}", needle, usage))
    }

    #[test]
    fn test_header() {
        let usage = usage();
        assert!(usage.starts_with("Usage: tgs-api [options] [arguments]\n\nOPTIONS\n"));
    }

    #[test]
    fn test_names_types_and_defaults() {
        let usage = usage();
        let line = line_for(&usage, "--web-api-host");
        assert!(line.contains("--web-api-host/$APP_WEB_API_HOST"));
        assert!(line.contains("<string>"));
        assert!(line.ends_with("(default: 0.0.0.0:3000)"));

        let line = line_for(&usage, "--web-read-timeout");
        assert!(line.trim_start().starts_with("-r, --web-read-timeout/$APP_WEB_READ_TIMEOUT"));
        assert!(line.contains("<duration>"));
    }

    #[test]
    fn test_bools_have_no_type_token() {
        let usage = usage();
        let line = line_for(&usage, "--web-debug");
        assert!(!line.contains('<'), "{}", line);
        assert!(usage.contains("      enable debug routes\n"));
    }

    #[test]
    fn test_lists_and_quoted_types() {
        let usage = usage();
        assert!(line_for(&usage, "--web-origins").contains("<string>,[string...]"));

        let line = line_for(&usage, "--web-max-conns");
        assert!(line.contains("<connections>"));
        assert!(usage.contains("      upper bound of connections kept open\n"));
    }

    #[test]
    fn test_option_summary() {
        let usage = usage();
        assert!(line_for(&usage, "--web-password").ends_with("(required,noprint)"));
    }

    #[test]
    fn test_help_row_is_last_and_untyped() {
        let usage = usage();
        let options: Vec<&str> = usage.lines().filter(|l| l.starts_with("  -")).collect();
        let help = options.last().unwrap();
        assert_eq!(help.trim(), "-h, --help");
        assert!(usage.ends_with("      display this help message\n"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let usage = usage();
        let host = line_for(&usage, "--web-api-host");
        let conns = line_for(&usage, "--web-max-conns");
        assert_eq!(host.find('<'), conns.find('<'));
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(type_and_help("", FieldKind::Scalar(Kind::Uint(16))).0, "uint");
        assert_eq!(type_and_help("", FieldKind::Scalar(Kind::Float(64))).0, "float");
        assert_eq!(type_and_help("", FieldKind::Scalar(Kind::Other)).0, "value");
        assert_eq!(
            type_and_help("a 'host:port' pair", FieldKind::Scalar(Kind::String)),
            ("host:port".to_string(), "a host:port pair".to_string())
        );
        assert_eq!(
            type_and_help("it's unterminated", FieldKind::Scalar(Kind::Int(64))),
            ("int".to_string(), "it's unterminated".to_string())
        );
    }
}
