//! Leaf value types and string coercion.
//!
//! Every leaf a configuration struct registers implements [`FieldValue`]:
//! it reports its declared kind (used by usage text and providers), assigns
//! itself from a raw string, and renders itself back to the same literal
//! form.

use std::path::PathBuf;
use std::time::Duration;

/// Declared kind of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    /// Signed integer with the given bit width.
    Int(u32),
    /// Unsigned integer with the given bit width.
    Uint(u32),
    /// Floating point with the given bit width.
    Float(u32),
    Duration,
    /// Anything else a custom `FieldValue` implementation declares.
    Other,
}

/// Declared kind of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(Kind),
    /// Comma-separated list of scalars.
    List(Kind),
}

impl FieldKind {
    /// The scalar kind, looking through lists.
    pub fn scalar(self) -> Kind {
        match self {
            FieldKind::Scalar(kind) | FieldKind::List(kind) => kind,
        }
    }

    pub fn is_bool(self) -> bool {
        self == FieldKind::Scalar(Kind::Bool)
    }
}

/// A value slot the engine can write into.
pub trait FieldValue {
    /// Declared kind of the slot.
    fn kind(&self) -> FieldKind;

    /// Replace the slot's value with the coerced form of `raw`.
    ///
    /// Returns the reason on failure; the slot is left unchanged.
    fn assign(&mut self, raw: &str) -> Result<(), String>;

    /// Render the current value in the form `assign` accepts.
    fn render(&self) -> String;
}

impl FieldValue for String {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::String)
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = raw.to_string();
        Ok(())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FieldValue for PathBuf {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::String)
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = PathBuf::from(raw);
        Ok(())
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

impl FieldValue for bool {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::Bool)
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = parse_bool(raw)?;
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! signed_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Scalar(Kind::Int(<$ty>::BITS))
            }

            fn assign(&mut self, raw: &str) -> Result<(), String> {
                let wide = parse_int(raw)?;
                *self = <$ty>::try_from(wide).map_err(|_| {
                    format!("{} overflows a {}-bit integer", wide, <$ty>::BITS)
                })?;
                Ok(())
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

macro_rules! unsigned_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Scalar(Kind::Uint(<$ty>::BITS))
            }

            fn assign(&mut self, raw: &str) -> Result<(), String> {
                let wide = parse_uint(raw)?;
                *self = <$ty>::try_from(wide).map_err(|_| {
                    format!("{} overflows a {}-bit unsigned integer", wide, <$ty>::BITS)
                })?;
                Ok(())
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

signed_value!(i8, i16, i32, i64, isize);
unsigned_value!(u8, u16, u32, u64, usize);

impl FieldValue for f32 {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::Float(32))
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = raw
            .trim()
            .parse()
            .map_err(|e| format!("invalid float: {}", e))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for f64 {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::Float(64))
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = raw
            .trim()
            .parse()
            .map_err(|e| format!("invalid float: {}", e))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for Duration {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar(Kind::Duration)
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = parse_duration(raw)?;
        Ok(())
    }

    fn render(&self) -> String {
        format_duration(*self)
    }
}

impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::List(T::default().kind().scalar())
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        if raw.trim().is_empty() {
            self.clear();
            return Ok(());
        }
        let mut items = Vec::new();
        for part in raw.split(',') {
            let mut item = T::default();
            item.assign(part.trim())?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }

    fn render(&self) -> String {
        self.iter()
            .map(FieldValue::render)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Pointer-to-leaf: stays `None` until a non-empty value arrives.
impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn kind(&self) -> FieldKind {
        match self {
            Some(inner) => inner.kind(),
            None => T::default().kind(),
        }
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        if raw.is_empty() {
            return Ok(());
        }
        let mut inner = T::default();
        inner.assign(raw)?;
        *self = Some(inner);
        Ok(())
    }

    fn render(&self) -> String {
        self.as_ref().map(FieldValue::render).unwrap_or_default()
    }
}

/// Parse a boolean literal: `1 t T TRUE true True 0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid boolean literal {:?}", raw)),
    }
}

/// Split an optional `0x`/`0o`/`0b` prefix off a digit string.
fn split_radix(digits: &str) -> (u32, &str) {
    let lower = digits.get(..2).map(|p| p.to_ascii_lowercase());
    match lower.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    }
}

/// Parse a signed integer, honoring radix prefixes.
pub fn parse_int(raw: &str) -> Result<i64, String> {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = split_radix(rest);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("invalid integer {:?}", raw));
    }
    let magnitude = u64::from_str_radix(digits, radix)
        .map_err(|_| format!("invalid or out of range integer {:?}", raw))?;
    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(format!("{} overflows a 64-bit integer", raw));
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| format!("{} overflows a 64-bit integer", raw))
    }
}

/// Parse an unsigned integer, honoring radix prefixes.
pub fn parse_uint(raw: &str) -> Result<u64, String> {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let (radix, digits) = split_radix(s);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("invalid unsigned integer {:?}", raw));
    }
    u64::from_str_radix(digits, radix)
        .map_err(|_| format!("invalid or out of range unsigned integer {:?}", raw))
}

const NANOS_PER_UNIT: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a duration literal such as `300ms`, `1.5h` or `2h45m`.
///
/// A bare `0` is accepted; any other number needs a unit.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        if s[1..].chars().all(|c| c == '0') && s.len() > 1 {
            return Ok(Duration::ZERO);
        }
        return Err(format!("negative duration {:?}", raw));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(format!("invalid duration {:?}", raw));
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("invalid duration {:?}", raw));
        }

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| {
                if unit.is_empty() {
                    format!("missing unit in duration {:?}", raw)
                } else {
                    format!("unknown unit {:?} in duration {:?}", unit, raw)
                }
            })?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| format!("invalid duration {:?}", raw))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| format!("duration {:?} is too large", raw))?;

        // Fractional digits beyond nanosecond precision are dropped.
        let mut place = scale;
        for digit in frac_part.bytes() {
            place /= 10;
            if place == 0 {
                break;
            }
            nanos = nanos
                .checked_add(u128::from(digit - b'0') * place)
                .ok_or_else(|| format!("duration {:?} is too large", raw))?;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("duration {:?} is too large", raw))?;
    }

    let secs = u64::try_from(total / 1_000_000_000)
        .map_err(|_| format!("duration {:?} is too large", raw))?;
    Ok(Duration::new(secs, (total % 1_000_000_000) as u32))
}

/// Render a duration in the literal form [`parse_duration`] accepts.
///
/// Sub-second values use the largest fitting unit (`1.5ms`); longer values
/// use `h`, `m` and `s` (`2m0s`, `1h30m5.25s`).
pub fn format_duration(d: Duration) -> String {
    let total = d.as_nanos();
    if total == 0 {
        return "0s".to_string();
    }
    if total < 1_000 {
        return format!("{}ns", total);
    }
    if total < 1_000_000 {
        return format!("{}µs", fixed(total, 1_000));
    }
    if total < 1_000_000_000 {
        return format!("{}ms", fixed(total, 1_000_000));
    }

    let secs = d.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = fixed(u128::from(secs % 60) * 1_000_000_000 + u128::from(d.subsec_nanos()), 1_000_000_000);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&seconds);
    out.push('s');
    out
}

/// `value / unit` as a decimal string without trailing zeros.
fn fixed(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_overflow_is_rejected() {
        let mut small: i8 = 0;
        let err = small.assign("99999999999").unwrap_err();
        assert!(err.contains("overflows"), "got: {}", err);
        assert_eq!(small, 0);

        let mut wide: i64 = 0;
        assert!(wide.assign("99999999999999999999").is_err());
    }

    #[test]
    fn test_int_radix_and_sign() {
        assert_eq!(parse_int("0x1F"), Ok(31));
        assert_eq!(parse_int("-0b101"), Ok(-5));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("+42"), Ok(42));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
        assert!(parse_int("").is_err());
        assert!(parse_int("--1").is_err());
        assert!(parse_int("12abc").is_err());
    }

    #[test]
    fn test_int8_bounds() {
        let mut v: i8 = 0;
        v.assign("-128").unwrap();
        assert_eq!(v, -128);
        v.assign("127").unwrap();
        assert_eq!(v, 127);
        assert!(v.assign("128").is_err());
    }

    #[test]
    fn test_uint_rejects_negative() {
        let mut port: u16 = 0;
        assert!(port.assign("-1").is_err());
        assert!(port.assign("70000").is_err());
        port.assign("8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_bool_literals() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Ok(true), "{}", raw);
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Ok(false), "{}", raw);
        }
        assert!(parse_bool("").is_err());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn test_duration_literals() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("120s"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse_duration("1.5h"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse_duration("2h45m"), Ok(Duration::from_secs(9900)));
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("10µs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn test_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("s").is_err());
    }

    #[test]
    fn test_duration_overflow_in_fraction() {
        let hour: u128 = 3_600_000_000_000;
        let max_hours = u128::MAX / hour;
        let err = parse_duration(&format!("{}.9h", max_hours)).unwrap_err();
        assert!(err.contains("too large"), "got: {}", err);

        let err = parse_duration(&format!("{}h", max_hours + 1)).unwrap_err();
        assert!(err.contains("too large"), "got: {}", err);

        assert!(parse_duration(&format!("{}h", u64::MAX)).is_err());
    }

    #[test]
    fn test_duration_format() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m0s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
    }

    #[test]
    fn test_values_survive_render_and_assign() {
        let d = Duration::new(5405, 250_000_000);
        let mut back = Duration::ZERO;
        back.assign(&d.render()).unwrap();
        assert_eq!(back, d);

        let mut n: i32 = 0;
        n.assign(&(-123_456i32).render()).unwrap();
        assert_eq!(n, -123_456);

        let mut flag = false;
        flag.assign(&true.render()).unwrap();
        assert!(flag);

        let mut s = String::new();
        s.assign(&"postgres://db".to_string().render()).unwrap();
        assert_eq!(s, "postgres://db");
    }

    #[test]
    fn test_list_values() {
        let mut commands: Vec<String> = Vec::new();
        commands.assign("migrate, seed ,createsecret").unwrap();
        assert_eq!(commands, vec!["migrate", "seed", "createsecret"]);
        assert_eq!(commands.kind(), FieldKind::List(Kind::String));

        let mut ports: Vec<u16> = Vec::new();
        assert!(ports.assign("80,not-a-port").is_err());
        assert!(ports.is_empty());
        commands.assign("").unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_optional_leaf_stays_none_on_empty() {
        let mut limit: Option<u32> = None;
        limit.assign("").unwrap();
        assert_eq!(limit, None);
        limit.assign("10").unwrap();
        assert_eq!(limit, Some(10));
        assert_eq!(limit.kind(), FieldKind::Scalar(Kind::Uint(32)));
    }
}
