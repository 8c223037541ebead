//! Built-in validators, one per [`TypeTag`](crate::TypeTag).
//!
//! Every validator is a pure function from raw text to an [`EnvValue`] or a
//! reason. The same function checks live input and the rendered form of a
//! fallback, so a fallback is accepted exactly when the equivalent raw text
//! would be.
//!
//! Numeric grammars accept a leading numeric prefix (`"12px"` reads as 12),
//! mirroring the usual behaviour of lenient float parsing in config loaders.

use std::net::{IpAddr, Ipv6Addr};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::EnvValue;

/// A parsing rule for one semantic type.
///
/// Implement this to add a type to a
/// [`ValidatorRegistry`](crate::ValidatorRegistry). Closures of the form
/// `Fn(&str) -> Result<EnvValue, String>` implement it too.
pub trait Validator: Send + Sync {
    /// Parse raw text, returning the native value or the reason it was
    /// rejected.
    fn parse(&self, raw: &str) -> Result<EnvValue, String>;
}

impl<F> Validator for F
where
    F: Fn(&str) -> Result<EnvValue, String> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        self(raw)
    }
}

/// Words read as `true` by [`BooleanValidator`].
pub const TRUE_WORDS: [&str; 8] = ["true", "1", "yes", "on", "enable", "enabled", "t", "y"];

/// Words read as `false` by [`BooleanValidator`].
pub const FALSE_WORDS: [&str; 8] = ["false", "0", "no", "off", "disable", "disabled", "f", "n"];

/// `string`: accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl Validator for StringValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        Ok(EnvValue::String(raw.to_string()))
    }
}

/// `number`: floating-point literal prefix, never NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

impl Validator for NumberValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        parse_float_prefix(raw)
            .map(EnvValue::Number)
            .ok_or_else(|| format!("{raw:?} is not a number"))
    }
}

/// `boolean`: fixed vocabulary, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

impl Validator for BooleanValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        let lowered = raw.to_lowercase();
        if TRUE_WORDS.contains(&lowered.as_str()) {
            Ok(EnvValue::Boolean(true))
        } else if FALSE_WORDS.contains(&lowered.as_str()) {
            Ok(EnvValue::Boolean(false))
        } else {
            Err(format!("{raw:?} is not a recognized boolean"))
        }
    }
}

/// `port`: integer in 1..=65535.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortValidator;

impl Validator for PortValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        let n = parse_int_prefix(raw).ok_or_else(|| format!("{raw:?} is not an integer"))?;
        match u16::try_from(n) {
            Ok(port) if port != 0 => Ok(EnvValue::Port(port)),
            _ => Err(format!("{n} is outside 1..=65535")),
        }
    }
}

/// `url`: absolute URL with a scheme, authority optional
/// (`sqlite:///app.db`, `mailto:ops@example.com`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl Validator for UrlValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        let url = Url::parse(raw).map_err(|e| format!("{raw:?} is not a URL: {e}"))?;
        if url.scheme().is_empty() {
            return Err(format!("{raw:?} has no scheme"));
        }
        Ok(EnvValue::Url(raw.to_string()))
    }
}

/// `host`: IPv4/IPv6 literal (scoped IPv6 included) or `localhost`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostValidator;

impl Validator for HostValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        if raw == "localhost" || raw.parse::<IpAddr>().is_ok() || is_scoped_ipv6(raw) {
            Ok(EnvValue::Host(raw.to_string()))
        } else {
            Err(format!("{raw:?} is not an IP address or localhost"))
        }
    }
}

/// `fe80::1%eth0`: an IPv6 address followed by a non-empty zone id.
fn is_scoped_ipv6(raw: &str) -> bool {
    match raw.split_once('%') {
        Some((addr, zone)) => {
            !zone.is_empty()
                && !zone.contains('%')
                && addr.parse::<Ipv6Addr>().is_ok()
        }
        None => false,
    }
}

/// `json`: any JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValidator;

impl Validator for JsonValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        serde_json::from_str::<Value>(raw)
            .map(EnvValue::Json)
            .map_err(|e| format!("invalid JSON: {e}"))
    }
}

/// `email`: local-part/domain grammar with a TLD of at least two letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        if raw.contains("..") {
            return Err(format!("{raw:?} contains consecutive dots"));
        }
        if email_regex().is_match(raw) {
            Ok(EnvValue::Email(raw.to_string()))
        } else {
            Err(format!("{raw:?} is not an e-mail address"))
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
    })
}

/// `integer`: integer prefix that equals the float prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator;

impl Validator for IntegerValidator {
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        let int = parse_int_prefix(raw).ok_or_else(|| format!("{raw:?} is not an integer"))?;
        match parse_float_prefix(raw) {
            Some(float) if float == int as f64 => Ok(EnvValue::Integer(int)),
            _ => Err(format!("{raw:?} is not a whole number")),
        }
    }
}

/// `uuidv4`: hyphenated RFC 4122 version-4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuidv4Validator;

impl Validator for Uuidv4Validator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        if raw.len() != 36 {
            return Err(format!("{raw:?} is not a hyphenated UUID"));
        }
        let uuid = Uuid::parse_str(raw).map_err(|e| format!("{raw:?} is not a UUID: {e}"))?;
        if uuid.get_version_num() != 4 {
            return Err(format!("{raw:?} is UUID version {}", uuid.get_version_num()));
        }
        if uuid.get_variant() != uuid::Variant::RFC4122 {
            return Err(format!("{raw:?} does not use the RFC 4122 variant"));
        }
        Ok(EnvValue::Uuid(raw.to_string()))
    }
}

/// `array`: JSON array, else comma-separated text.
///
/// The two paths produce different element types: `"[1,2]"` gives numbers,
/// `"1,2"` gives strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayValidator;

impl Validator for ArrayValidator {
    fn parse(&self, raw: &str) -> Result<EnvValue, String> {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
            return Ok(EnvValue::Array(items));
        }
        if raw.is_empty() {
            return Err("empty value is not a list".to_string());
        }
        Ok(EnvValue::Array(
            raw.split(',')
                .map(|item| Value::String(item.trim().to_string()))
                .collect(),
        ))
    }
}

/// Parse the longest floating-point literal at the start of `raw`.
///
/// Leading whitespace is skipped, an optional sign and `Infinity` are
/// accepted, trailing text is ignored.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        let frac_digits = frac_end - (end + 1);
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(bytes, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parse the decimal integer at the start of `raw`.
///
/// Leading whitespace is skipped, an optional sign is accepted, trailing
/// text is ignored. Returns `None` on overflow.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = skip_digits(bytes, start);
    if end == start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(v: &dyn Validator, raw: &str) -> EnvValue {
        v.parse(raw).unwrap()
    }

    #[test]
    fn test_string_accepts_anything() {
        assert_eq!(ok(&StringValidator, ""), EnvValue::String(String::new()));
        assert_eq!(ok(&StringValidator, " x "), EnvValue::String(" x ".into()));
    }

    #[test]
    fn test_number() {
        assert_eq!(ok(&NumberValidator, "3.5"), EnvValue::Number(3.5));
        assert_eq!(ok(&NumberValidator, "  -2e3"), EnvValue::Number(-2000.0));
        assert_eq!(ok(&NumberValidator, "12px"), EnvValue::Number(12.0));
        assert_eq!(ok(&NumberValidator, ".5"), EnvValue::Number(0.5));
        assert_eq!(ok(&NumberValidator, "7."), EnvValue::Number(7.0));
        assert_eq!(ok(&NumberValidator, "1e"), EnvValue::Number(1.0));
        assert_eq!(ok(&NumberValidator, "Infinity"), EnvValue::Number(f64::INFINITY));
        assert!(NumberValidator.parse("abc").is_err());
        assert!(NumberValidator.parse("").is_err());
        assert!(NumberValidator.parse("NaN").is_err());
        assert!(NumberValidator.parse(".").is_err());
        assert!(NumberValidator.parse("-").is_err());
    }

    #[test]
    fn test_boolean() {
        for word in TRUE_WORDS {
            assert_eq!(ok(&BooleanValidator, word), EnvValue::Boolean(true));
        }
        for word in FALSE_WORDS {
            assert_eq!(ok(&BooleanValidator, word), EnvValue::Boolean(false));
        }
        assert_eq!(ok(&BooleanValidator, "ENABLED"), EnvValue::Boolean(true));
        assert_eq!(ok(&BooleanValidator, "Off"), EnvValue::Boolean(false));
        assert!(BooleanValidator.parse("maybe").is_err());
        assert!(BooleanValidator.parse("").is_err());
    }

    #[test]
    fn test_port_boundaries() {
        assert!(PortValidator.parse("0").is_err());
        assert_eq!(ok(&PortValidator, "1"), EnvValue::Port(1));
        assert_eq!(ok(&PortValidator, "65535"), EnvValue::Port(65535));
        assert!(PortValidator.parse("65536").is_err());
        assert!(PortValidator.parse("-80").is_err());
        assert!(PortValidator.parse("http").is_err());
        assert!(PortValidator.parse("").is_err());
    }

    #[test]
    fn test_url() {
        assert_eq!(
            ok(&UrlValidator, "https://example.com/path?q=1"),
            EnvValue::Url("https://example.com/path?q=1".into())
        );
        assert!(UrlValidator.parse("postgres://user:pw@db:5432/app").is_ok());
        assert!(UrlValidator.parse("redis://localhost:6379").is_ok());
        assert!(UrlValidator.parse("example.com").is_err());
        assert!(UrlValidator.parse("/relative/path").is_err());
        assert!(UrlValidator.parse("").is_err());
        assert!(UrlValidator.parse("http://exa mple.com").is_err());
    }

    #[test]
    fn test_url_without_authority() {
        assert_eq!(
            ok(&UrlValidator, "sqlite:///data.db"),
            EnvValue::Url("sqlite:///data.db".into())
        );
        assert!(UrlValidator.parse("file:///tmp/x").is_ok());
        assert!(UrlValidator.parse("mailto:a@b.com").is_ok());
        assert!(UrlValidator.parse("urn:isbn:123").is_ok());
        assert!(UrlValidator.parse("://missing-scheme").is_err());
    }

    #[test]
    fn test_host() {
        assert!(HostValidator.parse("127.0.0.1").is_ok());
        assert!(HostValidator.parse("::1").is_ok());
        assert!(HostValidator.parse("fe80::1ff:fe23:4567:890a").is_ok());
        assert_eq!(ok(&HostValidator, "localhost"), EnvValue::Host("localhost".into()));
        assert!(HostValidator.parse("example.com").is_err());
        assert!(HostValidator.parse("256.0.0.1").is_err());
        assert!(HostValidator.parse("LOCALHOST").is_err());
    }

    #[test]
    fn test_host_scoped_ipv6() {
        assert_eq!(ok(&HostValidator, "fe80::1%eth0"), EnvValue::Host("fe80::1%eth0".into()));
        assert!(HostValidator.parse("fe80::1%25").is_ok());
        assert!(HostValidator.parse("fe80::1%").is_err());
        assert!(HostValidator.parse("10.0.0.1%eth0").is_err());
        assert!(HostValidator.parse("localhost%lo").is_err());
    }

    #[test]
    fn test_json() {
        assert_eq!(ok(&JsonValidator, r#"{"a":[1,2]}"#), EnvValue::Json(json!({"a": [1, 2]})));
        assert_eq!(ok(&JsonValidator, "42"), EnvValue::Json(json!(42)));
        assert_eq!(ok(&JsonValidator, "null"), EnvValue::Json(Value::Null));
        assert!(JsonValidator.parse("{a:1}").is_err());
        assert!(JsonValidator.parse("").is_err());
    }

    #[test]
    fn test_email() {
        assert!(EmailValidator.parse("a@b.co").is_ok());
        assert!(EmailValidator.parse("first.last+tag%x@mail-server.example.org").is_ok());
        assert!(EmailValidator.parse("a..b@x.com").is_err());
        assert!(EmailValidator.parse("a@b.c").is_err());
        assert!(EmailValidator.parse("a@b..com").is_err());
        assert!(EmailValidator.parse("no-at-sign.com").is_err());
        assert!(EmailValidator.parse("a@b.c0m").is_err());
    }

    #[test]
    fn test_integer() {
        assert_eq!(ok(&IntegerValidator, "42"), EnvValue::Integer(42));
        assert_eq!(ok(&IntegerValidator, "-7"), EnvValue::Integer(-7));
        assert_eq!(ok(&IntegerValidator, "1.0"), EnvValue::Integer(1));
        assert!(IntegerValidator.parse("1.5").is_err());
        assert!(IntegerValidator.parse("1e3").is_err());
        assert!(IntegerValidator.parse("abc").is_err());
        assert!(IntegerValidator.parse("").is_err());
    }

    #[test]
    fn test_uuidv4() {
        let valid = "d18d39a8-a4a0-484b-b676-0798ab3cc333";
        assert_eq!(ok(&Uuidv4Validator, valid), EnvValue::Uuid(valid.into()));
        assert!(Uuidv4Validator.parse(&valid.to_uppercase()).is_ok());
        assert!(Uuidv4Validator.parse("d18d39a8-a4a0-584b-b676-0798ab3cc333").is_err());
        assert!(Uuidv4Validator.parse("d18d39a8-a4a0-484b-c676-0798ab3cc333").is_err());
        assert!(Uuidv4Validator.parse("d18d39a8a4a0484bb6760798ab3cc333").is_err());
        assert!(Uuidv4Validator.parse("{d18d39a8-a4a0-484b-b676-0798ab3cc33}").is_err());
    }

    #[test]
    fn test_array_json_and_split() {
        assert_eq!(
            ok(&ArrayValidator, "[1,2,3]"),
            EnvValue::Array(vec![json!(1), json!(2), json!(3)])
        );
        assert_eq!(
            ok(&ArrayValidator, "1,2,3"),
            EnvValue::Array(vec![json!("1"), json!("2"), json!("3")])
        );
        assert_eq!(
            ok(&ArrayValidator, "a, b"),
            EnvValue::Array(vec![json!("a"), json!("b")])
        );
        assert_eq!(ok(&ArrayValidator, "5"), EnvValue::Array(vec![json!("5")]));
        assert!(ArrayValidator.parse("").is_err());
    }

    #[test]
    fn test_closure_validator() {
        let upper = |raw: &str| -> Result<EnvValue, String> {
            if raw.chars().all(|c| c.is_ascii_uppercase()) {
                Ok(EnvValue::String(raw.to_string()))
            } else {
                Err("not upper case".to_string())
            }
        };
        assert!(upper.parse("ABC").is_ok());
        assert!(upper.parse("abc").is_err());
    }

    #[test]
    fn test_int_prefix() {
        assert_eq!(parse_int_prefix(" 12abc"), Some(12));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), None);
    }
}
