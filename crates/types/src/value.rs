//! The runtime value model.
//!
//! Values follow JavaScript semantics because bindings are written in a
//! JavaScript-flavoured expression language: there is a distinguished
//! `Undefined` separate from `Null`, numbers are `f64`, and the coercion
//! helpers (`truthy`, `to_number`, `to_int32`, `type_name`, `Display`) mirror
//! the language's abstract operations.

use indexmap::IndexMap;
use regex::Regex;
use std::fmt;

/// Object members, in insertion order.
pub type Map = IndexMap<String, Value>;

/// A value produced by an expression or stored in a data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// The absent value. Returned for missing data; never an error.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A regular-expression literal.
    Pattern(Pattern),
    Array(Vec<Value>),
    Object(Map),
}

/// A compiled regular-expression literal that keeps its original source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` with the given flags.
    ///
    /// `i`, `m` and `s` map to the equivalent inline flags; `g`, `u` and `y`
    /// only affect how a pattern is applied and are kept for display.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let flags = flags.into();
        let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
        let compiled = if inline.is_empty() {
            Regex::new(&source)?
        } else {
            Regex::new(&format!("(?{}){}", inline, source))?
        };
        Ok(Self {
            source,
            flags,
            regex: compiled,
        })
    }

    /// The pattern text between the slashes.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Boolean coercion.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Pattern(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Numeric coercion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            // Arrays go through their string form: `[]` is 0, `[7]` is 7.
            Value::Array(_) => string_to_number(&self.to_string()),
            Value::Pattern(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// 32-bit signed integer coercion used by the bitwise operators.
    pub fn to_int32(&self) -> i32 {
        number_to_int32(self.to_number())
    }

    /// The tag reported by `typeof`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::Pattern(_) | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    /// Converts to JSON. `Undefined` becomes `null` and patterns become their
    /// `/source/flags` string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Pattern(p) => serde_json::Value::String(p.to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned.starts_with(['+', '-']) {
        return f64::NAN;
    }
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if sign > 0.0 && trimmed.as_bytes()[0] != b'+' {
        for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
            if let Some(digits) = unsigned.strip_prefix(prefix) {
                return u64::from_str_radix(digits, radix)
                    .map(|v| v as f64)
                    .unwrap_or(f64::NAN);
            }
        }
    }
    // Rust's float parser accepts words like "inf" and "nan"; the language does not.
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    unsigned.parse::<f64>().map(|v| sign * v).unwrap_or(f64::NAN)
}

fn number_to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let modulo = n.trunc().rem_euclid(4_294_967_296.0);
    (modulo as u32) as i32
}

fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Covers negative zero as well.
        f.write_str("0")
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    /// String coercion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(f, *n),
            Value::String(s) => f.write_str(s),
            Value::Pattern(p) => write!(f, "{}", p),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Pattern(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}
