//! Decoder for structured literal payloads.
//!
//! Decorator payloads are written in a JSON5 subset and decoded into
//! [`serde_json::Value`] with key order preserved.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde_json::{Map, Number, Value};

/// The structured literal parser.
#[derive(Parser)]
#[grammar = "parser/literal.pest"]
pub struct LiteralParser;

/// Why a payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Parser message, including the position of the failure.
    pub message: String,
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LiteralError {}

/// Decode a complete payload. Trailing input after the literal is an error.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut pairs = LiteralParser::parse(Rule::literal, text).map_err(|e| LiteralError {
        message: e.to_string(),
    })?;

    match pairs.next() {
        Some(pair) => convert(pair),
        None => Err(LiteralError {
            message: "empty payload".to_string(),
        }),
    }
}

/// Decode a payload that must be an object.
///
/// Returns `Ok(None)` when the payload is well formed but not an object.
pub fn parse_object(text: &str) -> Result<Option<Map<String, Value>>, LiteralError> {
    match parse_literal(text)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

fn convert(pair: Pair<'_, Rule>) -> Result<Value, LiteralError> {
    match pair.as_rule() {
        Rule::object => {
            let mut map = Map::new();
            for entry in pair.into_inner() {
                let mut inner = entry.into_inner();
                let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                    continue;
                };
                let key = match key.as_rule() {
                    Rule::string => unquote(key),
                    _ => key.as_str().to_string(),
                };
                map.insert(key, convert(value)?);
            }
            Ok(Value::Object(map))
        }
        Rule::array => pair
            .into_inner()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Rule::string => Ok(Value::String(unquote(pair))),
        Rule::number => parse_number(pair.as_str()).map(Value::Number),
        Rule::boolean => Ok(Value::Bool(pair.as_str() == "true")),
        Rule::null => Ok(Value::Null),
        rule => Err(LiteralError {
            message: format!("unexpected {:?}", rule),
        }),
    }
}

fn parse_number(raw: &str) -> Result<Number, LiteralError> {
    let invalid = || LiteralError {
        message: format!("invalid number `{}`", raw),
    };

    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        let magnitude = i64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return Ok(Number::from(if negative { -magnitude } else { magnitude }));
    }

    let is_float = digits.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(v) = format!("{}{}", if negative { "-" } else { "" }, digits).parse::<i64>() {
            return Ok(Number::from(v));
        }
        if !negative {
            if let Ok(v) = digits.parse::<u64>() {
                return Ok(Number::from(v));
            }
        }
    }

    let v: f64 = digits.parse().map_err(|_| invalid())?;
    Number::from_f64(if negative { -v } else { v }).ok_or_else(invalid)
}

fn unquote(pair: Pair<'_, Rule>) -> String {
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    unescape(raw)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            // Line continuation.
            Some('\n') => {}
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&code);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
