//! Lenient decoding of JavaScript object literals into JSON values.
//!
//! Story args are written as JavaScript, not JSON: unquoted keys, single
//! quotes, trailing commas and comments are all common. Plain data is decoded;
//! anything that needs evaluation (calls, identifiers, arrow functions) is
//! left out of the decoded value.

use serde_json::{Map, Number, Value};

use crate::scan::{self, Entry};

/// Decode a literal expression into a JSON value.
///
/// Returns `None` for expressions that are not plain data, including
/// `undefined`.
pub fn decode_literal(text: &str) -> Option<Value> {
    let text = strip_type_suffix(text.trim());

    match text.as_bytes().first()? {
        b'{' => decode_object(text).map(Value::Object),
        b'[' => decode_array(text),
        b'\'' | b'"' | b'`' => string_literal(text).map(Value::String),
        _ => decode_scalar(text),
    }
}

/// Decode an object literal, skipping entries whose values are not plain data.
pub fn decode_object(text: &str) -> Option<Map<String, Value>> {
    let entries = scan::object_entries(strip_type_suffix(text.trim()))?;

    let mut map = Map::new();
    for entry in entries {
        if let Entry::Pair { key, value } = entry {
            if let Some(value) = decode_literal(value) {
                map.insert(key.to_string(), value);
            }
        }
    }
    Some(map)
}

fn decode_array(text: &str) -> Option<Value> {
    let body = scan::inner(text)?;
    let items = scan::split_top_level(body, b',')
        .into_iter()
        .filter_map(|item| decode_literal(scan::split_leading_comments(item).1))
        .collect();
    Some(Value::Array(items))
}

fn decode_scalar(text: &str) -> Option<Value> {
    match text {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }

    let digits = text.replace('_', "");
    if let Ok(n) = digits.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    let looks_numeric = digits
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if looks_numeric {
        return digits
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number);
    }
    None
}

/// Decode a single quoted string literal.
///
/// Template literals are accepted only without `${}` interpolation.
pub fn string_literal(text: &str) -> Option<String> {
    let text = text.trim();
    let quote = *text.as_bytes().first()?;
    if !matches!(quote, b'\'' | b'"' | b'`') || scan::skip_string(text, 0) != text.len() {
        return None;
    }
    if text.len() < 2 || text.as_bytes()[text.len() - 1] != quote {
        return None;
    }

    let body = &text[1..text.len() - 1];
    if quote == b'`' && body.contains("${") {
        return None;
    }
    Some(unescape(body))
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Drop a trailing `as T` / `satisfies T` after a balanced object or array.
fn strip_type_suffix(text: &str) -> &str {
    if !text.starts_with(['{', '[']) {
        return text;
    }
    match scan::find_matching(text, 0) {
        Some(close) => {
            let rest = text[close + 1..].trim_start();
            if rest.is_empty() || rest.starts_with("as ") || rest.starts_with("satisfies ") {
                &text[..=close]
            } else {
                text
            }
        }
        None => text,
    }
}
