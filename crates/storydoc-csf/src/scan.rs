//! String and comment aware scanning over JavaScript-like source text.
//!
//! Nothing here understands a grammar. The helpers know just enough about
//! quotes, comments and bracket nesting to find where a delimited region ends
//! and to split a region at its top level. Unbalanced input never panics; it
//! simply yields `None` or runs to the end of the text.

/// An entry of an object literal, split at its top level.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    /// `key: value` (the key is already unquoted)
    Pair { key: &'a str, value: &'a str },
    /// `key` shorthand
    Shorthand(&'a str),
    /// `...expr`
    Spread(&'a str),
    /// Methods, computed keys and anything else without a plain key
    Other(&'a str),
}

/// Return the index just past the string literal that opens at `start`.
///
/// Handles `'`, `"` and backtick literals including `${}` interpolation.
/// An unterminated literal runs to the end of the input.
pub fn skip_string(src: &str, start: usize) -> usize {
    let bytes = src.as_bytes();
    let Some(&quote) = bytes.get(start) else {
        return src.len();
    };

    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
        } else if b == quote {
            return i + 1;
        } else if quote == b'`' && b == b'$' && bytes.get(i + 1) == Some(&b'{') {
            match find_matching(src, i + 1) {
                Some(close) => i = close + 1,
                None => return src.len(),
            }
        } else {
            i += 1;
        }
    }

    src.len()
}

/// If a comment starts at `i`, return the index just past it.
fn skip_comment(src: &str, i: usize) -> Option<usize> {
    let rest = src.get(i..)?;
    if rest.starts_with("//") {
        Some(rest.find('\n').map_or(src.len(), |n| i + n))
    } else if let Some(body) = rest.strip_prefix("/*") {
        Some(body.find("*/").map_or(src.len(), |n| i + 2 + n + 2))
    } else {
        None
    }
}

/// Visit every byte outside strings and comments with its nesting depth.
///
/// Openers are reported at the depth outside them and closers at the depth
/// they return to, so a matching pair shares one depth. Returning `false`
/// from `visit` stops the walk.
fn visit_code(src: &str, mut visit: impl FnMut(usize, u8, usize) -> bool) {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            // A quote glued to a word is prose (JSX text such as `Don't`).
            b'\'' | b'"' if i > 0 && is_identifier_byte(bytes[i - 1]) => {}
            b'\'' | b'"' | b'`' => {
                i = skip_string(src, i);
                continue;
            }
            b'/' => {
                if let Some(end) = skip_comment(src, i) {
                    i = end;
                    continue;
                }
            }
            _ => {}
        }

        if matches!(b, b'}' | b']' | b')') {
            depth = depth.saturating_sub(1);
        }
        if !visit(i, b, depth) {
            return;
        }
        if matches!(b, b'{' | b'[' | b'(') {
            depth += 1;
        }
        i += 1;
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Find the bracket closing the `{`, `[` or `(` at `open`.
pub fn find_matching(src: &str, open: usize) -> Option<usize> {
    let tail = src.get(open..)?;
    if !matches!(tail.as_bytes().first(), Some(b'{' | b'[' | b'(')) {
        return None;
    }

    let mut found = None;
    visit_code(tail, |i, b, depth| {
        if i > 0 && depth == 0 && matches!(b, b'}' | b']' | b')') {
            found = Some(open + i);
            false
        } else {
            true
        }
    });
    found
}

/// Find the first occurrence of `target` outside strings, comments and brackets.
pub fn find_top_level(src: &str, target: u8) -> Option<usize> {
    let mut found = None;
    visit_code(src, |i, b, depth| {
        if depth == 0 && b == target {
            found = Some(i);
            false
        } else {
            true
        }
    });
    found
}

/// Find a top-level `=` that is an assignment rather than part of `=>`, `==`,
/// `<=`, `>=` or `!=`.
pub fn find_assignment(src: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut found = None;
    visit_code(src, |i, b, depth| {
        let is_assignment = depth == 0
            && b == b'='
            && !matches!(bytes.get(i + 1), Some(b'=' | b'>'))
            && !matches!(i.checked_sub(1).map(|p| bytes[p]), Some(b'=' | b'!' | b'<' | b'>'));
        if is_assignment {
            found = Some(i);
            false
        } else {
            true
        }
    });
    found
}

/// Split `src` at every top-level `sep`, trimming and dropping empty parts.
pub fn split_top_level(src: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    visit_code(src, |i, b, depth| {
        if depth == 0 && b == sep {
            parts.push(&src[start..i]);
            start = i + 1;
        }
        true
    });
    parts.push(&src[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split the body of a TypeScript interface or type literal into members.
///
/// Members may be separated by `;`, `,` or a line break. Angle brackets count
/// as nesting here so `Record<string, number>` stays in one piece, and a line
/// break inside a union or after `:` does not end the member.
pub fn split_members(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut angle = 0usize;
    let mut start = 0;

    visit_code(body, |i, b, depth| {
        match b {
            b'<' => angle += 1,
            b'>' if i == 0 || bytes[i - 1] != b'=' => angle = angle.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && angle == 0 {
            let split = match b {
                b';' | b',' => true,
                b'\n' => ends_member(&body[start..i]) && !continues_type(&body[i + 1..]),
                _ => false,
            };
            if split {
                parts.push(&body[start..i]);
                start = i + 1;
            }
        }
        true
    });
    parts.push(&body[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn ends_member(text: &str) -> bool {
    match text.trim_end().chars().last() {
        Some(c) => !matches!(c, '|' | '&' | ':' | '=' | ',' | '(' | '<' | '{' | '[' | '?'),
        None => false,
    }
}

fn continues_type(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.starts_with('|') || rest.starts_with('&') || rest.starts_with("=>")
}

/// Return the inner text of a braced region if `text` is exactly one
/// balanced `{...}` or `[...]`.
pub fn inner(text: &str) -> Option<&str> {
    let text = text.trim();
    let close = find_matching(text, 0)?;
    (close == text.len() - 1).then(|| &text[1..close])
}

/// Split an object literal (braces included) into its top-level entries.
pub fn object_entries(object: &str) -> Option<Vec<Entry<'_>>> {
    let body = inner(object)?;
    if !object.trim_start().starts_with('{') {
        return None;
    }

    let entries = split_top_level(body, b',')
        .into_iter()
        .map(|chunk| {
            let (_, chunk) = split_leading_comments(chunk);
            if let Some(spread) = chunk.strip_prefix("...") {
                return Entry::Spread(spread.trim());
            }
            if is_identifier(chunk) {
                return Entry::Shorthand(chunk);
            }
            let Some(colon) = find_top_level(chunk, b':') else {
                return Entry::Other(chunk);
            };
            match unquote_key(chunk[..colon].trim()) {
                Some(key) => Entry::Pair {
                    key,
                    value: chunk[colon + 1..].trim(),
                },
                None => Entry::Other(chunk),
            }
        })
        .collect();

    Some(entries)
}

/// Look up the value text of a top-level `key` in an object literal.
pub fn object_value<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    object_entries(object)?.into_iter().find_map(|entry| match entry {
        Entry::Pair { key: k, value } if k == key => Some(value),
        _ => None,
    })
}

/// Accept an identifier, numeric or quoted key and return it unquoted.
fn unquote_key(key: &str) -> Option<&str> {
    if is_identifier(key) || (!key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())) {
        return Some(key);
    }
    let bytes = key.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'\''), Some(b'\'')) | (Some(b'"'), Some(b'"')) if key.len() >= 2 => {
            Some(&key[1..key.len() - 1])
        }
        _ => None,
    }
}

/// Whether `text` is a JavaScript identifier (ASCII subset).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Strip comments in front of `chunk`, returning the last block comment's
/// cleaned text together with the remainder.
pub fn split_leading_comments(chunk: &str) -> (Option<String>, &str) {
    let mut rest = chunk.trim_start();
    let mut doc = None;

    loop {
        if let Some(after) = rest.strip_prefix("/*") {
            let Some(end) = after.find("*/") else {
                break;
            };
            doc = clean_block_comment(&after[..end]);
            rest = after[end + 2..].trim_start();
        } else if rest.starts_with("//") {
            rest = rest.find('\n').map_or("", |n| &rest[n + 1..]).trim_start();
        } else {
            break;
        }
    }

    (doc, rest)
}

/// Return the cleaned block comment that ends right before `pos`.
///
/// Only whitespace may separate the comment from `pos`.
pub fn comment_before(src: &str, pos: usize) -> Option<String> {
    let head = src.get(..pos)?.trim_end();
    let body_end = head.strip_suffix("*/")?;
    let start = body_end.rfind("/*")?;
    clean_block_comment(&body_end[start + 2..])
}

/// Clean the body of a `/* */` or `/** */` comment.
///
/// Leading `*` gutters are removed and the text stops at the first `@tag`
/// line. Returns `None` if nothing remains.
pub fn clean_block_comment(body: &str) -> Option<String> {
    let body = body.strip_prefix('*').unwrap_or(body);
    let text = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map_or(line, str::trim_start)
        })
        .take_while(|line| !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join("\n");

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
