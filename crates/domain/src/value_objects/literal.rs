//! Low-level helpers for the literal grammar.
//!
//! Structural characters (`|`, `;`, `=`, `[`, `]`) are only meaningful at
//! bracket depth zero. Element text never contains them raw: [`escape`]
//! replaces them with `&`-codes so any element survives a trip through a list
//! or map literal.

const ESCAPES: [(&str, &str); 5] = [
    ("|", "&pipe"),
    (";", "&sc"),
    ("[", "&lb"),
    ("]", "&rb"),
    ("=", "&eq"),
];

/// Escapes element text for embedding in a literal.
pub fn escape(text: &str) -> String {
    let mut out = text.replace('&', "&amp");
    for (raw, code) in ESCAPES {
        out = out.replace(raw, code);
    }
    out
}

/// Reverses [`escape`]. Unknown `&`-sequences are kept verbatim.
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (raw, code) in ESCAPES {
        out = out.replace(code, raw);
    }
    out.replace("&amp", "&")
}

/// Splits `text` on `separator` wherever the bracket depth is zero.
///
/// Unbalanced closing brackets are treated as depth zero.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte index of the first `needle` at bracket depth zero.
pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}

/// Whether `text` is one bracket group: starts with `[` whose matching `]` is
/// the final character.
pub fn is_bracket_wrapped(text: &str) -> bool {
    if !text.starts_with('[') || !text.ends_with(']') {
        return false;
    }
    matching_bracket(text, 0) == Some(text.len() - 1)
}

/// Byte index of the `]` matching the `[` at `open`.
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text[open..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}
