//! Script values: element, ordered list, ordered key-unique map.
//!
//! These are the only literal types the scripting layer has. Every value has a
//! canonical text form ([`TagValue::identify`]) that [`TagValue::parse`] reads
//! back:
//!
//! - element: escaped text (`a&pipeb` for `a|b`)
//! - list: entries joined by `|`, one-entry lists end with `|`, the empty list
//!   is a lone `|` and an empty entry is written `&empty`
//! - map: `[key=value;key=value]`
//!
//! Consumers coerce on demand (`as_list`, `as_map`, `as_bool`, ...), so an
//! element holding `a|b` is as good as a two-entry list.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::literal::{
    escape, find_top_level, is_bracket_wrapped, split_top_level, unescape,
};
use crate::common::{format_decimal, format_f32};
use crate::error::TagError;

/// Stand-in for an empty entry inside a list literal
const EMPTY_ENTRY: &str = "&empty";

/// Ordered, key-unique map of script values
pub type TagMap = IndexMap<String, TagValue>;

/// A script value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Element(String),
    List(Vec<TagValue>),
    Map(TagMap),
}

impl TagValue {
    pub fn element(text: impl Into<String>) -> Self {
        Self::Element(text.into())
    }

    /// Builds a map value from key/value pairs; later duplicates win.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<TagValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<TagValue>, I: IntoIterator<Item = V>>(entries: I) -> Self {
        Self::List(entries.into_iter().map(Into::into).collect())
    }

    /// Parses the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns `TagError::Parse` when a bracketed map contains a segment
    /// without `=`.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        if is_bracket_wrapped(text) {
            return parse_map_body(&text[1..text.len() - 1]).map(Self::Map);
        }
        if find_top_level(text, '|').is_some() {
            let mut parts = split_top_level(text, '|');
            // Trailing terminator of a one-entry list, or the lone `|` of an
            // empty one
            if parts.last().is_some_and(|last| last.is_empty()) {
                parts.pop();
            }
            if parts == [""] {
                return Ok(Self::List(Vec::new()));
            }
            return parts
                .into_iter()
                .map(|part| match part {
                    EMPTY_ENTRY => Ok(Self::Element(String::new())),
                    other => Self::parse(other),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List);
        }
        Ok(Self::Element(unescape(text)))
    }

    /// Canonical text form.
    pub fn identify(&self) -> String {
        match self {
            Self::Element(text) => escape(text),
            Self::List(items) if items.is_empty() => "|".to_string(),
            Self::List(items) => {
                let mut out = items
                    .iter()
                    .map(|item| match item {
                        // A bare nested list would merge into its parent
                        Self::List(_) => escape(&item.identify()),
                        Self::Element(text) if text.is_empty() => EMPTY_ENTRY.to_string(),
                        other => other.identify(),
                    })
                    .collect::<Vec<_>>()
                    .join("|");
                if items.len() == 1 {
                    out.push('|');
                }
                out
            }
            Self::Map(map) => {
                let body = map
                    .iter()
                    .map(|(key, value)| format!("{}={}", escape(key), value.identify()))
                    .collect::<Vec<_>>()
                    .join(";");
                format!("[{}]", body)
            }
        }
    }

    /// Plain text: the raw element, or the identify form of a list/map.
    pub fn as_text(&self) -> String {
        match self {
            Self::Element(text) => text.clone(),
            other => other.identify(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Element(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    /// Coerces to a list. Elements are split on top-level `|`; a map becomes
    /// a one-entry list.
    pub fn as_list(&self) -> Vec<TagValue> {
        match self {
            Self::List(items) => items.clone(),
            Self::Map(_) => vec![self.clone()],
            Self::Element(text) if text.is_empty() => Vec::new(),
            Self::Element(text) => match Self::parse(text) {
                Ok(Self::List(items)) => items,
                Ok(other) => vec![other],
                Err(_) => vec![self.clone()],
            },
        }
    }

    /// Coerces to a map.
    ///
    /// Accepts a map, a bracketed or bare `key=value;key=value` element, or a
    /// list whose entries are `key=value` elements.
    ///
    /// # Errors
    ///
    /// Returns `TagError::Parse` naming the first entry that is not a
    /// `key=value` pair.
    pub fn as_map(&self) -> Result<TagMap, TagError> {
        match self {
            Self::Map(map) => Ok(map.clone()),
            Self::List(items) => list_to_map(items),
            Self::Element(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(TagMap::new());
                }
                if is_bracket_wrapped(trimmed) {
                    return parse_map_body(&trimmed[1..trimmed.len() - 1]);
                }
                if find_top_level(trimmed, '|').is_some() {
                    return list_to_map(&self.as_list());
                }
                parse_map_body(trimmed)
            }
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Element(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Integer value; whole decimals such as `5.0` are accepted.
    pub fn as_int(&self) -> Option<i64> {
        let Self::Element(text) = self else {
            return None;
        };
        let text = text.trim();
        text.parse::<i64>().ok().or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        })
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Element(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

fn parse_map_body(body: &str) -> Result<TagMap, TagError> {
    let mut map = TagMap::new();
    if body.trim().is_empty() {
        return Ok(map);
    }
    for segment in split_top_level(body, ';') {
        if segment.is_empty() {
            continue;
        }
        let eq = find_top_level(segment, '=').ok_or_else(|| {
            TagError::parse(format!("Map entry '{}' is not a key=value pair", segment))
        })?;
        let key = unescape(segment[..eq].trim());
        if key.is_empty() {
            return Err(TagError::parse(format!("Map entry '{}' has an empty key", segment)));
        }
        map.insert(key, TagValue::parse(&segment[eq + 1..])?);
    }
    Ok(map)
}

fn list_to_map(items: &[TagValue]) -> Result<TagMap, TagError> {
    let mut map = TagMap::new();
    for item in items {
        match item {
            TagValue::Map(inner) => map.extend(inner.clone()),
            other => {
                let text = other.as_text();
                let (key, value) = text.split_once('=').ok_or_else(|| {
                    TagError::parse(format!("List entry '{}' is not a key=value pair", text))
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(TagError::parse(format!("List entry '{}' has an empty key", text)));
                }
                map.insert(key.to_string(), TagValue::Element(value.trim().to_string()));
            }
        }
    }
    Ok(map)
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Element(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<usize> for TagValue {
    fn from(value: usize) -> Self {
        Self::Element(value.to_string())
    }
}

impl From<f32> for TagValue {
    fn from(value: f32) -> Self {
        Self::Element(format_f32(value))
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        Self::Element(format_decimal(value))
    }
}

impl From<Vec<TagValue>> for TagValue {
    fn from(value: Vec<TagValue>) -> Self {
        Self::List(value)
    }
}

impl From<TagMap> for TagValue {
    fn from(value: TagMap) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_with_special_characters_round_trips() {
        let value = TagValue::element("a|b;c=[d]");
        assert_eq!(TagValue::parse(&value.identify()), Ok(value));
    }

    #[test]
    fn list_identify_and_parse() {
        let value = TagValue::list(["a", "b", "c"]);
        assert_eq!(value.identify(), "a|b|c");
        assert_eq!(TagValue::parse("a|b|c"), Ok(value));
    }

    #[test]
    fn single_entry_list_keeps_trailing_pipe() {
        let value = TagValue::list(["only"]);
        assert_eq!(value.identify(), "only|");
        assert_eq!(TagValue::parse("only|"), Ok(value));
    }

    #[test]
    fn lists_with_empty_entries_round_trip() {
        let trailing = TagValue::list(["a", ""]);
        assert_eq!(trailing.identify(), "a|&empty");
        assert_eq!(TagValue::parse(&trailing.identify()), Ok(trailing));

        let blanks = TagValue::list(["", ""]);
        assert_eq!(blanks.identify(), "&empty|&empty");
        assert_eq!(TagValue::parse(&blanks.identify()), Ok(blanks));

        let single = TagValue::list([""]);
        assert_eq!(TagValue::parse(&single.identify()), Ok(single));
    }

    #[test]
    fn empty_list_round_trips() {
        let value = TagValue::List(vec![]);
        assert_eq!(value.identify(), "|");
        assert_eq!(TagValue::parse("|"), Ok(value));
        assert_eq!(TagValue::parse(""), Ok(TagValue::element("")));
    }

    #[test]
    fn element_spelled_like_empty_entry_is_escaped() {
        let value = TagValue::list(["&empty", "b"]);
        assert_eq!(TagValue::parse(&value.identify()), Ok(value));
    }

    #[test]
    fn map_identify_keeps_insertion_order() {
        let value = TagValue::map([("nutrition", "5"), ("saturation", "1")]);
        assert_eq!(value.identify(), "[nutrition=5;saturation=1]");
    }

    #[test]
    fn nested_map_in_list_round_trips() {
        let value = TagValue::list([
            TagValue::map([("type", "speed"), ("duration", "30")]),
            TagValue::map([("type", "jump_boost"), ("duration", "60")]),
        ]);
        let text = value.identify();
        assert_eq!(text, "[type=speed;duration=30]|[type=jump_boost;duration=60]");
        assert_eq!(TagValue::parse(&text), Ok(value));
    }

    #[test]
    fn list_nested_in_list_is_escaped() {
        let value = TagValue::list([TagValue::list(["x", "y"]), TagValue::from("z")]);
        let parsed = TagValue::parse(&value.identify()).unwrap();
        let items = parsed.as_list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_list(), vec![TagValue::from("x"), TagValue::from("y")]);
    }

    #[test]
    fn map_with_missing_equals_is_rejected() {
        assert!(matches!(TagValue::parse("[a=1;oops]"), Err(TagError::Parse(_))));
    }

    #[test]
    fn as_map_accepts_bare_pairs() {
        let map = TagValue::from("nutrition=5;saturation=1").as_map().unwrap();
        assert_eq!(map.get("nutrition"), Some(&TagValue::from("5")));
        assert_eq!(map.get("saturation"), Some(&TagValue::from("1")));
    }

    #[test]
    fn as_map_accepts_list_of_pairs() {
        let map = TagValue::from("nutrition=5|can_always_eat=true").as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("can_always_eat").and_then(TagValue::as_bool), Some(true));
    }

    #[test]
    fn as_map_rejects_plain_element() {
        assert!(TagValue::from("hello").as_map().is_err());
    }

    #[test]
    fn as_list_of_plain_element_is_single_entry() {
        assert_eq!(TagValue::from("solo").as_list(), vec![TagValue::from("solo")]);
        assert!(TagValue::from("").as_list().is_empty());
    }

    #[test]
    fn scalar_coercions() {
        assert_eq!(TagValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(TagValue::from("maybe").as_bool(), None);
        assert_eq!(TagValue::from("5.0").as_int(), Some(5));
        assert_eq!(TagValue::from("5.5").as_int(), None);
        assert_eq!(TagValue::from(" 0.25 ").as_decimal(), Some(0.25));
        assert_eq!(TagValue::from(1.0f32), TagValue::from("1"));
    }

    #[test]
    fn empty_map_round_trips() {
        let value = TagValue::Map(TagMap::new());
        assert_eq!(value.identify(), "[]");
        assert_eq!(TagValue::parse("[]"), Ok(value));
    }
}
