//! Attribute path reader
//!
//! Turns a tag expression such as `<item.food.nutrition>` or
//! `map.get[effects].first` into ordered steps, each with a name and an
//! optional bracketed parameter, and tracks how many steps have been consumed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::literal::{matching_bracket, split_top_level};
use crate::error::TagError;

/// One step of an attribute path: `name` or `name[param]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStep {
    pub name: String,
    pub param: Option<String>,
}

impl AttributeStep {
    fn parse(raw: &str) -> Result<Self, TagError> {
        let (name, param) = match raw.find('[') {
            None => {
                if raw.contains(']') {
                    return Err(TagError::parse(format!("Unbalanced ']' in '{}'", raw)));
                }
                (raw, None)
            }
            Some(open) => {
                let close = matching_bracket(raw, open)
                    .ok_or_else(|| TagError::parse(format!("Unclosed '[' in '{}'", raw)))?;
                if close != raw.len() - 1 {
                    return Err(TagError::parse(format!(
                        "Unexpected text after parameter in '{}'",
                        raw
                    )));
                }
                (&raw[..open], Some(raw[open + 1..close].to_string()))
            }
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(TagError::parse(format!("Empty attribute name in '{}'", raw)));
        }
        Ok(Self {
            name: name.to_ascii_lowercase(),
            param,
        })
    }
}

impl fmt::Display for AttributeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}[{}]", self.name, param),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A parsed attribute path with a cursor over its steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    raw: String,
    steps: Vec<AttributeStep>,
    cursor: usize,
}

impl Attribute {
    /// Parse a dotted/bracketed attribute expression.
    ///
    /// A single pair of surrounding angle brackets is ignored. Dots inside a
    /// parameter do not split (`get[1.5].abs` has two steps).
    ///
    /// # Errors
    ///
    /// Returns `TagError::Parse` for empty input, empty step names and
    /// unbalanced brackets.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(trimmed);
        if inner.is_empty() {
            return Err(TagError::parse("Empty attribute path"));
        }
        let steps = split_top_level(inner, '.')
            .into_iter()
            .map(AttributeStep::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: inner.to_string(),
            steps,
            cursor: 0,
        })
    }

    /// The step under the cursor.
    pub fn current(&self) -> Option<&AttributeStep> {
        self.steps.get(self.cursor)
    }

    /// Name of the step under the cursor, or `""` once complete.
    pub fn name(&self) -> &str {
        self.current().map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn param(&self) -> Option<&str> {
        self.current().and_then(|s| s.param.as_deref())
    }

    pub fn has_param(&self) -> bool {
        self.param().is_some()
    }

    /// Step `offset` positions past the cursor.
    pub fn step_at(&self, offset: usize) -> Option<&AttributeStep> {
        self.steps.get(self.cursor + offset)
    }

    /// Whether the step `offset` positions past the cursor is named `name`.
    pub fn starts_with(&self, name: &str, offset: usize) -> bool {
        self.step_at(offset)
            .is_some_and(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Marks `count` steps as consumed.
    pub fn fulfill(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.steps.len());
    }

    pub fn fulfilled(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn steps(&self) -> &[AttributeStep] {
        &self.steps
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
