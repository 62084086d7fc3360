//! Mechanism invocations and the helpers properties use to validate input.

use std::fmt::Display;
use std::str::FromStr;

use mechanist_domain::{TagError, TagMap, TagValue};

/// Where a tag or mechanism call came from, for error reporting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptContext {
    pub script: Option<String>,
}

impl ScriptContext {
    pub fn script(name: impl Into<String>) -> Self {
        Self {
            script: Some(name.into()),
        }
    }

    /// Name used in log lines; `<none>` outside of a script.
    pub fn label(&self) -> &str {
        self.script.as_deref().unwrap_or("<none>")
    }
}

/// A named write against a typed object
#[derive(Debug, Clone, PartialEq)]
pub struct Mechanism {
    /// Lowercased mechanism name
    pub name: String,
    pub value: TagValue,
    pub context: ScriptContext,
}

impl Mechanism {
    pub fn new(name: impl AsRef<str>, value: impl Into<TagValue>) -> Self {
        Self {
            name: name.as_ref().trim().to_ascii_lowercase(),
            value: value.into(),
            context: ScriptContext::default(),
        }
    }

    pub fn with_context(mut self, context: ScriptContext) -> Self {
        self.context = context;
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn invalid(&self, reason: impl Into<String>) -> TagError {
        TagError::invalid_value(&self.name, reason)
    }

    pub fn require_bool(&self) -> Result<bool, TagError> {
        self.value
            .as_bool()
            .ok_or_else(|| self.invalid(format!("'{}' is not a boolean", self.value)))
    }

    pub fn require_int(&self) -> Result<i64, TagError> {
        self.value
            .as_int()
            .ok_or_else(|| self.invalid(format!("'{}' is not a whole number", self.value)))
    }

    pub fn require_decimal(&self) -> Result<f64, TagError> {
        self.value
            .as_decimal()
            .ok_or_else(|| self.invalid(format!("'{}' is not a number", self.value)))
    }

    /// Parses the value as one of an enum's names.
    pub fn require_enum<T>(&self) -> Result<T, TagError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.value
            .as_text()
            .parse::<T>()
            .map_err(|e| self.invalid(e.to_string()))
    }

    pub fn value_as_map(&self) -> Result<TagMap, TagError> {
        self.value.as_map().map_err(|e| self.invalid(e.to_string()))
    }
}
