//! Validated namespaced keys for materials and potion effects
//!
//! Keys are stored lowercase without the default `minecraft:` namespace, so
//! `Minecraft:Oak_Slab` and `oak_slab` are the same key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TagError;

const DEFAULT_NAMESPACE: &str = "minecraft:";

/// Maximum length for a namespaced key
const MAX_KEY_LENGTH: usize = 128;

fn normalize_key(kind: &str, raw: &str) -> Result<String, TagError> {
    let lowered = raw.trim().to_ascii_lowercase();
    let key = lowered
        .strip_prefix(DEFAULT_NAMESPACE)
        .unwrap_or(&lowered)
        .to_string();
    if key.is_empty() {
        return Err(TagError::validation(format!("{} key cannot be empty", kind)));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(TagError::validation(format!(
            "{} key cannot exceed {} characters",
            kind, MAX_KEY_LENGTH
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || "_-./:".contains(*c)))
    {
        return Err(TagError::validation(format!(
            "{} key '{}' contains invalid character '{}'",
            kind, raw, bad
        )));
    }
    Ok(key)
}

// ============================================================================
// MaterialKey
// ============================================================================

/// A validated material key such as `apple` or `oak_slab`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MaterialKey(String);

impl MaterialKey {
    /// # Errors
    ///
    /// Returns `TagError::Validation` if the key is empty, too long, or has
    /// characters outside `[a-z0-9_-./:]`.
    pub fn new(key: impl AsRef<str>) -> Result<Self, TagError> {
        normalize_key("Material", key.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_air(&self) -> bool {
        matches!(self.0.as_str(), "air" | "cave_air" | "void_air")
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MaterialKey {
    type Error = TagError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MaterialKey> for String {
    fn from(key: MaterialKey) -> String {
        key.0
    }
}

// ============================================================================
// EffectKey
// ============================================================================

/// A validated potion effect key such as `jump_boost`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EffectKey(String);

impl EffectKey {
    pub fn new(key: impl AsRef<str>) -> Result<Self, TagError> {
        normalize_key("Effect", key.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EffectKey {
    type Error = TagError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EffectKey> for String {
    fn from(key: EffectKey) -> String {
        key.0
    }
}
