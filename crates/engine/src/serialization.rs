//! Identify / parse for typed objects.
//!
//! Host-backed objects are written as `<prefix><base>[<props>]`:
//!
//! - `i@apple[food=[nutrition=5;saturation=1;can_always_eat=true]]`
//! - `m@oak_slab[type=TOP]`
//! - `p@<uuid>`
//!
//! `props` lists `id=value` for each registered property whose string is not
//! `None`, in registration order. Plain values use the `TagValue` grammar.

use tracing::warn;

use mechanist_domain::common::strip_prefix_ignore_case;
use mechanist_domain::value_objects::literal::{find_top_level, matching_bracket, split_top_level};
use mechanist_domain::{
    ItemStack, ItemTag, MaterialKey, MaterialState, MaterialTag, ObjectTag, PlayerId,
    PlayerTag, TagError, TagValue,
};

use crate::engine::Engine;
use crate::mechanism::Mechanism;

/// Result of [`Engine::parse`]: the object plus every segment that could not
/// be applied
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedObject {
    pub object: ObjectTag,
    /// `MalformedPropertyLiteral` for each skipped segment
    pub errors: Vec<TagError>,
}

impl ParsedObject {
    fn clean(object: ObjectTag) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Engine {
    /// Canonical literal for `object`.
    pub fn identify(&self, object: &ObjectTag) -> Result<String, TagError> {
        let base = match object {
            ObjectTag::Value(value) => return Ok(value.identify()),
            ObjectTag::Item(item) => self.host().items.stack(item.id())?.material.to_string(),
            ObjectTag::Material(material) => {
                self.host().materials.state(material.id())?.key.to_string()
            }
            ObjectTag::Player(player) => player.id().to_string(),
        };
        let prefix = object.object_type().literal_prefix().unwrap_or_default();
        let properties = self.property_strings(object)?;
        if properties.is_empty() {
            Ok(format!("{}{}", prefix, base))
        } else {
            Ok(format!("{}{}[{}]", prefix, base, properties.join(";")))
        }
    }

    fn property_strings(&self, object: &ObjectTag) -> Result<Vec<String>, TagError> {
        let mut out = Vec::new();
        for descriptor in self.registry().properties_for(object.object_type()) {
            if let Some(value) = descriptor.property_string(object, self.host())? {
                out.push(format!("{}={}", descriptor.id, value));
            }
        }
        Ok(out)
    }

    /// Reads a literal back into an object.
    ///
    /// Item and material literals create a fresh host object and apply each
    /// `key=value` segment through the mechanism named `key`. Segments that
    /// fail are logged, collected in [`ParsedObject::errors`] and skipped.
    ///
    /// # Errors
    ///
    /// `Parse` when the base itself is invalid (bad material key, unknown
    /// player, unbalanced property brackets).
    pub fn parse(&self, text: &str) -> Result<ParsedObject, TagError> {
        let trimmed = text.trim();
        if let Some(rest) = strip_prefix_ignore_case(trimmed, "i@") {
            let (base, props) = split_base(rest)?;
            let key = material_key(base)?;
            let id = self.host().items.create(ItemStack::new(key));
            return Ok(self.apply_properties(ObjectTag::Item(ItemTag(id)), props));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, "m@") {
            let (base, props) = split_base(rest)?;
            let key = material_key(base)?;
            let id = self.host().materials.create(MaterialState::from_key(key));
            return Ok(self.apply_properties(ObjectTag::Material(MaterialTag(id)), props));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, "p@") {
            let (base, props) = split_base(rest)?;
            let id = PlayerId::parse(base)?;
            self.host()
                .players
                .profile(id)
                .map_err(|e| TagError::parse(format!("Unknown player '{}': {}", base, e)))?;
            return Ok(self.apply_properties(ObjectTag::Player(PlayerTag(id)), props));
        }
        TagValue::parse(trimmed).map(|value| ParsedObject::clean(ObjectTag::Value(value)))
    }

    fn apply_properties(&self, object: ObjectTag, props: Option<&str>) -> ParsedObject {
        let mut parsed = ParsedObject::clean(object);
        let Some(props) = props else {
            return parsed;
        };
        for segment in split_top_level(props, ';') {
            if segment.trim().is_empty() {
                continue;
            }
            if let Err(reason) = self.apply_segment(&parsed.object, segment) {
                let err = TagError::malformed(segment, reason);
                warn!(error = %err, "Skipping property segment");
                parsed.errors.push(err);
            }
        }
        parsed
    }

    fn apply_segment(&self, object: &ObjectTag, segment: &str) -> Result<(), String> {
        let eq = find_top_level(segment, '=').ok_or("missing '='")?;
        let key = segment[..eq].trim();
        if key.is_empty() {
            return Err("empty property key".to_string());
        }
        let value = TagValue::parse(segment[eq + 1..].trim()).map_err(|e| e.to_string())?;
        self.adjust(object, &Mechanism::new(key, value))
            .map_err(|e| e.to_string())
    }
}

/// Splits `base[props]` into `base` and the bracket body.
fn split_base(text: &str) -> Result<(&str, Option<&str>), TagError> {
    let Some(open) = text.find('[') else {
        if text.contains(']') {
            return Err(TagError::parse(format!("Unbalanced ']' in '{}'", text)));
        }
        return Ok((text.trim(), None));
    };
    match matching_bracket(text, open) {
        Some(close) if close == text.len() - 1 => {
            Ok((text[..open].trim(), Some(&text[open + 1..close])))
        }
        Some(_) => Err(TagError::parse(format!(
            "Unexpected text after properties in '{}'",
            text
        ))),
        None => Err(TagError::parse(format!("Unclosed '[' in '{}'", text))),
    }
}

fn material_key(base: &str) -> Result<MaterialKey, TagError> {
    MaterialKey::new(base).map_err(|e| TagError::parse(format!("Invalid object base '{}': {}", base, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_base_variants() {
        assert_eq!(split_base("apple").unwrap(), ("apple", None));
        assert_eq!(
            split_base("apple[food=[nutrition=1]]").unwrap(),
            ("apple", Some("food=[nutrition=1]"))
        );
        assert_eq!(split_base("apple[]").unwrap(), ("apple", Some("")));
        assert!(split_base("apple[food=1").is_err());
        assert!(split_base("apple[a=1]x").is_err());
        assert!(split_base("apple]").is_err());
    }
}
