//! Core tags for every object type, the base tags answered on any object,
//! and per-type fallbacks.

use mechanist_domain::{Attribute, ObjectTag, ObjectType, TagError, TagValue};

use crate::registry::{PropertyRegistryBuilder, TagDoc};
use crate::resolution::TagContext;

pub fn register(builder: &mut PropertyRegistryBuilder) {
    register_element_tags(builder);
    register_list_tags(builder);
    register_map_tags(builder);
    register_item_tags(builder);
    register_material_tags(builder);
    register_player_tags(builder);
    register_base_tags(builder);
}

fn plain_value(object: &ObjectTag) -> Result<&TagValue, TagError> {
    object
        .as_value()
        .ok_or_else(|| TagError::validation(format!("{} is not a plain value", object.object_type())))
}

fn require_param(attribute: &Attribute) -> Result<String, TagError> {
    attribute
        .param()
        .map(str::to_string)
        .ok_or_else(|| TagError::parse(format!("Tag '{}' needs a [parameter]", attribute.name())))
}

/// 1-based index into a list of `len` entries.
fn list_index(attribute: &Attribute, len: usize) -> Result<usize, TagError> {
    let param = require_param(attribute)?;
    let index: usize = param
        .trim()
        .parse()
        .map_err(|_| TagError::parse(format!("'{}' is not a list index", param)))?;
    if index == 0 || index > len {
        return Err(TagError::validation(format!(
            "Index {} is out of range for a list of {}",
            index, len
        )));
    }
    Ok(index - 1)
}

fn map_get<'m>(map: &'m mechanist_domain::TagMap, key: &str) -> Option<&'m TagValue> {
    map.get(key)
        .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}

// =============================================================================
// Element
// =============================================================================

fn register_element_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::Element,
        "length",
        TagDoc::new("ElementTag(Number)", "Number of characters in the element."),
        |object, _, _| {
            let text = plain_value(object)?.as_text();
            Ok(ObjectTag::from(TagValue::from(text.chars().count())))
        },
    );
    builder.register_core_tag(
        ObjectType::Element,
        "to_uppercase",
        TagDoc::new("ElementTag", "The element in upper case."),
        |object, _, _| Ok(ObjectTag::from(plain_value(object)?.as_text().to_uppercase())),
    );
    builder.register_core_tag(
        ObjectType::Element,
        "to_lowercase",
        TagDoc::new("ElementTag", "The element in lower case."),
        |object, _, _| Ok(ObjectTag::from(plain_value(object)?.as_text().to_lowercase())),
    );
    builder.register_core_tag(
        ObjectType::Element,
        "contains",
        TagDoc::new(
            "ElementTag(Boolean)",
            "Whether the element contains the given text, ignoring case.",
        ),
        |object, attribute, _| {
            let needle = require_param(attribute)?.to_lowercase();
            let text = plain_value(object)?.as_text().to_lowercase();
            Ok(ObjectTag::from(text.contains(&needle)))
        },
    );
    builder.register_core_tag(
        ObjectType::Element,
        "split",
        TagDoc::new(
            "ListTag",
            "Splits the element on the given separator, or as a list literal without one.",
        ),
        |object, attribute, _| {
            let value = plain_value(object)?;
            let items = match attribute.param() {
                Some(separator) if !separator.is_empty() => value
                    .as_text()
                    .split(separator)
                    .map(TagValue::from)
                    .collect(),
                _ => value.as_list(),
            };
            Ok(ObjectTag::from(TagValue::List(items)))
        },
    );
    builder.register_core_tag(
        ObjectType::Element,
        "as_list",
        TagDoc::new("ListTag", "The element read as a list literal."),
        |object, _, _| Ok(ObjectTag::from(TagValue::List(plain_value(object)?.as_list()))),
    );
    builder.register_core_tag(
        ObjectType::Element,
        "as_map",
        TagDoc::new("MapTag", "The element read as a map literal."),
        |object, _, _| Ok(ObjectTag::from(TagValue::Map(plain_value(object)?.as_map()?))),
    );
}

// =============================================================================
// List
// =============================================================================

fn list_items(object: &ObjectTag) -> Result<Vec<TagValue>, TagError> {
    Ok(plain_value(object)?.as_list())
}

fn register_list_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::List,
        "size",
        TagDoc::new("ElementTag(Number)", "Number of entries in the list."),
        |object, _, _| Ok(ObjectTag::from(TagValue::from(list_items(object)?.len()))),
    );
    builder.register_core_tag(
        ObjectType::List,
        "get",
        TagDoc::new("ObjectTag", "Entry at the given 1-based index."),
        |object, attribute, _| {
            let mut items = list_items(object)?;
            let index = list_index(attribute, items.len())?;
            Ok(ObjectTag::from(items.swap_remove(index)))
        },
    );
    builder.register_core_tag(
        ObjectType::List,
        "first",
        TagDoc::new("ObjectTag", "First entry of the list."),
        |object, _, _| {
            list_items(object)?
                .into_iter()
                .next()
                .map(ObjectTag::from)
                .ok_or_else(|| TagError::validation("List is empty"))
        },
    );
    builder.register_core_tag(
        ObjectType::List,
        "last",
        TagDoc::new("ObjectTag", "Last entry of the list."),
        |object, _, _| {
            list_items(object)?
                .pop()
                .map(ObjectTag::from)
                .ok_or_else(|| TagError::validation("List is empty"))
        },
    );
    builder.register_core_tag(
        ObjectType::List,
        "contains",
        TagDoc::new(
            "ElementTag(Boolean)",
            "Whether any entry equals the given text, ignoring case.",
        ),
        |object, attribute, _| {
            let needle = require_param(attribute)?;
            let found = list_items(object)?
                .iter()
                .any(|item| item.as_text().eq_ignore_ascii_case(&needle));
            Ok(ObjectTag::from(found))
        },
    );
}

// =============================================================================
// Map
// =============================================================================

fn map_entries(object: &ObjectTag) -> Result<mechanist_domain::TagMap, TagError> {
    plain_value(object)?.as_map()
}

fn register_map_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::Map,
        "size",
        TagDoc::new("ElementTag(Number)", "Number of keys in the map."),
        |object, _, _| Ok(ObjectTag::from(TagValue::from(map_entries(object)?.len()))),
    );
    builder.register_core_tag(
        ObjectType::Map,
        "get",
        TagDoc::new("ObjectTag", "Value under the given key."),
        |object, attribute, _| {
            let key = require_param(attribute)?;
            let map = map_entries(object)?;
            map_get(&map, &key)
                .cloned()
                .map(ObjectTag::from)
                .ok_or_else(|| TagError::unknown_attribute(ObjectType::Map, key))
        },
    );
    builder.register_core_tag(
        ObjectType::Map,
        "keys",
        TagDoc::new("ListTag", "Keys of the map, in order."),
        |object, _, _| {
            let keys = map_entries(object)?.into_keys().map(TagValue::from).collect();
            Ok(ObjectTag::from(TagValue::List(keys)))
        },
    );
    builder.register_core_tag(
        ObjectType::Map,
        "values",
        TagDoc::new("ListTag", "Values of the map, in key order."),
        |object, _, _| {
            let values = map_entries(object)?.into_values().collect();
            Ok(ObjectTag::from(TagValue::List(values)))
        },
    );
    builder.register_core_tag(
        ObjectType::Map,
        "contains",
        TagDoc::new("ElementTag(Boolean)", "Whether the map has the given key."),
        |object, attribute, _| {
            let key = require_param(attribute)?;
            Ok(ObjectTag::from(map_get(&map_entries(object)?, &key).is_some()))
        },
    );
    builder.register_fallback(
        ObjectType::Map,
        TagDoc::new(
            "ObjectTag",
            "Any other step is read as a key of the map, so <map.nutrition> works like <map.get[nutrition]>.",
        ),
        |object, attribute, _| {
            let map = map_entries(object)?;
            Ok(map_get(&map, attribute.name()).cloned().map(ObjectTag::from))
        },
    );
}

// =============================================================================
// Item
// =============================================================================

fn register_item_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::Item,
        "material",
        TagDoc::new("ElementTag", "Material key of the item."),
        |object, _, context| {
            let item = object
                .as_item()
                .ok_or_else(|| TagError::validation("Expected an item"))?;
            let stack = context.host().items.stack(item.id())?;
            Ok(ObjectTag::from(stack.material.to_string()))
        },
    );
    builder.register_core_tag(
        ObjectType::Item,
        "quantity",
        TagDoc::new("ElementTag(Number)", "Number of items in the stack."),
        |object, _, context| {
            let item = object
                .as_item()
                .ok_or_else(|| TagError::validation("Expected an item"))?;
            let stack = context.host().items.stack(item.id())?;
            Ok(ObjectTag::from(TagValue::from(stack.quantity)))
        },
    );
}

// =============================================================================
// Material
// =============================================================================

fn register_material_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::Material,
        "name",
        TagDoc::new("ElementTag", "Key of the material."),
        |object, _, context| {
            let material = object
                .as_material()
                .ok_or_else(|| TagError::validation("Expected a material"))?;
            let state = context.host().materials.state(material.id())?;
            Ok(ObjectTag::from(state.key.to_string()))
        },
    );
    builder.register_core_tag(
        ObjectType::Material,
        "is_block",
        TagDoc::new("ElementTag(Boolean)", "Whether the material can be placed as a block."),
        |object, _, context| {
            let material = object
                .as_material()
                .ok_or_else(|| TagError::validation("Expected a material"))?;
            let state = context.host().materials.state(material.id())?;
            Ok(ObjectTag::from(state.block_data.is_some()))
        },
    );
}

// =============================================================================
// Player
// =============================================================================

fn register_player_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_core_tag(
        ObjectType::Player,
        "name",
        TagDoc::new("ElementTag", "Name of the player."),
        |object, _, context| {
            let player = object
                .as_player()
                .ok_or_else(|| TagError::validation("Expected a player"))?;
            let profile = context.host().players.profile(player.id())?;
            Ok(ObjectTag::from(profile.name))
        },
    );
    builder.register_core_tag(
        ObjectType::Player,
        "uuid",
        TagDoc::new("ElementTag", "Unique id of the player."),
        |object, _, _| {
            let player = object
                .as_player()
                .ok_or_else(|| TagError::validation("Expected a player"))?;
            Ok(ObjectTag::from(player.id().to_string()))
        },
    );
    builder.register_core_tag(
        ObjectType::Player,
        "is_banned",
        TagDoc::new("ElementTag(Boolean)", "Whether the player is on the ban list."),
        |object, _, context| {
            let player = object
                .as_player()
                .ok_or_else(|| TagError::validation("Expected a player"))?;
            let banned = context.host().players.ban_entry(player.id())?.is_some();
            Ok(ObjectTag::from(banned))
        },
    );
}

// =============================================================================
// Base tags
// =============================================================================

fn register_base_tags(builder: &mut PropertyRegistryBuilder) {
    builder.register_base_tag(
        "object_type",
        TagDoc::new("ElementTag", "Type name of the object."),
        |object, _, _| Ok(ObjectTag::from(object.object_type().to_string())),
    );
    builder.register_base_tag(
        "identify",
        TagDoc::new("ElementTag", "Literal that parses back into this object."),
        identify_tag,
    );
    builder.register_base_tag(
        "as_element",
        TagDoc::new("ElementTag", "The object as plain text."),
        |object, attribute, context| match object {
            ObjectTag::Value(value) => Ok(ObjectTag::from(value.as_text())),
            _ => identify_tag(object, attribute, context),
        },
    );
}

fn identify_tag(
    object: &ObjectTag,
    _attribute: &mut Attribute,
    context: &mut TagContext<'_>,
) -> Result<ObjectTag, TagError> {
    context.engine().identify(object).map(ObjectTag::from)
}
