//! Typed objects: what a script holds when it holds a value
//!
//! Host-backed views are `Copy` handles. They carry no state of their own;
//! every read goes back to the host, so two views of one handle always agree.

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, MaterialId, PlayerId};
use crate::value_objects::{ObjectType, TagValue};

/// View of a host item stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTag(pub ItemId);

/// View of a host material (block state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialTag(pub MaterialId);

/// View of a host player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerTag(pub PlayerId);

impl ItemTag {
    pub fn id(&self) -> ItemId {
        self.0
    }
}

impl MaterialTag {
    pub fn id(&self) -> MaterialId {
        self.0
    }
}

impl PlayerTag {
    pub fn id(&self) -> PlayerId {
        self.0
    }
}

/// Any value a script can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ObjectTag {
    Value(TagValue),
    Item(ItemTag),
    Material(MaterialTag),
    Player(PlayerTag),
}

impl ObjectTag {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Value(TagValue::Element(_)) => ObjectType::Element,
            Self::Value(TagValue::List(_)) => ObjectType::List,
            Self::Value(TagValue::Map(_)) => ObjectType::Map,
            Self::Item(_) => ObjectType::Item,
            Self::Material(_) => ObjectType::Material,
            Self::Player(_) => ObjectType::Player,
        }
    }

    pub fn as_value(&self) -> Option<&TagValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<ItemTag> {
        match self {
            Self::Item(item) => Some(*item),
            _ => None,
        }
    }

    pub fn as_material(&self) -> Option<MaterialTag> {
        match self {
            Self::Material(material) => Some(*material),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<PlayerTag> {
        match self {
            Self::Player(player) => Some(*player),
            _ => None,
        }
    }
}

impl From<TagValue> for ObjectTag {
    fn from(value: TagValue) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ObjectTag {
    fn from(value: &str) -> Self {
        Self::Value(TagValue::from(value))
    }
}

impl From<String> for ObjectTag {
    fn from(value: String) -> Self {
        Self::Value(TagValue::from(value))
    }
}

impl From<bool> for ObjectTag {
    fn from(value: bool) -> Self {
        Self::Value(TagValue::from(value))
    }
}

impl From<ItemTag> for ObjectTag {
    fn from(value: ItemTag) -> Self {
        Self::Item(value)
    }
}

impl From<MaterialTag> for ObjectTag {
    fn from(value: MaterialTag) -> Self {
        Self::Material(value)
    }
}

impl From<PlayerTag> for ObjectTag {
    fn from(value: PlayerTag) -> Self {
        Self::Player(value)
    }
}
