//! Mechanist domain
//!
//! Pure data for the property/mechanism core: script values and their literal
//! grammar, attribute paths, typed object views, and the host state those
//! views point at. Nothing here performs I/O.

pub mod common;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod objects;
pub mod value_objects;

pub use entities::{
    BanEntry, BlockData, DripstoneThickness, FoodComponent, FoodEffect, ItemMeta, ItemStack,
    MaterialState, PistonType, PlayerProfile, SlabType, TICKS_PER_SECOND,
};
pub use error::TagError;
pub use events::PlayerKickEvent;
pub use ids::{ItemId, MaterialId, PlayerId};
pub use objects::{ItemTag, MaterialTag, ObjectTag, PlayerTag};
pub use value_objects::{
    Attribute, AttributeStep, EffectKey, MaterialKey, ObjectType, ServerVersion, TagMap, TagValue,
};
