//! Host state types
//!
//! Plain data mirrored from the host runtime. Typed objects never hold these;
//! they hold handles and read a fresh copy on every call.

pub mod item;
pub mod material;
pub mod player;

pub use item::{FoodComponent, FoodEffect, ItemMeta, ItemStack, TICKS_PER_SECOND};
pub use material::{BlockData, DripstoneThickness, MaterialState, PistonType, SlabType};
pub use player::{BanEntry, PlayerProfile};
