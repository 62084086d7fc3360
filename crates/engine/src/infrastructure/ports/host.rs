//! Host state ports.
//!
//! Reads return owned copies; property code edits a copy and writes it back
//! with a single setter call.

use mechanist_domain::{
    BanEntry, BlockData, ItemId, ItemMeta, ItemStack, MaterialId, MaterialState, PlayerId,
    PlayerProfile,
};

use super::HostError;

#[cfg_attr(test, mockall::automock)]
pub trait ItemPort: Send + Sync {
    /// Spawns a new stack in the host and returns its handle.
    fn create(&self, stack: ItemStack) -> ItemId;
    fn stack(&self, id: ItemId) -> Result<ItemStack, HostError>;
    fn set_meta(&self, id: ItemId, meta: ItemMeta) -> Result<(), HostError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MaterialPort: Send + Sync {
    fn create(&self, state: MaterialState) -> MaterialId;
    fn state(&self, id: MaterialId) -> Result<MaterialState, HostError>;
    fn set_block_data(&self, id: MaterialId, data: BlockData) -> Result<(), HostError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PlayerPort: Send + Sync {
    fn profile(&self, id: PlayerId) -> Result<PlayerProfile, HostError>;
    /// Current entry on the profile ban list, if any.
    fn ban_entry(&self, id: PlayerId) -> Result<Option<BanEntry>, HostError>;
    /// Adds or replaces the player's ban entry.
    fn add_ban(&self, id: PlayerId, entry: BanEntry) -> Result<(), HostError>;
    fn pardon(&self, id: PlayerId) -> Result<(), HostError>;
}
