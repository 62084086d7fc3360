//! In-memory host adapters.
//!
//! DashMap-backed implementations of every host port. The binary and the test
//! suites use these in place of a running game server.

use std::sync::Arc;

use dashmap::DashMap;
use mechanist_domain::{
    BanEntry, BlockData, ItemId, ItemMeta, ItemStack, MaterialId, MaterialState, PlayerId,
    PlayerProfile, ServerVersion,
};

use crate::host::Host;
use crate::infrastructure::ports::{ClockPort, HostError, ItemPort, MaterialPort, PlayerPort};

/// In-memory implementation of [`ItemPort`].
#[derive(Default)]
pub struct InMemoryItems {
    stacks: DashMap<ItemId, ItemStack>,
}

impl ItemPort for InMemoryItems {
    fn create(&self, stack: ItemStack) -> ItemId {
        let id = ItemId::new();
        self.stacks.insert(id, stack);
        id
    }

    fn stack(&self, id: ItemId) -> Result<ItemStack, HostError> {
        self.stacks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| HostError::not_found("Item", id))
    }

    fn set_meta(&self, id: ItemId, meta: ItemMeta) -> Result<(), HostError> {
        let mut entry = self
            .stacks
            .get_mut(&id)
            .ok_or_else(|| HostError::not_found("Item", id))?;
        if entry.is_air() {
            return Err(HostError::rejected("set_meta", "air has no item meta"));
        }
        entry.meta = meta;
        Ok(())
    }
}

/// In-memory implementation of [`MaterialPort`].
#[derive(Default)]
pub struct InMemoryMaterials {
    states: DashMap<MaterialId, MaterialState>,
}

impl MaterialPort for InMemoryMaterials {
    fn create(&self, state: MaterialState) -> MaterialId {
        let id = MaterialId::new();
        self.states.insert(id, state);
        id
    }

    fn state(&self, id: MaterialId) -> Result<MaterialState, HostError> {
        self.states
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| HostError::not_found("Material", id))
    }

    fn set_block_data(&self, id: MaterialId, data: BlockData) -> Result<(), HostError> {
        let mut entry = self
            .states
            .get_mut(&id)
            .ok_or_else(|| HostError::not_found("Material", id))?;
        if entry.block_data.is_none() {
            return Err(HostError::rejected(
                "set_block_data",
                format!("{} is not a block", entry.key),
            ));
        }
        entry.block_data = Some(data);
        Ok(())
    }
}

/// In-memory implementation of [`PlayerPort`].
#[derive(Default)]
pub struct InMemoryPlayers {
    profiles: DashMap<PlayerId, PlayerProfile>,
    bans: DashMap<PlayerId, BanEntry>,
}

impl InMemoryPlayers {
    /// Registers a known player and returns its id.
    pub fn add_profile(&self, name: impl Into<String>) -> PlayerId {
        let id = PlayerId::new();
        self.profiles.insert(
            id,
            PlayerProfile {
                id,
                name: name.into(),
            },
        );
        id
    }

    fn require_profile(&self, id: PlayerId) -> Result<(), HostError> {
        if self.profiles.contains_key(&id) {
            Ok(())
        } else {
            Err(HostError::not_found("Player", id))
        }
    }
}

impl PlayerPort for InMemoryPlayers {
    fn profile(&self, id: PlayerId) -> Result<PlayerProfile, HostError> {
        self.profiles
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| HostError::not_found("Player", id))
    }

    fn ban_entry(&self, id: PlayerId) -> Result<Option<BanEntry>, HostError> {
        self.require_profile(id)?;
        Ok(self.bans.get(&id).map(|entry| entry.value().clone()))
    }

    fn add_ban(&self, id: PlayerId, entry: BanEntry) -> Result<(), HostError> {
        self.require_profile(id)?;
        self.bans.insert(id, entry);
        Ok(())
    }

    fn pardon(&self, id: PlayerId) -> Result<(), HostError> {
        self.require_profile(id)?;
        self.bans.remove(&id);
        Ok(())
    }
}

/// All in-memory adapters together, with typed access for fixtures.
#[derive(Clone, Default)]
pub struct InMemoryHost {
    pub items: Arc<InMemoryItems>,
    pub materials: Arc<InMemoryMaterials>,
    pub players: Arc<InMemoryPlayers>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port bundle backed by these adapters.
    pub fn host(&self, clock: Arc<dyn ClockPort>, version: ServerVersion) -> Host {
        Host {
            items: self.items.clone(),
            materials: self.materials.clone(),
            players: self.players.clone(),
            clock,
            version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mechanist_domain::MaterialKey;

    fn key(k: &str) -> MaterialKey {
        MaterialKey::new(k).unwrap()
    }

    #[test]
    fn item_meta_write_is_visible_on_next_read() {
        let items = InMemoryItems::default();
        let id = items.create(ItemStack::new(key("apple")));
        let meta = ItemMeta {
            hide_tooltip: true,
            ..ItemMeta::default()
        };
        items.set_meta(id, meta.clone()).unwrap();
        assert_eq!(items.stack(id).unwrap().meta, meta);
    }

    #[test]
    fn air_rejects_meta() {
        let items = InMemoryItems::default();
        let id = items.create(ItemStack::new(key("air")));
        let err = items.set_meta(id, ItemMeta::default()).unwrap_err();
        assert!(matches!(err, HostError::Rejected { .. }));
    }

    #[test]
    fn unknown_item_is_not_found() {
        let items = InMemoryItems::default();
        assert!(items.stack(ItemId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn non_block_material_rejects_block_data() {
        let materials = InMemoryMaterials::default();
        let id = materials.create(MaterialState::from_key(key("apple")));
        assert!(materials.set_block_data(id, BlockData::Plain).is_err());
    }

    #[test]
    fn ban_and_pardon() {
        let players = InMemoryPlayers::default();
        let id = players.add_profile("Steve");
        assert_eq!(players.ban_entry(id).unwrap(), None);

        let entry = BanEntry {
            reason: Some("Griefing".into()),
            source: Some("Console".into()),
            created: Utc::now(),
            expiration: None,
        };
        players.add_ban(id, entry.clone()).unwrap();
        assert_eq!(players.ban_entry(id).unwrap(), Some(entry));

        players.pardon(id).unwrap();
        assert_eq!(players.ban_entry(id).unwrap(), None);
    }

    #[test]
    fn unknown_player_cannot_be_banned() {
        let players = InMemoryPlayers::default();
        let entry = BanEntry {
            reason: None,
            source: None,
            created: Utc::now(),
            expiration: None,
        };
        assert!(players.add_ban(PlayerId::new(), entry).is_err());
    }
}
