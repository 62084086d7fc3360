//! Shared test helpers.
//!
//! [`TestWorld`] wires the standard registry to in-memory host adapters and a
//! fixed clock so tests can create objects and drive the engine directly.
//!
//! ```rust,ignore
//! let world = TestWorld::new();
//! let apple = world.item("apple");
//! world.mechanism(&apple, "food", "[nutrition=5]").unwrap();
//! assert_eq!(world.resolve(&apple, "food.nutrition").unwrap(), ObjectTag::from("5"));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use mechanist_domain::{
    BanEntry, FoodComponent, ItemStack, ItemTag, MaterialKey, MaterialState, MaterialTag,
    ObjectTag, PlayerId, PlayerTag, ServerVersion, TagError, TagValue,
};

use crate::engine::Engine;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory::InMemoryHost;
use crate::infrastructure::ports::{ItemPort, MaterialPort, PlayerPort};
use crate::mechanism::ScriptContext;
use crate::registry::PropertyRegistry;

/// The instant every [`TestWorld`] clock is frozen at.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub struct TestWorld {
    pub memory: InMemoryHost,
    pub engine: Engine,
    pub script: ScriptContext,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_version(version: ServerVersion) -> Self {
        Self::with_config(EngineConfig {
            server_version: version,
            ..EngineConfig::default()
        })
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_parts(PropertyRegistry::standard(), config)
    }

    pub fn with_registry(registry: PropertyRegistry) -> Self {
        Self::with_parts(registry, EngineConfig::default())
    }

    pub fn with_parts(registry: PropertyRegistry, config: EngineConfig) -> Self {
        let memory = InMemoryHost::new();
        let host = memory.host(Arc::new(FixedClock(test_now())), config.server_version);
        Self {
            engine: Engine::new(Arc::new(registry), host, config),
            memory,
            script: ScriptContext::script("test_script"),
        }
    }

    pub fn item(&self, material: &str) -> ObjectTag {
        let key = MaterialKey::new(material).unwrap();
        ObjectTag::Item(ItemTag(self.memory.items.create(ItemStack::new(key))))
    }

    pub fn material(&self, name: &str) -> ObjectTag {
        let key = MaterialKey::new(name).unwrap();
        ObjectTag::Material(MaterialTag(
            self.memory.materials.create(MaterialState::from_key(key)),
        ))
    }

    pub fn player(&self, name: &str) -> ObjectTag {
        ObjectTag::Player(PlayerTag(self.memory.players.add_profile(name)))
    }

    pub fn player_id(&self, player: &ObjectTag) -> PlayerId {
        player.as_player().expect("not a player").id()
    }

    /// Bans `player` with a ban created `age` before [`test_now`].
    pub fn ban(&self, player: &ObjectTag, reason: &str, source: &str, age: Duration) -> BanEntry {
        let entry = BanEntry {
            reason: Some(reason.to_string()),
            source: Some(source.to_string()),
            created: test_now() - age,
            expiration: None,
        };
        self.memory
            .players
            .add_ban(self.player_id(player), entry.clone())
            .unwrap();
        entry
    }

    pub fn ban_entry(&self, player: &ObjectTag) -> Option<BanEntry> {
        self.memory.players.ban_entry(self.player_id(player)).unwrap()
    }

    pub fn resolve(&self, object: &ObjectTag, path: &str) -> Result<ObjectTag, TagError> {
        self.engine.resolve_attribute(object, path, &self.script)
    }

    pub fn mechanism(
        &self,
        object: &ObjectTag,
        name: &str,
        value: impl Into<TagValue>,
    ) -> Result<(), TagError> {
        self.engine.apply_mechanism(object, name, value, &self.script)
    }

    pub fn stack(&self, item: &ObjectTag) -> ItemStack {
        let id = item.as_item().expect("not an item").id();
        self.memory.items.stack(id).unwrap()
    }

    /// Food component of `item`, default when it has none.
    pub fn food(&self, item: &ObjectTag) -> FoodComponent {
        self.stack(item).meta.food.unwrap_or_default()
    }

    pub fn block_data(&self, material: &ObjectTag) -> Option<mechanist_domain::BlockData> {
        let id = material.as_material().expect("not a material").id();
        self.memory.materials.state(id).unwrap().block_data
    }
}
