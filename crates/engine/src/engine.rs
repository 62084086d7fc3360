//! The engine: a sealed registry bound to a host.
//!
//! Script-facing entry points live next to the behaviour they implement:
//! [`Engine::resolve_attribute`] in `resolution`, [`Engine::apply_mechanism`]
//! in `dispatch`, [`Engine::identify`] and [`Engine::parse`] in
//! `serialization`, [`Engine::on_player_kick`] in `events::player_banned`.

use std::sync::Arc;

use crate::host::Host;
use crate::infrastructure::config::EngineConfig;
use crate::registry::PropertyRegistry;

pub struct Engine {
    registry: Arc<PropertyRegistry>,
    host: Host,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: Arc<PropertyRegistry>, host: Host, config: EngineConfig) -> Self {
        Self {
            registry,
            host,
            config,
        }
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
