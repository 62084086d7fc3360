//! Port bundle handed to every property and event.

use std::sync::Arc;

use mechanist_domain::ServerVersion;

use crate::infrastructure::ports::{ClockPort, ItemPort, MaterialPort, PlayerPort};

/// The host runtime as the dispatch core sees it
#[derive(Clone)]
pub struct Host {
    pub items: Arc<dyn ItemPort>,
    pub materials: Arc<dyn MaterialPort>,
    pub players: Arc<dyn PlayerPort>,
    pub clock: Arc<dyn ClockPort>,
    /// Gates properties that only exist on newer servers
    pub version: ServerVersion,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
