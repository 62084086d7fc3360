//! Host events
//!
//! Snapshots of events the host runtime raises. The engine wraps these in
//! script-facing event wrappers; the structs here only carry host data.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// A player is about to be disconnected by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKickEvent {
    pub player: PlayerId,
    /// Message shown on the disconnect screen
    pub message: String,
    /// A cancelled kick keeps the player connected
    pub cancelled: bool,
}

impl PlayerKickEvent {
    pub fn new(player: PlayerId, message: impl Into<String>) -> Self {
        Self {
            player,
            message: message.into(),
            cancelled: false,
        }
    }
}
