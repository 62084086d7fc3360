//! Port traits for the host runtime boundary.
//!
//! These are the only abstractions between the dispatch core and the game
//! server. Ports exist for:
//! - Item stacks and their metadata
//! - Materials and their block data
//! - Player profiles and the ban list
//! - Clock (for testing)

mod error;
mod host;
mod testing;

// =============================================================================
// Host Ports
// =============================================================================
pub use host::{ItemPort, MaterialPort, PlayerPort};

#[cfg(test)]
pub use host::{MockItemPort, MockMaterialPort, MockPlayerPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::HostError;
