//! Mechanist engine library.
//!
//! The property/mechanism dispatch core of a script engine embedded in a
//! game server.
//!
//! ## Structure
//!
//! - `registry/` - Property registry: tags, mechanisms, property descriptors
//! - `properties/` - Property modules (item food, tooltip, block type)
//! - `core_tags` - Tags every object of a type answers
//! - `resolution` / `dispatch` / `serialization` - Script entry points on [`Engine`]
//! - `events/` - Script events and the determination protocol
//! - `infrastructure/` - Host ports, in-memory adapters, config, logging

pub mod core_tags;
pub mod dispatch;
pub mod engine;
pub mod events;
pub mod host;
pub mod infrastructure;
pub mod mechanism;
pub mod properties;
pub mod registry;
pub mod resolution;
pub mod serialization;

/// Test fixtures shared by unit and scenario tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end scenarios against in-memory host adapters.
#[cfg(test)]
mod e2e_tests;

pub use engine::Engine;
pub use events::{EventDispatcher, EventFiring, EventScript, FnScript, ScriptEvent, ScriptPath};
pub use host::Host;
pub use mechanism::{Mechanism, ScriptContext};
pub use registry::{PropertyRegistry, PropertyRegistryBuilder};
pub use serialization::ParsedObject;
