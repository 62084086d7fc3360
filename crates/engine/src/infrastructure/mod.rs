//! Infrastructure implementations.
//!
//! Host ports, their in-memory adapters, configuration and logging.

pub mod clock;
pub mod config;
pub mod logging;
pub mod memory;
pub mod ports;
