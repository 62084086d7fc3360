//! End-to-end scenarios.
//!
//! Each test builds a [`TestWorld`](crate::test_fixtures::TestWorld) (the
//! standard registry, in-memory host adapters, a frozen clock) or a world
//! around a purpose-built registry, and drives the engine only through its
//! script-facing entry points.
//!
//! ```bash
//! cargo test -p mechanist-engine --lib e2e_tests
//! ```

mod food_tests;
