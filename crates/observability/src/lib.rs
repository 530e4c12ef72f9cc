//! `supplyline-observability` — tracing initialization for binaries.

pub mod tracing;

pub use tracing::init;
