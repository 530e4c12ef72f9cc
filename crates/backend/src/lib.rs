//! `supplyline-backend` — the remote-backend boundary.
//!
//! The hosted service (auth, tables, blob storage) is an external
//! collaborator. This crate defines the three client-facing contracts
//! ([`AuthApi`], [`TableApi`], [`StorageApi`]), the environment
//! configuration they are constructed from, an HTTP implementation
//! ([`RestBackend`]) and an in-memory implementation ([`MemoryBackend`])
//! used by tests across the workspace.

pub mod api;
pub mod config;
pub mod memory;
pub mod rest;

pub use api::{
    AuthApi, Embed, Identity, NewUserAttributes, SelectQuery, StorageApi, TableApi,
};
pub use config::{BackendConfig, ConfigError};
pub use memory::{FailPoint, MemoryBackend};
pub use rest::RestBackend;
