//! `supplyline-assets` — asset lifecycle and maintenance tracking.

pub mod asset;

pub use asset::{Asset, AssetDraft, AssetStatus, AssetsScreen};
