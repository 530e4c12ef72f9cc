//! `supplyline-logistics` — shipment tracking.

pub mod shipment;

pub use shipment::{Shipment, ShipmentDraft, ShipmentStatus, ShipmentsScreen};
