//! Shipment records and the logistics screen.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record, Searchable, search};

/// Delivery lifecycle of a shipment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Pending,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
        }
    }

    /// All statuses, in the order the screen offers them.
    pub const ALL: [ShipmentStatus; 3] = [
        ShipmentStatus::Pending,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
    ];
}

impl core::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shipment {
    pub id: RecordId,
    pub description: String,
    pub vehicle: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ShipmentStatus,
}

impl Record for Shipment {
    const TABLE: &'static str = "shipments";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new().columns("id,description,vehicle,latitude,longitude,status")
    }
}

impl Searchable for Shipment {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.description.to_lowercase().contains(keyword)
            || self.vehicle.to_lowercase().contains(keyword)
            || self.status.as_str().to_lowercase().contains(keyword)
    }
}

/// Candidate shipment; new shipments start `Pending`.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentDraft {
    pub description: String,
    pub vehicle: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ShipmentStatus,
}

impl ShipmentDraft {
    pub fn new(
        description: impl Into<String>,
        vehicle: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            description: description.into(),
            vehicle: vehicle.into(),
            latitude,
            longitude,
            status: ShipmentStatus::Pending,
        }
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: ShipmentStatus,
}

#[derive(Serialize)]
struct PositionPatch {
    latitude: f64,
    longitude: f64,
}

/// The logistics screen: shipment list plus status and position updates.
/// Map rendering consumes the coordinates; it is not this crate's concern.
pub struct ShipmentsScreen {
    list: ListResource<Shipment>,
    pub search: String,
}

impl ShipmentsScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Shipment"),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn shipments(&self) -> &[Shipment] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&Shipment> {
        search(self.list.items(), &self.search)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    pub async fn add(&mut self, draft: &ShipmentDraft) -> ClientResult<RecordId> {
        self.list.create(draft).await
    }

    pub async fn set_status(&mut self, id: RecordId, status: ShipmentStatus) -> ClientResult<()> {
        self.list.update(id, &StatusPatch { status }).await
    }

    /// Record the shipment's latest position.
    pub async fn set_position(
        &mut self,
        id: RecordId,
        latitude: f64,
        longitude: f64,
    ) -> ClientResult<()> {
        self.list
            .update(
                id,
                &PositionPatch {
                    latitude,
                    longitude,
                },
            )
            .await
    }

    pub async fn delete(&mut self, id: RecordId) -> ClientResult<()> {
        self.list.delete(id).await
    }
}
