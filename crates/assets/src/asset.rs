//! Asset records and the lifecycle screen.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record, Searchable, search};

/// Lifecycle state of a company asset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Active,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    Retired,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "Active",
            AssetStatus::UnderMaintenance => "Under Maintenance",
            AssetStatus::Retired => "Retired",
        }
    }

    /// All statuses, in the order the screen offers them.
    pub const ALL: [AssetStatus; 3] = [
        AssetStatus::Active,
        AssetStatus::UnderMaintenance,
        AssetStatus::Retired,
    ];
}

impl core::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub id: RecordId,
    pub name: String,
    /// Equipment category ("type" on the wire).
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AssetStatus,
    pub next_maintenance: NaiveDate,
}

impl Record for Asset {
    const TABLE: &'static str = "assets";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,name,type,status,next_maintenance")
            .order_asc("id")
    }
}

impl Searchable for Asset {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self.kind.to_lowercase().contains(keyword)
            || self.status.as_str().to_lowercase().contains(keyword)
    }
}

/// Candidate asset; new assets start `Active`.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AssetStatus,
    pub next_maintenance: NaiveDate,
}

impl AssetDraft {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, next_maintenance: NaiveDate) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            status: AssetStatus::Active,
            next_maintenance,
        }
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: AssetStatus,
}

/// The asset lifecycle screen: list, status transitions, and the
/// maintenance-due lookup the calendar widget reads from.
pub struct AssetsScreen {
    list: ListResource<Asset>,
    pub search: String,
}

impl AssetsScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Asset"),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn assets(&self) -> &[Asset] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&Asset> {
        search(self.list.items(), &self.search)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    /// Assets whose next maintenance falls on the selected date. Pure over
    /// the fetched list; selecting a date never re-queries.
    pub fn due_on(&self, date: NaiveDate) -> Vec<&Asset> {
        self.list
            .items()
            .iter()
            .filter(|asset| asset.next_maintenance == date)
            .collect()
    }

    pub async fn add(&mut self, draft: &AssetDraft) -> ClientResult<RecordId> {
        self.list.create(draft).await
    }

    pub async fn set_status(&mut self, id: RecordId, status: AssetStatus) -> ClientResult<()> {
        self.list.update(id, &StatusPatch { status }).await
    }

    pub async fn delete(&mut self, id: RecordId) -> ClientResult<()> {
        self.list.delete(id).await
    }
}
