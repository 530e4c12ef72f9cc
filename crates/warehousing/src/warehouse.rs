//! Warehouse records and their management screen.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record, Searchable};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Warehouse {
    pub id: RecordId,
    pub name: String,
    pub location: String,
}

impl Record for Warehouse {
    const TABLE: &'static str = "warehouses";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,name,location")
            .order_asc("name")
    }
}

impl Searchable for Warehouse {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self.location.to_lowercase().contains(keyword)
    }
}

/// Candidate warehouse submitted from the form.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseDraft {
    pub name: String,
    pub location: String,
}

/// The warehouses management screen.
pub struct WarehousesScreen {
    list: ListResource<Warehouse>,
}

impl WarehousesScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Warehouse"),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        self.list.items()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    pub async fn add(&mut self, draft: &WarehouseDraft) -> ClientResult<RecordId> {
        self.list.create(draft).await
    }

    pub async fn save(&mut self, id: RecordId, draft: &WarehouseDraft) -> ClientResult<()> {
        self.list.update(id, draft).await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.list.request_delete(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.list.pending_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> ClientResult<Option<RecordId>> {
        self.list.confirm_delete().await
    }
}
