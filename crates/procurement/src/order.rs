//! Purchase orders, joined to their supplier.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{
    ListResource, MISSING_REFERENCE, Notice, Record, Searchable, search,
};

/// Purchase-order lifecycle. New orders start `Pending`; managers settle
/// them one way or the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The supplier columns embedded into each order row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupplierRef {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseOrder {
    pub id: RecordId,
    pub item: String,
    pub quantity: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub supplier_id: Option<RecordId>,
    /// Joined supplier; `None` when the reference dangles.
    #[serde(rename = "suppliers", default)]
    pub supplier: Option<SupplierRef>,
}

impl PurchaseOrder {
    /// Supplier name for display; a dangling reference renders the
    /// missing-reference marker.
    pub fn supplier_label(&self) -> &str {
        self.supplier
            .as_ref()
            .map_or(MISSING_REFERENCE, |supplier| supplier.name.as_str())
    }
}

impl Record for PurchaseOrder {
    const TABLE: &'static str = "purchase_orders";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,item,quantity,status,supplier_id")
            .embed("suppliers", "supplier_id", "id,name")
    }
}

impl Searchable for PurchaseOrder {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.id.to_string().contains(keyword)
            || self.item.to_lowercase().contains(keyword)
            || self.quantity.to_string().contains(keyword)
            || self.status.as_str().to_lowercase().contains(keyword)
            || self
                .supplier
                .as_ref()
                .is_some_and(|supplier| supplier.name.to_lowercase().contains(keyword))
    }
}

/// Candidate order; always submitted `Pending`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderDraft {
    pub supplier_id: RecordId,
    pub item: String,
    pub quantity: i64,
    pub status: OrderStatus,
}

impl PurchaseOrderDraft {
    pub fn new(supplier_id: RecordId, item: impl Into<String>, quantity: i64) -> Self {
        Self {
            supplier_id,
            item: item.into(),
            quantity,
            status: OrderStatus::Pending,
        }
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
}

/// The purchase-orders screen.
pub struct PurchaseOrdersScreen {
    list: ListResource<PurchaseOrder>,
    pub search: String,
}

impl PurchaseOrdersScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Purchase order"),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn orders(&self) -> &[PurchaseOrder] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&PurchaseOrder> {
        search(self.list.items(), &self.search)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    /// Create an order, then refetch so the supplier join is
    /// server-computed.
    pub async fn add(&mut self, draft: &PurchaseOrderDraft) -> ClientResult<()> {
        self.list.create(draft).await?;
        self.list.refresh().await;
        Ok(())
    }

    pub async fn approve(&mut self, id: RecordId) -> ClientResult<()> {
        self.set_status(id, OrderStatus::Approved).await
    }

    pub async fn reject(&mut self, id: RecordId) -> ClientResult<()> {
        self.set_status(id, OrderStatus::Rejected).await
    }

    async fn set_status(&mut self, id: RecordId, status: OrderStatus) -> ClientResult<()> {
        self.list.update(id, &StatusPatch { status }).await?;
        self.list.refresh().await;
        Ok(())
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
