//! Product records, joined to their warehouse, and the catalog screen.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{
    ListResource, MISSING_REFERENCE, Notice, Record, Searchable, search,
};

/// Stock below this counts as low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// The warehouse columns embedded into each product row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarehouseRef {
    pub id: RecordId,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub stock: i64,
    #[serde(default)]
    pub warehouse_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    /// Joined warehouse; `None` when the reference dangles.
    #[serde(rename = "warehouses", default)]
    pub warehouse: Option<WarehouseRef>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Warehouse name for display; a dangling reference renders the
    /// missing-reference marker rather than failing the row.
    pub fn warehouse_label(&self) -> &str {
        self.warehouse
            .as_ref()
            .map_or(MISSING_REFERENCE, |warehouse| warehouse.name.as_str())
    }
}

impl Record for Product {
    const TABLE: &'static str = "products";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,name,stock,warehouse_id,created_at")
            .embed("warehouses", "warehouse_id", "id,name,location")
            .order_desc("created_at")
    }
}

impl Searchable for Product {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self
                .warehouse
                .as_ref()
                .is_some_and(|warehouse| warehouse.name.to_lowercase().contains(keyword))
    }
}

/// Candidate product submitted from the form.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub stock: i64,
    pub warehouse_id: RecordId,
}

/// Categorical warehouse filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarehouseFilter {
    #[default]
    All,
    Only(RecordId),
}

impl WarehouseFilter {
    fn admits(&self, product: &Product) -> bool {
        match self {
            WarehouseFilter::All => true,
            WarehouseFilter::Only(id) => product.warehouse_id == Some(*id),
        }
    }
}

/// The product catalog screen.
///
/// Search and both categorical filters run over the fetched list only and
/// are recomputed per change; the backend is never re-queried for them.
pub struct ProductsScreen {
    list: ListResource<Product>,
    pub search: String,
    pub low_stock_only: bool,
    pub warehouse_filter: WarehouseFilter,
}

impl ProductsScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Product"),
            search: String::new(),
            low_stock_only: false,
            warehouse_filter: WarehouseFilter::All,
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn products(&self) -> &[Product] {
        self.list.items()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    /// The rows the table shows under the current search + filters.
    pub fn visible(&self) -> Vec<&Product> {
        search(self.list.items(), &self.search)
            .into_iter()
            .filter(|product| !self.low_stock_only || product.is_low_stock())
            .filter(|product| self.warehouse_filter.admits(product))
            .collect()
    }

    /// Create a product, then refetch so the joined warehouse columns come
    /// from the server.
    pub async fn add(&mut self, draft: &ProductDraft) -> ClientResult<()> {
        self.list.create(draft).await?;
        self.list.refresh().await;
        Ok(())
    }

    /// Update a product, then refetch for the same reason as [`Self::add`].
    pub async fn save(&mut self, id: RecordId, draft: &ProductDraft) -> ClientResult<()> {
        self.list.update(id, draft).await?;
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

#[cfg(test)]
mod tests {
    use serde_json::json;
    use supplyline_backend::MemoryBackend;

    use super::*;

    async fn screen_with_fixture() -> (Arc<MemoryBackend>, ProductsScreen, RecordId) {
        let backend = Arc::new(MemoryBackend::new());
        let warehouse = backend.seed(
            "warehouses",
            json!({ "name": "North Hub", "location": "Cebu" }),
        );
        let warehouse_id: RecordId = warehouse["id"].as_str().unwrap().parse().unwrap();
        backend.seed(
            "products",
            json!({ "name": "Pallet", "stock": 4, "warehouse_id": warehouse["id"] }),
        );
        backend.seed(
            "products",
            json!({ "name": "Crate", "stock": 40, "warehouse_id": warehouse["id"] }),
        );
        backend.seed(
            "products",
            json!({
                "name": "Orphan Bin",
                "stock": 2,
                "warehouse_id": RecordId::new().to_string(),
            }),
        );

        let mut screen = ProductsScreen::new(backend.clone());
        screen.load().await;
        (backend, screen, warehouse_id)
    }

    #[tokio::test]
    async fn dangling_warehouse_reference_renders_the_missing_marker() {
        let (_backend, screen, _warehouse_id) = screen_with_fixture().await;
        let orphan = screen
            .products()
            .iter()
            .find(|product| product.name == "Orphan Bin")
            .unwrap();
        assert!(orphan.warehouse.is_none());
        assert_eq!(orphan.warehouse_label(), "N/A");

        let joined = screen
            .products()
            .iter()
            .find(|product| product.name == "Pallet")
            .unwrap();
        assert_eq!(joined.warehouse_label(), "North Hub");
    }

    #[tokio::test]
    async fn low_stock_and_warehouse_filters_compose_with_search() {
        let (_backend, mut screen, warehouse_id) = screen_with_fixture().await;
        assert_eq!(screen.visible().len(), 3);

        screen.low_stock_only = true;
        let names: Vec<&str> = screen.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(!names.contains(&"Crate"));

        screen.warehouse_filter = WarehouseFilter::Only(warehouse_id);
        let names: Vec<&str> = screen.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pallet"]);

        screen.search = "pal".into();
        assert_eq!(screen.visible().len(), 1);
        screen.search = "crate".into();
        assert!(screen.visible().is_empty());
    }

    #[tokio::test]
    async fn add_refetches_so_the_join_is_server_computed() {
        let (_backend, mut screen, warehouse_id) = screen_with_fixture().await;
        screen
            .add(&ProductDraft {
                name: "Drum".into(),
                stock: 12,
                warehouse_id,
            })
            .await
            .unwrap();

        let drum = screen
            .products()
            .iter()
            .find(|product| product.name == "Drum")
            .unwrap();
        assert_eq!(drum.warehouse_label(), "North Hub");
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Filtering twice with the same query, without a refetch in
            /// between, yields an identical view.
            #[test]
            fn search_is_idempotent(query in ".{0,24}") {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                runtime.block_on(async {
                    let (_backend, mut screen, _warehouse_id) = screen_with_fixture().await;
                    screen.search = query.clone();
                    let first: Vec<RecordId> =
                        screen.visible().iter().map(|p| p.id).collect();
                    let second: Vec<RecordId> =
                        screen.visible().iter().map(|p| p.id).collect();
                    assert_eq!(first, second);
                });
            }
        }
    }
}
