//! Supplier records and their management screen.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record, Searchable, search};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Supplier {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Record for Supplier {
    const TABLE: &'static str = "suppliers";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new().columns("id,name,email,phone")
    }
}

impl Searchable for Supplier {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self.email.to_lowercase().contains(keyword)
            || self.phone.to_lowercase().contains(keyword)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// The supplier directory screen.
pub struct SuppliersScreen {
    list: ListResource<Supplier>,
    pub search: String,
}

impl SuppliersScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Supplier"),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn suppliers(&self) -> &[Supplier] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&Supplier> {
        search(self.list.items(), &self.search)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    pub async fn add(&mut self, draft: &SupplierDraft) -> ClientResult<RecordId> {
        self.list.create(draft).await
    }

    pub async fn save(&mut self, id: RecordId, draft: &SupplierDraft) -> ClientResult<()> {
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

#[cfg(test)]
mod tests {
    use supplyline_backend::MemoryBackend;

    use super::*;

    #[tokio::test]
    async fn search_covers_name_email_and_phone() {
        let backend = Arc::new(MemoryBackend::new());
        let mut screen = SuppliersScreen::new(backend.clone());
        screen
            .add(&SupplierDraft {
                name: "Acme Freight".into(),
                email: "sales@acme.test".into(),
                phone: "+63 912 000 1111".into(),
            })
            .await
            .unwrap();
        screen
            .add(&SupplierDraft {
                name: "Island Metals".into(),
                email: "orders@island.test".into(),
                phone: "+63 917 222 3333".into(),
            })
            .await
            .unwrap();

        screen.search = "acme".into();
        assert_eq!(screen.visible().len(), 1);
        screen.search = "orders@".into();
        assert_eq!(screen.visible()[0].name, "Island Metals");
        screen.search = "917".into();
        assert_eq!(screen.visible()[0].name, "Island Metals");
        screen.search = "  ".into();
        assert_eq!(screen.visible().len(), 2);
    }

    #[tokio::test]
    async fn delete_confirmation_switches_between_rows() {
        let backend = Arc::new(MemoryBackend::new());
        let mut screen = SuppliersScreen::new(backend.clone());
        let a = screen
            .add(&SupplierDraft {
                name: "Acme Freight".into(),
                email: "sales@acme.test".into(),
                phone: "1".into(),
            })
            .await
            .unwrap();
        let b = screen
            .add(&SupplierDraft {
                name: "Island Metals".into(),
                email: "orders@island.test".into(),
                phone: "2".into(),
            })
            .await
            .unwrap();

        screen.request_delete(a);
        screen.request_delete(b);
        assert_eq!(screen.pending_delete(), Some(b));
        assert_eq!(screen.confirm_delete().await.unwrap(), Some(b));
        assert_eq!(screen.suppliers().len(), 1);
        assert_eq!(screen.suppliers()[0].id, a);
    }
}
