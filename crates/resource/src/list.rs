//! The list-resource state machine.

use std::sync::Arc;

use serde::Serialize;

use supplyline_backend::TableApi;
use supplyline_core::{BackendError, ClientResult, RecordId};

use crate::notice::{Notice, NoticeState};
use crate::record::Record;

/// Token tying a fetch result to the fetch that produced it.
///
/// Remote calls cannot be cancelled; when a screen is remounted or refreshed
/// while a fetch is in flight, the superseded result must not overwrite the
/// newer state. A ticket from a superseded generation is simply discarded at
/// apply time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
}

/// In-memory view of one backend collection.
///
/// The list is a cache, never the source of truth: every mutation goes to
/// the backend first and the local copy is patched only on success, so the
/// screen can never show a success that did not happen. Each screen owns its
/// resource exclusively; there is no cross-screen shared list state.
pub struct ListResource<R: Record> {
    tables: Arc<dyn TableApi>,
    label: &'static str,
    items: Vec<R>,
    epoch: u64,
    notices: NoticeState,
    pending_delete: Option<RecordId>,
}

impl<R: Record> ListResource<R> {
    /// `label` is the human noun used in notices ("Warehouse added").
    pub fn new(tables: Arc<dyn TableApi>, label: &'static str) -> Self {
        Self {
            tables,
            label,
            items: Vec::new(),
            epoch: 0,
            notices: NoticeState::new(),
            pending_delete: None,
        }
    }

    /// Shorten the notice display window (tests).
    pub fn set_notice_ttl(&mut self, ttl: std::time::Duration) {
        self.notices = NoticeState::with_ttl(ttl);
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.notices.show_success(text);
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.notices.show_error(text);
    }

    // ── Fetch ────────────────────────────────────────────────────────────

    /// Start a fetch generation. Any ticket issued earlier is superseded.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.epoch += 1;
        FetchTicket { epoch: self.epoch }
    }

    /// Fetch and decode the collection without touching local state.
    pub async fn load(&self) -> ClientResult<Vec<R>> {
        let rows = self.tables.select(R::TABLE, R::select_query()).await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value::<R>(row)
                    .map_err(|err| BackendError::decode(format!("{} row: {err}", R::TABLE)))
            })
            .collect()
    }

    /// Apply a fetch result, unless the ticket was superseded.
    ///
    /// A failed fetch degrades to an empty list: the screen renders, the
    /// failure is logged, nothing is surfaced as an error page.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ClientResult<Vec<R>>) {
        if ticket.epoch != self.epoch {
            tracing::debug!("discarding stale {} fetch result", R::TABLE);
            return;
        }
        match result {
            Ok(items) => self.items = items,
            Err(err) => {
                tracing::warn!("failed to fetch {}: {err}", R::TABLE);
                self.items.clear();
            }
        }
    }

    /// Fetch the collection and install the result.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.load().await;
        self.apply_fetch(ticket, result);
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Insert a candidate record; append the server's representation on
    /// success and return its assigned id. On failure the list is untouched
    /// and a failure notice shows.
    pub async fn create<D: Serialize>(&mut self, draft: &D) -> ClientResult<RecordId> {
        let row = serde_json::to_value(draft)
            .map_err(|err| BackendError::decode(format!("{} draft: {err}", R::TABLE)))?;
        match self.tables.insert(R::TABLE, row).await.and_then(|stored| {
            serde_json::from_value::<R>(stored)
                .map_err(|err| BackendError::decode(format!("{} row: {err}", R::TABLE)))
        }) {
            Ok(record) => {
                let id = record.id();
                self.items.push(record);
                self.notices.show_success(format!("{} added", self.label));
                Ok(id)
            }
            Err(err) => {
                self.notices
                    .show_error(format!("Failed to add {}", self.label.to_lowercase()));
                Err(err)
            }
        }
    }

    /// Patch a record; replace the matching entry in place on success. On
    /// failure the prior entry is untouched.
    pub async fn update<P: Serialize>(&mut self, id: RecordId, patch: &P) -> ClientResult<()> {
        let patch = serde_json::to_value(patch)
            .map_err(|err| BackendError::decode(format!("{} patch: {err}", R::TABLE)))?;
        match self
            .tables
            .update(R::TABLE, id, patch)
            .await
            .and_then(|stored| {
                serde_json::from_value::<R>(stored)
                    .map_err(|err| BackendError::decode(format!("{} row: {err}", R::TABLE)))
            }) {
            Ok(record) => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
                    *slot = record;
                } else {
                    // The entry vanished locally (a refetch raced the
                    // mutation); the next refresh reconciles.
                    tracing::debug!("updated {} row {id} not present locally", R::TABLE);
                }
                self.notices.show_success(format!("{} updated", self.label));
                Ok(())
            }
            Err(err) => {
                self.notices
                    .show_error(format!("Failed to update {}", self.label.to_lowercase()));
                Err(err)
            }
        }
    }

    /// Delete a record remotely; remove the matching entry on success. On
    /// failure the list is untouched.
    pub async fn delete(&mut self, id: RecordId) -> ClientResult<()> {
        match self.tables.delete(R::TABLE, id).await {
            Ok(()) => {
                self.remove_local(id);
                self.notices.show_success(format!("{} deleted", self.label));
                Ok(())
            }
            Err(err) => {
                self.notices
                    .show_error(format!("Failed to delete {}", self.label.to_lowercase()));
                Err(err)
            }
        }
    }

    /// Drop an entry from local state only. Custom multi-step deletes use
    /// this after their remote steps succeed.
    pub fn remove_local(&mut self, id: RecordId) {
        self.items.retain(|item| item.id() != id);
    }

    // ── Delete confirmation ──────────────────────────────────────────────

    /// Mark a row as pending deletion. At most one row is pending at a
    /// time; requesting another silently replaces the first.
    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Take the pending id, clearing the confirmation state. Custom delete
    /// flows use this to run their own remote steps.
    pub fn take_pending_delete(&mut self) -> Option<RecordId> {
        self.pending_delete.take()
    }

    /// Delete the row whose confirmation is pending, if any.
    pub async fn confirm_delete(&mut self) -> ClientResult<Option<RecordId>> {
        let Some(id) = self.take_pending_delete() else {
            return Ok(None);
        };
        self.delete(id).await?;
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use supplyline_backend::{FailPoint, MemoryBackend, SelectQuery};

    use super::*;
    use crate::notice::NoticeKind;

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    struct Depot {
        id: RecordId,
        name: String,
        location: String,
    }

    impl Record for Depot {
        const TABLE: &'static str = "warehouses";

        fn id(&self) -> RecordId {
            self.id
        }

        fn select_query() -> SelectQuery {
            SelectQuery::new().order_asc("name")
        }
    }

    #[derive(Serialize)]
    struct DepotDraft {
        name: &'static str,
        location: &'static str,
    }

    fn resource(backend: &Arc<MemoryBackend>) -> ListResource<Depot> {
        ListResource::new(backend.clone(), "Warehouse")
    }

    #[tokio::test]
    async fn create_appends_the_server_representation() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);

        let draft = DepotDraft {
            name: "North Hub",
            location: "Cebu",
        };
        let first = list.create(&draft).await.unwrap();
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "North Hub");
        assert_eq!(list.items()[0].location, "Cebu");

        // No client-side dedup: identical fields make two distinct records.
        let second = list.create(&draft).await.unwrap();
        assert_eq!(list.items().len(), 2);
        assert_ne!(first, second);
        assert_eq!(
            list.notice().map(|n| n.text.as_str()),
            Some("Warehouse added")
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_the_entry_untouched() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "North Hub", "location": "Cebu" }));
        list.refresh().await;
        list.set_notice_ttl(Duration::from_millis(20));

        let before = list.items().to_vec();
        let id = before[0].id();

        backend.fail_next(FailPoint::Update);
        let err = list.update(id, &json!({ "name": "Renamed" })).await;
        assert!(err.is_err());
        assert_eq!(list.items(), before.as_slice());

        let notice = list.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        std::thread::sleep(Duration::from_millis(30));
        assert!(list.notice().is_none(), "failure notice must auto-clear");
    }

    #[tokio::test]
    async fn successful_update_replaces_in_place() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "North Hub", "location": "Cebu" }));
        list.refresh().await;
        let id = list.items()[0].id();

        list.update(id, &json!({ "location": "Davao" })).await.unwrap();
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].location, "Davao");
    }

    #[tokio::test]
    async fn delete_confirmation_tracks_one_pending_row() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "A", "location": "x" }));
        backend.seed("warehouses", json!({ "name": "B", "location": "y" }));
        list.refresh().await;

        let a = list.items()[0].id();
        let b = list.items()[1].id();

        list.request_delete(a);
        assert_eq!(list.pending_delete(), Some(a));
        // Selecting another row replaces the pending confirmation.
        list.request_delete(b);
        assert_eq!(list.pending_delete(), Some(b));

        let deleted = list.confirm_delete().await.unwrap();
        assert_eq!(deleted, Some(b));
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].id(), a);
        assert_eq!(list.pending_delete(), None);
    }

    #[tokio::test]
    async fn confirm_without_pending_row_is_a_no_op() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        assert_eq!(list.confirm_delete().await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_list_untouched() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "North Hub", "location": "Cebu" }));
        list.refresh().await;
        let id = list.items()[0].id();

        backend.fail_next(FailPoint::Delete);
        list.request_delete(id);
        assert!(list.confirm_delete().await.is_err());
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.notice().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn fetch_error_degrades_to_an_empty_list() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "North Hub", "location": "Cebu" }));
        list.refresh().await;
        assert_eq!(list.items().len(), 1);

        backend.fail_next(FailPoint::Select);
        list.refresh().await;
        assert!(list.items().is_empty());
    }

    #[tokio::test]
    async fn superseded_fetch_results_are_discarded() {
        let backend = Arc::new(MemoryBackend::new());
        let mut list = resource(&backend);
        backend.seed("warehouses", json!({ "name": "A", "location": "x" }));

        let stale_ticket = list.begin_fetch();
        let stale_result = list.load().await;

        backend.seed("warehouses", json!({ "name": "B", "location": "y" }));
        let fresh_ticket = list.begin_fetch();
        let fresh_result = list.load().await;
        list.apply_fetch(fresh_ticket, fresh_result);
        assert_eq!(list.items().len(), 2);

        // The unmounted/older fetch lands late and must not win.
        list.apply_fetch(stale_ticket, stale_result);
        assert_eq!(list.items().len(), 2);
    }
}
