//! Document records: a metadata row paired with a stored file object.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplyline_backend::{SelectQuery, StorageApi, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record, Searchable, search};

/// Storage bucket holding the uploaded files.
pub const DOCUMENTS_BUCKET: &str = "documents";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub title: String,
    pub owner: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Storage key of the file behind this row (last URL segment).
    fn storage_key(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

impl Record for Document {
    const TABLE: &'static str = "documents";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,title,owner,url,created_at")
            .order_desc("created_at")
    }
}

impl Searchable for Document {
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(keyword)
            || self.owner.to_lowercase().contains(keyword)
    }
}

#[derive(Serialize)]
struct DocumentDraft<'a> {
    title: &'a str,
    owner: &'a str,
    url: String,
    created_at: DateTime<Utc>,
}

/// The document tracking screen.
///
/// A document lives in two places at once: the blob in storage and the
/// metadata row. The two are created and deleted together. Either
/// step failing fails the whole operation; there is no compensating
/// rollback (see the delete notes on [`DocumentsScreen::confirm_delete`]).
pub struct DocumentsScreen {
    list: ListResource<Document>,
    storage: Arc<dyn StorageApi>,
    pub search: String,
}

impl DocumentsScreen {
    pub fn new(tables: Arc<dyn TableApi>, storage: Arc<dyn StorageApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Document"),
            storage,
            search: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn documents(&self) -> &[Document] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&Document> {
        search(self.list.items(), &self.search)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    /// Upload a file and record its metadata row.
    ///
    /// The object key is the upload timestamp joined to the file name, so
    /// repeated uploads of the same file never collide. Any failing step
    /// fails the upload as a whole; a storage-step failure leaves no row
    /// behind.
    pub async fn upload(
        &mut self,
        title: &str,
        owner: &str,
        file_name: &str,
        bytes: Vec<u8>,
        uploaded_at: DateTime<Utc>,
    ) -> ClientResult<()> {
        let key = format!("{}_{}", uploaded_at.timestamp_millis(), file_name);
        if let Err(err) = self.storage.upload(DOCUMENTS_BUCKET, &key, bytes).await {
            self.list.show_error("Failed to upload document");
            return Err(err);
        }

        let draft = DocumentDraft {
            title,
            owner,
            url: self.storage.public_url(DOCUMENTS_BUCKET, &key),
            created_at: uploaded_at,
        };
        self.list.create(&draft).await?;
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

    /// Two-step delete of the pending document: the stored object first,
    /// then the metadata row.
    ///
    /// A second-step failure is reported as one failure even though the
    /// object is already gone; the row stays listed and points at a
    /// missing object until a later delete succeeds. No rollback is
    /// attempted.
    pub async fn confirm_delete(&mut self) -> ClientResult<Option<RecordId>> {
        let Some(id) = self.list.take_pending_delete() else {
            return Ok(None);
        };
        let Some(document) = self.list.get(id).cloned() else {
            self.list.show_error("Failed to delete document");
            return Err(supplyline_core::BackendError::not_found());
        };

        let key = document.storage_key().to_string();
        if let Err(err) = self.storage.remove(DOCUMENTS_BUCKET, &[key]).await {
            self.list.show_error("Failed to delete document");
            return Err(err);
        }

        if let Err(err) = self.list.delete(id).await {
            tracing::warn!(
                "document row {id} outlived its removed object; storage and metadata are out of step"
            );
            return Err(err);
        }
        Ok(Some(id))
    }
}
