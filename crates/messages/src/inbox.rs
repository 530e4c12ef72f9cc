//! Admin inbox over contact messages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::{ClientResult, RecordId};
use supplyline_resource::{ListResource, Notice, Record};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactMessage {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Record for ContactMessage {
    const TABLE: &'static str = "messages";

    fn id(&self) -> RecordId {
        self.id
    }

    fn select_query() -> SelectQuery {
        SelectQuery::new()
            .columns("id,name,email,content,created_at")
            .order_desc("created_at")
    }
}

/// The admin inbox: newest first, one message viewable at a time.
pub struct InboxScreen {
    list: ListResource<ContactMessage>,
    selected: Option<RecordId>,
}

impl InboxScreen {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            list: ListResource::new(tables, "Message"),
            selected: None,
        }
    }

    pub async fn load(&mut self) {
        self.list.refresh().await;
    }

    pub fn messages(&self) -> &[ContactMessage] {
        self.list.items()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.list.notice()
    }

    /// Open a message in the viewer.
    pub fn select(&mut self, id: RecordId) {
        self.selected = Some(id);
    }

    pub fn selected(&self) -> Option<&ContactMessage> {
        self.selected.and_then(|id| self.list.get(id))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Delete a message; the viewer closes if it was showing that message.
    pub async fn delete(&mut self, id: RecordId) -> ClientResult<()> {
        self.list.delete(id).await?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }
}
