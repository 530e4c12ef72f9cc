//! Public "get in touch" form.

use std::sync::Arc;

use serde_json::json;

use supplyline_backend::TableApi;
use supplyline_core::ClientResult;
use supplyline_resource::{Notice, NoticeState};

/// State of the contact form. Reachable without a session; the only thing
/// it can do is insert one message row.
pub struct ContactForm {
    tables: Arc<dyn TableApi>,
    pub name: String,
    pub email: String,
    pub content: String,
    notices: NoticeState,
}

impl ContactForm {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self {
            tables,
            name: String::new(),
            email: String::new(),
            content: String::new(),
            notices: NoticeState::new(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Send the message. Fields clear only on success.
    pub async fn submit(&mut self) -> ClientResult<()> {
        let row = json!({
            "name": self.name,
            "email": self.email,
            "content": self.content,
        });
        match self.tables.insert("messages", row).await {
            Ok(_) => {
                self.notices
                    .show_success("Message sent! We'll get back to you soon.");
                self.name.clear();
                self.email.clear();
                self.content.clear();
                Ok(())
            }
            Err(err) => {
                self.notices
                    .show_error("Something went wrong. Please try again.");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use supplyline_backend::{FailPoint, MemoryBackend};
    use supplyline_resource::NoticeKind;

    use super::*;

    #[tokio::test]
    async fn successful_submit_clears_the_form() {
        let backend = Arc::new(MemoryBackend::new());
        let mut form = ContactForm::new(backend.clone());
        form.name = "Rey Santos".into();
        form.email = "rey@example.com".into();
        form.content = "Interested in a partnership.".into();

        form.submit().await.unwrap();
        assert!(form.name.is_empty());
        assert!(form.content.is_empty());
        assert_eq!(form.notice().map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(backend.row_count("messages"), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_fields() {
        let backend = Arc::new(MemoryBackend::new());
        let mut form = ContactForm::new(backend.clone());
        form.name = "Rey Santos".into();
        form.email = "rey@example.com".into();
        form.content = "Interested in a partnership.".into();

        backend.fail_next(FailPoint::Insert);
        assert!(form.submit().await.is_err());
        assert_eq!(form.name, "Rey Santos");
        assert_eq!(form.notice().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(backend.row_count("messages"), 0);
    }
}
