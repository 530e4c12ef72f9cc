//! Transient status notices.

use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short-lived success/failure banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Holds at most one live notice.
///
/// Showing a new notice replaces the current one (outcomes are never
/// queued), and a notice self-dismisses once its display duration elapses.
#[derive(Debug, Clone)]
pub struct NoticeState {
    ttl: Duration,
    current: Option<(Notice, Instant)>,
}

impl Default for NoticeState {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeState {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    /// Custom display duration (tests shorten it).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Success, text);
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Error, text);
    }

    pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.current = Some((
            Notice {
                kind,
                text: text.into(),
            },
            Instant::now(),
        ));
    }

    /// The notice, if it is still within its display window.
    pub fn current(&self) -> Option<&Notice> {
        match &self.current {
            Some((notice, shown_at)) if shown_at.elapsed() < self.ttl => Some(notice),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
