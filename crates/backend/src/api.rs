//! Contracts the client holds against the hosted backend.
//!
//! Rows cross this boundary as `serde_json::Value`; typed record shapes live
//! with the screens that own them. Role and profile semantics also stay out
//! of here; at this layer a role is just the string the wire carries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use supplyline_core::{ClientResult, IdentityId, RecordId};

/// An authenticated principal as reported by the auth service.
///
/// Observed, never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
}

/// Display attributes submitted with a registration.
///
/// The backend materializes these into the profile row; the client never
/// writes profiles directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserAttributes {
    pub full_name: String,
    pub role: String,
}

/// Embedded-join request: attach one related row to each selected row.
///
/// `table` is both the related table and the key the joined object appears
/// under in the result row; `fk_column` is the referencing column on the
/// selected table. A dangling reference yields `null`, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub table: String,
    pub fk_column: String,
    pub columns: String,
}

/// Ordering of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub ascending: bool,
}

/// Query shape for [`TableApi::select`]: columns, equality filters, ordering
/// and at most one embedded join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub columns: Option<String>,
    pub filters: Vec<(String, Value)>,
    pub order: Option<Ordering>,
    pub embed: Option<Embed>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the selected columns (comma-separated, wire syntax).
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Add an equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(Ordering {
            column: column.into(),
            ascending: true,
        });
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(Ordering {
            column: column.into(),
            ascending: false,
        });
        self
    }

    /// Join one related row per result row (see [`Embed`]).
    pub fn embed(
        mut self,
        table: impl Into<String>,
        fk_column: impl Into<String>,
        columns: impl Into<String>,
    ) -> Self {
        self.embed = Some(Embed {
            table: table.into(),
            fk_column: fk_column.into(),
            columns: columns.into(),
        });
        self
    }
}

/// Authentication operations plus the identity-change stream.
///
/// The stream is a `watch` channel: the backend is its single writer, every
/// subscriber sees the latest identity, and dropping a receiver is the
/// unsubscribe. Login, logout and token refresh all publish a replacement
/// value.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Fetch the currently authenticated identity, if any.
    async fn current_identity(&self) -> ClientResult<Option<Identity>>;

    /// Authenticate with email + password.
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Identity>;

    /// Register a new account with display attributes.
    ///
    /// Registration does not establish a session when the service requires
    /// email confirmation; callers treat the returned identity as pending.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: NewUserAttributes,
    ) -> ClientResult<Identity>;

    /// End the current session.
    async fn sign_out(&self) -> ClientResult<()>;

    /// Subscribe to identity changes. The receiver is seeded with the
    /// current value.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Generic row storage: ordered selects and single-row mutations.
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Fetch rows matching `query`, in the requested order.
    async fn select(&self, table: &str, query: SelectQuery) -> ClientResult<Vec<Value>>;

    /// Insert one row; returns the stored representation (server-assigned
    /// id and defaults included).
    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value>;

    /// Patch the row with the given id; returns the updated representation.
    async fn update(&self, table: &str, id: RecordId, patch: Value) -> ClientResult<Value>;

    /// Delete the row with the given id.
    async fn delete(&self, table: &str, id: RecordId) -> ClientResult<()>;
}

/// Blob storage: uploads, public URLs, removals.
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> ClientResult<()>;

    /// Public URL for a stored object. Pure formatting, no IO.
    fn public_url(&self, bucket: &str, key: &str) -> String;

    async fn remove(&self, bucket: &str, keys: &[String]) -> ClientResult<()>;
}
