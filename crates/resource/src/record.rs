//! The record contract a list resource is parameterized over.

use serde::de::DeserializeOwned;

use supplyline_backend::SelectQuery;
use supplyline_core::RecordId;

/// A row shape stored in one backend table.
pub trait Record: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Backend table the collection lives in.
    const TABLE: &'static str;

    /// Server-assigned identifier.
    fn id(&self) -> RecordId;

    /// Query used to fetch the collection (columns, ordering, at most one
    /// embedded join).
    fn select_query() -> SelectQuery {
        SelectQuery::new()
    }
}
