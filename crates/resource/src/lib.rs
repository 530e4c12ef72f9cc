//! `supplyline-resource` — the remote-backed list resource.
//!
//! Every record screen in the application is the same machine: fetch a
//! collection, hold it as local state, mutate remotely and reconcile
//! locally, flash a transient notice, filter in memory, and ask twice
//! before deleting. This crate implements that machine once; the domain
//! crates configure it per record type.

pub mod filter;
pub mod list;
pub mod notice;
pub mod record;

pub use filter::{Searchable, search};
pub use list::{FetchTicket, ListResource};
pub use notice::{NOTICE_TTL, Notice, NoticeKind, NoticeState};
pub use record::Record;

/// Marker rendered in place of a joined row that no longer exists.
///
/// A dangling reference must never crash the row; it degrades to this.
pub const MISSING_REFERENCE: &str = "N/A";
