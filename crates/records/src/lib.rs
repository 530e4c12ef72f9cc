//! `supplyline-records` — document tracking over blob storage.

pub mod document;

pub use document::{DOCUMENTS_BUCKET, Document, DocumentsScreen};
