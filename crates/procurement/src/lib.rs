//! `supplyline-procurement` — suppliers and purchase orders.

pub mod order;
pub mod supplier;

pub use order::{OrderStatus, PurchaseOrder, PurchaseOrderDraft, PurchaseOrdersScreen, SupplierRef};
pub use supplier::{Supplier, SupplierDraft, SuppliersScreen};
