//! `supplyline-messages` — the public contact form and the admin inbox.

pub mod contact;
pub mod inbox;

pub use contact::ContactForm;
pub use inbox::{ContactMessage, InboxScreen};
