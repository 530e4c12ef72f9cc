//! `supplyline-auth` — who is signed in, and what are they allowed to be.
//!
//! Holds the closed [`Role`] set, the [`SessionStore`] that tracks the live
//! identity, the [`ProfileResolver`] that enriches an identity into a
//! [`Profile`] with safe defaults, and the login/register form flow.

pub mod form;
pub mod profile;
pub mod role;
pub mod session;

pub use form::{AuthForm, AuthMode, AuthOutcome, FormNotice};
pub use profile::{Profile, ProfileResolver};
pub use role::Role;
pub use session::SessionStore;
