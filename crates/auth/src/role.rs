//! Access roles.

use serde::{Deserialize, Serialize};

/// Access tier of a signed-in user.
///
/// A closed set: the wire carries lowercase strings, and anything
/// unrecognized decodes to [`Role::Unknown`] rather than failing the row.
/// `Unknown` is never a default (an absent profile resolves to `Staff`,
/// see [`crate::Profile::fallback`]); it only marks a value this build
/// does not know how to gate on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Manager,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }

    /// Parse a wire string; unrecognized values map to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "staff" => Role::Staff,
            "manager" => Role::Manager,
            "admin" => Role::Admin,
            _ => Role::Unknown,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
