//! Identity → profile enrichment.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use supplyline_backend::{SelectQuery, TableApi};
use supplyline_core::IdentityId;

use crate::role::Role;

/// Table holding one profile row per identity, keyed by identity id.
const PROFILES_TABLE: &str = "profiles";

/// Fallback display name when the profile row carries none.
const DEFAULT_FULL_NAME: &str = "User";

/// Application-level user record: display attributes plus the access role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: IdentityId,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

impl Profile {
    /// The profile used when no row exists or the lookup failed: a plain
    /// staff user. Navigation must keep working on this.
    pub fn fallback(id: IdentityId) -> Self {
        Self {
            id,
            full_name: DEFAULT_FULL_NAME.to_string(),
            role: Role::Staff,
            avatar_url: None,
        }
    }
}

/// Lenient wire shape: any individual field may be absent or null.
#[derive(Debug, Deserialize)]
struct WireProfile {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    role: Option<Value>,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// Resolves an identity id to a [`Profile`].
///
/// Infallible by contract: a missing row is an empty result, not an error,
/// and lookup/transport failures are logged and degrade to the fallback
/// profile. The UI never hard-fails because enrichment failed.
#[derive(Clone)]
pub struct ProfileResolver {
    tables: Arc<dyn TableApi>,
}

impl ProfileResolver {
    pub fn new(tables: Arc<dyn TableApi>) -> Self {
        Self { tables }
    }

    pub async fn resolve(&self, id: IdentityId) -> Profile {
        let query = SelectQuery::new()
            .columns("id,full_name,role,avatar_url")
            .eq("id", id.to_string());

        let rows = match self.tables.select(PROFILES_TABLE, query).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("profile lookup failed for {id}: {err}");
                return Profile::fallback(id);
            }
        };

        // Zero-or-one result shape: no row is a valid outcome.
        let Some(row) = rows.into_iter().next() else {
            return Profile::fallback(id);
        };

        match serde_json::from_value::<WireProfile>(row) {
            Ok(wire) => Profile {
                id,
                full_name: wire
                    .full_name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| DEFAULT_FULL_NAME.to_string()),
                // A missing or non-string role is a malformed row and means
                // staff; an unrecognized string is a role this build cannot
                // gate on.
                role: wire
                    .role
                    .as_ref()
                    .and_then(Value::as_str)
                    .map_or(Role::Staff, Role::parse),
                avatar_url: wire.avatar_url,
            },
            Err(err) => {
                tracing::warn!("malformed profile row for {id}: {err}");
                Profile::fallback(id)
            }
        }
    }
}
