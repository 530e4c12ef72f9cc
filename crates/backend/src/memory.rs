//! In-memory implementation of the backend contracts, for tests.
//!
//! Mirrors the hosted service closely enough for the state-sync contracts to
//! be exercised: server-assigned ids and `created_at` defaults, embedded
//! joins with `null` for dangling references, and an identity watch channel
//! written only here. `fail_next` injects one failure at a chosen operation
//! so callers can assert their no-false-success behavior.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value, json};
use tokio::sync::watch;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use supplyline_core::{BackendError, ClientResult, IdentityId, RecordId};

use crate::api::{AuthApi, Identity, NewUserAttributes, SelectQuery, StorageApi, TableApi};

/// Operation at which the next injected failure fires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailPoint {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
    Remove,
    SignIn,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, Vec<u8>>,
    users: Vec<MemoryUser>,
    fail_next: Option<FailPoint>,
}

struct MemoryUser {
    identity: Identity,
    password: String,
}

/// Backend double holding everything in process memory.
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    identity_tx: watch::Sender<Option<Identity>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            state: Mutex::new(MemoryState::default()),
            identity_tx,
        }
    }

    /// Insert a row directly, bypassing the API (test fixture setup).
    /// Server defaults (id, created_at) are filled in; the stored row is
    /// returned.
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let mut state = self.state.lock().expect("state lock poisoned");
        let row = with_server_defaults(row);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    /// Register an account without going through `sign_up`.
    pub fn register_user(&self, email: &str, password: &str) -> Identity {
        let identity = Identity {
            id: IdentityId::new(),
            email: email.to_string(),
        };
        let mut state = self.state.lock().expect("state lock poisoned");
        state.users.push(MemoryUser {
            identity: identity.clone(),
            password: password.to_string(),
        });
        identity
    }

    /// Arrange for the next matching operation to fail.
    pub fn fail_next(&self, point: FailPoint) {
        self.state.lock().expect("state lock poisoned").fail_next = Some(point);
    }

    /// Publish an identity replacement as the auth service would (token
    /// refresh, remote logout).
    pub fn emit_identity_change(&self, identity: Option<Identity>) {
        self.identity_tx.send_replace(identity);
    }

    /// Number of rows currently stored for a table.
    pub fn row_count(&self, table: &str) -> usize {
        self.state
            .lock()
            .expect("state lock poisoned")
            .tables
            .get(table)
            .map_or(0, Vec::len)
    }

    /// Whether a stored object exists.
    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.state
            .lock()
            .expect("state lock poisoned")
            .objects
            .contains_key(&object_key(bucket, key))
    }

    fn take_failure(state: &mut MemoryState, point: FailPoint) -> ClientResult<()> {
        if state.fail_next == Some(point) {
            state.fail_next = None;
            return Err(BackendError::transport("injected failure"));
        }
        Ok(())
    }
}

fn object_key(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

fn with_server_defaults(row: Value) -> Value {
    let mut object = match row {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    object
        .entry("id")
        .or_insert_with(|| json!(Uuid::now_v7().to_string()));
    object
        .entry("created_at")
        .or_insert_with(|| json!(Utc::now().to_rfc3339()));
    Value::Object(object)
}

fn row_id_matches(row: &Value, id: RecordId) -> bool {
    let id = id.to_string();
    row.get("id").and_then(Value::as_str) == Some(id.as_str())
}

fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

#[async_trait]
impl TableApi for MemoryBackend {
    async fn select(&self, table: &str, query: SelectQuery) -> ClientResult<Vec<Value>> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Select)?;

        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| row.get(column) == Some(value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(embed) = &query.embed {
            let related = state.tables.get(&embed.table).cloned().unwrap_or_default();
            for row in &mut rows {
                let fk = row.get(&embed.fk_column).cloned().unwrap_or(Value::Null);
                let joined = related
                    .iter()
                    .find(|candidate| candidate.get("id") == Some(&fk))
                    .cloned()
                    .unwrap_or(Value::Null);
                if let Some(object) = row.as_object_mut() {
                    object.insert(embed.table.clone(), joined);
                }
            }
        }

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Insert)?;

        let row = with_server_defaults(row);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: RecordId, patch: Value) -> ClientResult<Value> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Update)?;

        let rows = state.tables.entry(table.to_string()).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row_id_matches(row, id))
            .ok_or_else(BackendError::not_found)?;

        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: RecordId) -> ClientResult<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Delete)?;

        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| !row_id_matches(row, id));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MemoryBackend {
    async fn current_identity(&self) -> ClientResult<Option<Identity>> {
        Ok(self.identity_tx.borrow().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Identity> {
        let identity = {
            let mut state = self.state.lock().expect("state lock poisoned");
            MemoryBackend::take_failure(&mut state, FailPoint::SignIn)
                .map_err(|_| BackendError::auth("service unavailable"))?;
            state
                .users
                .iter()
                .find(|user| user.identity.email == email && user.password == password)
                .map(|user| user.identity.clone())
        };
        let identity =
            identity.ok_or_else(|| BackendError::auth("Invalid login credentials"))?;
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: NewUserAttributes,
    ) -> ClientResult<Identity> {
        {
            let state = self.state.lock().expect("state lock poisoned");
            if state.users.iter().any(|user| user.identity.email == email) {
                return Err(BackendError::auth("User already registered"));
            }
        }
        let identity = self.register_user(email, password);
        // The hosted service materializes the profile row from the sign-up
        // attributes; emulate that here.
        self.seed(
            "profiles",
            json!({
                "id": identity.id,
                "full_name": attributes.full_name,
                "role": attributes.role,
                "avatar_url": null,
            }),
        );
        Ok(identity)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        self.identity_tx.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }
}

#[async_trait]
impl StorageApi for MemoryBackend {
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> ClientResult<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Upload)
            .map_err(|_| BackendError::storage("injected upload failure"))?;
        state.objects.insert(object_key(bucket, key), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> ClientResult<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        MemoryBackend::take_failure(&mut state, FailPoint::Remove)
            .map_err(|_| BackendError::storage("injected remove failure"))?;
        for key in keys {
            state.objects.remove(&object_key(bucket, key));
        }
        Ok(())
    }
}
