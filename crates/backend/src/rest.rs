//! HTTP implementation of the backend contracts.
//!
//! Talks to a hosted PostgREST/GoTrue-style API: `/auth/v1/*` for sessions,
//! `/rest/v1/{table}` for rows, `/storage/v1/object/*` for blobs. Every
//! request carries the project API key; row and storage requests are
//! bearer-authenticated with the session token when one is held.

use std::sync::RwLock;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::watch;

use async_trait::async_trait;

use supplyline_core::{BackendError, ClientResult, IdentityId, RecordId};

use crate::api::{AuthApi, Identity, NewUserAttributes, SelectQuery, StorageApi, TableApi};
use crate::config::BackendConfig;

/// Client for the hosted backend.
///
/// Holds the current session and publishes every identity replacement on a
/// `watch` channel; this client is the channel's only writer.
pub struct RestBackend {
    http: reqwest::Client,
    base: String,
    key: String,
    session: RwLock<Option<RestSession>>,
    identity_tx: watch::Sender<Option<Identity>>,
}

#[derive(Debug, Clone)]
struct RestSession {
    access_token: String,
    identity: Identity,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: IdentityId,
    #[serde(default)]
    email: Option<String>,
}

impl WireUser {
    fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

/// Registration response; the session part is absent when the service
/// requires email confirmation.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    id: Option<IdentityId>,
    #[serde(default)]
    email: Option<String>,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            base: config.url,
            key: config.key,
            session: RwLock::new(None),
            identity_tx,
        }
    }

    fn bearer(&self) -> String {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.key.clone())
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn store_session(&self, session: Option<RestSession>) {
        let identity = session.as_ref().map(|s| s.identity.clone());
        *self.session.write().expect("session lock poisoned") = session;
        // Replace, don't compare: a token refresh republishes the same
        // identity and dependents re-run.
        self.identity_tx.send_replace(identity);
    }

    async fn check(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::api(status.as_u16(), message))
    }

    async fn auth_failure(&self, response: reqwest::Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::auth(auth_message(status, &body))
    }
}

/// Extract a user-facing message from an auth-service error body.
fn auth_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| format!("authentication failed ({})", status.as_u16()))
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::transport(err.to_string())
}

fn render_select(query: &SelectQuery) -> String {
    let mut columns = query.columns.clone().unwrap_or_else(|| "*".to_string());
    if let Some(embed) = &query.embed {
        columns.push(',');
        columns.push_str(&embed.table);
        columns.push(':');
        columns.push_str(&embed.fk_column);
        columns.push('(');
        columns.push_str(&embed.columns);
        columns.push(')');
    }
    columns
}

fn render_filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl AuthApi for RestBackend {
    async fn current_identity(&self) -> ClientResult<Option<Identity>> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };

        let url = format!("{}/auth/v1/user", self.base);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.key)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The token expired; the session is gone.
            self.store_session(None);
            return Ok(None);
        }

        let response = self.check(response).await?;
        let user: WireUser = response.json().await.map_err(transport)?;
        let identity = user.into_identity();
        self.store_session(Some(RestSession {
            access_token: token,
            identity: identity.clone(),
        }));
        Ok(Some(identity))
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Identity> {
        let url = format!("{}/auth/v1/token", self.base);
        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(self.auth_failure(response).await);
        }

        let token: TokenResponse = response.json().await.map_err(transport)?;
        let identity = token.user.into_identity();
        self.store_session(Some(RestSession {
            access_token: token.access_token,
            identity: identity.clone(),
        }));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: NewUserAttributes,
    ) -> ClientResult<Identity> {
        let url = format!("{}/auth/v1/signup", self.base);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": attributes,
            }))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(self.auth_failure(response).await);
        }

        let body: SignUpResponse = response.json().await.map_err(transport)?;
        let identity = match (body.user, body.id) {
            (Some(user), _) => user.into_identity(),
            (None, Some(id)) => Identity {
                id,
                email: body.email.unwrap_or_else(|| email.to_string()),
            },
            (None, None) => {
                return Err(BackendError::decode("sign-up response carried no user"));
            }
        };

        // Instances with auto-confirm hand back a session immediately.
        if let Some(access_token) = body.access_token {
            self.store_session(Some(RestSession {
                access_token,
                identity: identity.clone(),
            }));
        }
        Ok(identity)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        if let Some(token) = self.access_token() {
            let url = format!("{}/auth/v1/logout", self.base);
            let result = self
                .http
                .post(&url)
                .header("apikey", &self.key)
                .bearer_auth(&token)
                .send()
                .await;
            if let Err(err) = result {
                tracing::warn!("sign-out request failed, dropping session locally: {err}");
            }
        }
        // The local session ends regardless of what the service said.
        self.store_session(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }
}

#[async_trait]
impl TableApi for RestBackend {
    async fn select(&self, table: &str, query: SelectQuery) -> ClientResult<Vec<Value>> {
        let url = format!("{}/rest/v1/{}", self.base, table);
        let mut params: Vec<(String, String)> = vec![("select".into(), render_select(&query))];
        for (column, value) in &query.filters {
            params.push((column.clone(), format!("eq.{}", render_filter_value(value))));
        }
        if let Some(order) = &query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".into(), format!("{}.{}", order.column, direction)));
        }

        let response = self
            .http
            .get(&url)
            .query(&params)
            .header("apikey", &self.key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(transport)?;
        let response = self.check(response).await?;
        response.json().await.map_err(transport)
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let url = format!("{}/rest/v1/{}", self.base, table);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(&json!([row]))
            .send()
            .await
            .map_err(transport)?;
        let response = self.check(response).await?;
        let mut rows: Vec<Value> = response.json().await.map_err(transport)?;
        if rows.is_empty() {
            return Err(BackendError::decode("insert returned no representation"));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: &str, id: RecordId, patch: Value) -> ClientResult<Value> {
        let url = format!("{}/rest/v1/{}", self.base, table);
        let response = self
            .http
            .patch(&url)
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        let response = self.check(response).await?;
        let mut rows: Vec<Value> = response.json().await.map_err(transport)?;
        if rows.is_empty() {
            return Err(BackendError::not_found());
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete(&self, table: &str, id: RecordId) -> ClientResult<()> {
        let url = format!("{}/rest/v1/{}", self.base, table);
        let response = self
            .http
            .delete(&url)
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(transport)?;
        self.check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageApi for RestBackend {
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> ClientResult<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base, bucket, key);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.key)
            .bearer_auth(self.bearer())
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::storage(format!(
                "upload failed ({}): {message}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base, bucket, key)
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> ClientResult<()> {
        let url = format!("{}/storage/v1/object/{}", self.base, bucket);
        let response = self
            .http
            .delete(&url)
            .header("apikey", &self.key)
            .bearer_auth(self.bearer())
            .json(&json!({ "prefixes": keys }))
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::storage(format!(
                "remove failed ({}): {message}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}
