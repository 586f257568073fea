//! Hosted-service backend for smartmark.
//!
//! Implements the collaborator traits against the hosted service's REST
//! surface: the auth endpoint for user resolution and the row API for
//! bookmark queries and writes. The change feed is served by polling the
//! owner-scoped query and diffing; the reconciliation core is delivery-
//! agnostic, so a poll-based feed and a push-based one are interchangeable
//! behind [`ChangeFeedTrait`].

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::services::backend::{
    AuthServiceTrait, ChangeFeedTrait, FeedSubscription, PersistenceServiceTrait, SubscriptionId,
};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::BackendError;
use crate::types::event::{AuthEvent, RawChangeEvent};
use crate::types::user::User;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// A bookmark row as returned by the hosted row API.
///
/// Timestamps come back as RFC 3339 strings and are converted to unix
/// seconds for the client-side ordering key.
#[derive(Debug, Deserialize)]
struct RemoteBookmark {
    id: String,
    user_id: String,
    title: String,
    url: String,
    created_at: String,
}

impl RemoteBookmark {
    fn into_bookmark(self) -> Result<Bookmark, BackendError> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| BackendError::Serialization(format!("created_at: {}", e)))?
            .timestamp();
        Ok(Bookmark {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            url: self.url,
            created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    email: Option<String>,
}

/// Backend implementation over the hosted service's REST API.
pub struct RemoteBackend {
    http: reqwest::Client,
    config: BackendConfig,
    poll_interval: Duration,
    pollers: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
    auth_tx: broadcast::Sender<AuthEvent>,
}

impl RemoteBackend {
    pub fn new(config: BackendConfig) -> Self {
        let (auth_tx, _) = broadcast::channel(16);
        Self {
            http: reqwest::Client::new(),
            config,
            poll_interval: DEFAULT_POLL_INTERVAL,
            pollers: Mutex::new(HashMap::new()),
            auth_tx,
        }
    }

    /// Overrides the change-feed polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token),
            )
    }

    async fn fetch_bookmarks(
        http: &reqwest::Client,
        config: &BackendConfig,
        user_id: &str,
    ) -> Result<Vec<Bookmark>, BackendError> {
        let url = format!(
            "{}/rest/v1/bookmarks?select=*&user_id=eq.{}&order=created_at.desc",
            config.base_url, user_id
        );
        let response = http
            .get(&url)
            .header("apikey", &config.api_key)
            .header("Authorization", format!("Bearer {}", config.access_token))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Network(format!(
                "snapshot query failed with status {}",
                response.status()
            )));
        }

        let rows: Vec<RemoteBookmark> = response
            .json()
            .await
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        rows.into_iter().map(RemoteBookmark::into_bookmark).collect()
    }
}

#[async_trait]
impl AuthServiceTrait for RemoteBackend {
    async fn current_user(&self) -> Result<Option<User>, BackendError> {
        let url = format!("{}/auth/v1/user", self.config.base_url);
        let response = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BackendError::Auth(format!(
                "user lookup failed with status {}",
                response.status()
            )));
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        Ok(Some(User {
            id: user.id,
            email: user.email,
        }))
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        // The remote session is bound to a fixed access token; no sign-in or
        // sign-out transitions originate here.
        self.auth_tx.subscribe()
    }
}

#[async_trait]
impl PersistenceServiceTrait for RemoteBackend {
    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, BackendError> {
        Self::fetch_bookmarks(&self.http, &self.config, user_id).await
    }

    async fn insert_bookmark(&self, new: NewBookmark) -> Result<Bookmark, BackendError> {
        let url = format!("{}/rest/v1/bookmarks", self.config.base_url);
        let response = self
            .authed(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({
                "user_id": new.user_id,
                "title": new.title,
                "url": new.url,
            }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Network(format!(
                "insert failed with status {}",
                response.status()
            )));
        }

        let mut rows: Vec<RemoteBookmark> = response
            .json()
            .await
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        match rows.pop() {
            Some(row) => row.into_bookmark(),
            None => Err(BackendError::Serialization(
                "insert returned no representation".to_string(),
            )),
        }
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/bookmarks?id=eq.{}", self.config.base_url, id);
        let response = self
            .authed(self.http.delete(&url))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Network(format!(
                "delete failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeFeedTrait for RemoteBackend {
    async fn subscribe(&self, user_id: &str) -> Result<FeedSubscription, BackendError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();

        let http = self.http.clone();
        let config = self.config.clone();
        let interval = self.poll_interval;
        let owner = user_id.to_string();

        let handle = tokio::spawn(async move {
            let mut known: HashMap<String, Bookmark> = HashMap::new();
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let rows = match Self::fetch_bookmarks(&http, &config, &owner).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        // Poll failures are the feed's own reconnection
                        // concern; the next tick retries.
                        tracing::warn!(error = %e, "change feed poll failed");
                        continue;
                    }
                };

                let current_ids: HashSet<String> = rows.iter().map(|b| b.id.clone()).collect();

                let deleted: Vec<String> = known
                    .keys()
                    .filter(|id| !current_ids.contains(*id))
                    .cloned()
                    .collect();
                for id in deleted {
                    known.remove(&id);
                    if tx.send(RawChangeEvent::deleted(&id)).is_err() {
                        return;
                    }
                }

                for row in rows {
                    if known.contains_key(&row.id) {
                        continue;
                    }
                    known.insert(row.id.clone(), row.clone());
                    if tx.send(RawChangeEvent::created(row)).is_err() {
                        return;
                    }
                }
            }
        });

        self.pollers
            .lock()
            .expect("poller mutex poisoned")
            .insert(id.clone(), handle);

        tracing::debug!(subscription = %id, owner = %user_id, "polling feed subscription opened");
        Ok(FeedSubscription { id, events: rx })
    }

    async fn unsubscribe(&self, id: &SubscriptionId) {
        let handle = self
            .pollers
            .lock()
            .expect("poller mutex poisoned")
            .remove(id);
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!(subscription = %id, "polling feed subscription closed");
        }
    }
}
