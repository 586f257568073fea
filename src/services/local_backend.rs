//! Embedded backend for smartmark.
//!
//! Implements all three collaborator traits over a local SQLite database:
//! relational storage with owner scoping, server-side id and timestamp
//! assignment, and change fan-out to per-user subscriber channels. Used as
//! the demo default and as the test backend.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::params;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::database::Database;
use crate::services::backend::{
    AuthServiceTrait, ChangeFeedTrait, FeedSubscription, PersistenceServiceTrait, SubscriptionId,
};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::BackendError;
use crate::types::event::{AuthEvent, RawChangeEvent};
use crate::types::user::User;

/// One open feed subscription: events for `user_id` go to `tx`.
struct Subscriber {
    id: SubscriptionId,
    user_id: String,
    tx: mpsc::UnboundedSender<RawChangeEvent>,
}

/// Backend implementation backed by an embedded SQLite database.
pub struct LocalBackend {
    db: Mutex<Database>,
    current_user: Mutex<Option<User>>,
    subscribers: Mutex<Vec<Subscriber>>,
    auth_tx: broadcast::Sender<AuthEvent>,
}

impl LocalBackend {
    /// Creates a backend over an already-opened database.
    pub fn new(db: Database) -> Self {
        let (auth_tx, _) = broadcast::channel(16);
        Self {
            db: Mutex::new(db),
            current_user: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            auth_tx,
        }
    }

    /// Opens (or creates) a backend database at the given path.
    pub fn open(path: &str) -> Result<Self, BackendError> {
        let db = Database::open(path).map_err(|e| BackendError::Database(e.to_string()))?;
        Ok(Self::new(db))
    }

    /// Opens an in-memory backend, discarded on drop.
    pub fn open_in_memory() -> Result<Self, BackendError> {
        let db = Database::open_in_memory().map_err(|e| BackendError::Database(e.to_string()))?;
        Ok(Self::new(db))
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// Signs in as the user with the given email, creating the user row on
    /// first sign-in. Emits a [`AuthEvent::SignedIn`] transition when the
    /// signed-in user actually changes.
    pub fn sign_in(&self, email: &str) -> Result<User, BackendError> {
        let user = {
            let db = self.db.lock().expect("database mutex poisoned");
            let conn = db.connection();

            let existing = conn
                .query_row(
                    "SELECT id, email FROM users WHERE email = ?1",
                    params![email],
                    |row| {
                        Ok(User {
                            id: row.get(0)?,
                            email: row.get(1)?,
                        })
                    },
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(BackendError::Database(other.to_string())),
                })?;

            match existing {
                Some(user) => user,
                None => {
                    let id = Uuid::new_v4().to_string();
                    conn.execute(
                        "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
                        params![id, email, Self::now()],
                    )
                    .map_err(|e| BackendError::Database(e.to_string()))?;
                    User {
                        id,
                        email: Some(email.to_string()),
                    }
                }
            }
        };

        let mut current = self.current_user.lock().expect("auth mutex poisoned");
        let changed = current.as_ref().map(|u| u.id.as_str()) != Some(user.id.as_str());
        *current = Some(user.clone());
        drop(current);

        if changed {
            let _ = self.auth_tx.send(AuthEvent::SignedIn(user.clone()));
        }
        Ok(user)
    }

    /// Signs the current user out. Emits [`AuthEvent::SignedOut`] if a user
    /// was signed in.
    pub fn sign_out(&self) {
        let mut current = self.current_user.lock().expect("auth mutex poisoned");
        let was_signed_in = current.take().is_some();
        drop(current);

        if was_signed_in {
            let _ = self.auth_tx.send(AuthEvent::SignedOut);
        }
    }

    /// Delivers an event to every open subscription for the given owner.
    ///
    /// Subscriptions whose receiver has been dropped are pruned here.
    fn fan_out(&self, user_id: &str, event: RawChangeEvent) {
        let mut subs = self.subscribers.lock().expect("subscriber mutex poisoned");
        subs.retain(|s| {
            if s.user_id != user_id {
                return true;
            }
            s.tx.send(event.clone()).is_ok()
        });
    }
}

#[async_trait]
impl AuthServiceTrait for LocalBackend {
    async fn current_user(&self) -> Result<Option<User>, BackendError> {
        Ok(self.current_user.lock().expect("auth mutex poisoned").clone())
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.auth_tx.subscribe()
    }
}

#[async_trait]
impl PersistenceServiceTrait for LocalBackend {
    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, BackendError> {
        let db = self.db.lock().expect("database mutex poisoned");
        let conn = db.connection();

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, url, created_at \
                 FROM bookmarks WHERE user_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| BackendError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], Self::row_to_bookmark)
            .map_err(|e| BackendError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| BackendError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    async fn insert_bookmark(&self, new: NewBookmark) -> Result<Bookmark, BackendError> {
        let record = {
            let db = self.db.lock().expect("database mutex poisoned");
            let conn = db.connection();

            let record = Bookmark {
                id: Uuid::new_v4().to_string(),
                user_id: new.user_id,
                title: new.title,
                url: new.url,
                created_at: Self::now(),
            };

            conn.execute(
                "INSERT INTO bookmarks (id, user_id, title, url, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![record.id, record.user_id, record.title, record.url, record.created_at],
            )
            .map_err(|e| BackendError::Database(e.to_string()))?;

            record
        };

        self.fan_out(&record.user_id, RawChangeEvent::created(record.clone()));
        Ok(record)
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), BackendError> {
        let owner = {
            let db = self.db.lock().expect("database mutex poisoned");
            let conn = db.connection();

            let owner: Option<String> = conn
                .query_row(
                    "SELECT user_id FROM bookmarks WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(BackendError::Database(other.to_string())),
                })?;

            if owner.is_some() {
                conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])
                    .map_err(|e| BackendError::Database(e.to_string()))?;
            }
            owner
        };

        // Deleting an absent row succeeds with no event, matching the hosted
        // store's delete-by-filter semantics.
        if let Some(owner) = owner {
            self.fan_out(&owner, RawChangeEvent::deleted(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeFeedTrait for LocalBackend {
    async fn subscribe(&self, user_id: &str) -> Result<FeedSubscription, BackendError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();

        let mut subs = self.subscribers.lock().expect("subscriber mutex poisoned");
        subs.push(Subscriber {
            id: id.clone(),
            user_id: user_id.to_string(),
            tx,
        });
        drop(subs);

        tracing::debug!(subscription = %id, owner = %user_id, "feed subscription opened");
        Ok(FeedSubscription { id, events: rx })
    }

    async fn unsubscribe(&self, id: &SubscriptionId) {
        let mut subs = self.subscribers.lock().expect("subscriber mutex poisoned");
        let before = subs.len();
        subs.retain(|s| &s.id != id);
        if subs.len() != before {
            tracing::debug!(subscription = %id, "feed subscription closed");
        }
    }
}
