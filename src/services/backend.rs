//! Collaborator interfaces for smartmark.
//!
//! The reconciliation core talks to its three external services (auth,
//! persistence, and the change feed) through these traits only. The
//! embedded [`LocalBackend`](crate::services::local_backend::LocalBackend)
//! and the hosted [`RemoteBackend`](crate::services::remote_backend::RemoteBackend)
//! both implement them; the core cannot tell which one is wired in.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::BackendError;
use crate::types::event::{AuthEvent, RawChangeEvent};
use crate::types::user::User;

/// Identifier for an open feed subscription.
pub type SubscriptionId = String;

/// An open live subscription to the change feed.
///
/// Events arrive on `events` until the subscription is closed via
/// [`ChangeFeedTrait::unsubscribe`], after which the channel drains and ends.
pub struct FeedSubscription {
    pub id: SubscriptionId,
    pub events: mpsc::UnboundedReceiver<RawChangeEvent>,
}

/// Trait defining the authentication service boundary.
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    /// Resolves the currently authenticated user, if any.
    async fn current_user(&self) -> Result<Option<User>, BackendError>;

    /// Returns a receiver of sign-in/sign-out transitions.
    ///
    /// Fires only on actual user changes, not token refreshes; consumed to
    /// decide when to reload the top-level view.
    fn auth_events(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Trait defining the persistence service boundary.
#[async_trait]
pub trait PersistenceServiceTrait: Send + Sync {
    /// Owner-scoped snapshot query, ordered by creation time descending.
    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, BackendError>;

    /// Inserts a bookmark; the service populates `id` and `created_at`.
    async fn insert_bookmark(&self, new: NewBookmark) -> Result<Bookmark, BackendError>;

    /// Deletes a bookmark by id. Deleting an absent row succeeds.
    async fn delete_bookmark(&self, id: &str) -> Result<(), BackendError>;
}

/// Trait defining the change-feed service boundary.
#[async_trait]
pub trait ChangeFeedTrait: Send + Sync {
    /// Opens a live subscription filtered to the given owner, delivering
    /// Created and Deleted events for the bookmarks collection.
    async fn subscribe(&self, user_id: &str) -> Result<FeedSubscription, BackendError>;

    /// Closes a subscription. Idempotent; closing twice is harmless.
    async fn unsubscribe(&self, id: &SubscriptionId);
}
