//! App core for smartmark.
//!
//! Central struct wiring the session context, the reconciling store, and the
//! subscription lifecycle manager over a set of backend collaborators. The
//! submit and delete paths live here: they validate input against the cached
//! session identity and funnel their optimistic updates through the same
//! idempotent store primitives the live feed uses.

use std::sync::Arc;

use tokio::sync::watch;
use url::Url;

use crate::managers::store::StoreHandle;
use crate::managers::subscription_manager::SubscriptionManager;
use crate::services::backend::{AuthServiceTrait, ChangeFeedTrait, PersistenceServiceTrait};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::{SubmitError, SubscriptionError};
use crate::types::user::User;

/// Central application struct for one bookmark view instance.
pub struct App {
    persistence: Arc<dyn PersistenceServiceTrait>,
    subscription_manager: SubscriptionManager,
    store: StoreHandle,
    /// Session identity, resolved once per view activation.
    session_user: Option<User>,
}

impl App {
    /// Creates a new App over the three collaborator services.
    pub fn new(
        auth: Arc<dyn AuthServiceTrait>,
        persistence: Arc<dyn PersistenceServiceTrait>,
        feed: Arc<dyn ChangeFeedTrait>,
    ) -> Self {
        let store = StoreHandle::new();
        let subscription_manager = SubscriptionManager::new(
            auth,
            Arc::clone(&persistence),
            feed,
            store.clone(),
        );
        Self {
            persistence,
            subscription_manager,
            store,
            session_user: None,
        }
    }

    /// Creates a new App over a single backend implementing all three
    /// collaborator traits.
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: AuthServiceTrait + PersistenceServiceTrait + ChangeFeedTrait + 'static,
    {
        Self::new(
            Arc::clone(&backend) as Arc<dyn AuthServiceTrait>,
            Arc::clone(&backend) as Arc<dyn PersistenceServiceTrait>,
            backend as Arc<dyn ChangeFeedTrait>,
        )
    }

    /// Activates the view: resolves the session user, loads the snapshot,
    /// and opens the live subscription. See
    /// [`SubscriptionManager::activate`].
    pub async fn activate_view(&mut self) -> Result<(), SubscriptionError> {
        self.session_user = self.subscription_manager.activate().await?;
        Ok(())
    }

    /// Deactivates the view, closing the live subscription and clearing the
    /// session identity. Idempotent.
    pub async fn deactivate_view(&mut self) {
        self.subscription_manager.deactivate().await;
        self.session_user = None;
    }

    /// Validates and submits a new bookmark.
    ///
    /// On success the returned record is applied to the view optimistically,
    /// racing the remote echo of the same insert; the store's
    /// insert-if-absent merge absorbs whichever arrives second. On any
    /// failure the view is unchanged.
    pub async fn submit_bookmark(&self, title: &str, url: &str) -> Result<Bookmark, SubmitError> {
        let title = title.trim();
        let url = url.trim();

        if title.is_empty() || url.is_empty() {
            return Err(SubmitError::EmptyFields);
        }
        if Url::parse(url).is_err() {
            return Err(SubmitError::InvalidUrl);
        }

        let user = self.session_user.as_ref().ok_or(SubmitError::NotSignedIn)?;

        let record = self
            .persistence
            .insert_bookmark(NewBookmark {
                user_id: user.id.clone(),
                title: title.to_string(),
                url: url.to_string(),
            })
            .await
            .map_err(|e| SubmitError::Persistence(e.to_string()))?;

        self.store.apply_local_insert(record.clone());
        Ok(record)
    }

    /// Deletes a bookmark, removing it from the view immediately.
    ///
    /// The backing delete is fire-and-forget relative to the view: a failure
    /// is logged and the optimistic removal is NOT rolled back, leaving an
    /// accepted inconsistency window until the next full reload.
    pub async fn delete_bookmark(&self, id: &str) {
        self.store.apply_local_delete(id);

        if let Err(e) = self.persistence.delete_bookmark(id).await {
            tracing::warn!(error = %e, bookmark = %id, "bookmark delete failed; view not rolled back");
        }
    }

    /// The merged bookmark list, newest first.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.store.bookmarks()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// The session user resolved at the last activation, if any.
    pub fn session_user(&self) -> Option<&User> {
        self.session_user.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription_manager.is_active()
    }

    /// Returns a receiver observing every republished merged list.
    pub fn subscribe_list(&self) -> watch::Receiver<Vec<Bookmark>> {
        self.store.subscribe_list()
    }
}
