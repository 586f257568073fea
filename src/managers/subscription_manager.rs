//! Subscription lifecycle manager for smartmark.
//!
//! Binds the live change feed to the current authenticated user and to the
//! enclosing view's lifetime: resolves the user once per activation, performs
//! the initial snapshot load, opens exactly one owner-filtered subscription,
//! and pumps normalized events into the reconciling store until deactivation.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::managers::store::StoreHandle;
use crate::services::backend::{
    AuthServiceTrait, ChangeFeedTrait, PersistenceServiceTrait, SubscriptionId,
};
use crate::services::normalizer::normalize;
use crate::types::errors::SubscriptionError;
use crate::types::user::User;

/// State of one open subscription.
struct ActiveSubscription {
    subscription_id: SubscriptionId,
    pump: JoinHandle<()>,
}

/// Manages the live feed subscription for one view instance.
///
/// At most one subscription is open at any time; [`activate`](Self::activate)
/// fails with [`SubscriptionError::AlreadyActive`] rather than opening a
/// second one.
pub struct SubscriptionManager {
    auth: Arc<dyn AuthServiceTrait>,
    persistence: Arc<dyn PersistenceServiceTrait>,
    feed: Arc<dyn ChangeFeedTrait>,
    store: StoreHandle,
    active: Option<ActiveSubscription>,
}

impl SubscriptionManager {
    pub fn new(
        auth: Arc<dyn AuthServiceTrait>,
        persistence: Arc<dyn PersistenceServiceTrait>,
        feed: Arc<dyn ChangeFeedTrait>,
        store: StoreHandle,
    ) -> Self {
        Self {
            auth,
            persistence,
            feed,
            store,
            active: None,
        }
    }

    /// Activates the view: resolves the current user, loads the initial
    /// snapshot, and opens the live subscription.
    ///
    /// This is the single user-resolution point for the view; the returned
    /// user is the session identity for the subscription's lifetime. With no
    /// user signed in, the store is marked loaded-and-empty and no
    /// subscription is opened.
    ///
    /// A snapshot query failure is logged and degrades to an empty loaded
    /// view; the live subscription still opens.
    pub async fn activate(&mut self) -> Result<Option<User>, SubscriptionError> {
        if self.active.is_some() {
            return Err(SubscriptionError::AlreadyActive);
        }

        let user = self
            .auth
            .current_user()
            .await
            .map_err(|e| SubscriptionError::Backend(e.to_string()))?;

        let user = match user {
            Some(user) => user,
            None => {
                self.store.finish_loading();
                return Ok(None);
            }
        };

        match self.persistence.list_bookmarks(&user.id).await {
            Ok(records) => self.store.load_snapshot(records),
            Err(e) => {
                tracing::error!(error = %e, "initial bookmark snapshot failed");
                self.store.load_snapshot(Vec::new());
            }
        }

        let subscription = self
            .feed
            .subscribe(&user.id)
            .await
            .map_err(|e| SubscriptionError::Backend(e.to_string()))?;

        let store = self.store.clone();
        let current_user_id = user.id.clone();
        let mut events = subscription.events;
        let pump = tokio::spawn(async move {
            while let Some(raw) = events.recv().await {
                if let Some(event) = normalize(raw, &current_user_id) {
                    store.apply(event);
                }
            }
        });

        tracing::info!(owner = %user.id, "view activated with live subscription");
        self.active = Some(ActiveSubscription {
            subscription_id: subscription.id,
            pump,
        });
        Ok(Some(user))
    }

    /// Deactivates the view: closes the subscription and waits for the pump
    /// task to drain. Idempotent; deactivating an inactive manager is a
    /// no-op.
    ///
    /// An event already in flight when closure is requested may still be
    /// applied; the store's idempotent merge makes that harmless.
    pub async fn deactivate(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.feed.unsubscribe(&active.subscription_id).await;
        // The feed has dropped its sender; the pump drains and exits.
        let _ = active.pump.await;
        tracing::info!("view deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }
}
