//! Reconciling bookmark store for smartmark.
//!
//! Owns the in-memory ordered list of the current user's bookmarks and merges
//! the three state-changing inputs (initial snapshot, local optimistic
//! mutations, remote feed events) through two idempotent primitives:
//! insert-if-absent-by-id and remove-if-present-by-id. Convergence is
//! independent of arrival order between a local mutation and its remote echo.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::types::bookmark::Bookmark;
use crate::types::event::ChangeEvent;

/// Trait defining the reconciling store operations.
pub trait BookmarkStoreTrait {
    /// Replaces the list wholesale with an already-ordered snapshot and
    /// clears the loading flag. Called once per subscription lifetime.
    fn load_snapshot(&mut self, records: Vec<Bookmark>);
    /// Idempotent insert from the remote feed. Returns true if the list changed.
    fn apply_created(&mut self, record: Bookmark) -> bool;
    /// Idempotent removal from the remote feed. Returns true if the list changed.
    fn apply_deleted(&mut self, id: &str) -> bool;
    /// Idempotent insert after a successful local write; races the remote echo.
    fn apply_local_insert(&mut self, record: Bookmark) -> bool;
    /// Optimistic removal before the backing delete resolves.
    fn apply_local_delete(&mut self, id: &str) -> bool;
    /// Applies a normalized feed event. Returns true if the list changed.
    fn apply(&mut self, event: ChangeEvent) -> bool;
    fn bookmarks(&self) -> &[Bookmark];
    fn contains(&self, id: &str) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn is_loading(&self) -> bool;
    /// Clears the loading flag without a snapshot (unauthenticated view).
    fn finish_loading(&mut self);
}

/// In-memory reconciling store, newest bookmark first.
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
    loading: bool,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self {
            bookmarks: Vec::new(),
            loading: true,
        }
    }

    fn find_index(&self, id: &str) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id == id)
    }

    /// Insert-if-absent-by-id. New records are assumed newest and prepended;
    /// the list is never re-sorted against the full timestamp.
    fn insert_if_absent(&mut self, record: Bookmark) -> bool {
        if self.find_index(&record.id).is_some() {
            return false;
        }
        self.bookmarks.insert(0, record);
        true
    }

    /// Remove-if-present-by-id.
    fn remove_if_present(&mut self, id: &str) -> bool {
        match self.find_index(id) {
            Some(idx) => {
                self.bookmarks.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl Default for BookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    fn load_snapshot(&mut self, records: Vec<Bookmark>) {
        self.bookmarks = records;
        self.loading = false;
    }

    fn apply_created(&mut self, record: Bookmark) -> bool {
        self.insert_if_absent(record)
    }

    fn apply_deleted(&mut self, id: &str) -> bool {
        self.remove_if_present(id)
    }

    fn apply_local_insert(&mut self, record: Bookmark) -> bool {
        self.insert_if_absent(record)
    }

    fn apply_local_delete(&mut self, id: &str) -> bool {
        self.remove_if_present(id)
    }

    fn apply(&mut self, event: ChangeEvent) -> bool {
        match event {
            ChangeEvent::Created(record) => self.apply_created(record),
            ChangeEvent::Deleted(id) => self.apply_deleted(&id),
        }
    }

    fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    fn contains(&self, id: &str) -> bool {
        self.find_index(id).is_some()
    }

    fn len(&self) -> usize {
        self.bookmarks.len()
    }

    fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn finish_loading(&mut self) {
        self.loading = false;
    }
}

/// Shared handle to a [`BookmarkStore`].
///
/// The feed pump task and the local mutation paths all go through this
/// handle; each operation locks, applies, and republishes the merged list
/// over a watch channel, so observers see every merge in order.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<BookmarkStore>>,
    list_tx: Arc<watch::Sender<Vec<Bookmark>>>,
}

impl StoreHandle {
    pub fn new() -> Self {
        let (list_tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Mutex::new(BookmarkStore::new())),
            list_tx: Arc::new(list_tx),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BookmarkStore> {
        self.inner.lock().expect("bookmark store mutex poisoned")
    }

    fn publish(&self, store: &BookmarkStore) {
        let _ = self.list_tx.send(store.bookmarks().to_vec());
    }

    pub fn load_snapshot(&self, records: Vec<Bookmark>) {
        let mut store = self.lock();
        store.load_snapshot(records);
        self.publish(&store);
    }

    pub fn apply(&self, event: ChangeEvent) -> bool {
        let mut store = self.lock();
        let changed = store.apply(event);
        if changed {
            self.publish(&store);
        }
        changed
    }

    pub fn apply_local_insert(&self, record: Bookmark) -> bool {
        let mut store = self.lock();
        let changed = store.apply_local_insert(record);
        if changed {
            self.publish(&store);
        }
        changed
    }

    pub fn apply_local_delete(&self, id: &str) -> bool {
        let mut store = self.lock();
        let changed = store.apply_local_delete(id);
        if changed {
            self.publish(&store);
        }
        changed
    }

    pub fn finish_loading(&self) {
        let mut store = self.lock();
        store.finish_loading();
        self.publish(&store);
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.lock().bookmarks().to_vec()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    /// Returns a receiver that observes every republished merged list.
    pub fn subscribe_list(&self) -> watch::Receiver<Vec<Bookmark>> {
        self.list_tx.subscribe()
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}
