use serde::{Deserialize, Serialize};

/// A saved bookmark, as stored by the persistence service.
///
/// Records are immutable after creation: there is no edit operation, only
/// insert and delete. `id` and `created_at` are assigned server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    /// Unix timestamp in seconds; the sole ordering key (descending).
    pub created_at: i64,
}

/// Payload for inserting a new bookmark.
///
/// The persistence service populates `id` and `created_at` and returns the
/// full [`Bookmark`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub user_id: String,
    pub title: String,
    pub url: String,
}
