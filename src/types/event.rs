use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;
use crate::types::user::User;

/// The kind of row change announced by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Created,
    Deleted,
}

/// A raw event as delivered by the change feed, before normalization.
///
/// Mirrors the wire payloads: a Created event carries the full record, a
/// Deleted event carries at least the row identifier. Either field may be
/// missing on a malformed delivery; the normalizer discards those.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChangeEvent {
    pub kind: ChangeKind,
    /// Full record; present on Created events.
    pub record: Option<Bookmark>,
    /// Row identifier; present on Deleted events.
    pub deleted_id: Option<String>,
}

impl RawChangeEvent {
    pub fn created(record: Bookmark) -> Self {
        Self {
            kind: ChangeKind::Created,
            record: Some(record),
            deleted_id: None,
        }
    }

    pub fn deleted(id: &str) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            record: None,
            deleted_id: Some(id.to_string()),
        }
    }
}

/// A normalized change event, validated and ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created(Bookmark),
    Deleted(String),
}

/// An authentication state transition.
///
/// Emitted by the auth service only when the signed-in user actually changes,
/// not on token refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}
