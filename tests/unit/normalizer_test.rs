//! Unit tests for the change event normalizer.
//!
//! Ownership validation on Created events, trust of the server-side filter
//! on Deleted events, and discarding of malformed payloads.

use smartmark::services::normalizer::normalize;
use smartmark::types::bookmark::Bookmark;
use smartmark::types::event::{ChangeEvent, ChangeKind, RawChangeEvent};

fn bookmark(id: &str, user_id: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: "Example".to_string(),
        url: "https://example.com".to_string(),
        created_at: 1,
    }
}

/// A Created event owned by the current user normalizes to Created.
#[test]
fn test_created_for_current_user_passes() {
    let raw = RawChangeEvent::created(bookmark("a", "user-1"));

    let event = normalize(raw, "user-1");
    assert_eq!(event, Some(ChangeEvent::Created(bookmark("a", "user-1"))));
}

/// A Created event owned by another user is discarded, even though the
/// server-side filter should have dropped it already.
#[test]
fn test_created_for_other_user_is_discarded() {
    let raw = RawChangeEvent::created(bookmark("a", "user-2"));

    assert_eq!(normalize(raw, "user-1"), None);
}

/// A Created event with no record payload is discarded.
#[test]
fn test_created_without_record_is_discarded() {
    let raw = RawChangeEvent {
        kind: ChangeKind::Created,
        record: None,
        deleted_id: None,
    };

    assert_eq!(normalize(raw, "user-1"), None);
}

/// A Deleted event carries only the identifier; ownership cannot be
/// re-verified, so it is kept on the strength of the server-side filter.
#[test]
fn test_deleted_with_id_passes() {
    let raw = RawChangeEvent::deleted("a");

    assert_eq!(
        normalize(raw, "user-1"),
        Some(ChangeEvent::Deleted("a".to_string()))
    );
}

/// A Deleted event with no identifier is discarded.
#[test]
fn test_deleted_without_id_is_discarded() {
    let raw = RawChangeEvent {
        kind: ChangeKind::Deleted,
        record: None,
        deleted_id: None,
    };

    assert_eq!(normalize(raw, "user-1"), None);
}
