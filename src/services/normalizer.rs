//! Change event normalizer for smartmark.
//!
//! Converts raw feed events into normalized [`ChangeEvent`] values, or
//! discards them. Pure transformation, no side effects.

use crate::types::event::{ChangeEvent, ChangeKind, RawChangeEvent};

/// Normalizes a raw feed event against the current user's identity.
///
/// Created events are discarded when the payload is missing its record or the
/// record's owner is not the current user, a defense-in-depth check on top
/// of the server-side subscription filter. Deleted events carry only the row
/// identifier, so ownership cannot be re-verified client-side; the server-side
/// filter is trusted and the event is kept whenever an identifier is present.
pub fn normalize(raw: RawChangeEvent, current_user_id: &str) -> Option<ChangeEvent> {
    match raw.kind {
        ChangeKind::Created => {
            let record = raw.record?;
            if record.user_id != current_user_id {
                return None;
            }
            Some(ChangeEvent::Created(record))
        }
        ChangeKind::Deleted => raw.deleted_id.map(ChangeEvent::Deleted),
    }
}
