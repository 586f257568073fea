//! View binding for smartmark.
//!
//! Renders the current store state as text: the loading placeholder, the
//! empty state, or the bookmark list with its count header. Presentation
//! only; the reconciliation core does not depend on this module.

use crate::types::bookmark::Bookmark;

/// Renders the bookmark list view.
pub fn render(bookmarks: &[Bookmark], loading: bool) -> String {
    if loading {
        return "Loading bookmarks...".to_string();
    }

    if bookmarks.is_empty() {
        return "No bookmarks yet\nAdd your first bookmark using the form above!".to_string();
    }

    let mut out = format!(
        "{} bookmark{} saved\n",
        bookmarks.len(),
        if bookmarks.len() != 1 { "s" } else { "" }
    );
    for bookmark in bookmarks {
        out.push_str(&format!(
            "  {} — {} ({})\n",
            bookmark.title,
            bookmark.url,
            format_date(bookmark.created_at)
        ));
    }
    out
}

/// Formats a creation timestamp like "Aug 7, 2026, 09:15 AM".
pub fn format_date(created_at: i64) -> String {
    match chrono::DateTime::from_timestamp(created_at, 0) {
        Some(dt) => dt.format("%b %e, %Y, %I:%M %p").to_string(),
        None => created_at.to_string(),
    }
}
