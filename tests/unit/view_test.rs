//! Unit tests for the text view binding.

use smartmark::types::bookmark::Bookmark;
use smartmark::view;

fn bookmark(id: &str, title: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        title: title.to_string(),
        url: format!("https://example.com/{}", id),
        created_at: 1754550000,
    }
}

/// The loading state renders a placeholder regardless of list content.
#[test]
fn test_render_loading() {
    let rendered = view::render(&[], true);
    assert_eq!(rendered, "Loading bookmarks...");
}

/// An empty loaded list renders the empty-state prompt.
#[test]
fn test_render_empty() {
    let rendered = view::render(&[], false);
    assert!(rendered.contains("No bookmarks yet"));
    assert!(rendered.contains("Add your first bookmark"));
}

/// A singular count reads "1 bookmark saved"; plural gets the "s".
#[test]
fn test_render_count_pluralization() {
    let one = view::render(&[bookmark("a", "First")], false);
    assert!(one.starts_with("1 bookmark saved"));

    let two = view::render(
        &[bookmark("a", "First"), bookmark("b", "Second")],
        false,
    );
    assert!(two.starts_with("2 bookmarks saved"));
}

/// Each entry shows its title, url, and formatted date, in list order.
#[test]
fn test_render_lists_entries_in_order() {
    let rendered = view::render(
        &[bookmark("b", "Newest"), bookmark("a", "Oldest")],
        false,
    );

    let newest = rendered.find("Newest").unwrap();
    let oldest = rendered.find("Oldest").unwrap();
    assert!(newest < oldest);
    assert!(rendered.contains("https://example.com/b"));
    assert!(rendered.contains(&view::format_date(1754550000)));
}
