use smartmark::types::errors::*;

// === SubmitError Tests ===

#[test]
fn submit_error_empty_fields_display() {
    let err = SubmitError::EmptyFields;
    assert_eq!(err.to_string(), "Please fill in both fields");
}

#[test]
fn submit_error_invalid_url_display() {
    let err = SubmitError::InvalidUrl;
    assert_eq!(
        err.to_string(),
        "Please enter a valid URL (e.g., https://example.com)"
    );
}

#[test]
fn submit_error_not_signed_in_display() {
    let err = SubmitError::NotSignedIn;
    assert_eq!(err.to_string(), "You must be logged in to add bookmarks");
}

#[test]
fn submit_error_persistence_display() {
    let err = SubmitError::Persistence("connection reset".to_string());
    assert_eq!(err.to_string(), "Failed to add bookmark: connection reset");
}

#[test]
fn submit_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(SubmitError::EmptyFields);
    assert!(err.source().is_none());
}

// === BackendError Tests ===

#[test]
fn backend_error_display_variants() {
    assert_eq!(
        BackendError::Database("locked".to_string()).to_string(),
        "Backend database error: locked"
    );
    assert_eq!(
        BackendError::Network("timeout".to_string()).to_string(),
        "Backend network error: timeout"
    );
    assert_eq!(
        BackendError::Auth("token expired".to_string()).to_string(),
        "Backend auth error: token expired"
    );
    assert_eq!(
        BackendError::Serialization("bad payload".to_string()).to_string(),
        "Backend serialization error: bad payload"
    );
}

// === SubscriptionError Tests ===

#[test]
fn subscription_error_already_active_display() {
    let err = SubscriptionError::AlreadyActive;
    assert_eq!(
        err.to_string(),
        "A subscription is already active for this view"
    );
}

#[test]
fn subscription_error_backend_display() {
    let err = SubscriptionError::Backend("feed unavailable".to_string());
    assert_eq!(
        err.to_string(),
        "Subscription backend error: feed unavailable"
    );
}
