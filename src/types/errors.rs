use std::fmt;

// === SubmitError ===

/// Errors reported to the submitter of a new bookmark.
///
/// The `Display` strings are the user-visible messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Title or URL was empty after trimming.
    EmptyFields,
    /// The URL did not parse as a valid absolute URL.
    InvalidUrl,
    /// No user is signed in for the current view.
    NotSignedIn,
    /// The persistence service rejected the insert.
    Persistence(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyFields => write!(f, "Please fill in both fields"),
            SubmitError::InvalidUrl => {
                write!(f, "Please enter a valid URL (e.g., https://example.com)")
            }
            SubmitError::NotSignedIn => {
                write!(f, "You must be logged in to add bookmarks")
            }
            SubmitError::Persistence(msg) => {
                write!(f, "Failed to add bookmark: {}", msg)
            }
        }
    }
}

impl std::error::Error for SubmitError {}

// === BackendError ===

/// Errors from the auth, persistence, and change-feed collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backing database rejected an operation.
    Database(String),
    /// A network error occurred while talking to the hosted service.
    Network(String),
    /// The auth service rejected the request or session.
    Auth(String),
    /// A payload could not be serialized or deserialized.
    Serialization(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Database(msg) => write!(f, "Backend database error: {}", msg),
            BackendError::Network(msg) => write!(f, "Backend network error: {}", msg),
            BackendError::Auth(msg) => write!(f, "Backend auth error: {}", msg),
            BackendError::Serialization(msg) => {
                write!(f, "Backend serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for BackendError {}

// === SubscriptionError ===

/// Errors related to view subscription lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// A live subscription is already open for this view instance.
    AlreadyActive,
    /// The change feed could not be opened.
    Backend(String),
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionError::AlreadyActive => {
                write!(f, "A subscription is already active for this view")
            }
            SubscriptionError::Backend(msg) => {
                write!(f, "Subscription backend error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SubscriptionError {}
