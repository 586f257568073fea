//! Configuration for the hosted-service backend.

/// Connection settings for the hosted backend service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the hosted service, e.g. `https://xyz.example.co`.
    pub base_url: String,
    /// Project API key, sent on every request.
    pub api_key: String,
    /// The signed-in user's access token.
    pub access_token: String,
}

impl BackendConfig {
    /// Reads the backend configuration from the environment.
    ///
    /// Returns `None` unless all of `SMARTMARK_BACKEND_URL`,
    /// `SMARTMARK_API_KEY`, and `SMARTMARK_ACCESS_TOKEN` are set; the demo
    /// binary falls back to the embedded backend in that case.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SMARTMARK_BACKEND_URL").ok()?;
        let api_key = std::env::var("SMARTMARK_API_KEY").ok()?;
        let access_token = std::env::var("SMARTMARK_ACCESS_TOKEN").ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            access_token,
        })
    }
}
