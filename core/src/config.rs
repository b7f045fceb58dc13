//! Client configuration read from the environment.
//!
//! `VITE_API_URL` names the backend base URL (the same variable the web
//! front-end uses, so one `.env` serves both). A `.env` file in the working
//! directory is loaded first when present.

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "VITE_API_URL";

/// Base URL used when `VITE_API_URL` is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Load `.env` (if any) and read `VITE_API_URL`.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }

    /// Health endpoint next to the API root, used in diagnostics.
    pub fn health_url(&self) -> String {
        health_url(&self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

pub(crate) fn health_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    match trimmed.strip_suffix("/api/v1") {
        Some(root) => format!("{root}/health"),
        None => format!("{trimmed}/health"),
    }
}
