//! Bearer token sources consulted by the request interceptor.
//!
//! The client only ever reads the token. Whoever runs the login flow owns
//! writing it, typically through a shared `TokenStore`.

use std::sync::{Arc, RwLock};

pub trait TokenProvider: Send + Sync {
    /// The current bearer token, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// Never supplies a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, e.g. a service credential read at startup.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Replaceable token shared between a login flow (writer) and any number of
/// clients (readers). Cloning shares the same slot.
#[derive(Debug, Default, Clone)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

impl TokenProvider for TokenStore {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .filter(|t| !t.is_empty())
    }
}
