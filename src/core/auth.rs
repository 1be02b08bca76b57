//! Authentication for admin routes
//!
//! An [`AuthProvider`] turns request headers into an [`AuthContext`]. The
//! shipped provider resolves bearer tokens through a static table loaded from
//! configuration; a real identity service plugs in behind the same trait.

use anyhow::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use std::collections::HashMap;

/// Identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: String },

    /// No usable credentials
    Anonymous,
}

impl AuthContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<&str> {
        match self {
            AuthContext::User { user_id } => Some(user_id),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::User { .. })
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the caller from request headers
    ///
    /// Missing or unknown credentials yield [`AuthContext::Anonymous`]; an
    /// `Err` is reserved for provider failures.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves bearer tokens through a fixed token → user id table
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthProvider {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuthProvider {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Add a single token
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuthProvider {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let Some(token) = bearer_token(headers) else {
            return Ok(AuthContext::Anonymous);
        };

        Ok(match self.tokens.get(token) {
            Some(user_id) => AuthContext::User {
                user_id: user_id.clone(),
            },
            None => {
                tracing::debug!("rejected unknown bearer token");
                AuthContext::Anonymous
            }
        })
    }
}

/// Provider that never authenticates anybody
///
/// Every mutation is rejected; useful for a read-only deployment.
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn authenticate(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_static_provider_resolves_known_token() {
        let provider = StaticTokenAuthProvider::default().with_token("t-1", "user_1");
        let ctx = provider
            .authenticate(&headers_with("Bearer t-1"))
            .await
            .unwrap();
        assert_eq!(ctx.user_id(), Some("user_1"));
        assert!(ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_static_provider_unknown_token_is_anonymous() {
        let provider = StaticTokenAuthProvider::default().with_token("t-1", "user_1");
        let ctx = provider
            .authenticate(&headers_with("Bearer nope"))
            .await
            .unwrap();
        assert_eq!(ctx, AuthContext::Anonymous);

        let ctx = provider.authenticate(&HeaderMap::new()).await.unwrap();
        assert_eq!(ctx, AuthContext::Anonymous);
    }

    #[tokio::test]
    async fn test_no_auth_provider_is_always_anonymous() {
        let ctx = NoAuthProvider
            .authenticate(&headers_with("Bearer t-1"))
            .await
            .unwrap();
        assert!(!ctx.is_authenticated());
    }
}
