//! Authentication seam.
//!
//! The API only asks an `Authenticator` whether a bearer token is valid. Requests that
//! fail the check get a 401 pointing at `/auth?next=<path>`, so clients can sign in and
//! come back to where they were.

pub mod handlers;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn is_authenticated(&self, token: Option<&str>) -> bool;

    /// Exchanges a secret for a session token.
    async fn sign_in(&self, secret: &str) -> Result<String, AppError>;

    async fn sign_out(&self, token: Option<&str>);
}

/// Sessions older than this are rejected and dropped at the next sign-in.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Accepts the configured API token directly, and hands out revocable session
/// tokens to clients that present it at sign-in.
pub struct TokenAuthenticator {
    api_token: String,
    /// Session token → issue time.
    sessions: RwLock<HashMap<String, Instant>>,
}

impl TokenAuthenticator {
    pub fn new(api_token: String) -> Self {
        Self {
            api_token,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn is_authenticated(&self, token: Option<&str>) -> bool {
        match token {
            Some(t) if t == self.api_token => true,
            Some(t) => self
                .sessions
                .read()
                .await
                .get(t)
                .is_some_and(|issued| issued.elapsed() < SESSION_TTL),
            None => false,
        }
    }

    async fn sign_in(&self, secret: &str) -> Result<String, AppError> {
        if secret != self.api_token {
            warn!("Rejected sign-in attempt");
            return Err(AppError::Unauthorized { redirect: None });
        }
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, issued| issued.elapsed() < SESSION_TTL);
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(token.clone(), Instant::now());
        info!("Session opened");
        Ok(token)
    }

    async fn sign_out(&self, token: Option<&str>) {
        if let Some(token) = token {
            if self.sessions.write().await.remove(token).is_some() {
                info!("Session closed");
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Sign-in location that sends the client back to `next` afterwards.
pub fn auth_redirect(next: &str) -> String {
    format!("/auth?next={next}")
}

/// Route layer rejecting unauthenticated requests with a redirect to the auth flow.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers());
    if state.auth.is_authenticated(token.as_deref()).await {
        return Ok(next.run(request).await);
    }

    let path = request.uri().path();
    warn!("Unauthenticated request to {path}");
    Err(AppError::Unauthorized {
        redirect: Some(auth_redirect(path)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_api_token_is_accepted() {
        let auth = TokenAuthenticator::new("secret".into());
        assert!(auth.is_authenticated(Some("secret")).await);
        assert!(!auth.is_authenticated(Some("guess")).await);
        assert!(!auth.is_authenticated(None).await);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let auth = TokenAuthenticator::new("secret".into());
        assert!(auth.sign_in("wrong").await.is_err());

        let session = auth.sign_in("secret").await.unwrap();
        assert!(auth.is_authenticated(Some(&session)).await);

        auth.sign_out(Some(&session)).await;
        assert!(!auth.is_authenticated(Some(&session)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_expire_and_are_pruned() {
        let auth = TokenAuthenticator::new("secret".into());
        let stale = auth.sign_in("secret").await.unwrap();

        tokio::time::advance(SESSION_TTL + Duration::from_secs(1)).await;
        assert!(!auth.is_authenticated(Some(&stale)).await);
        assert_eq!(auth.session_count().await, 1);

        let fresh = auth.sign_in("secret").await.unwrap();
        assert!(auth.is_authenticated(Some(&fresh)).await);
        assert_eq!(auth.session_count().await, 1);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_auth_redirect() {
        assert_eq!(
            auth_redirect("/api/v1/resumes/42"),
            "/auth?next=/api/v1/resumes/42"
        );
    }
}
