use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    /// Where the client should go once signed in.
    pub next: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
}

/// GET /auth?next=<path>
pub async fn handle_auth_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NextQuery>,
) -> Json<AuthStatusResponse> {
    let token = bearer_token(&headers);
    let authenticated = state.auth.is_authenticated(token.as_deref()).await;
    Json(AuthStatusResponse {
        authenticated,
        next: query
            .next
            .filter(|n| is_local_path(n))
            .unwrap_or_else(|| "/".to_string()),
    })
}

/// Same-origin absolute path. `//host` and `/\host` are resolved by browsers as
/// another origin.
fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\")
}

/// POST /auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let token = state.auth.sign_in(&request.secret).await?;
    Ok(Json(SignInResponse { token }))
}

/// POST /auth/sign-out
pub async fn handle_sign_out(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let token = bearer_token(&headers);
    state.auth.sign_out(token.as_deref()).await;
    StatusCode::NO_CONTENT
}
