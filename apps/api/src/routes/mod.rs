pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{handlers as auth_handlers, require_auth};
use crate::review::handlers::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Review API, authenticated callers only.
    let review = Router::new()
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_upload),
        )
        .route("/api/v1/resumes/:id", get(handlers::handle_get_review))
        .route("/api/v1/resumes/:id/file", get(handlers::handle_get_file))
        .route("/api/v1/resumes/:id/image", get(handlers::handle_get_image))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth flow
        .route("/auth", get(auth_handlers::handle_auth_status))
        .route("/auth/sign-in", post(auth_handlers::handle_sign_in))
        .route("/auth/sign-out", post(auth_handlers::handle_sign_out))
        .merge(review)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
