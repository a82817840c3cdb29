use axum::{routing::post, Router};

use super::handlers::{generate_test_token, verify_token};
use crate::app_state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/generate-test-token", post(generate_test_token))
        .route("/auth/verify-token", post(verify_token))
}
