use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{decode_token, issue_token, TokenRequest};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateTestToken {
    pub member_id: i64,
    pub unit_id: i64,
    pub company_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

/// Mint a signed token for development and integration testing. Disabled
/// in production, where tokens come from the identity provider.
pub async fn generate_test_token(
    State(state): State<AppState>,
    Json(payload): Json<GenerateTestToken>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    if state.env.is_production() {
        return Err(AppError::Forbidden(
            "Test tokens are not available in this environment".to_string(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let (token, claims) = issue_token(
        &state.env.auth,
        TokenRequest {
            member_id: payload.member_id,
            unit_id: payload.unit_id,
            company_id: payload.company_id,
            name: payload.name,
            email: payload.email,
            user_roles: payload.user_roles,
        },
        now,
    )?;

    let expires_at = claims.expires_at().and_then(|at| at.format(&Rfc3339).ok());
    Ok(Json(json!({
        "success": true,
        "token": token,
        "expires_at": expires_at,
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyToken {
    #[validate(length(min = 1))]
    pub token: String,
}

pub async fn verify_token(
    State(state): State<AppState>,
    Json(payload): Json<VerifyToken>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;
    let claims = decode_token(&state.env.auth, &payload.token)?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": claims,
        })),
    ))
}
