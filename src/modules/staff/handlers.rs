use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::MemberContext;
use crate::db::repositories::{OtpRepository, StaffRepository};
use crate::db::{validate_mobile, DatabaseError, NewStaff, SendOtp, UpdateStaff, VerifyOtp, VerifyStaff};
use crate::error::{field_error, AppError, AppResult};

const OTP_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckMobileQuery {
    #[validate(custom(function = validate_mobile))]
    pub mobile: String,
}

pub async fn check_mobile(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Query(query): Query<CheckMobileQuery>,
) -> AppResult<Json<serde_json::Value>> {
    query.validate()?;
    let staff = StaffRepository::find_by_mobile(&state.db, &query.mobile).await?;
    let body = match staff {
        Some(staff) => json!({
            "success": true,
            "exists": true,
            "verified": staff.is_verified,
            "staff_id": staff.id,
        }),
        None => json!({
            "success": true,
            "exists": false,
        }),
    };
    Ok(Json(body))
}

pub async fn send_otp(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Json(payload): Json<SendOtp>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    let now = OffsetDateTime::now_utc();

    OtpRepository::invalidate_unverified(&state.db, &payload.mobile, now).await?;

    let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
    let expires_at = now + Duration::minutes(OTP_TTL_MINUTES);
    OtpRepository::insert(&state.db, &payload.mobile, &code, expires_at).await?;

    // Delivery goes through the SMS gateway; only the issuance is logged.
    info!(mobile = %payload.mobile, "OTP issued");

    Ok(Json(json!({
        "success": true,
        "message": "OTP sent successfully",
    })))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Json(payload): Json<VerifyOtp>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    let now = OffsetDateTime::now_utc();

    let otp = OtpRepository::find_valid(&state.db, &payload.mobile, &payload.otp, now)
        .await?
        .ok_or_else(|| AppError::PreconditionFailed("Invalid or expired OTP".to_string()))?;

    OtpRepository::mark_verified(&state.db, otp.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP verified successfully",
    })))
}

pub async fn create_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<NewStaff>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;

    let staff = match StaffRepository::create(&state.db, &payload, ctx.member_id).await {
        Ok(staff) => staff,
        Err(DatabaseError::Duplicate) => {
            return Err(field_error(
                "mobile",
                "unique",
                "The mobile has already been taken.",
            ));
        }
        Err(err) => return Err(err.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Staff created successfully",
            "data": staff,
        })),
    ))
}

pub async fn get_staff(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let staff = StaffRepository::find_active(&state.db, staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;
    Ok(Json(json!({
        "success": true,
        "data": staff,
    })))
}

pub async fn update_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<UpdateStaff>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    StaffRepository::find_active(&state.db, staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;

    let staff =
        StaffRepository::update_details(&state.db, staff_id, &payload, ctx.member_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Staff updated successfully",
        "data": staff,
    })))
}

pub async fn verify_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<VerifyStaff>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    let staff = StaffRepository::find_active(&state.db, staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;

    if staff.is_verified {
        return Err(AppError::PreconditionFailed(
            "Staff is already verified".to_string(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let staff =
        StaffRepository::mark_verified(&state.db, staff_id, &payload, ctx.member_id, now).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Staff verified successfully",
        "data": staff,
    })))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    match StaffRepository::soft_delete(&state.db, staff_id).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Staff deleted successfully",
        }))),
        Err(DatabaseError::NotFound) => {
            Err(AppError::NotFound("Staff not found".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}
