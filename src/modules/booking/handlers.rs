use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use sqlx::{Postgres, Transaction};
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::MemberContext;
use crate::db::repositories::{BookingRepository, MemberRepository, StaffRepository};
use crate::db::{NewBooking, RescheduleBooking};
use crate::error::{field_error, AppError, AppResult};
use crate::schedule::expand_occurrences;

fn tx_failed(err: impl std::fmt::Display) -> AppError {
    AppError::Transaction(err.to_string())
}

async fn begin(pool: &PgPool) -> AppResult<Transaction<'_, Postgres>> {
    pool.begin().await.map_err(tx_failed)
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub member_id: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    ctx: MemberContext,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let member_id = query.member_id.unwrap_or(ctx.member_id);
    if member_id != ctx.member_id {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    let rows = BookingRepository::slots_for_member(&state.db, member_id).await?;
    Ok(Json(json!(rows)))
}

/// Create a booking and its expanded slot rows in one transaction. The
/// date range is stepped daily regardless of repeat type, and any slot
/// insertion failure rolls the whole booking back.
pub async fn create_booking(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<NewBooking>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    if payload.member_id != ctx.member_id {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }
    StaffRepository::find_active(&state.db, payload.staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;
    if MemberRepository::find(&state.db, payload.member_id).await?.is_none() {
        return Err(field_error(
            "member_id",
            "exists",
            "The selected member_id is invalid.",
        ));
    }

    let occurrences =
        expand_occurrences(payload.start_date, payload.end_date, &payload.slot_hours);

    let mut tx = begin(&state.db).await?;
    let booking = BookingRepository::insert_booking(&mut tx, &payload)
        .await
        .map_err(tx_failed)?;
    for (date, hour) in occurrences {
        BookingRepository::insert_slot(&mut tx, booking.id, date, hour)
            .await
            .map_err(tx_failed)?;
    }
    tx.commit().await.map_err(tx_failed)?;

    Ok(Json(json!({
        "status": "success",
        "booking_id": booking.id,
    })))
}

/// Reschedule collapses the booking onto a single day: every existing
/// slot row is dropped and one row per requested hour is recreated at
/// the new date. Staff availability is not re-checked here.
pub async fn reschedule_booking(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(booking_id): Path<i64>,
    Json(payload): Json<RescheduleBooking>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    BookingRepository::find(&state.db, booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let mut tx = begin(&state.db).await?;
    BookingRepository::delete_slots(&mut tx, booking_id)
        .await
        .map_err(tx_failed)?;
    for &hour in &payload.new_hours {
        BookingRepository::insert_slot(&mut tx, booking_id, payload.new_date, hour)
            .await
            .map_err(tx_failed)?;
    }
    BookingRepository::apply_reschedule(&mut tx, booking_id, payload.new_date)
        .await
        .map_err(tx_failed)?;
    tx.commit().await.map_err(tx_failed)?;

    Ok(Json(json!({ "status": "rescheduled" })))
}

/// Cancellation removes the slot rows and then the booking itself; this
/// entity is hard-deleted rather than soft-deleted.
pub async fn cancel_booking(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(booking_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    BookingRepository::find(&state.db, booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let mut tx = begin(&state.db).await?;
    BookingRepository::delete_slots(&mut tx, booking_id)
        .await
        .map_err(tx_failed)?;
    BookingRepository::delete_booking(&mut tx, booking_id)
        .await
        .map_err(tx_failed)?;
    tx.commit().await.map_err(tx_failed)?;

    Ok(Json(json!({ "status": "deleted" })))
}
