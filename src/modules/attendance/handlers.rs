use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{AuthContext, MemberContext};
use crate::db::repositories::AttendanceRepository;
use crate::db::{AttendanceEvent, AttendanceStatus, SaveAttendance, UpdateAttendance};
use crate::error::{field_error, AppError, AppResult};
use crate::schedule::timefmt;

#[derive(Debug, Deserialize)]
pub struct MemberAttendanceQuery {
    pub member_id: i64,
    /// `YYYY-MM`
    pub month: String,
}

/// A member's attendance sheet for one month, grouped by date.
pub async fn member_attendance(
    State(state): State<AppState>,
    ctx: MemberContext,
    Query(query): Query<MemberAttendanceQuery>,
) -> AppResult<Json<serde_json::Value>> {
    if query.member_id != ctx.member_id {
        return Err(AppError::Forbidden("Unauthorized access".to_string()));
    }
    let (year, month) = timefmt::parse_year_month(&query.month)
        .ok_or_else(|| field_error("month", "date_format", "month must be in YYYY-MM form"))?;
    let (from, to) = timefmt::month_date_range(year, month);

    let records =
        AttendanceRepository::for_member_between(&state.db, query.member_id, from, to).await?;

    let mut by_date: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
    for record in records {
        by_date
            .entry(timefmt::format_ymd(record.date))
            .or_default()
            .push(json!({
                "staff_id": record.staff_id,
                "staff_name": record.staff_name,
                "staff_photo": record.staff_photo,
                "staff_category": record.staff_category,
                "status": record.status,
                "note": record.note,
                "photo_url": record.photo_url,
            }));
    }

    Ok(Json(json!(by_date)))
}

pub async fn save_attendance(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<SaveAttendance>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    if payload.member_id != ctx.member_id {
        return Err(AppError::Forbidden("Unauthorized access".to_string()));
    }

    for entry in &payload.entries {
        AttendanceRepository::upsert(
            &state.db,
            payload.member_id,
            payload.unit_id,
            payload.date,
            entry,
        )
        .await?;
    }

    Ok(Json(json!({ "status": "saved" })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminAttendanceQuery {
    pub date: String,
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

pub async fn admin_attendance(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<AdminAttendanceQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_admin()?;
    query.validate()?;
    let date = timefmt::parse_ymd(&query.date)
        .map_err(|_| field_error("date", "date", "date must be in YYYY-MM-DD form"))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page - 1) * limit;

    let total =
        AttendanceRepository::admin_count(&state.db, date, query.status, query.search.as_deref())
            .await?;
    let records = AttendanceRepository::admin_page(
        &state.db,
        date,
        query.status,
        query.search.as_deref(),
        limit,
        offset,
    )
    .await?;

    let records: Vec<_> = records
        .into_iter()
        .map(|record| {
            json!({
                "attendance_id": record.id,
                "staff_id": record.staff_id,
                "staff_name": record.staff_name,
                "staff_category": record.staff_category,
                "staff_photo": record.staff_photo,
                "status": record.status,
                "note": record.note,
                "photo_url": record.photo_url,
                "updated_at": record.updated_at.format(&Rfc3339).ok(),
            })
        })
        .collect();

    Ok(Json(json!({
        "records": records,
        "total": total,
        "page": page,
        "limit": limit,
        "totalPages": (total + limit - 1) / limit,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AdminSummaryQuery {
    pub date: String,
}

pub async fn admin_attendance_summary(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<AdminSummaryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_admin()?;
    let date = timefmt::parse_ymd(&query.date)
        .map_err(|_| field_error("date", "date", "date must be in YYYY-MM-DD form"))?;

    let present =
        AttendanceRepository::status_count(&state.db, date, AttendanceStatus::Present).await?;
    let absent =
        AttendanceRepository::status_count(&state.db, date, AttendanceStatus::Absent).await?;
    let not_marked =
        AttendanceRepository::status_count(&state.db, date, AttendanceStatus::NotMarked).await?;
    let total = AttendanceRepository::total_staff(&state.db).await?;

    Ok(Json(json!({
        "present": present,
        "absent": absent,
        "not_marked": not_marked,
        "total": total,
    })))
}

pub async fn admin_update_attendance(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<UpdateAttendance>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_admin()?;
    payload.validate()?;

    AttendanceRepository::find_record(&state.db, payload.attendance_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;

    AttendanceRepository::update_status(
        &state.db,
        payload.attendance_id,
        payload.status,
        payload.note.as_deref(),
    )
    .await?;

    let record = AttendanceRepository::find_record(&state.db, payload.attendance_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;

    // Push the change to every connected dashboard.
    let event = AttendanceEvent {
        id: record.id,
        staff_id: record.staff_id,
        staff_name: record.staff_name.clone(),
        status: record.status,
        note: record.note.clone(),
        photo_url: record.photo_url.clone(),
        updated_at: record.updated_at.format(&Rfc3339).unwrap_or_default(),
    };
    if let Ok(message) = serde_json::to_string(&event) {
        let tx = state.ws_tx.lock().unwrap().clone();
        let _ = tx.send(message);
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Attendance updated successfully",
        "attendance": {
            "id": record.id,
            "staff_id": record.staff_id,
            "staff_name": record.staff_name,
            "status": record.status,
            "note": record.note,
            "photo_url": record.photo_url,
            "updated_at": record.updated_at.format(&Rfc3339).ok(),
        },
    })))
}
