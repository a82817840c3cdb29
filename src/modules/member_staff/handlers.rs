use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::MemberContext;
use crate::db::repositories::{AssignmentRepository, StaffRepository, TimeSlotRepository};
use crate::db::{AssignStaff, StaffScope, UnassignStaff};
use crate::error::{AppError, AppResult};

/// A member's assigned staff, each with their full slot calendar.
pub async fn get_member_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Path(member_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    if ctx.member_id != member_id {
        return Err(AppError::Forbidden("Unauthorized access".to_string()));
    }

    let staff_list = AssignmentRepository::staff_for_member(&state.db, member_id).await?;
    let mut data = Vec::with_capacity(staff_list.len());
    for staff in staff_list {
        let slots = TimeSlotRepository::all_for_staff(&state.db, staff.id).await?;
        let mut value = serde_json::to_value(&staff)
            .map_err(|err| AppError::Internal(err.to_string()))?;
        value["time_slots"] =
            serde_json::to_value(&slots).map_err(|err| AppError::Internal(err.to_string()))?;
        data.push(value);
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

pub async fn assign_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<AssignStaff>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;
    if ctx.member_id != payload.member_id && ctx.member_id != payload.assigned_by {
        return Err(AppError::Forbidden("Unauthorized access".to_string()));
    }

    let staff = StaffRepository::find_active(&state.db, payload.staff_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))?;
    if !staff.is_verified {
        return Err(AppError::PreconditionFailed(
            "Staff must be verified before assignment".to_string(),
        ));
    }

    if AssignmentRepository::find_active(&state.db, payload.member_id, payload.staff_id)
        .await?
        .is_some()
    {
        return Err(AppError::PreconditionFailed(
            "Staff is already assigned to this member".to_string(),
        ));
    }

    let assignment = AssignmentRepository::insert(&state.db, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Staff assigned successfully",
            "data": assignment,
        })),
    ))
}

pub async fn unassign_staff(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<UnassignStaff>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    if ctx.member_id != payload.member_id {
        return Err(AppError::Forbidden("Unauthorized access".to_string()));
    }

    let assignment =
        AssignmentRepository::find_active(&state.db, payload.member_id, payload.staff_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Staff is not assigned to this member".to_string())
            })?;

    AssignmentRepository::deactivate(&state.db, assignment.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Staff unassigned successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct CompanyStaffQuery {
    pub staff_scope: Option<StaffScope>,
    pub is_verified: Option<bool>,
}

pub async fn get_company_staff(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(company_id): Path<i64>,
    Query(query): Query<CompanyStaffQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let staff = StaffRepository::list_by_company(
        &state.db,
        company_id,
        query.staff_scope,
        query.is_verified,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "data": staff,
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchStaffQuery {
    pub company_id: i64,
    #[validate(length(min = 3))]
    pub query: String,
    pub staff_scope: Option<StaffScope>,
    pub is_verified: Option<bool>,
}

pub async fn search_staff(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Query(query): Query<SearchStaffQuery>,
) -> AppResult<Json<serde_json::Value>> {
    query.validate()?;
    let staff = StaffRepository::search(
        &state.db,
        query.company_id,
        &query.query,
        query.staff_scope,
        query.is_verified,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "data": staff,
    })))
}
