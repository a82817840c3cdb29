use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{AuthContext, MemberContext};
use crate::db::repositories::{
    AssignmentRepository, MemberRepository, RatingRepository, StaffRepository,
};
use crate::db::{month_bounds, NewRating, StaffRef, StaffScope, StaffSummary};
use crate::error::{field_error, AppError, AppResult};
use crate::export;

fn round_average(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

pub async fn submit_rating(
    State(state): State<AppState>,
    ctx: MemberContext,
    Json(payload): Json<NewRating>,
) -> AppResult<Response> {
    payload.validate()?;

    if payload.member_id != ctx.member_id {
        return Err(AppError::Forbidden(
            "Unauthorized. You can only submit ratings for your own account.".to_string(),
        ));
    }

    if MemberRepository::find(&state.db, payload.member_id).await?.is_none() {
        return Err(field_error(
            "member_id",
            "exists",
            "The selected member_id is invalid.",
        ));
    }

    let staff_ref = StaffRef::new(payload.staff_type, payload.staff_id);
    StaffRepository::resolve(&state.db, staff_ref)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found.".to_string()))?;

    // Member-scope staff can only be rated by members they serve.
    if payload.staff_type == StaffScope::Member
        && !AssignmentRepository::is_assigned(&state.db, ctx.member_id, payload.staff_id).await?
    {
        return Err(AppError::Forbidden(
            "You can only rate staff assigned to your unit.".to_string(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let (window_start, window_end) = month_bounds(now);
    if let Some(existing) = RatingRepository::find_in_window(
        &state.db,
        ctx.member_id,
        staff_ref,
        window_start,
        window_end,
    )
    .await?
    {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "You have already rated this staff member this month.",
                "existing_rating": existing,
            })),
        )
            .into_response());
    }

    let rating = RatingRepository::insert(&state.db, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Rating submitted successfully.",
            "rating": rating,
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct StaffTypeQuery {
    pub staff_type: StaffScope,
}

pub async fn get_rating_summary(
    State(state): State<AppState>,
    _ctx: MemberContext,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<StaffTypeQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let staff_ref = StaffRef::new(query.staff_type, staff_id);
    StaffRepository::resolve(&state.db, staff_ref)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found.".to_string()))?;

    let (average, total) = RatingRepository::summary_stats(&state.db, staff_ref).await?;
    let distribution = fill_distribution(RatingRepository::distribution(&state.db, staff_ref).await?);
    let recent_reviews = RatingRepository::recent_reviews(&state.db, staff_ref, 5).await?;
    let recent_reviews: Vec<_> = recent_reviews
        .into_iter()
        .map(|review| {
            json!({
                "rating": review.rating,
                "feedback": review.feedback,
                "member_name": review.member_name.unwrap_or_else(|| "Anonymous".to_string()),
                "created_at": review.created_at.format(&Rfc3339).ok(),
            })
        })
        .collect();

    Ok(Json(json!({
        "staff_id": staff_id,
        "staff_type": query.staff_type,
        "average_rating": average.map(round_average),
        "total_ratings": total,
        "rating_distribution": distribution,
        "recent_reviews": recent_reviews,
    })))
}

fn fill_distribution(counts: Vec<(i32, i64)>) -> HashMap<i32, i64> {
    let mut distribution: HashMap<i32, i64> = (1..=5).map(|value| (value, 0)).collect();
    for (value, count) in counts {
        distribution.insert(value, count);
    }
    distribution
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminRatingsQuery {
    pub staff_type: Option<StaffScope>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub min_rating: Option<f64>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub max_rating: Option<f64>,
    pub search: Option<String>,
}

/// Per-staff aggregates for the admin dashboard, resolved through the
/// staff reference so both staff tables contribute display fields.
pub async fn admin_list_ratings(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<AdminRatingsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_admin()?;
    query.validate()?;

    let aggregates = RatingRepository::aggregates(
        &state.db,
        query.staff_type,
        query.min_rating,
        query.max_rating,
    )
    .await?;

    let search = query.search.as_deref().map(str::to_lowercase);
    let mut ratings = Vec::with_capacity(aggregates.len());
    for aggregate in aggregates {
        let staff_ref = StaffRef::new(aggregate.staff_type, aggregate.staff_id);
        let Some(staff) = StaffRepository::resolve(&state.db, staff_ref).await? else {
            // Ratings may outlive a deleted staff row; skip those lines.
            continue;
        };
        if let Some(search) = &search {
            if !staff.name.to_lowercase().contains(search) {
                continue;
            }
        }
        ratings.push(json!({
            "staff_id": aggregate.staff_id,
            "staff_type": aggregate.staff_type,
            "average_rating": round_average(aggregate.average_rating),
            "total_ratings": aggregate.total_ratings,
            "staff_name": staff.name,
            "staff_category": staff.category,
            "staff_photo_url": staff.photo_url,
        }));
    }

    Ok(Json(json!({
        "total": ratings.len(),
        "ratings": ratings,
    })))
}

pub async fn admin_rating_detail(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<StaffTypeQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_admin()?;

    let staff_ref = StaffRef::new(query.staff_type, staff_id);
    let staff = StaffRepository::resolve(&state.db, staff_ref)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff not found.".to_string()))?;

    let (average, total) = RatingRepository::summary_stats(&state.db, staff_ref).await?;
    let distribution = fill_distribution(RatingRepository::distribution(&state.db, staff_ref).await?);
    let recent_reviews = RatingRepository::recent_reviews(&state.db, staff_ref, 10).await?;
    let recent_reviews: Vec<_> = recent_reviews
        .into_iter()
        .map(|review| {
            json!({
                "id": review.id,
                "rating": review.rating,
                "feedback": review.feedback,
                "member_name": review.member_name.unwrap_or_else(|| "Anonymous".to_string()),
                "created_at": review.created_at.format(&Rfc3339).ok(),
            })
        })
        .collect();

    Ok(Json(json!({
        "staff_id": staff_id,
        "staff_type": query.staff_type,
        "staff_name": staff.name,
        "staff_category": staff.category,
        "staff_photo_url": staff.photo_url,
        "average_rating": average.map(round_average),
        "total_ratings": total,
        "rating_distribution": distribution,
        "recent_reviews": recent_reviews,
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingExportQuery {
    pub staff_type: Option<StaffScope>,
    #[validate(range(min = 1, max = 5))]
    pub min_rating: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub max_rating: Option<i32>,
    pub search: Option<String>,
}

pub async fn admin_export_ratings(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<RatingExportQuery>,
) -> AppResult<Response> {
    ctx.require_admin()?;
    query.validate()?;

    let rows = RatingRepository::export_rows(
        &state.db,
        query.staff_type,
        query.min_rating,
        query.max_rating,
    )
    .await?;

    // Resolve each distinct staff once rather than per row.
    let mut staff_cache: HashMap<(StaffScope, Uuid), Option<StaffSummary>> = HashMap::new();
    for row in &rows {
        let key = (row.staff_type, row.staff_id);
        if !staff_cache.contains_key(&key) {
            let staff =
                StaffRepository::resolve(&state.db, StaffRef::new(row.staff_type, row.staff_id))
                    .await?;
            staff_cache.insert(key, staff);
        }
    }

    let search = query.search.as_deref().map(str::to_lowercase);
    let lines: Vec<export::RatingCsvLine> = rows
        .into_iter()
        .filter_map(|row| {
            let staff = staff_cache
                .get(&(row.staff_type, row.staff_id))
                .and_then(|staff| staff.as_ref());
            if let Some(search) = &search {
                match staff {
                    Some(staff) if staff.name.to_lowercase().contains(search) => {}
                    _ => return None,
                }
            }
            Some(export::RatingCsvLine {
                staff_name: staff
                    .map(|staff| staff.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                row,
            })
        })
        .collect();

    let bytes = export::write_ratings_csv(&lines)?;
    export::csv_attachment("staff_ratings.csv", bytes)
}
