use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::AuthContext;
use crate::db::repositories::{DuesDimension, DuesFilters, DuesStatus, ReportRepository};
use crate::error::{field_error, AppResult};
use crate::export;
use crate::schedule::timefmt;

const DEFAULT_PER_PAGE: i64 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct DuesReportQuery {
    pub building: Option<String>,
    pub wing: Option<String>,
    pub floor: Option<i32>,
    pub month: Option<String>,
    pub min_due: Option<Decimal>,
    pub max_due: Option<Decimal>,
    pub status: Option<DuesStatus>,
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<i64>,
    pub group_by: Option<DuesDimension>,
}

fn filters_from(query: &DuesReportQuery) -> AppResult<DuesFilters> {
    if let Some(month) = &query.month {
        if timefmt::parse_year_month(month).is_none() {
            return Err(field_error(
                "month",
                "date_format",
                "month must be in YYYY-MM form",
            ));
        }
    }
    Ok(DuesFilters {
        building: query.building.clone(),
        wing: query.wing.clone(),
        floor: query.floor,
        month: query.month.clone(),
        min_due: query.min_due,
        max_due: query.max_due,
        status: query.status,
        search: query.search.clone(),
    })
}

/// Outstanding bills with member/unit/building context, oldest due first.
pub async fn dues_report(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<DuesReportQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_committee()?;
    query.validate()?;
    let filters = filters_from(&query)?;
    let today = OffsetDateTime::now_utc().date();

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let offset = (page - 1) * per_page;

    let total = ReportRepository::dues_count(&state.db, &filters, today).await?;
    let rows = ReportRepository::dues_page(&state.db, &filters, today, per_page, offset).await?;

    Ok(Json(json!({
        "data": rows,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": (total + per_page - 1) / per_page,
    })))
}

/// Total due per building, floor or member for the chart view. Groups
/// with nothing outstanding are excluded; the member dimension returns
/// only the ten largest debtors.
pub async fn dues_summary(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<DuesReportQuery>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.require_committee()?;
    query.validate()?;
    let filters = filters_from(&query)?;
    let today = OffsetDateTime::now_utc().date();
    let dimension = query.group_by.unwrap_or(DuesDimension::Building);

    let rows = ReportRepository::dues_summary(&state.db, dimension, &filters, today).await?;

    Ok(Json(json!(rows)))
}

pub async fn export_dues_report(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<DuesReportQuery>,
) -> AppResult<Response> {
    ctx.require_committee()?;
    query.validate()?;
    let filters = filters_from(&query)?;
    let today = OffsetDateTime::now_utc().date();

    let rows = ReportRepository::dues_all(&state.db, &filters, today).await?;
    let bytes = export::write_dues_csv(&rows)?;
    let filename = format!("dues_report_{}.csv", timefmt::format_ymd(today));
    export::csv_attachment(&filename, bytes)
}
