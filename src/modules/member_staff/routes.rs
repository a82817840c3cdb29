use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    assign_staff, get_company_staff, get_member_staff, search_staff, unassign_staff,
};
use crate::app_state::AppState;

pub fn member_staff_routes() -> Router<AppState> {
    Router::new()
        .route("/members/{member_id}/staff", get(get_member_staff))
        .route("/member-staff/assign", post(assign_staff))
        .route("/member-staff/unassign", post(unassign_staff))
        .route("/company/{company_id}/staff", get(get_company_staff))
        .route("/staff/search", get(search_staff))
}
