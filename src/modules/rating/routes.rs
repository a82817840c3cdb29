use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    admin_export_ratings, admin_list_ratings, admin_rating_detail, get_rating_summary,
    submit_rating,
};
use crate::app_state::AppState;

pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/member-staff/ratings", post(submit_rating))
        .route(
            "/member-staff/ratings/{staff_id}/summary",
            get(get_rating_summary),
        )
        .route("/admin/staff-ratings", get(admin_list_ratings))
        .route("/admin/staff-ratings/export", get(admin_export_ratings))
        .route("/admin/staff-ratings/{staff_id}", get(admin_rating_detail))
}
