use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    admin_attendance, admin_attendance_summary, admin_update_attendance, member_attendance,
    save_attendance,
};
use crate::app_state::AppState;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/member-staff/attendance",
            get(member_attendance).post(save_attendance),
        )
        .route(
            "/admin/attendance",
            get(admin_attendance).put(admin_update_attendance),
        )
        .route("/admin/attendance/summary", get(admin_attendance_summary))
}
