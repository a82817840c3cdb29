use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    check_mobile, create_staff, delete_staff, get_staff, send_otp, update_staff, verify_otp,
    verify_staff,
};
use crate::app_state::AppState;

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/staff/check", get(check_mobile))
        .route("/staff/send-otp", post(send_otp))
        .route("/staff/verify-otp", post(verify_otp))
        .route("/staff", post(create_staff))
        .route(
            "/staff/{staff_id}",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route("/staff/{staff_id}/verify", put(verify_staff))
}
