use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{cancel_booking, create_booking, list_bookings, reschedule_booking};
use crate::app_state::AppState;

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/member-staff/booking",
            get(list_bookings).post(create_booking),
        )
        .route(
            "/member-staff/booking/{booking_id}",
            put(reschedule_booking).delete(cancel_booking),
        )
}
