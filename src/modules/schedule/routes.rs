use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    add_time_slot, bulk_add_time_slots, get_schedule, get_slots_for_date, remove_time_slot,
    update_time_slot,
};
use crate::app_state::AppState;

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/staff/{staff_id}/schedule", get(get_schedule))
        .route("/staff/{staff_id}/schedule/slots", post(add_time_slot))
        .route(
            "/staff/{staff_id}/schedule/slots/bulk",
            post(bulk_add_time_slots),
        )
        .route(
            "/staff/{staff_id}/schedule/slots/{slot_id}",
            put(update_time_slot).delete(remove_time_slot),
        )
        .route(
            "/staff/{staff_id}/schedule/date/{date}",
            get(get_slots_for_date),
        )
}
