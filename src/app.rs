use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{
        attendance::routes::attendance_routes, auth::routes::auth_routes,
        booking::routes::booking_routes, committee::routes::committee_routes,
        member_staff::routes::member_staff_routes, rating::routes::rating_routes,
        schedule::routes::schedule_routes, staff::routes::staff_routes,
    },
    websocket::websocket_routes,
};

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.env.app.static_dir.to_string();

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .merge(websocket_routes())
        .merge(auth_routes())
        .merge(staff_routes())
        .merge(schedule_routes())
        .merge(member_staff_routes())
        .merge(booking_routes())
        .merge(rating_routes())
        .merge(attendance_routes())
        .merge(committee_routes())
        .nest_service(
            "/static",
            tower_http::services::ServeDir::new(static_dir),
        )
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Member Staff API says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": OffsetDateTime::now_utc().format(&Rfc3339).ok(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
