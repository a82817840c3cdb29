use axum::{routing::get, Router};

use super::handlers::{dues_report, dues_summary, export_dues_report};
use crate::app_state::AppState;

pub fn committee_routes() -> Router<AppState> {
    Router::new()
        .route("/committee/dues-report", get(dues_report))
        .route("/committee/dues-report/summary", get(dues_summary))
        .route("/committee/dues-report/export", get(export_dues_report))
}
