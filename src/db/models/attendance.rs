use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

use crate::schedule::timefmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    NotMarked,
}

/// Attendance row joined with the staff display fields; every read path
/// wants the staff name next to the mark, so this is the only row shape.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub staff_category: Option<String>,
    pub staff_photo: Option<String>,
    #[serde(with = "timefmt::ymd")]
    pub date: Date,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AttendanceEntry {
    pub staff_id: Uuid,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveAttendance {
    pub member_id: i64,
    pub unit_id: i64,
    #[serde(with = "timefmt::ymd")]
    pub date: Date,
    #[validate(length(min = 1), nested)]
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAttendance {
    pub attendance_id: i64,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Broadcast to dashboard subscribers whenever an admin edits a record.
#[derive(Debug, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub updated_at: String,
}
