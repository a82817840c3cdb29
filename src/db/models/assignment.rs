use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MemberStaffAssignment {
    pub id: Uuid,
    pub member_id: i64,
    pub staff_id: Uuid,
    pub assigned_by: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignStaff {
    pub member_id: i64,
    pub staff_id: Uuid,
    pub assigned_by: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UnassignStaff {
    pub member_id: i64,
    pub staff_id: Uuid,
}
