use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::schedule::timefmt;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Member {
    pub id: i64,
    pub unit_id: Option<i64>,
    pub company_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One outstanding bill line of the committee dues report: bill joined to
/// member, unit and building, with payments pre-aggregated per bill.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DuesRow {
    pub member_name: String,
    pub unit_no: String,
    pub floor: Option<i32>,
    pub building_name: Option<String>,
    #[serde(with = "timefmt::ymd")]
    pub bill_cycle: Date,
    pub bill_amount: Decimal,
    pub amount_paid: Decimal,
    pub due_amount: Decimal,
    #[serde(with = "timefmt::ymd")]
    pub due_date: Date,
    #[serde(with = "timefmt::ymd::option")]
    pub last_payment_date: Option<Date>,
}

/// One bar of the dues summary chart.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DuesSummaryRow {
    pub label: String,
    pub total_due: Decimal,
}
