use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, Month, OffsetDateTime, Time};
use validator::Validate;

use super::staff::StaffScope;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StaffRating {
    pub id: i64,
    pub member_id: i64,
    pub staff_id: Uuid,
    pub staff_type: StaffScope,
    pub rating: i32,
    pub feedback: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewRating {
    pub member_id: i64,
    pub staff_id: Uuid,
    pub staff_type: StaffScope,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

/// Aggregated rating line for the admin dashboard, one per rated staff.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RatingAggregate {
    pub staff_id: Uuid,
    pub staff_type: StaffScope,
    pub average_rating: f64,
    pub total_ratings: i64,
}

/// A single review with the author's display name attached.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RatingReview {
    pub id: i64,
    pub rating: i32,
    pub feedback: Option<String>,
    pub member_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Denormalized row for the CSV export.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RatingExportRow {
    pub id: i64,
    pub member_id: i64,
    pub member_name: Option<String>,
    pub staff_id: Uuid,
    pub staff_type: StaffScope,
    pub rating: i32,
    pub feedback: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Start (inclusive) and end (exclusive) of the calendar month containing
/// `now`. A member gets one rating per staff inside these bounds.
pub fn month_bounds(now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = Date::from_calendar_date(now.year(), now.month(), 1)
        .expect("day 1 exists in every month")
        .with_time(Time::MIDNIGHT)
        .assume_utc();
    let (next_year, next_month) = match now.month() {
        Month::December => (now.year() + 1, Month::January),
        month => (now.year(), month.next()),
    };
    let end = Date::from_calendar_date(next_year, next_month, 1)
        .expect("day 1 exists in every month")
        .with_time(Time::MIDNIGHT)
        .assume_utc();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn month_bounds_cover_the_calendar_month() {
        let (start, end) = month_bounds(datetime!(2025-04-21 14:30 UTC));
        assert_eq!(start, datetime!(2025-04-01 00:00 UTC));
        assert_eq!(end, datetime!(2025-05-01 00:00 UTC));
    }

    #[test]
    fn december_rolls_into_the_next_year() {
        let (start, end) = month_bounds(datetime!(2025-12-31 23:59 UTC));
        assert_eq!(start, datetime!(2025-12-01 00:00 UTC));
        assert_eq!(end, datetime!(2026-01-01 00:00 UTC));
    }

    #[test]
    fn first_of_month_belongs_to_the_new_window() {
        let (start, end) = month_bounds(datetime!(2025-05-01 00:00 UTC));
        assert_eq!(start, datetime!(2025-05-01 00:00 UTC));
        assert_eq!(end, datetime!(2025-06-01 00:00 UTC));
        // A rating created at 2025-04-30 23:59 falls outside this window,
        // so a member who rated in April may rate again on May 1st.
        assert!(datetime!(2025-04-30 23:59 UTC) < start);
    }
}
