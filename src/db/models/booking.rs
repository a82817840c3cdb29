use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::{Validate, ValidationError};

use crate::schedule::timefmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "repeat_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RepeatType {
    Once,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rescheduled,
    Cancelled,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Booking {
    pub id: i64,
    pub staff_id: Uuid,
    pub member_id: i64,
    pub unit_id: i64,
    pub company_id: i64,
    #[serde(with = "timefmt::ymd")]
    pub start_date: Date,
    #[serde(with = "timefmt::ymd")]
    pub end_date: Date,
    pub repeat_type: RepeatType,
    pub notes: Option<String>,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Flattened per-occurrence view returned by the booking listing. The
/// underlying booking_slots rows are only ever written in bulk alongside
/// their booking, so there is no standalone slot model.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct BookingSlotRow {
    pub booking_id: i64,
    pub staff_id: Uuid,
    #[serde(with = "timefmt::ymd")]
    pub date: Date,
    pub hour: i32,
    pub status: BookingStatus,
}

pub fn validate_slot_hours(hours: &[i32]) -> Result<(), ValidationError> {
    if hours.iter().all(|h| (0..=23).contains(h)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slot_hours");
        err.message = Some("slot hours must be between 0 and 23".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_date_range))]
pub struct NewBooking {
    pub staff_id: Uuid,
    pub member_id: i64,
    pub unit_id: i64,
    pub company_id: i64,
    #[serde(with = "timefmt::ymd")]
    pub start_date: Date,
    #[serde(with = "timefmt::ymd")]
    pub end_date: Date,
    pub repeat_type: RepeatType,
    #[validate(length(min = 1), custom(function = validate_slot_hours))]
    pub slot_hours: Vec<i32>,
    pub notes: Option<String>,
}

fn validate_date_range(booking: &NewBooking) -> Result<(), ValidationError> {
    if booking.start_date <= booking.end_date {
        Ok(())
    } else {
        let mut err = ValidationError::new("end_date");
        err.message = Some("end_date must not be before start_date".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RescheduleBooking {
    #[serde(with = "timefmt::ymd")]
    pub new_date: Date,
    #[validate(length(min = 1), custom(function = validate_slot_hours))]
    pub new_hours: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn hours_outside_the_day_are_rejected() {
        assert!(validate_slot_hours(&[0, 12, 23]).is_ok());
        assert!(validate_slot_hours(&[24]).is_err());
        assert!(validate_slot_hours(&[-1]).is_err());
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let booking = NewBooking {
            staff_id: Uuid::new_v4(),
            member_id: 1,
            unit_id: 1,
            company_id: 1,
            start_date: date!(2025 - 04 - 23),
            end_date: date!(2025 - 04 - 21),
            repeat_type: RepeatType::Once,
            slot_hours: vec![9],
            notes: None,
        };
        assert!(booking.validate().is_err());
    }

    #[test]
    fn repeat_type_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&RepeatType::Weekly).unwrap(),
            "\"weekly\""
        );
        let parsed: RepeatType = serde_json::from_str("\"once\"").unwrap();
        assert_eq!(parsed, RepeatType::Once);
    }
}
