use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime, Time};
use validator::{Validate, ValidationError};

use crate::schedule::{timefmt, Interval};

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub staff_id: Uuid,
    #[serde(with = "timefmt::ymd")]
    pub date: Date,
    #[serde(with = "timefmt::hhmm")]
    pub start_time: Time,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: Time,
    pub is_booked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TimeSlot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.date, self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_slot_times))]
pub struct NewTimeSlot {
    #[serde(with = "timefmt::ymd")]
    pub date: Date,
    #[serde(with = "timefmt::hhmm")]
    pub start_time: Time,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: Time,
    #[serde(default)]
    pub is_booked: bool,
}

impl NewTimeSlot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.date, self.start_time, self.end_time)
    }
}

fn validate_slot_times(slot: &NewTimeSlot) -> Result<(), ValidationError> {
    if slot.start_time < slot.end_time {
        Ok(())
    } else {
        let mut err = ValidationError::new("end_time");
        err.message = Some("end_time must be after start_time".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTimeSlot {
    #[serde(default, with = "timefmt::ymd::option")]
    pub date: Option<Date>,
    #[serde(default, with = "timefmt::hhmm::option")]
    pub start_time: Option<Time>,
    #[serde(default, with = "timefmt::hhmm::option")]
    pub end_time: Option<Time>,
    pub is_booked: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkTimeSlots {
    #[validate(length(min = 1), nested)]
    pub time_slots: Vec<NewTimeSlot>,
}

/// One rejected item of a bulk add, echoing the proposal next to the
/// persisted slot it collided with.
#[derive(Debug, Serialize)]
pub struct ConflictingSlot {
    pub new_slot: NewTimeSlot,
    pub existing_slot: TimeSlot,
}

impl Serialize for NewTimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("NewTimeSlot", 4)?;
        state.serialize_field("date", &timefmt::format_ymd(self.date))?;
        state.serialize_field("start_time", &timefmt::format_hhmm(self.start_time))?;
        state.serialize_field("end_time", &timefmt::format_hhmm(self.end_time))?;
        state.serialize_field("is_booked", &self.is_booked)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn rejects_inverted_times() {
        let slot = NewTimeSlot {
            date: date!(2025 - 04 - 21),
            start_time: time!(11:00),
            end_time: time!(10:00),
            is_booked: false,
        };
        assert!(slot.validate().is_err());
    }

    #[test]
    fn rejects_zero_length_slot() {
        let slot = NewTimeSlot {
            date: date!(2025 - 04 - 21),
            start_time: time!(10:00),
            end_time: time!(10:00),
            is_booked: false,
        };
        assert!(slot.validate().is_err());
    }

    #[test]
    fn payload_parses_wire_format() {
        let slot: NewTimeSlot = serde_json::from_str(
            r#"{"date": "2025-04-21", "start_time": "09:00", "end_time": "10:00"}"#,
        )
        .unwrap();
        assert_eq!(slot.date, date!(2025 - 04 - 21));
        assert_eq!(slot.start_time, time!(09:00));
        assert!(!slot.is_booked);
        assert!(slot.validate().is_ok());
    }
}
