use time::{Date, Time};

use crate::db::TimeSlot;

/// A time-of-day window on a single calendar date, with the endpoints
/// converted to minutes since midnight for the comparison arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub date: Date,
    pub start_min: u16,
    pub end_min: u16,
}

impl Interval {
    pub fn new(date: Date, start: Time, end: Time) -> Self {
        Self {
            date,
            start_min: minutes_of(start),
            end_min: minutes_of(end),
        }
    }

    /// Half-open intersection test. Slots on different dates never
    /// overlap, and touching endpoints (one ends at 10:00, the next
    /// starts at 10:00) do not count as a conflict.
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.date != other.date {
            return false;
        }
        self.start_min < other.end_min && self.end_min > other.start_min
    }
}

pub fn minutes_of(time: Time) -> u16 {
    u16::from(time.hour()) * 60 + u16::from(time.minute())
}

/// First active slot in `existing` that the proposal collides with.
/// Callers fetch the candidate set for the proposal's staff and date;
/// an update path excludes the slot under edit before calling.
pub fn find_conflict<'a>(proposed: &Interval, existing: &'a [TimeSlot]) -> Option<&'a TimeSlot> {
    existing
        .iter()
        .find(|slot| proposed.overlaps(&slot.interval()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn interval(date: Date, start: Time, end: Time) -> Interval {
        Interval::new(date, start, end)
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = interval(date!(2025 - 04 - 21), time!(09:00), time!(10:00));
        let b = interval(date!(2025 - 04 - 21), time!(09:30), time!(10:30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn different_dates_never_overlap() {
        let a = interval(date!(2025 - 04 - 21), time!(09:00), time!(17:00));
        let b = interval(date!(2025 - 04 - 22), time!(09:00), time!(17:00));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a = interval(date!(2025 - 04 - 21), time!(09:00), time!(10:00));
        let b = interval(date!(2025 - 04 - 21), time!(10:00), time!(11:00));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_interval_overlaps() {
        let outer = interval(date!(2025 - 04 - 21), time!(09:00), time!(12:00));
        let inner = interval(date!(2025 - 04 - 21), time!(10:00), time!(11:00));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn identical_intervals_overlap() {
        let a = interval(date!(2025 - 04 - 21), time!(09:00), time!(10:00));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn minutes_conversion() {
        assert_eq!(minutes_of(time!(00:00)), 0);
        assert_eq!(minutes_of(time!(09:30)), 570);
        assert_eq!(minutes_of(time!(23:59)), 1439);
    }
}
