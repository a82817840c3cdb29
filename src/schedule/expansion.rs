use time::Date;

/// Expand a booking request into one (date, hour) occurrence per calendar
/// day in the range, inclusive of both endpoints.
///
/// The step is always one day. `repeat_type` is stored on the booking as
/// metadata but does not alter the expansion; a weekly booking still gets
/// a slot row for every day of the range. Skipping non-matching weekdays
/// would be a behavior change pending product clarification.
pub fn expand_occurrences(start: Date, end: Date, hours: &[i32]) -> Vec<(Date, i32)> {
    let mut occurrences = Vec::new();
    let mut day = start;
    while day <= end {
        for &hour in hours {
            occurrences.push((day, hour));
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn three_days_two_hours_gives_six_occurrences() {
        let occurrences =
            expand_occurrences(date!(2025 - 04 - 21), date!(2025 - 04 - 23), &[9, 14]);
        assert_eq!(occurrences.len(), 6);
        assert_eq!(occurrences[0], (date!(2025 - 04 - 21), 9));
        assert_eq!(occurrences[5], (date!(2025 - 04 - 23), 14));
    }

    #[test]
    fn single_day_range_expands_once_per_hour() {
        let occurrences = expand_occurrences(date!(2025 - 04 - 21), date!(2025 - 04 - 21), &[8]);
        assert_eq!(occurrences, vec![(date!(2025 - 04 - 21), 8)]);
    }

    #[test]
    fn inverted_range_expands_to_nothing() {
        let occurrences = expand_occurrences(date!(2025 - 04 - 23), date!(2025 - 04 - 21), &[9]);
        assert!(occurrences.is_empty());
    }

    #[test]
    fn crosses_month_boundaries() {
        let occurrences =
            expand_occurrences(date!(2025 - 04 - 29), date!(2025 - 05 - 02), &[10]);
        let dates: Vec<Date> = occurrences.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 04 - 29),
                date!(2025 - 04 - 30),
                date!(2025 - 05 - 01),
                date!(2025 - 05 - 02),
            ]
        );
    }
}
