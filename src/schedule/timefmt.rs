use time::macros::format_description;
use time::{Date, Month, Time};

/// Parse a time-of-day in `HH:MM` form.
pub fn parse_hhmm(value: &str) -> Result<Time, time::error::Parse> {
    Time::parse(value, format_description!("[hour]:[minute]"))
}

pub fn format_hhmm(value: Time) -> String {
    format!("{:02}:{:02}", value.hour(), value.minute())
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_ymd(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

pub fn format_ymd(value: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        u8::from(value.month()),
        value.day()
    )
}

/// Parse a billing/report month in `YYYY-MM` form.
pub fn parse_year_month(value: &str) -> Option<(i32, Month)> {
    let (year, month) = value.split_once('-')?;
    if month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    Some((year, Month::try_from(month).ok()?))
}

/// First day of the given month (inclusive) and first day of the next
/// month (exclusive), for month-window queries.
pub fn month_date_range(year: i32, month: Month) -> (Date, Date) {
    let start = Date::from_calendar_date(year, month, 1).expect("day 1 exists in every month");
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };
    let end =
        Date::from_calendar_date(next_year, next_month, 1).expect("day 1 exists in every month");
    (start, end)
}

/// Serde adapter for `Date` fields carried as `YYYY-MM-DD` strings.
pub mod ymd {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_ymd(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_ymd(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&super::super::format_ymd(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| super::super::parse_ymd(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Serde adapter for `Time` fields carried as `HH:MM` strings.
pub mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;

    pub fn serialize<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Time;

        pub fn serialize<S: Serializer>(
            time: &Option<Time>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&super::super::format_hhmm(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Time>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| super::super::parse_hhmm(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn parses_and_formats_hhmm() {
        assert_eq!(parse_hhmm("09:30").unwrap(), time!(09:30));
        assert_eq!(parse_hhmm("00:00").unwrap(), Time::MIDNIGHT);
        assert_eq!(format_hhmm(time!(23:05)), "23:05");
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("10:61").is_err());
    }

    #[test]
    fn parses_and_formats_dates() {
        assert_eq!(parse_ymd("2025-04-21").unwrap(), date!(2025 - 04 - 21));
        assert_eq!(format_ymd(date!(2025 - 04 - 21)), "2025-04-21");
        assert!(parse_ymd("2025-13-01").is_err());
    }

    #[test]
    fn month_range_is_half_open() {
        let (start, end) = month_date_range(2025, Month::April);
        assert_eq!(start, date!(2025 - 04 - 01));
        assert_eq!(end, date!(2025 - 05 - 01));

        let (start, end) = month_date_range(2025, Month::December);
        assert_eq!(start, date!(2025 - 12 - 01));
        assert_eq!(end, date!(2026 - 01 - 01));
    }

    #[test]
    fn parses_report_months() {
        assert_eq!(parse_year_month("2025-04"), Some((2025, Month::April)));
        assert_eq!(parse_year_month("2025-4"), None);
        assert_eq!(parse_year_month("2025"), None);
        assert_eq!(parse_year_month("2025-00"), None);
    }
}
