//! IANA time-zone lookups and conversions.

use crate::error::{Result, WeatherError};
use chrono::{DateTime, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::Serialize;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| WeatherError::InvalidTimezone(name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeInfo {
    pub timezone: String,
    pub datetime: String,
    pub day_of_week: String,
    pub utc_offset: String,
    pub is_dst: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimezoneInfo {
    pub timezone_name: String,
    pub current_local_time: String,
    pub current_utc_time: String,
    pub utc_offset: String,
    pub utc_offset_hours: f64,
    pub abbreviation: String,
    pub is_dst: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeConversion {
    pub original_datetime: String,
    pub original_timezone: String,
    pub converted_datetime: String,
    pub converted_timezone: String,
    pub time_difference_hours: f64,
}

fn iso(dt: &DateTime<Tz>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn offset_hours(dt: &DateTime<Tz>) -> f64 {
    f64::from(dt.offset().fix().local_minus_utc()) / 3600.0
}

fn is_dst(dt: &DateTime<Tz>) -> bool {
    dt.offset().dst_offset() != chrono::Duration::zero()
}

pub fn current_datetime(tz: Tz, now: DateTime<Utc>) -> DateTimeInfo {
    let local = now.with_timezone(&tz);
    DateTimeInfo {
        timezone: tz.name().to_string(),
        datetime: iso(&local),
        day_of_week: local.format("%A").to_string(),
        utc_offset: local.format("%:z").to_string(),
        is_dst: is_dst(&local),
    }
}

pub fn timezone_info(tz: Tz, now: DateTime<Utc>) -> TimezoneInfo {
    let local = now.with_timezone(&tz);
    TimezoneInfo {
        timezone_name: tz.name().to_string(),
        current_local_time: iso(&local),
        current_utc_time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        utc_offset: local.format("%:z").to_string(),
        utc_offset_hours: offset_hours(&local),
        abbreviation: local.format("%Z").to_string(),
        is_dst: is_dst(&local),
    }
}

/// Interpret `datetime` in `from` and express the same instant in `to`.
///
/// An explicit offset in `datetime` takes precedence over `from`. Ambiguous
/// local times resolve to the earlier instant; times inside a DST gap are
/// rejected.
pub fn convert_time(datetime: &str, from: Tz, to: Tz) -> Result<TimeConversion> {
    let source = localize(datetime.trim(), from)?;
    let target = source.with_timezone(&to);

    Ok(TimeConversion {
        original_datetime: iso(&source),
        original_timezone: from.name().to_string(),
        converted_datetime: iso(&target),
        converted_timezone: to.name().to_string(),
        time_difference_hours: offset_hours(&target) - offset_hours(&source),
    })
}

fn localize(datetime: &str, tz: Tz) -> Result<DateTime<Tz>> {
    if let Ok(fixed) = DateTime::parse_from_rfc3339(datetime) {
        return Ok(fixed.with_timezone(&tz));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(datetime, fmt).ok())
        .ok_or_else(|| WeatherError::InvalidDatetime(datetime.to_string()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| WeatherError::NonexistentLocalTime {
            datetime: datetime.to_string(),
            timezone: tz.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn parse_timezone_accepts_iana_names_only() {
        assert_eq!(parse_timezone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(parse_timezone(" UTC ").unwrap(), chrono_tz::UTC);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(WeatherError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn current_datetime_in_tokyo() {
        let info = current_datetime(chrono_tz::Asia::Tokyo, utc(2024, 1, 1, 12, 0));
        assert_eq!(info.datetime, "2024-01-01T21:00:00+09:00");
        assert_eq!(info.day_of_week, "Monday");
        assert_eq!(info.utc_offset, "+09:00");
        assert!(!info.is_dst);
    }

    #[test]
    fn timezone_info_reports_dst_in_summer() {
        let info = timezone_info(chrono_tz::America::New_York, utc(2024, 7, 1, 12, 0));
        assert_eq!(info.timezone_name, "America/New_York");
        assert_eq!(info.utc_offset, "-04:00");
        assert_eq!(info.utc_offset_hours, -4.0);
        assert_eq!(info.abbreviation, "EDT");
        assert_eq!(info.current_utc_time, "2024-07-01T12:00:00Z");
        assert!(info.is_dst);
    }

    #[test]
    fn timezone_info_half_hour_offset() {
        let info = timezone_info(chrono_tz::Asia::Kolkata, utc(2024, 1, 1, 0, 0));
        assert_eq!(info.utc_offset_hours, 5.5);
    }

    #[test]
    fn convert_naive_time_between_zones() {
        let conv = convert_time(
            "2024-01-01T12:00:00",
            chrono_tz::America::New_York,
            chrono_tz::Europe::London,
        )
        .unwrap();
        assert_eq!(conv.original_datetime, "2024-01-01T12:00:00-05:00");
        assert_eq!(conv.converted_datetime, "2024-01-01T17:00:00+00:00");
        assert_eq!(conv.time_difference_hours, 5.0);
    }

    #[test]
    fn convert_accepts_space_separator_and_no_seconds() {
        let conv =
            convert_time("2024-06-15 08:30", chrono_tz::UTC, chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(conv.converted_datetime, "2024-06-15T17:30:00+09:00");
    }

    #[test]
    fn explicit_offset_wins_over_source_zone() {
        let conv = convert_time(
            "2024-01-01T12:00:00+00:00",
            chrono_tz::Asia::Tokyo,
            chrono_tz::UTC,
        )
        .unwrap();
        assert_eq!(conv.converted_datetime, "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn dst_gap_is_rejected() {
        // 02:30 on 2024-03-10 does not exist in New York.
        let err = convert_time(
            "2024-03-10T02:30:00",
            chrono_tz::America::New_York,
            chrono_tz::UTC,
        )
        .unwrap_err();
        assert!(matches!(err, WeatherError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // 01:30 on 2024-11-03 happens twice in New York; the first is EDT.
        let conv = convert_time(
            "2024-11-03T01:30:00",
            chrono_tz::America::New_York,
            chrono_tz::UTC,
        )
        .unwrap();
        assert_eq!(conv.converted_datetime, "2024-11-03T05:30:00+00:00");
    }

    #[test]
    fn garbage_datetime_is_rejected() {
        let err = convert_time("yesterday", chrono_tz::UTC, chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidDatetime(_)));
    }
}
