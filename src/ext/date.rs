//! Calendar arithmetic, parsing and formatting on top of `chrono`.
//!
//! All component reads and calendar arithmetic happen in the date's own
//! time zone, so a `DateTime<Local>` behaves like a wall-clock date and a
//! `DateTime<Utc>` like a UTC one.

use std::fmt::{Display, Write};

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SecondsFormat, TimeDelta, TimeZone, Timelike, Utc,
};
use log::debug;

use crate::constants::{date_formats, relative_days};
use crate::value::TimeInterval;

/// Calendar fields of a date, read in the date's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 1 = Sunday through 7 = Saturday.
    pub weekday: u32,
    pub day_of_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    None,
    Short,
    Medium,
    Long,
    Full,
}

/// How durations are spelled by [`relative_string_for_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsStyle {
    /// `1:02:03`
    Positional,
    /// `1h 2m 3s`
    Abbreviated,
    /// `1 hr, 2 min, 3 sec`
    Short,
    /// `1 hour, 2 minutes, 3 seconds`
    Full,
}

const UNIT_SECONDS: [i64; 4] = [86_400, 3_600, 60, 1];

impl UnitsStyle {
    fn spell(self, unit: usize, amount: i64) -> String {
        let plural = amount != 1;
        match self {
            UnitsStyle::Positional => amount.to_string(),
            UnitsStyle::Abbreviated => format!("{amount}{}", ["d", "h", "m", "s"][unit]),
            UnitsStyle::Short => {
                let names = [("day", "days"), ("hr", "hr"), ("min", "min"), ("sec", "sec")];
                let (one, many) = names[unit];
                format!("{amount} {}", if plural { many } else { one })
            }
            UnitsStyle::Full => {
                let names = ["day", "hour", "minute", "second"];
                format!("{amount} {}{}", names[unit], if plural { "s" } else { "" })
            }
        }
    }
}

fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: Display,
{
    let mut text = String::new();
    if write!(text, "{}", date.format(format)).is_err() {
        debug!("Invalid date format '{format}'");
        return String::new();
    }
    text
}

/// Extension trait for `chrono::DateTime`.
pub trait DateExt: Sized {
    /// True when the time of day is not midnight.
    fn includes_time(&self) -> bool;
    fn is_today(&self) -> bool;

    fn components(&self) -> DateComponents;
    /// 1 = Sunday through 7 = Saturday.
    fn weekday_number(&self) -> u32;
    fn day_of_year(&self) -> u32;
    fn day_number(&self) -> u32;
    fn month_number(&self) -> u32;
    fn year_number(&self) -> i32;

    /// This date at the time of day of `time`.
    fn with_time_of(&self, time: &Self) -> Option<Self>;
    /// Midnight at the start of this date.
    fn without_time(&self) -> Self;
    /// Floors the minutes to a multiple of `increment` and clears seconds.
    fn aligned_to_minute_increment(&self, increment: u32) -> Option<Self>;

    fn adding_minutes(&self, minutes: i64) -> Option<Self>;
    fn adding_hours(&self, hours: i64) -> Option<Self>;
    /// Calendar days: the wall-clock time is kept across DST changes.
    fn adding_days(&self, days: i64) -> Option<Self>;
    fn adding_weeks(&self, weeks: i64) -> Option<Self>;
    /// Calendar months, clamping the day to the end of shorter months.
    fn adding_months(&self, months: i32) -> Option<Self>;
    fn adding_years(&self, years: i32) -> Option<Self>;

    fn difference_in_minutes_to(&self, other: &Self) -> i64;
    fn difference_in_hours_to(&self, other: &Self) -> i64;
    fn difference_in_days_to(&self, other: &Self) -> i64;
    fn difference_in_weeks_to(&self, other: &Self) -> i64;
    /// Whole calendar months from `self` to `other`, truncated toward zero.
    fn difference_in_months_to(&self, other: &Self) -> i64;
    fn difference_in_years_to(&self, other: &Self) -> i64;

    /// True when the date falls between the start of the day `days_before`
    /// days ago and the end of the day `days_after` days ahead.
    fn is_between_days(&self, days_before: i64, days_after: i64) -> bool;

    /// Midnight on the first day of the month `offset` months away.
    fn month_start_with_offset(&self, offset: i32) -> Option<Self>;
    /// Last second of the month `offset` months away.
    fn month_end_with_offset(&self, offset: i32) -> Option<Self>;

    fn string_with_format(&self, format: &str) -> String;
    fn short_date_string(&self) -> String;
    fn date_string(&self) -> String;
    fn formatted(&self, date_style: DateStyle, time_style: DateStyle, allow_relative: bool) -> String;
    fn internet_string(&self) -> String;
    fn json_string(&self) -> String;
    /// `/Date(1420070400000+0000)/`
    fn old_style_json_string(&self) -> String;
    fn description_with_short_date_time(&self) -> String;
    fn description_with_short_date(&self) -> String;
    fn description_with_time(&self) -> String;

    /// Distance from now to this date, spelled out.
    fn relative_string(&self, style: UnitsStyle, maximum_units: usize, keep_zero: bool, default: &str) -> String;
}

impl<Tz: TimeZone> DateExt for DateTime<Tz>
where
    Tz::Offset: Display,
{
    fn includes_time(&self) -> bool {
        self.time() != NaiveTime::MIN
    }

    fn is_today(&self) -> bool {
        self.date_naive() == Utc::now().with_timezone(&self.timezone()).date_naive()
    }

    fn components(&self) -> DateComponents {
        DateComponents {
            year: self.year(),
            month: self.month(),
            day: self.day(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            weekday: self.weekday_number(),
            day_of_year: self.day_of_year(),
        }
    }

    fn weekday_number(&self) -> u32 {
        self.weekday().number_from_sunday()
    }

    fn day_of_year(&self) -> u32 {
        self.ordinal()
    }

    fn day_number(&self) -> u32 {
        self.day()
    }

    fn month_number(&self) -> u32 {
        self.month()
    }

    fn year_number(&self) -> i32 {
        self.year()
    }

    fn with_time_of(&self, time: &Self) -> Option<Self> {
        localize(&self.timezone(), self.date_naive().and_time(time.time()))
    }

    fn without_time(&self) -> Self {
        localize(&self.timezone(), self.date_naive().and_time(NaiveTime::MIN))
            .unwrap_or_else(|| self.clone() - (self.time() - NaiveTime::MIN))
    }

    fn aligned_to_minute_increment(&self, increment: u32) -> Option<Self> {
        if increment == 0 {
            return Some(self.clone());
        }
        let minute = self.minute() / increment * increment;
        let time = NaiveTime::from_hms_opt(self.hour(), minute, 0)?;
        localize(&self.timezone(), self.date_naive().and_time(time))
    }

    fn adding_minutes(&self, minutes: i64) -> Option<Self> {
        self.clone().checked_add_signed(TimeDelta::try_minutes(minutes)?)
    }

    fn adding_hours(&self, hours: i64) -> Option<Self> {
        self.clone().checked_add_signed(TimeDelta::try_hours(hours)?)
    }

    fn adding_days(&self, days: i64) -> Option<Self> {
        if days >= 0 {
            self.clone().checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.clone().checked_sub_days(Days::new(days.unsigned_abs()))
        }
    }

    fn adding_weeks(&self, weeks: i64) -> Option<Self> {
        self.adding_days(weeks.checked_mul(7)?)
    }

    fn adding_months(&self, months: i32) -> Option<Self> {
        if months >= 0 {
            self.clone().checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.clone().checked_sub_months(Months::new(months.unsigned_abs()))
        }
    }

    fn adding_years(&self, years: i32) -> Option<Self> {
        self.adding_months(years.checked_mul(12)?)
    }

    fn difference_in_minutes_to(&self, other: &Self) -> i64 {
        (other.clone() - self.clone()).num_minutes()
    }

    fn difference_in_hours_to(&self, other: &Self) -> i64 {
        (other.clone() - self.clone()).num_hours()
    }

    fn difference_in_days_to(&self, other: &Self) -> i64 {
        (other.clone() - self.clone()).num_days()
    }

    fn difference_in_weeks_to(&self, other: &Self) -> i64 {
        (other.clone() - self.clone()).num_weeks()
    }

    fn difference_in_months_to(&self, other: &Self) -> i64 {
        let month_index = |d: &Self| i64::from(d.year()) * 12 + i64::from(d.month0());
        let mut months = month_index(other) - month_index(self);
        let overshoots = |months: i64| -> bool {
            let Ok(months) = i32::try_from(months) else {
                return false;
            };
            match self.adding_months(months) {
                Some(candidate) if months > 0 => candidate > *other,
                Some(candidate) if months < 0 => candidate < *other,
                _ => false,
            }
        };
        if overshoots(months) {
            months -= months.signum();
        }
        months
    }

    fn difference_in_years_to(&self, other: &Self) -> i64 {
        self.difference_in_months_to(other) / 12
    }

    fn is_between_days(&self, days_before: i64, days_after: i64) -> bool {
        let today = Utc::now().with_timezone(&self.timezone()).without_time();
        let start = days_before.checked_neg().and_then(|days| today.adding_days(days));
        let end = days_after.checked_add(1).and_then(|days| today.adding_days(days));
        match (start, end) {
            (Some(start), Some(end)) => start <= *self && *self < end,
            _ => false,
        }
    }

    fn month_start_with_offset(&self, offset: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(self.year(), self.month(), 1)?;
        let target = if offset >= 0 {
            first.checked_add_months(Months::new(offset.unsigned_abs()))?
        } else {
            first.checked_sub_months(Months::new(offset.unsigned_abs()))?
        };
        localize(&self.timezone(), target.and_time(NaiveTime::MIN))
    }

    fn month_end_with_offset(&self, offset: i32) -> Option<Self> {
        let next_start = self.month_start_with_offset(offset.checked_add(1)?)?;
        next_start.checked_sub_signed(TimeDelta::seconds(1))
    }

    fn string_with_format(&self, format: &str) -> String {
        format_date(self, format)
    }

    fn short_date_string(&self) -> String {
        format_date(self, date_formats::SHORT_DATE)
    }

    fn date_string(&self) -> String {
        format_date(self, date_formats::LONG_DATE)
    }

    fn formatted(&self, date_style: DateStyle, time_style: DateStyle, allow_relative: bool) -> String {
        let relative = if allow_relative && date_style != DateStyle::None {
            let today = Utc::now().with_timezone(&self.timezone()).date_naive();
            match (self.date_naive() - today).num_days() {
                -1 => Some(relative_days::YESTERDAY),
                0 => Some(relative_days::TODAY),
                1 => Some(relative_days::TOMORROW),
                _ => None,
            }
        } else {
            None
        };
        let date_part = match (relative, date_style) {
            (Some(name), _) => name.to_string(),
            (None, DateStyle::None) => String::new(),
            (None, DateStyle::Short) => format_date(self, date_formats::SHORT_DATE),
            (None, DateStyle::Medium) => format_date(self, date_formats::MEDIUM_DATE),
            (None, DateStyle::Long) => format_date(self, date_formats::LONG_DATE),
            (None, DateStyle::Full) => format_date(self, date_formats::FULL_DATE),
        };
        let time_part = match time_style {
            DateStyle::None => String::new(),
            DateStyle::Short => format_date(self, date_formats::SHORT_TIME),
            DateStyle::Medium => format_date(self, date_formats::MEDIUM_TIME),
            DateStyle::Long | DateStyle::Full => format_date(self, date_formats::LONG_TIME),
        };
        match (date_part.is_empty(), time_part.is_empty()) {
            (false, false) => format!("{date_part} at {time_part}"),
            (false, true) => date_part,
            _ => time_part,
        }
    }

    fn internet_string(&self) -> String {
        self.to_rfc2822()
    }

    fn json_string(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn old_style_json_string(&self) -> String {
        let offset = self.offset().fix().local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.abs() / 60;
        format!("/Date({}{sign}{:02}{:02})/", self.timestamp_millis(), minutes / 60, minutes % 60)
    }

    fn description_with_short_date_time(&self) -> String {
        format_date(self, date_formats::DESCRIPTION_DATE_TIME)
    }

    fn description_with_short_date(&self) -> String {
        format_date(self, date_formats::DESCRIPTION_DATE)
    }

    fn description_with_time(&self) -> String {
        format_date(self, date_formats::DESCRIPTION_TIME)
    }

    fn relative_string(&self, style: UnitsStyle, maximum_units: usize, keep_zero: bool, default: &str) -> String {
        let interval = (self.clone().with_timezone(&Utc) - Utc::now()).num_milliseconds() as f64 / 1000.0;
        relative_string_for_interval(interval, style, maximum_units, keep_zero, default)
    }
}

/// Spells out a duration in days, hours, minutes and seconds.
///
/// Output starts at the largest non-zero unit. `maximum_units` caps how many
/// units are shown (0 means no cap); `keep_zero` keeps zero-valued units
/// after the first one and turns a zero interval into `0 seconds` instead of
/// `default`.
pub fn relative_string_for_interval(
    interval: TimeInterval,
    style: UnitsStyle,
    maximum_units: usize,
    keep_zero: bool,
    default: &str,
) -> String {
    let total = interval.abs().round() as i64;
    if total == 0 && !keep_zero {
        return default.to_string();
    }
    let sign = if interval < 0.0 && total > 0 { "-" } else { "" };

    let mut remaining = total;
    let amounts: Vec<i64> = UNIT_SECONDS
        .iter()
        .map(|unit| {
            let amount = remaining / unit;
            remaining %= unit;
            amount
        })
        .collect();

    if style == UnitsStyle::Positional {
        let first = amounts.iter().position(|a| *a != 0).unwrap_or(3).min(2);
        let text = amounts[first..]
            .iter()
            .enumerate()
            .map(|(i, a)| if i == 0 { a.to_string() } else { format!("{a:02}") })
            .collect::<Vec<_>>()
            .join(":");
        return format!("{sign}{text}");
    }

    let first = amounts.iter().position(|a| *a != 0).unwrap_or(3);
    let limit = if maximum_units == 0 { usize::MAX } else { maximum_units };
    let parts: Vec<String> = amounts
        .iter()
        .enumerate()
        .skip(first)
        .filter(|(i, a)| **a != 0 || keep_zero || *i == first)
        .take(limit)
        .map(|(i, a)| style.spell(i, *a))
        .collect();
    let separator = if style == UnitsStyle::Abbreviated { " " } else { ", " };
    format!("{sign}{}", parts.join(separator))
}

/// Midnight on `year-month-day`, in the local zone or UTC.
pub fn date_with_ymd(year: i32, month: u32, day: u32, local: bool) -> Option<DateTime<FixedOffset>> {
    date_with_ymd_hms(year, month, day, 0, 0, 0, local)
}

pub fn date_with_ymd_hms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    local: bool,
) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    if local {
        localize(&Local, naive).map(|d| d.fixed_offset())
    } else {
        Some(Utc.from_utc_datetime(&naive).fixed_offset())
    }
}

/// Parses the date formats this crate writes: JSON dates (both styles),
/// RFC 3339, internet (RFC 2822) dates, `YYYY-MM-DD HH:MM:SS ±ZZZZ`, and
/// bare local dates or date-times.
pub fn date_with_string(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.starts_with("/Date(") {
        return date_with_json_string(text, true);
    }
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .or_else(|_| DateTime::parse_from_str(text, date_formats::NUMERIC_DATE_TIME))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
                .iter()
                .find_map(|format| date_with_string_format(text, format))
        })
        .or_else(|| date_with_string_format(text, date_formats::NUMERIC_DATE))
}

/// Parses `text` with a strftime `format`. Formats without a zone are read
/// as local time, and formats without a time as local midnight.
pub fn date_with_string_format(text: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_str(text, format) {
        return Some(date);
    }
    let naive = NaiveDateTime::parse_from_str(text, format)
        .or_else(|_| NaiveDate::parse_from_str(text, format).map(|d| d.and_time(NaiveTime::MIN)))
        .ok()?;
    localize(&Local, naive).map(|d| d.fixed_offset())
}

fn parse_old_style_json(text: &str) -> Option<DateTime<FixedOffset>> {
    let inner = text.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let split = inner.rfind(['+', '-']).filter(|i| *i > 0);
    let (millis, offset) = match split {
        Some(i) => (&inner[..i], Some(&inner[i..])),
        None => (inner, None),
    };
    let utc = DateTime::from_timestamp_millis(millis.parse().ok()?)?;
    let offset = match offset {
        Some(zone) if zone.len() == 5 && zone[1..].bytes().all(|b| b.is_ascii_digit()) => {
            let hours: i32 = zone.get(1..3)?.parse().ok()?;
            let minutes: i32 = zone.get(3..5)?.parse().ok()?;
            let seconds = (hours * 60 + minutes) * 60;
            if zone.starts_with('-') {
                FixedOffset::west_opt(seconds)?
            } else {
                FixedOffset::east_opt(seconds)?
            }
        }
        Some(_) => return None,
        None => FixedOffset::east_opt(0)?,
    };
    Some(utc.with_timezone(&offset))
}

/// Parses a JSON date: `/Date(ms±hhmm)/`, RFC 3339, or an ISO date-time
/// without zone (read as UTC).
///
/// Serializers emit year-one dates as a placeholder for "no date"; those
/// come back as `None` unless `allow_placeholder` is set.
pub fn date_with_json_string(text: &str, allow_placeholder: bool) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    let date = parse_old_style_json(text)
        .or_else(|| DateTime::parse_from_rfc3339(text).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
        })?;
    if date.year() <= 1 && !allow_placeholder {
        return None;
    }
    Some(date)
}

/// Seconds the local zone is currently ahead of UTC.
pub fn local_time_offset() -> TimeInterval {
    f64::from(Local::now().offset().local_minus_utc())
}

/// Local midnight today.
pub fn today_without_time() -> DateTime<Local> {
    Local::now().without_time()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn test_components() {
        let date = utc(2015, 3, 1, 10, 30, 5);
        let parts = date.components();
        assert_eq!((parts.year, parts.month, parts.day), (2015, 3, 1));
        assert_eq!((parts.hour, parts.minute, parts.second), (10, 30, 5));
        assert_eq!(parts.weekday, 1);
        assert_eq!(parts.day_of_year, 60);
        assert_eq!((date.year_number(), date.month_number(), date.day_number()), (2015, 3, 1));
        assert!(date.includes_time());
        assert!(!date.without_time().includes_time());
    }

    #[test]
    fn test_adding_days_round_trips() {
        let date = utc(2016, 2, 29, 12, 0, 0);
        for days in [1, 30, 365, 1000] {
            let there = date.adding_days(days).unwrap();
            assert_eq!(there.adding_days(-days).unwrap(), date);
            assert_eq!(date.difference_in_days_to(&there), days);
        }
    }

    #[test]
    fn test_adding_units() {
        let date = utc(2015, 1, 31, 8, 0, 0);
        assert_eq!(date.adding_minutes(90).unwrap(), utc(2015, 1, 31, 9, 30, 0));
        assert_eq!(date.adding_hours(-9).unwrap(), utc(2015, 1, 30, 23, 0, 0));
        assert_eq!(date.adding_weeks(1).unwrap(), utc(2015, 2, 7, 8, 0, 0));
        assert_eq!(date.adding_months(1).unwrap(), utc(2015, 2, 28, 8, 0, 0));
        assert_eq!(date.adding_months(-2).unwrap(), utc(2014, 11, 30, 8, 0, 0));
        assert_eq!(date.adding_years(1).unwrap(), utc(2016, 1, 31, 8, 0, 0));
    }

    #[test]
    fn test_differences() {
        let start = utc(2015, 1, 31, 0, 0, 0);
        assert_eq!(start.difference_in_minutes_to(&utc(2015, 1, 31, 1, 30, 0)), 90);
        assert_eq!(start.difference_in_hours_to(&utc(2015, 1, 30, 22, 0, 0)), -2);
        assert_eq!(start.difference_in_weeks_to(&utc(2015, 2, 15, 0, 0, 0)), 2);
        assert_eq!(start.difference_in_months_to(&utc(2015, 2, 28, 0, 0, 0)), 1);
        assert_eq!(start.difference_in_months_to(&utc(2015, 3, 30, 0, 0, 0)), 1);
        assert_eq!(start.difference_in_months_to(&utc(2014, 12, 31, 0, 0, 0)), -1);
        assert_eq!(start.difference_in_years_to(&utc(2017, 1, 30, 0, 0, 0)), 1);
        assert_eq!(start.difference_in_years_to(&utc(2017, 1, 31, 0, 0, 0)), 2);
    }

    #[test]
    fn test_alignment_and_time_of() {
        let date = utc(2015, 6, 1, 10, 47, 33);
        assert_eq!(date.aligned_to_minute_increment(15).unwrap(), utc(2015, 6, 1, 10, 45, 0));
        assert_eq!(date.aligned_to_minute_increment(0).unwrap(), date);
        let time = utc(1999, 1, 1, 7, 5, 0);
        assert_eq!(date.with_time_of(&time).unwrap(), utc(2015, 6, 1, 7, 5, 0));
    }

    #[test]
    fn test_month_bounds() {
        let date = utc(2015, 1, 15, 12, 0, 0);
        assert_eq!(date.month_start_with_offset(0).unwrap(), utc(2015, 1, 1, 0, 0, 0));
        assert_eq!(date.month_start_with_offset(-1).unwrap(), utc(2014, 12, 1, 0, 0, 0));
        assert_eq!(date.month_end_with_offset(1).unwrap(), utc(2015, 2, 28, 23, 59, 59));
    }

    #[test]
    fn test_today_checks() {
        let now = Utc::now();
        assert!(now.is_today());
        assert!(now.is_between_days(0, 0));
        assert!(!now.adding_days(-3).unwrap().is_between_days(1, 1));
        assert!(now.adding_days(-3).unwrap().is_between_days(3, 0));
        assert!(!now.is_between_days(i64::MIN, 0));
        assert!(!now.is_between_days(0, i64::MAX));
        assert!(!today_without_time().includes_time());
    }

    #[test]
    fn test_formatting() {
        let date = utc(2015, 3, 1, 14, 5, 9);
        assert_eq!(date.short_date_string(), "3/1/15");
        assert_eq!(date.date_string(), "March 1, 2015");
        assert_eq!(date.string_with_format("%Y/%m/%d"), "2015/03/01");
        assert_eq!(date.formatted(DateStyle::Medium, DateStyle::Short, false), "Mar 1, 2015 at 2:05 PM");
        assert_eq!(date.formatted(DateStyle::None, DateStyle::Medium, false), "2:05:09 PM");
        assert_eq!(date.description_with_short_date_time(), "2015-03-01 14:05");
        assert_eq!(date.description_with_short_date(), "2015-03-01");
        assert_eq!(date.description_with_time(), "14:05:09");
        assert!(date.internet_string().starts_with("Sun, "));
        assert_eq!(date_with_string(&date.internet_string()).unwrap(), date);
    }

    #[test]
    fn test_relative_formatting() {
        let now = Utc::now();
        assert_eq!(now.formatted(DateStyle::Short, DateStyle::None, true), "Today");
        let tomorrow = now.adding_days(1).unwrap();
        assert_eq!(tomorrow.formatted(DateStyle::Long, DateStyle::None, true), "Tomorrow");
    }

    #[test]
    fn test_json_strings() {
        let date = utc(2015, 1, 1, 0, 0, 0);
        assert_eq!(date.json_string(), "2015-01-01T00:00:00.000Z");
        assert_eq!(date.old_style_json_string(), "/Date(1420070400000+0000)/");
        let parsed = date_with_json_string("/Date(1420070400000-0800)/", false).unwrap();
        assert_eq!(parsed.timestamp(), 1_420_070_400);
        assert_eq!(parsed.offset().local_minus_utc(), -8 * 3600);
        assert_eq!(parsed.old_style_json_string(), "/Date(1420070400000-0800)/");
        assert_eq!(date_with_json_string(&date.json_string(), false).unwrap(), date);
        assert_eq!(date_with_json_string("2015-01-01T00:00:00", false).unwrap(), date);
    }

    #[test]
    fn test_malformed_legacy_json_dates() {
        for text in [
            "/Date(0+0é0)/",
            "/Date(0-é000)/",
            "/Date(0+12345)/",
            "/Date(0+1a00)/",
            "/Date(abc)/",
            "/Date(0+0000",
        ] {
            assert!(date_with_json_string(text, true).is_none(), "parsing {text}");
            assert!(date_with_string(text).is_none(), "parsing {text}");
        }
    }

    #[test]
    fn test_json_placeholder() {
        assert!(date_with_json_string("0001-01-01T00:00:00", false).is_none());
        assert!(date_with_json_string("0001-01-01T00:00:00", true).is_some());
        assert!(date_with_json_string("garbage", true).is_none());
    }

    #[test]
    fn test_date_with_string_formats() {
        let expected = utc(2015, 3, 1, 14, 5, 9);
        for text in [
            "2015-03-01T14:05:09Z",
            "Sun, 1 Mar 2015 14:05:09 +0000",
            "2015-03-01 14:05:09 +0000",
            "/Date(1425218709000)/",
        ] {
            assert_eq!(date_with_string(text).unwrap(), expected, "parsing {text}");
        }
        let local = date_with_string("2015-03-01").unwrap();
        assert_eq!(local.components().day, 1);
        assert!(!local.includes_time());
        assert!(date_with_string("not a date").is_none());
    }

    #[test]
    fn test_constructors() {
        let utc_date = date_with_ymd(2020, 2, 29, false).unwrap();
        assert_eq!(utc_date.offset().local_minus_utc(), 0);
        assert_eq!(utc_date.components().day_of_year, 60);
        let local = date_with_ymd_hms(2020, 7, 4, 9, 30, 0, true).unwrap();
        assert_eq!((local.hour(), local.minute()), (9, 30));
        assert!(date_with_ymd(2021, 2, 29, false).is_none());
        let parsed = date_with_string_format("04/07/2020 09:30", "%d/%m/%Y %H:%M").unwrap();
        assert_eq!(parsed, local);
    }

    #[test]
    fn test_relative_string_for_interval() {
        let full = |s, max, keep| relative_string_for_interval(s, UnitsStyle::Full, max, keep, "now");
        assert_eq!(full(0.0, 0, false), "now");
        assert_eq!(full(0.0, 0, true), "0 seconds");
        assert_eq!(full(3723.0, 0, false), "1 hour, 2 minutes, 3 seconds");
        assert_eq!(full(3723.0, 2, false), "1 hour, 2 minutes");
        assert_eq!(full(3603.0, 0, false), "1 hour, 3 seconds");
        assert_eq!(full(3603.0, 0, true), "1 hour, 0 minutes, 3 seconds");
        assert_eq!(full(-90_000.0, 1, false), "-1 day");
        assert_eq!(
            relative_string_for_interval(3723.0, UnitsStyle::Abbreviated, 0, false, ""),
            "1h 2m 3s"
        );
        assert_eq!(
            relative_string_for_interval(61.0, UnitsStyle::Short, 0, false, ""),
            "1 min, 1 sec"
        );
        assert_eq!(
            relative_string_for_interval(3723.0, UnitsStyle::Positional, 0, false, ""),
            "1:02:03"
        );
        assert_eq!(
            relative_string_for_interval(5.0, UnitsStyle::Positional, 0, false, ""),
            "0:05"
        );
    }

    #[test]
    fn test_local_offset_is_sane() {
        assert!(local_time_offset().abs() <= 14.0 * 3600.0);
    }
}
