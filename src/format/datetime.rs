//! Calendar date/time formatter.
//!
//! Canonical form is signed seconds since `1970-01-01T00:00:00` UTC, with sub-second precision
//! carried in the fractional part.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::types::CellValue;

// Tried in order; the first successful parse wins.
const DATETIME_PATTERNS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_PATTERNS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parses dates and date/times into epoch seconds and renders them back.
///
/// Without an explicit pattern, text is tried against a fixed list of ISO-like and day-first
/// layouts (plus RFC 3339 with offsets, normalized to UTC) and values render as
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD HH:MM:SS.fff`, whichever is the shortest
/// lossless form. With a pattern, only that pattern is accepted and it is also used to render.
/// Patterns carrying an offset (`%z`, `%:z`) are normalized to UTC when parsing and render with a
/// UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateTimeFormatter {
    pattern: Option<String>,
}

impl DateTimeFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a single `chrono` strftime pattern for both parsing and rendering.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn parse(&self, value: &CellValue) -> Result<f64, String> {
        match value {
            CellValue::DateTime(dt) => Ok(to_epoch_seconds(dt)),
            CellValue::Text(s) => {
                let parsed = match &self.pattern {
                    Some(p) => parse_with_pattern(s.trim(), p),
                    None => parse_text(s),
                };
                parsed.map(|dt| to_epoch_seconds(&dt)).ok_or_else(|| match &self.pattern {
                    Some(p) => format!("expected date/time matching '{p}'"),
                    None => "expected date/time (e.g. YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)".to_string(),
                })
            }
            CellValue::Number(_) => Err("expected date/time, found number".to_string()),
            CellValue::Null => Err("missing value".to_string()),
        }
    }

    pub fn render(&self, value: f64) -> String {
        let Some(dt) = from_epoch_seconds(value) else {
            return format!("{value}");
        };
        if let Some(p) = &self.pattern {
            let mut out = String::new();
            if write!(out, "{}", dt.and_utc().format(p)).is_ok() {
                return out;
            }
        }
        let whole_second = dt.nanosecond() == 0;
        if whole_second && dt.num_seconds_from_midnight() == 0 {
            dt.format("%Y-%m-%d").to_string()
        } else if whole_second {
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
        }
    }
}

/// Returns true when `s` parses with one of the built-in date/time patterns.
pub fn looks_like_datetime(s: &str) -> bool {
    parse_text(s).is_some()
}

/// The single built-in pattern that matches every date/time-looking value in `values`, preferring
/// the one with the most matches (ties go to the earlier, more specific pattern).
///
/// Returns `None` when no value matches a built-in pattern or when the values mix layouts, so
/// callers fall back to the pattern-free formatter.
pub fn detect_pattern<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let mut counts = [0usize; DATETIME_PATTERNS.len() + DATE_PATTERNS.len()];
    let mut datetimes = 0usize;
    for v in values {
        let v = v.trim();
        if !looks_like_datetime(v) {
            continue;
        }
        datetimes += 1;
        for (count, p) in counts.iter_mut().zip(builtin_patterns()) {
            if parse_with_pattern(v, p).is_some() {
                *count += 1;
            }
        }
    }

    let (best, hits) = counts
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0), |acc, (i, c)| if c > acc.1 { (i, c) } else { acc });
    if hits == 0 || hits < datetimes {
        return None;
    }
    builtin_patterns().nth(best)
}

fn builtin_patterns() -> impl Iterator<Item = &'static str> {
    DATETIME_PATTERNS.into_iter().chain(DATE_PATTERNS)
}

fn parse_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for p in DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, p) {
            return Some(dt);
        }
    }
    for p in DATE_PATTERNS {
        if let Ok(d) = NaiveDate::parse_from_str(s, p) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_with_pattern(s: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_str(s, pattern) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, pattern).ok().or_else(|| {
        NaiveDate::parse_from_str(s, pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn to_epoch_seconds(dt: &NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
}

fn from_epoch_seconds(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let mut secs = value.floor();
    let mut nanos = ((value - secs) * 1e9).round();
    if nanos >= 1e9 {
        secs += 1.0;
        nanos = 0.0;
    }
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(secs as i64, nanos as u32).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn parses_iso_dates_and_datetimes() {
        let f = DateTimeFormatter::new();
        assert_eq!(f.parse(&text("1970-01-01")).unwrap(), 0.0);
        assert_eq!(f.parse(&text("1970-01-02")).unwrap(), 86_400.0);
        assert_eq!(f.parse(&text("1970-01-01 00:01:00")).unwrap(), 60.0);
        assert_eq!(f.parse(&text("1970-01-01T00:00:01.5")).unwrap(), 1.5);
        assert_eq!(f.parse(&text("1969-12-31")).unwrap(), -86_400.0);
        assert_eq!(f.parse(&text("2020-01-01T01:00:00+01:00")).unwrap(), 1_577_836_800.0);
    }

    #[test]
    fn parses_day_first_layouts() {
        let f = DateTimeFormatter::new();
        let iso = f.parse(&text("2004-03-10")).unwrap();
        assert_eq!(f.parse(&text("10/03/2004")).unwrap(), iso);
        assert_eq!(f.parse(&text("10-03-2004")).unwrap(), iso);
        assert_eq!(f.parse(&text("10.03.2004")).unwrap(), iso);
        assert_eq!(f.parse(&text("10/03/2004 18:00")).unwrap(), iso + 18.0 * 3600.0);
    }

    #[test]
    fn accepts_typed_datetime_cells() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let f = DateTimeFormatter::new();
        assert_eq!(f.parse(&CellValue::DateTime(dt)).unwrap(), 1_577_836_800.0);
    }

    #[test]
    fn rejects_non_dates() {
        let f = DateTimeFormatter::new();
        assert!(f.parse(&text("not-a-date")).is_err());
        assert!(f.parse(&CellValue::Number(3.0)).is_err());
        assert_eq!(f.parse(&CellValue::Null).unwrap_err(), "missing value");
    }

    #[test]
    fn render_round_trips_default_layouts() {
        let f = DateTimeFormatter::new();
        for s in ["2020-02-29", "1999-12-31 23:59:59", "1960-06-15 12:00:00", "2021-03-04 05:06:07.500"] {
            let v = f.parse(&text(s)).unwrap();
            assert_eq!(f.render(v), s);
        }
    }

    #[test]
    fn explicit_pattern_parses_and_renders() {
        let f = DateTimeFormatter::with_pattern("%d/%m/%Y");
        let v = f.parse(&text("10/03/2004")).unwrap();
        assert_eq!(f.render(v), "10/03/2004");
        // ISO text does not match the explicit pattern.
        assert!(f.parse(&text("2004-03-10")).is_err());

        let f = DateTimeFormatter::with_pattern("%d/%m/%Y %H.%M.%S");
        let v = f.parse(&text("10/03/2004 18.00.00")).unwrap();
        assert_eq!(f.render(v), "10/03/2004 18.00.00");
    }

    #[test]
    fn offset_patterns_normalize_to_utc() {
        let f = DateTimeFormatter::with_pattern("%Y-%m-%d %H:%M:%S %z");
        let plus_one = f.parse(&text("2020-01-01 01:00:00 +0100")).unwrap();
        let utc = f.parse(&text("2020-01-01 01:00:00 +0000")).unwrap();
        assert_eq!(plus_one, 1_577_836_800.0);
        assert_eq!(utc, 1_577_840_400.0);
        assert_eq!(f.render(plus_one), "2020-01-01 00:00:00 +0000");
        assert_eq!(f.parse(&text(&f.render(utc))).unwrap(), utc);
    }

    #[test]
    fn unrenderable_pattern_falls_back_to_default_layout() {
        // `%Q` is not a strftime specifier.
        let f = DateTimeFormatter::with_pattern("%Y-%m-%d %Q");
        assert_eq!(f.render(1_577_836_800.0), "2020-01-01");
    }

    #[test]
    fn detect_pattern_picks_a_single_layout() {
        assert_eq!(detect_pattern(["10/03/2004", "11/03/2004"]), Some("%d/%m/%Y"));
        assert_eq!(detect_pattern(["10.03.2004", "north"]), Some("%d.%m.%Y"));
        assert_eq!(detect_pattern(["2020-01-01T10:00"]), Some("%Y-%m-%dT%H:%M"));
        assert_eq!(
            detect_pattern(["2020-01-01 10:00:00", "2020-01-01 10:00:00.250"]),
            Some("%Y-%m-%d %H:%M:%S%.f")
        );
        // Mixed layouts cannot share one pattern.
        assert_eq!(detect_pattern(["2020-01-01", "2020-01-01 10:00"]), None);
        assert_eq!(detect_pattern(["112", "north"]), None);
    }

    #[test]
    fn detected_patterns_round_trip_source_text() {
        for s in ["10/03/2004", "10.03.2004", "10-03-2004", "2020-01-01T10:00", "2004/03/10 18:30", "10/03/2004 18:00:05"] {
            let p = detect_pattern([s]).unwrap();
            let f = DateTimeFormatter::with_pattern(p);
            assert_eq!(f.render(f.parse(&text(s)).unwrap()), s);
        }
    }

    #[test]
    fn render_non_finite_falls_back_to_number() {
        assert_eq!(DateTimeFormatter::new().render(f64::NAN), "NaN");
    }

    #[test]
    fn looks_like_datetime_is_strict() {
        assert!(looks_like_datetime("2020-01-01"));
        assert!(looks_like_datetime(" 2020-01-01 10:00 "));
        assert!(!looks_like_datetime("112.0"));
        assert!(!looks_like_datetime("north"));
        assert!(!looks_like_datetime(""));
    }
}
