// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Date/time parsing: exact layout matching with a numeric
//! serial-day fallback for legacy spreadsheet exports.

use crate::kind::{Coercible, ParseFn};
use crate::value::Value;

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// The fully round-trippable canonical timestamp layout. Fractional
/// seconds print only when present.
pub const CANONICAL_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Accepted textual layouts, in match order. ISO-like layouts come
/// first so year-first text never matches a day-first layout. All
/// matching is exact and culture-invariant.
pub const DEFAULT_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y/%m/%d",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %I:%M:%S %p",
    "%d-%m-%Y",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %I:%M:%S %p",
    "%d/%m/%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %I:%M:%S %p",
    CANONICAL_LAYOUT,
];

/// Smallest accepted serial day count: 0001-01-01.
pub const SERIAL_DAY_MIN: f64 = -693_593.0;

/// Largest accepted serial day count: 9999-12-31.
pub const SERIAL_DAY_MAX: f64 = 2_958_465.0;

/// Parse text against an ordered list of layouts, falling back to the
/// numeric serial-day interpretation.
pub fn parse_datetime(text: &str, layouts: &[&str]) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_layouts(text, layouts) {
        return Some(dt);
    }
    from_serial_days(text.trim().parse::<f64>().ok()?)
}

/// Interpret a day count anchored at the serial epoch (1899-12-30, the
/// day before what legacy spreadsheet formats call day 1). The
/// fractional part encodes time-of-day, kept to millisecond precision.
/// Day counts outside the supported calendar range yield `None`.
pub fn from_serial_days(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() || !(SERIAL_DAY_MIN..=SERIAL_DAY_MAX).contains(&days) {
        return None;
    }
    let epoch = serial_epoch()?;
    let millis = (days * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

fn serial_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

fn parse_layouts(text: &str, layouts: &[&str]) -> Option<NaiveDateTime> {
    for layout in layouts {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
        // Date-only layouts carry no time fields; midnight is implied.
        if let Ok(d) = NaiveDate::parse_from_str(text, layout) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

impl Coercible for NaiveDateTime {
    fn parser() -> Option<ParseFn<Self>> {
        Some(|text| parse_datetime(text, DEFAULT_LAYOUTS))
    }

    fn zero() -> Self {
        NaiveDateTime::default()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}
