// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use kindcast::*;
use serde::Deserialize;

use core::fmt;
use std::str::FromStr;

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

// A custom value kind exposing its own textual-parse contract.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fraction {
    num: i32,
    den: i32,
}

impl FromStr for Fraction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s.split_once('/').ok_or(())?;
        Ok(Fraction {
            num: num.trim().parse().map_err(|_| ())?,
            den: den.trim().parse().map_err(|_| ())?,
        })
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl Coercible for Fraction {
    fn parser() -> Option<ParseFn<Self>> {
        Some(|text| text.parse().ok())
    }

    fn zero() -> Self {
        Fraction { num: 0, den: 0 }
    }
}

impl Target for Fraction {
    fn coerce_from(coercer: &Coercer, value: &Value) -> Self {
        coercer.coerce_or_zero::<Fraction>(value)
    }
}

// A kind with no parse contract at all.
#[derive(Debug, Clone, PartialEq)]
struct Blob(Vec<u8>);

impl Coercible for Blob {
    fn parser() -> Option<ParseFn<Self>> {
        None
    }

    fn zero() -> Self {
        Blob(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Currency {
    Usd = 0,
    Eur = 1,
    Gbp = 2,
}

coercible_enum!(Currency { Usd, Eur, Gbp });

#[test]
fn round_trip_integers() {
    let coercer = Coercer::new();
    for v in [0i64, 42, -7, i64::MAX, i64::MIN] {
        let text = Value::from(v.to_string());
        assert_eq!(coercer.try_coerce::<i64>(&text), Some(v));
    }
}

#[test]
fn round_trip_booleans() {
    let coercer = Coercer::new();
    for v in [true, false] {
        let text = Value::from(v.to_string());
        assert_eq!(coercer.try_coerce::<bool>(&text), Some(v));
    }
}

#[test]
fn round_trip_floats() {
    let coercer = Coercer::new();
    for v in [0.0f64, 1.5, -0.25, 1e300] {
        let text = Value::from(v.to_string());
        assert_eq!(coercer.try_coerce::<f64>(&text), Some(v));
    }
}

#[test]
fn round_trip_custom_kind() {
    let coercer = Coercer::new();
    let v = Fraction { num: 3, den: 4 };
    let text = Value::from(v.to_string());
    assert_eq!(coercer.try_coerce::<Fraction>(&text), Some(v));
}

#[test]
fn identity_fast_path() {
    let coercer = Coercer::new();
    assert_eq!(coercer.try_coerce::<i64>(&Value::Int(5)), Some(5));
    assert_eq!(coercer.try_coerce::<bool>(&Value::Bool(true)), Some(true));
    assert_eq!(coercer.try_coerce::<f64>(&Value::from(1.5)), Some(1.5));
    // integral values widen into the float kind directly
    assert_eq!(coercer.try_coerce::<f64>(&Value::Int(3)), Some(3.0));
    assert_eq!(
        coercer.try_coerce::<String>(&Value::from("x")),
        Some("x".to_owned())
    );
}

#[test]
fn cross_kind_textual_paths() {
    let coercer = Coercer::new();
    // numbers render to text before parsing into the target kind
    assert_eq!(coercer.try_coerce::<String>(&Value::Int(5)), Some("5".into()));
    assert_eq!(coercer.try_coerce::<i32>(&Value::from("42")), Some(42));
    assert_eq!(coercer.try_coerce::<i64>(&Value::from(" 42 ")), Some(42));

    // a fractional number is not an integer
    assert_eq!(coercer.try_coerce::<i64>(&Value::Float(3.5)), None);
    // out-of-range narrowing fails rather than wrapping
    assert_eq!(coercer.try_coerce::<u8>(&Value::Int(300)), None);
    assert_eq!(coercer.try_coerce::<u32>(&Value::Int(-1)), None);
}

#[test]
fn absent_inputs_stay_absent() {
    let coercer = Coercer::new();
    assert_eq!(coercer.try_coerce::<i64>(&Value::Null), None);
    assert_eq!(coercer.try_coerce::<i64>(&Value::from("")), None);
    assert_eq!(coercer.try_coerce::<i64>(&Value::from("12x")), None);
    assert_eq!(coercer.try_coerce::<bool>(&Value::from("maybe")), None);
    assert_eq!(coercer.try_coerce::<Fraction>(&Value::from("3:4")), None);
}

#[test]
fn defaulting_collapses_absence_to_zero() {
    let coercer = Coercer::new();
    assert_eq!(coercer.coerce_or_zero::<i64>(&Value::from("oops")), 0);
    assert_eq!(coercer.coerce_or_zero::<f64>(&Value::Null), 0.0);
    assert!(!coercer.coerce_or_zero::<bool>(&Value::from("")));
    assert_eq!(
        coercer.coerce_or_zero::<Fraction>(&Value::from("junk")),
        Fraction { num: 0, den: 0 }
    );
    // a parseable value is never replaced by zero
    assert_eq!(coercer.coerce_or_zero::<i64>(&Value::from("7")), 7);
}

#[test]
fn kind_without_parser_is_absent_for_any_input() {
    let coercer = Coercer::new();
    for value in [Value::Null, Value::from("data"), Value::Int(1)] {
        assert_eq!(coercer.try_coerce::<Blob>(&value), None);
        assert_eq!(coercer.coerce_or_zero::<Blob>(&value), Blob(Vec::new()));
    }
}

#[test]
fn enum_parse_by_name_or_number() {
    let coercer = Coercer::new();
    assert_eq!(
        coercer.try_coerce::<Currency>(&Value::from("Eur")),
        Some(Currency::Eur)
    );
    assert_eq!(
        coercer.try_coerce::<Currency>(&Value::from("2")),
        Some(Currency::Gbp)
    );
    assert_eq!(
        coercer.try_coerce::<Currency>(&Value::Int(1)),
        Some(Currency::Eur)
    );

    // names match exactly and case-sensitively
    assert_eq!(coercer.try_coerce::<Currency>(&Value::from("eur")), None);
    assert_eq!(coercer.try_coerce::<Currency>(&Value::from("3")), None);

    // the first variant is the enum's zero value
    assert_eq!(
        coercer.coerce_or_zero::<Currency>(&Value::from("???")),
        Currency::Usd
    );
}

#[test]
fn dynamic_scalar_target() -> Result<()> {
    let coercer = Coercer::new();
    let kind = TargetKind::scalar::<i64>();
    assert_eq!(kind.shape(), Shape::Scalar);
    assert!(kind.name().contains("i64"));

    let boxed = coercer.coerce(&Value::from("42"), &kind)?;
    assert_eq!(boxed.downcast_ref::<i64>(), Some(&42));

    // absence collapses to zero on the plain path
    let boxed = coercer.coerce(&Value::from("oops"), &kind)?;
    assert_eq!(boxed.downcast_ref::<i64>(), Some(&0));
    Ok(())
}

#[test]
fn dynamic_optional_target() -> Result<()> {
    let coercer = Coercer::new();
    let kind = TargetKind::optional::<i64>();
    assert_eq!(kind.shape(), Shape::Optional);

    let boxed = coercer.coerce(&Value::from("42"), &kind)?;
    assert_eq!(boxed.downcast_ref::<Option<i64>>(), Some(&Some(42)));

    // absence stays explicit on the optional path
    let boxed = coercer.coerce(&Value::from("oops"), &kind)?;
    assert_eq!(boxed.downcast_ref::<Option<i64>>(), Some(&None));
    Ok(())
}

#[test]
fn dynamic_datetime_target() -> Result<()> {
    let coercer = Coercer::new();
    let kind = TargetKind::scalar::<NaiveDateTime>();

    let boxed = coercer.coerce(&Value::from("2024-03-15"), &kind)?;
    assert_eq!(
        boxed.downcast_ref::<NaiveDateTime>(),
        Some(&dt(2024, 3, 15, 0, 0, 0))
    );

    // zero date/time for the non-optional case
    let boxed = coercer.coerce(&Value::from("junk"), &kind)?;
    assert_eq!(
        boxed.downcast_ref::<NaiveDateTime>(),
        Some(&dt(1970, 1, 1, 0, 0, 0))
    );

    let kind = TargetKind::optional::<NaiveDateTime>();
    let boxed = coercer.coerce(&Value::from("junk"), &kind)?;
    assert_eq!(
        boxed.downcast_ref::<Option<NaiveDateTime>>(),
        Some(&None)
    );
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Ratio(f64);

#[test]
fn dynamic_reference_target() -> Result<()> {
    let coercer = Coercer::new();
    let kind = TargetKind::reference::<Ratio>();
    assert_eq!(kind.shape(), Shape::Reference);

    let boxed = coercer.coerce(&Value::from(0.5), &kind)?;
    assert_eq!(boxed.downcast_ref::<Ratio>(), Some(&Ratio(0.5)));

    // the reference path is the only one that surfaces an error
    assert!(coercer.coerce(&Value::from("not a ratio"), &kind).is_err());
    Ok(())
}

#[test]
fn typed_entry_point() {
    let coercer = Coercer::new();
    assert_eq!(coercer.coerce_to::<i64>(&Value::from("42")), 42);
    assert_eq!(coercer.coerce_to::<i64>(&Value::from("oops")), 0);
    assert_eq!(coercer.coerce_to::<Option<i64>>(&Value::from("oops")), None);
    assert_eq!(
        coercer.coerce_to::<Option<bool>>(&Value::from("true")),
        Some(true)
    );
    assert_eq!(coercer.coerce_to::<String>(&Value::Int(5)), "5");
    assert_eq!(
        coercer.coerce_to::<NaiveDateTime>(&Value::from("junk")),
        dt(1970, 1, 1, 0, 0, 0)
    );
    assert_eq!(
        coercer.coerce_to::<Option<NaiveDateTime>>(&Value::from("2024-03-15")),
        Some(dt(2024, 3, 15, 0, 0, 0))
    );
    assert_eq!(
        coercer.coerce_to::<Fraction>(&Value::from("3/4")),
        Fraction { num: 3, den: 4 }
    );
    assert_eq!(
        coercer.coerce_to::<Currency>(&Value::from("Gbp")),
        Currency::Gbp
    );
    assert_eq!(
        coercer.coerce_to::<Option<Currency>>(&Value::from("???")),
        None
    );
}
