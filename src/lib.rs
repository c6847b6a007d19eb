// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Best-effort coercion of loosely typed scalar data.
//!
//! Data ingested from spreadsheets, text files, or dynamic query
//! results arrives as untyped scalars. This crate coerces such a
//! [`Value`] into a requested value kind, collapsing every recoverable
//! failure into absence or the kind's zero value so that one malformed
//! field never aborts a batch.
//!
//! ```ignore
//! use kindcast::{Coercer, Value};
//!
//! let coercer = Coercer::new();
//! assert_eq!(coercer.try_coerce::<i64>(&Value::from("42")), Some(42));
//! assert_eq!(coercer.coerce_or_zero::<i64>(&Value::from("oops")), 0);
//!
//! // Spreadsheet serial dates and textual dates land in the same kind.
//! let d = coercer.coerce_datetime(&Value::from("2024-03-15"));
//! let s = coercer.coerce_datetime(&Value::from("45366"));
//! assert_eq!(d, s);
//! ```
//!
//! Parsing functions are discovered once per kind through the
//! [`Coercible`] contract and cached in a [`ParserRegistry`] shared by
//! all callers.

mod coerce;
pub mod datetime;
mod kind;
mod registry;
mod target;
mod value;

pub use coerce::Coercer;
pub use kind::{Coercible, ParseFn};
pub use registry::ParserRegistry;
pub use target::{Shape, Target, TargetKind};
pub use value::Value;
