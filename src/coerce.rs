// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::datetime::{self, DEFAULT_LAYOUTS};
use crate::kind::Coercible;
use crate::registry::ParserRegistry;
use crate::target::{Target, TargetKind};
use crate::value::Value;

use std::any::Any;

use anyhow::Result;
use chrono::NaiveDateTime;

/// Best-effort coercion of loosely typed scalar values.
///
/// A `Coercer` owns the process's [`ParserRegistry`]. Construct one at
/// the application's composition root and share it by reference; all
/// methods take `&self` and are safe to call from concurrent callers.
///
/// The coercion paths never panic and never error: unparseable input,
/// empty input, and kinds without a parser all collapse to absence (or
/// to the kind's zero value at the defaulting layer). Only
/// reference-kind conversion surfaces an error.
#[derive(Default)]
pub struct Coercer {
    registry: ParserRegistry,
}

impl Coercer {
    /// Create a coercer with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the underlying parser registry.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Coerce into an optional value kind: a parsed `T`, or `None`.
    ///
    /// A value already of kind `T` is returned as-is. Otherwise the
    /// value renders to text (absent/empty input yields `None`), the
    /// kind's parser is resolved through the registry (a kind without
    /// one yields `None`), and the parser runs.
    pub fn try_coerce<T: Coercible>(&self, value: &Value) -> Option<T> {
        if let Some(v) = T::from_value(value) {
            return Some(v);
        }
        let text = value.to_text()?;
        let parse = self.registry.resolve::<T>()?;
        parse(text.as_ref())
    }

    /// Coerce into a value kind, substituting the kind's zero value
    /// when [`try_coerce`] comes back absent. Never fails.
    ///
    /// [`try_coerce`]: Coercer::try_coerce
    pub fn coerce_or_zero<T: Coercible>(&self, value: &Value) -> T {
        self.try_coerce(value).unwrap_or_else(T::zero)
    }

    /// Coerce into a date/time using the default layout list, falling
    /// back to the numeric serial-day interpretation.
    pub fn coerce_datetime(&self, value: &Value) -> Option<NaiveDateTime> {
        self.coerce_datetime_with(value, DEFAULT_LAYOUTS)
    }

    /// Coerce into a date/time against a caller-supplied layout list.
    ///
    /// A value already holding a date/time is returned directly;
    /// otherwise the textual representation must exactly match one of
    /// the layouts, or parse as a serial day count.
    pub fn coerce_datetime_with(
        &self,
        value: &Value,
        layouts: &[&str],
    ) -> Option<NaiveDateTime> {
        if let Value::DateTime(dt) = value {
            return Some(*dt);
        }
        let text = value.to_text()?;
        datetime::parse_datetime(text.as_ref(), layouts)
    }

    /// Coerce against a runtime target descriptor.
    ///
    /// The returned box holds the kind the descriptor was built for:
    /// `T` for [`TargetKind::scalar`] and [`TargetKind::reference`],
    /// `Option<T>` for [`TargetKind::optional`]. Only the reference
    /// path can return an error.
    pub fn coerce(&self, value: &Value, kind: &TargetKind) -> Result<Box<dyn Any + Send + Sync>> {
        kind.run(self, value)
    }

    /// Strongly-typed variant of [`coerce`] for ergonomic call sites.
    ///
    /// [`coerce`]: Coercer::coerce
    pub fn coerce_to<T: Target>(&self, value: &Value) -> T {
        T::coerce_from(self, value)
    }
}
