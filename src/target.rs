// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::coerce::Coercer;
use crate::kind::Coercible;
use crate::value::Value;

use core::fmt;
use std::any::{type_name, Any};

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;

/// Classification of a target kind. Fixed when the descriptor is
/// built; never derived from a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Plain value kind; absence collapses to the kind's zero value.
    Scalar,
    /// Optional-wrapped value kind; absence stays `None`.
    Optional,
    /// Reference kind; converted through the serde pipeline, and a
    /// failed conversion surfaces to the caller.
    Reference,
}

type Boxed = Box<dyn Any + Send + Sync>;

/// Runtime descriptor of a coercion target.
///
/// Descriptors are built once per target kind, typically at the
/// composition root, and handed to [`Coercer::coerce`]. Each descriptor
/// carries its classification and a fixed-signature run function bound
/// at construction time.
#[derive(Clone, Copy)]
pub struct TargetKind {
    name: &'static str,
    shape: Shape,
    run: fn(&Coercer, &Value) -> Result<Boxed>,
}

impl TargetKind {
    /// Descriptor for a plain value kind. Coercion yields a boxed `T`,
    /// substituting the kind's zero value for absence.
    pub fn scalar<T: Coercible>() -> Self {
        TargetKind {
            name: type_name::<T>(),
            shape: Shape::Scalar,
            run: run_scalar::<T>,
        }
    }

    /// Descriptor for an optional-wrapped value kind. Coercion yields a
    /// boxed `Option<T>`.
    pub fn optional<T: Coercible>() -> Self {
        TargetKind {
            name: type_name::<Option<T>>(),
            shape: Shape::Optional,
            run: run_optional::<T>,
        }
    }

    /// Descriptor for a reference kind, converted through the serde
    /// pipeline. Coercion yields a boxed `T` or the conversion error.
    pub fn reference<T: DeserializeOwned + Send + Sync + 'static>() -> Self {
        TargetKind {
            name: type_name::<T>(),
            shape: Shape::Reference,
            run: run_reference::<T>,
        }
    }

    /// Get the target's type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the target's classification.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub(crate) fn run(&self, coercer: &Coercer, value: &Value) -> Result<Boxed> {
        (self.run)(coercer, value)
    }
}

impl fmt::Debug for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetKind")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

fn run_scalar<T: Coercible>(coercer: &Coercer, value: &Value) -> Result<Boxed> {
    Ok(Box::new(coercer.coerce_or_zero::<T>(value)))
}

fn run_optional<T: Coercible>(coercer: &Coercer, value: &Value) -> Result<Boxed> {
    Ok(Box::new(coercer.try_coerce::<T>(value)))
}

fn run_reference<T: DeserializeOwned + Send + Sync + 'static>(
    _coercer: &Coercer,
    value: &Value,
) -> Result<Boxed> {
    Ok(Box::new(value.convert::<T>()?))
}

/// Statically known coercion target: the typed mirror of
/// [`Coercer::coerce`].
///
/// Implemented for every built-in value kind, for `Option<T>` of any
/// value kind, and by [`crate::coercible_enum!`] for enum kinds. Custom
/// kinds implement it by delegating to the matching [`Coercer`] method.
pub trait Target: Sized + 'static {
    fn coerce_from(coercer: &Coercer, value: &Value) -> Self;
}

impl<T: Coercible> Target for Option<T> {
    fn coerce_from(coercer: &Coercer, value: &Value) -> Self {
        coercer.try_coerce::<T>(value)
    }
}

macro_rules! scalar_target {
    ($($t:ty),+ $(,)?) => {$(
        impl Target for $t {
            fn coerce_from(coercer: &Coercer, value: &Value) -> Self {
                coercer.coerce_or_zero::<$t>(value)
            }
        }
    )+};
}

scalar_target!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    NaiveDateTime,
);
