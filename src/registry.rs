// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::kind::{Coercible, ParseFn};

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

/// A resolved registry entry. Once written for a given kind it never
/// changes.
enum Slot {
    /// The kind's parsing function, type-erased. Holds a `ParseFn<T>`.
    Bound(Arc<dyn Any + Send + Sync>),
    /// The kind exposes no parsing function.
    Missing,
}

/// Thread-safe, lazily-populated cache mapping a value kind to its
/// parsing function.
///
/// The first [`resolve`] for a kind consults [`Coercible::parser`] and
/// publishes the outcome under the kind's `TypeId`; every later resolve
/// is a cache hit that does not re-consult the kind. Concurrent first
/// resolutions of the same kind may duplicate the consult, but all
/// racing callers compute the same deterministic slot and only the
/// first write wins, so the race is harmless. The consult never runs
/// under a map lock, so resolving one kind cannot serialize resolution
/// of unrelated kinds.
///
/// A registry is constructed at the application's composition root and
/// shared by reference; entries live for the life of the registry.
///
/// [`resolve`]: ParserRegistry::resolve
#[derive(Default)]
pub struct ParserRegistry {
    slots: DashMap<TypeId, Slot>,
}

impl ParserRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the parsing function for a kind, consulting the kind
    /// itself on first sight and the cache thereafter.
    pub fn resolve<T: Coercible>(&self) -> Option<ParseFn<T>> {
        let key = TypeId::of::<T>();
        if let Some(slot) = self.slots.get(&key) {
            return Self::parser_of(slot.value());
        }

        let slot = match T::parser() {
            Some(f) => Slot::Bound(Arc::new(f)),
            None => Slot::Missing,
        };
        log::debug!("resolved parser for kind {}", type_name::<T>());

        // First write wins; a racing resolver's slot is identical.
        use dashmap::mapref::entry::Entry;
        match self.slots.entry(key) {
            Entry::Occupied(e) => Self::parser_of(e.get()),
            Entry::Vacant(e) => Self::parser_of(&*e.insert(slot)),
        }
    }

    /// Eagerly resolve a kind, typically at composition time.
    pub fn prime<T: Coercible>(&self) {
        let _ = self.resolve::<T>();
    }

    /// Check whether a kind has already been resolved.
    pub fn contains<T: Coercible>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Get the number of resolved kinds.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn parser_of<T: Coercible>(slot: &Slot) -> Option<ParseFn<T>> {
        match slot {
            Slot::Bound(f) => f.downcast_ref::<ParseFn<T>>().copied(),
            Slot::Missing => None,
        }
    }
}
