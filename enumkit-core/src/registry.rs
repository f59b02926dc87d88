//! Process-wide variant registry.
//!
//! Per enumeration type the registry keeps three caches, all populated
//! lazily and never evicted:
//!
//! - the declaration table (`constants`), discovered once from
//!   [`Enumeration::declare`], with ordinals in declaration order;
//! - one singleton slot per ordinal, materialized on first lookup;
//! - the sorted snapshot of all variants, built by the first `values()` call.
//!
//! Each cache sits behind a one-time initialization cell, so concurrent
//! lookups of the same name always observe the same instance.
//!
//! Performance characteristics:
//! - Discovery: O(declared variants), once per type
//! - Lookup by name: O(1) amortized
//! - `values()`: O(N) on first call, O(1) afterwards

use std::any::{Any, TypeId};
use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{EnumError, EnumResult};
use crate::variant::{Enumeration, Variant};

type StateRef = &'static (dyn Any + Send + Sync);

static STATES: Lazy<RwLock<HashMap<TypeId, StateRef>>> = Lazy::new(|| RwLock::new(HashMap::new()));

static VARIANT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variant name pattern is valid"));

/// Discovered declaration table of one enumeration type.
///
/// Iteration order is ordinal order; the index of an entry is its ordinal.
pub struct Constants<E: Enumeration> {
    entries: IndexMap<&'static str, E::Payload>,
}

impl<E: Enumeration> Constants<E> {
    fn discover() -> Self {
        let mut entries = IndexMap::new();
        for (name, payload) in E::declare() {
            assert!(
                VARIANT_NAME.is_match(name),
                "{}: '{}' is not a valid variant name",
                E::NAME,
                name
            );
            let previous = entries.insert(name, payload);
            assert!(
                previous.is_none(),
                "{}: variant '{}' is declared more than once",
                E::NAME,
                name
            );
        }
        debug!(enum_name = E::NAME, variants = entries.len(), "discovered enumeration");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Ordinal and payload of a declared name.
    pub fn get(&self, name: &str) -> Option<(usize, &E::Payload)> {
        self.entries
            .get_full(name)
            .map(|(ordinal, _, payload)| (ordinal, payload))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// `(ordinal, name, payload)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'static str, &E::Payload)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(ordinal, (name, payload))| (ordinal, *name, payload))
    }
}

struct TypeState<E: Enumeration> {
    constants: Constants<E>,
    instances: Box<[OnceCell<&'static Variant<E>>]>,
    all: OnceCell<Box<[&'static Variant<E>]>>,
}

impl<E: Enumeration> TypeState<E> {
    fn new(constants: Constants<E>) -> Self {
        let instances = (0..constants.len()).map(|_| OnceCell::new()).collect();
        Self {
            constants,
            instances,
            all: OnceCell::new(),
        }
    }

    /// Materialize the variant at `ordinal` if it does not exist yet.
    fn instance(&'static self, ordinal: usize) -> &'static Variant<E> {
        let slot = &self.instances[ordinal];
        if let Some(variant) = slot.get() {
            trace!(enum_name = E::NAME, ordinal, "variant cache hit");
            return *variant;
        }
        *slot.get_or_init(|| {
            let (name, payload) = match self.constants.entries.get_index(ordinal) {
                Some((name, payload)) => (*name, payload),
                None => unreachable!("{}: instance slot {} has no declaration", E::NAME, ordinal),
            };
            let variant = Variant::new(name, ordinal, E::construct(payload));
            debug!(enum_name = E::NAME, variant = name, ordinal, "materialized variant");
            let leaked: &'static Variant<E> = Box::leak(Box::new(variant));
            leaked
        })
    }

    fn is_fully_loaded(&self) -> bool {
        self.all.get().is_some()
    }
}

/// Per-type state, discovering the type on first access.
fn state<E: Enumeration>() -> &'static TypeState<E> {
    let id = TypeId::of::<E>();
    let existing = STATES.read().get(&id).copied();
    let entry = match existing {
        Some(entry) => entry,
        None => {
            // Discover outside the lock: `declare` may itself touch other
            // enumeration types.
            let discovered = TypeState::<E>::new(Constants::discover());
            let mut states = STATES.write();
            *states
                .entry(id)
                .or_insert_with(|| Box::leak(Box::new(discovered)) as StateRef)
        }
    };
    match entry.downcast_ref::<TypeState<E>>() {
        Some(state) => state,
        None => unreachable!("registry entry for {} has a foreign type", E::NAME),
    }
}

/// The declaration table of `E`, discovering it on first call.
pub fn constants<E: Enumeration>() -> &'static Constants<E> {
    &state::<E>().constants
}

/// Look up a variant by exact name, materializing it if needed.
pub fn value_of<E: Enumeration>(name: &str) -> EnumResult<&'static Variant<E>> {
    let state = state::<E>();
    match state.constants.ordinal_of(name) {
        Some(ordinal) => Ok(state.instance(ordinal)),
        None => Err(EnumError::unknown_variant(E::NAME, name)),
    }
}

/// Non-failing lookup: an undeclared name yields `Ok(None)`.
///
/// Only [`EnumError::UnknownVariant`] is converted; anything else propagates.
pub fn try_value_of<E: Enumeration>(name: &str) -> EnumResult<Option<&'static Variant<E>>> {
    match value_of::<E>(name) {
        Ok(variant) => Ok(Some(variant)),
        Err(EnumError::UnknownVariant { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// The variant with the given ordinal, if declared.
pub fn variant_at<E: Enumeration>(ordinal: usize) -> Option<&'static Variant<E>> {
    let state = state::<E>();
    (ordinal < state.constants.len()).then(|| state.instance(ordinal))
}

/// Every variant of `E`, in ascending ordinal order.
///
/// Reuses variants that were already materialized individually. The first
/// call marks the type fully loaded and caches the sorted snapshot.
pub fn values<E: Enumeration>() -> &'static [&'static Variant<E>] {
    let state = state::<E>();
    state.all.get_or_init(|| {
        let mut all: Vec<_> = (0..state.constants.len())
            .map(|ordinal| state.instance(ordinal))
            .collect();
        all.sort_by_key(|variant| variant.ordinal());
        debug!(enum_name = E::NAME, variants = all.len(), "enumeration fully loaded");
        all.into_boxed_slice()
    })
}

/// Whether `values()` has already been called for `E`.
pub fn is_fully_loaded<E: Enumeration>() -> bool {
    state::<E>().is_fully_loaded()
}

/// Accessor used by `enumeration!` for names it declared itself.
#[doc(hidden)]
pub fn declared<E: Enumeration>(name: &'static str) -> &'static Variant<E> {
    match value_of::<E>(name) {
        Ok(variant) => variant,
        Err(err) => unreachable!("generated accessor out of sync with declaration: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Coin {
        cents: u32,
    }

    impl Enumeration for Coin {
        const NAME: &'static str = "Coin";
        type Payload = u32;

        fn declare() -> Vec<(&'static str, u32)> {
            vec![("PENNY", 1), ("NICKEL", 5), ("DIME", 10), ("QUARTER", 25)]
        }

        fn construct(cents: &u32) -> Self {
            Coin { cents: *cents }
        }
    }

    struct Twice;

    impl Enumeration for Twice {
        const NAME: &'static str = "Twice";
        type Payload = ();

        fn declare() -> Vec<(&'static str, ())> {
            vec![("ONE", ()), ("ONE", ())]
        }

        fn construct(_: &()) -> Self {
            Twice
        }
    }

    struct BadName;

    impl Enumeration for BadName {
        const NAME: &'static str = "BadName";
        type Payload = ();

        fn declare() -> Vec<(&'static str, ())> {
            vec![("not a name", ())]
        }

        fn construct(_: &()) -> Self {
            BadName
        }
    }

    #[test]
    fn test_constants_in_declaration_order() {
        let constants = constants::<Coin>();
        assert_eq!(constants.len(), 4);
        assert_eq!(
            constants.names().collect::<Vec<_>>(),
            vec!["PENNY", "NICKEL", "DIME", "QUARTER"]
        );
        assert_eq!(constants.get("DIME"), Some((2, &10)));
        assert_eq!(constants.ordinal_of("quarter"), None);
        assert!(std::ptr::eq(constants, super::constants::<Coin>()));
    }

    #[test]
    fn test_payload_bound_at_materialization() {
        let dime = value_of::<Coin>("DIME").unwrap();
        assert_eq!(dime.cents, 10);
        assert_eq!(dime.ordinal(), 2);
        assert_eq!(dime.name(), "DIME");
    }

    #[test]
    fn test_value_of_is_identity() {
        let a = value_of::<Coin>("NICKEL").unwrap();
        let b = value_of::<Coin>("NICKEL").unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, variant_at::<Coin>(1).unwrap()));
        assert!(variant_at::<Coin>(4).is_none());
    }

    #[test]
    fn test_values_reuses_touched_instances() {
        let quarter = value_of::<Coin>("QUARTER").unwrap();
        let all = values::<Coin>();
        assert!(is_fully_loaded::<Coin>());
        assert!(std::ptr::eq(all[3], quarter));
        assert_eq!(
            all.iter().map(|v| v.ordinal()).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert!(std::ptr::eq(all, values::<Coin>()));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let err = value_of::<Coin>("penny").unwrap_err();
        assert!(matches!(err, EnumError::UnknownVariant { .. }));
        assert!(try_value_of::<Coin>("penny").unwrap().is_none());
        assert!(try_value_of::<Coin>(" PENNY").unwrap().is_none());
        assert!(try_value_of::<Coin>("PENNY").unwrap().is_some());
    }

    #[test]
    #[should_panic(expected = "declared more than once")]
    fn test_duplicate_declaration_panics() {
        constants::<Twice>();
    }

    #[test]
    #[should_panic(expected = "is not a valid variant name")]
    fn test_invalid_name_panics() {
        constants::<BadName>();
    }
}
