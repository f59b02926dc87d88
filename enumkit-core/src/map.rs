//! Array-backed map keyed by the variants of one enumeration type.
//!
//! The key universe is fixed at construction: one slot per ordinal, so every
//! operation is a direct index. A slot is absent, holds an explicit null, or
//! holds a [`Value`]. `get` folds null and absence together; `contains_key`
//! tells them apart.
//!
//! Iteration and `values()` always follow ordinal order, independent of the
//! order entries were inserted in.
//!
//! ```rust,ignore
//! let mut stock = EnumMap::<Weekday>::new(ValueType::Int, false);
//! stock.put(Weekday::FRIDAY(), Some(Value::Int(3)))?;
//! stock.put(Weekday::MONDAY(), Some(Value::Int(7)))?;
//! let first = stock.iter().next();   // MONDAY, 7
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{EnumError, EnumResult, MapFact};
use crate::value::{Value, ValueType};
use crate::variant::{Enumeration, Variant};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Absent,
    Null,
    Present(Value),
}

impl Slot {
    fn is_present(&self) -> bool {
        !matches!(self, Slot::Absent)
    }

    fn value(&self) -> Option<&Value> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// Map from the variants of `K` to values constrained by a [`ValueType`].
pub struct EnumMap<K: Enumeration> {
    keys: &'static [&'static Variant<K>],
    value_type: ValueType,
    allow_null: bool,
    slots: Box<[Slot]>,
    len: usize,
}

impl<K: Enumeration> EnumMap<K> {
    /// Create an empty map over every variant of `K`.
    pub fn new(value_type: ValueType, allow_null: bool) -> Self {
        let keys = K::values();
        Self {
            keys,
            value_type,
            allow_null,
            slots: vec![Slot::Absent; keys.len()].into_boxed_slice(),
            len: 0,
        }
    }

    /// Name of the key enumeration type.
    pub fn key_type(&self) -> &'static str {
        K::NAME
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// Assert the map's bound facts, for maps received from elsewhere.
    ///
    /// Checks key type, then value type, then null allowance, and reports the
    /// first mismatch.
    pub fn expect<E: Enumeration>(&self, value_type: &ValueType, allow_null: bool) -> EnumResult<()> {
        if std::any::TypeId::of::<E>() != std::any::TypeId::of::<K>() {
            return Err(EnumError::expectation(MapFact::KeyType, E::NAME, K::NAME));
        }
        if *value_type != self.value_type {
            return Err(EnumError::expectation(
                MapFact::ValueType,
                value_type,
                &self.value_type,
            ));
        }
        if allow_null != self.allow_null {
            return Err(EnumError::expectation(
                MapFact::AllowNull,
                allow_null,
                self.allow_null,
            ));
        }
        Ok(())
    }

    /// Number of present entries, nulls included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the key universe.
    pub fn key_count(&self) -> usize {
        self.slots.len()
    }

    /// Stored value, or `None` when the entry is absent or null.
    pub fn get(&self, key: &Variant<K>) -> Option<&Value> {
        self.slots[key.ordinal()].value()
    }

    /// Store `value` (`None` stores null) and return the previous value.
    ///
    /// Fails with [`EnumError::InvalidValue`] when the value does not satisfy
    /// the map's value type, or is null in a map that disallows nulls.
    pub fn put(&mut self, key: &Variant<K>, value: Option<Value>) -> EnumResult<Option<Value>> {
        self.check_value(key, value.as_ref())?;
        let slot = match value {
            Some(value) => Slot::Present(value),
            None => Slot::Null,
        };
        let previous = std::mem::replace(&mut self.slots[key.ordinal()], slot);
        if !previous.is_present() {
            self.len += 1;
        }
        Ok(previous.into_value())
    }

    /// Remove the entry for `key`, returning its value if it had one.
    pub fn remove(&mut self, key: &Variant<K>) -> Option<Value> {
        let previous = std::mem::replace(&mut self.slots[key.ordinal()], Slot::Absent);
        if previous.is_present() {
            self.len -= 1;
        }
        previous.into_value()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Absent);
        self.len = 0;
    }

    /// Whether `key` has an entry, null or not.
    pub fn contains_key(&self, key: &Variant<K>) -> bool {
        self.slots[key.ordinal()].is_present()
    }

    /// Whether any entry holds `value`; `None` asks whether a null is stored.
    pub fn contains_value(&self, value: Option<&Value>) -> bool {
        self.slots.iter().any(|slot| match (slot, value) {
            (Slot::Null, None) => true,
            (Slot::Present(stored), Some(wanted)) => stored == wanted,
            _ => false,
        })
    }

    /// Present values in ordinal order; nulls appear as `None`.
    pub fn values(&self) -> Vec<Option<&Value>> {
        self.slots
            .iter()
            .filter(|slot| slot.is_present())
            .map(Slot::value)
            .collect()
    }

    /// Keys with an entry, in ordinal order.
    pub fn keys(&self) -> impl Iterator<Item = &'static Variant<K>> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Present `(key, value)` pairs in ordinal order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            keys: self.keys.iter(),
            slots: self.slots.iter(),
        }
    }

    /// Externalized form: bound facts plus a sparse ordinal table.
    pub fn to_record(&self) -> EnumMapRecord {
        let values = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_present())
            .map(|(ordinal, slot)| (ordinal, slot.value().cloned()))
            .collect();
        EnumMapRecord {
            key_type: K::NAME.to_string(),
            value_type: self.value_type.clone(),
            allow_null_values: self.allow_null,
            values,
        }
    }

    /// Rebuild a map by re-running construction and replaying every entry.
    pub fn from_record(record: EnumMapRecord) -> EnumResult<Self> {
        if record.key_type != K::NAME {
            return Err(EnumError::type_mismatch(K::NAME, record.key_type));
        }
        let mut map = Self::new(record.value_type, record.allow_null_values);
        for (ordinal, value) in record.values {
            let key = map
                .keys
                .get(ordinal)
                .copied()
                .ok_or_else(|| EnumError::OrdinalOutOfRange {
                    enum_name: K::NAME.to_string(),
                    ordinal,
                    count: map.key_count(),
                })?;
            map.put(key, value)?;
        }
        debug!(enum_name = K::NAME, entries = map.len, "rebuilt enum map");
        Ok(map)
    }

    fn check_value(&self, key: &Variant<K>, value: Option<&Value>) -> EnumResult<()> {
        let found = match value {
            None if self.allow_null => return Ok(()),
            Some(value) if !value.is_finite() => format!("non-finite {}", value.kind()),
            Some(value) if self.value_type.accepts(value) => return Ok(()),
            None => "null".to_string(),
            Some(value) => value.kind(),
        };
        Err(EnumError::InvalidValue {
            key: key.qualified_name(),
            expected: self.value_type.clone(),
            found,
        })
    }
}

impl<K: Enumeration> Clone for EnumMap<K> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys,
            value_type: self.value_type.clone(),
            allow_null: self.allow_null,
            slots: self.slots.clone(),
            len: self.len,
        }
    }
}

/// Equal when the value type, null allowance and every slot match.
impl<K: Enumeration> PartialEq for EnumMap<K> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.len == other.len
            && self.value_type == other.value_type
            && self.allow_null == other.allow_null
            && self.slots == other.slots
    }
}

impl<K: Enumeration> fmt::Debug for EnumMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key.name(), value)))
            .finish()
    }
}

/// Iterator over the present entries of an [`EnumMap`], in ordinal order.
pub struct Iter<'a, K: Enumeration> {
    keys: std::slice::Iter<'static, &'static Variant<K>>,
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a, K: Enumeration> Iterator for Iter<'a, K> {
    type Item = (&'static Variant<K>, Option<&'a Value>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = *self.keys.next()?;
            let slot = self.slots.next()?;
            if slot.is_present() {
                return Some((key, slot.value()));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<'a, K: Enumeration> IntoIterator for &'a EnumMap<K> {
    type Item = (&'static Variant<K>, Option<&'a Value>);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized form of an [`EnumMap`]. Absent slots are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMapRecord {
    pub key_type: String,
    pub value_type: ValueType,
    pub allow_null_values: bool,
    #[serde(default)]
    pub values: BTreeMap<usize, Option<Value>>,
}

impl<K: Enumeration> Serialize for EnumMap<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de, K: Enumeration> Deserialize<'de> for EnumMap<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = EnumMapRecord::deserialize(deserializer)?;
        Self::from_record(record).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Light;

    impl Enumeration for Light {
        const NAME: &'static str = "Light";
        type Payload = ();

        fn declare() -> Vec<(&'static str, ())> {
            vec![("RED", ()), ("AMBER", ()), ("GREEN", ())]
        }

        fn construct(_: &()) -> Self {
            Light
        }
    }

    struct Other;

    impl Enumeration for Other {
        const NAME: &'static str = "Other";
        type Payload = ();

        fn declare() -> Vec<(&'static str, ())> {
            vec![("ONLY", ())]
        }

        fn construct(_: &()) -> Self {
            Other
        }
    }

    fn light(name: &str) -> &'static Variant<Light> {
        Light::value_of(name).unwrap()
    }

    #[test]
    fn test_new_map_has_one_absent_slot_per_variant() {
        let map = EnumMap::<Light>::new(ValueType::Any, true);
        assert_eq!(map.key_count(), 3);
        assert!(map.is_empty());
        assert!(map.iter().next().is_none());
        assert_eq!(map.key_type(), "Light");
    }

    #[test]
    fn test_put_tracks_size_and_previous() {
        let mut map = EnumMap::<Light>::new(ValueType::Text, false);
        assert_eq!(map.put(light("RED"), Some("stop".into())).unwrap(), None);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.put(light("RED"), Some("halt".into())).unwrap(),
            Some(Value::Text("stop".into()))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(light("RED")), Some(&Value::Text("halt".into())));
    }

    #[test]
    fn test_remove_only_decrements_present() {
        let mut map = EnumMap::<Light>::new(ValueType::Int, true);
        map.put(light("AMBER"), None).unwrap();
        assert_eq!(map.remove(light("GREEN")), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(light("AMBER")), None);
        assert_eq!(map.len(), 0);
        assert!(!map.contains_key(light("AMBER")));
    }

    #[test]
    fn test_null_rejected_when_disallowed() {
        let mut map = EnumMap::<Light>::new(ValueType::Any, false);
        let err = map.put(light("RED"), None).unwrap_err();
        assert!(matches!(err, EnumError::InvalidValue { .. }));
        assert!(err.to_string().contains("Light::RED"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_contains_value_null_query() {
        let mut map = EnumMap::<Light>::new(ValueType::Int, true);
        map.put(light("GREEN"), Some(Value::Int(1))).unwrap();
        assert!(!map.contains_value(None));
        map.put(light("RED"), None).unwrap();
        assert!(map.contains_value(None));
        assert!(map.contains_value(Some(&Value::Int(1))));
        assert!(!map.contains_value(Some(&Value::Int(2))));
    }

    #[test]
    fn test_clear() {
        let mut map = EnumMap::<Light>::new(ValueType::Bool, false);
        map.put(light("RED"), Some(true.into())).unwrap();
        map.put(light("GREEN"), Some(false.into())).unwrap();
        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.values().is_empty());
        assert_eq!(map.key_count(), 3);
    }

    #[test]
    fn test_expect_reports_each_fact() {
        let map = EnumMap::<Light>::new(ValueType::Int, true);
        assert!(map.expect::<Light>(&ValueType::Int, true).is_ok());

        let err = map.expect::<Other>(&ValueType::Int, true).unwrap_err();
        assert!(matches!(err, EnumError::ExpectationMismatch { fact: MapFact::KeyType, .. }));

        let err = map.expect::<Light>(&ValueType::Float, true).unwrap_err();
        assert!(matches!(err, EnumError::ExpectationMismatch { fact: MapFact::ValueType, .. }));

        let err = map.expect::<Light>(&ValueType::Int, false).unwrap_err();
        assert!(matches!(err, EnumError::ExpectationMismatch { fact: MapFact::AllowNull, .. }));
    }

    #[test]
    fn test_record_is_sparse() {
        let mut map = EnumMap::<Light>::new(ValueType::Int, true);
        map.put(light("GREEN"), Some(Value::Int(9))).unwrap();
        map.put(light("RED"), None).unwrap();
        let record = map.to_record();
        assert_eq!(record.key_type, "Light");
        assert_eq!(record.values.len(), 2);
        assert_eq!(record.values.get(&0), Some(&None));
        assert_eq!(record.values.get(&2), Some(&Some(Value::Int(9))));
        assert!(!record.values.contains_key(&1));
    }

    #[test]
    fn test_from_record_rejects_foreign_key_type() {
        let record = EnumMap::<Other>::new(ValueType::Any, true).to_record();
        let err = EnumMap::<Light>::from_record(record).unwrap_err();
        assert!(matches!(err, EnumError::TypeMismatch { .. }));
    }

    #[test]
    fn test_from_record_rejects_out_of_range_ordinal() {
        let mut record = EnumMap::<Light>::new(ValueType::Int, false).to_record();
        record.values.insert(3, Some(Value::Int(1)));
        let err = EnumMap::<Light>::from_record(record).unwrap_err();
        assert!(matches!(err, EnumError::OrdinalOutOfRange { ordinal: 3, count: 3, .. }));
    }

    #[test]
    fn test_from_record_replays_value_checks() {
        let mut record = EnumMap::<Light>::new(ValueType::Int, false).to_record();
        record.values.insert(0, Some(Value::Float(2.4)));
        assert!(matches!(
            EnumMap::<Light>::from_record(record),
            Err(EnumError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_equality_includes_bound_facts() {
        let mut a = EnumMap::<Light>::new(ValueType::Int, true);
        let mut b = EnumMap::<Light>::new(ValueType::Any, true);
        a.put(light("RED"), Some(Value::Int(1))).unwrap();
        b.put(light("RED"), Some(Value::Int(1))).unwrap();
        assert_ne!(a, b);

        let mut c = EnumMap::<Light>::new(ValueType::Int, true);
        c.put(light("RED"), Some(Value::Int(1))).unwrap();
        assert_eq!(a, c);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        let mut map = EnumMap::<Light>::new(ValueType::Any, true);
        for bad in [
            Value::Float(f64::INFINITY),
            Value::Float(f64::NAN),
            Value::List(vec![Value::Float(f64::NEG_INFINITY)]),
            Value::Record(crate::value::Record::new("Reading").with("level", f64::NAN)),
        ] {
            let err = map.put(light("RED"), Some(bad)).unwrap_err();
            assert!(matches!(err, EnumError::InvalidValue { .. }));
            assert!(err.to_string().contains("non-finite"));
        }
        assert!(map.is_empty());
        assert!(map.put(light("RED"), Some(Value::Float(-0.0))).is_ok());
    }

    #[test]
    fn test_iter_skips_absent_slots() {
        let mut map = EnumMap::<Light>::new(ValueType::Int, true);
        map.put(light("GREEN"), Some(Value::Int(3))).unwrap();
        map.put(light("RED"), None).unwrap();
        let mut iter = map.iter();
        assert_eq!(iter.size_hint(), (0, Some(3)));
        let (key, value) = iter.next().unwrap();
        assert_eq!((key.name(), value), ("RED", None));
        let (key, value) = iter.next().unwrap();
        assert_eq!((key.name(), value), ("GREEN", Some(&Value::Int(3))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_debug_lists_present_entries() {
        let mut map = EnumMap::<Light>::new(ValueType::Int, true);
        map.put(light("AMBER"), Some(Value::Int(2))).unwrap();
        let debug = format!("{:?}", map);
        assert!(debug.contains("AMBER"));
        assert!(!debug.contains("RED"));
    }
}
