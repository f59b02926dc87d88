//! Enumeration types and their singleton variants.
//!
//! An enumeration type implements [`Enumeration`] by supplying a declaration
//! table: the ordered list of variant names, each with its construction
//! payload. The registry turns that table into [`Variant`] singletons on
//! demand. Variants are handed out as `&'static Variant<E>`; there is no other
//! way to obtain one.
//!
//! ```rust,ignore
//! use enumkit_core::prelude::*;
//!
//! enumkit_core::enumeration! {
//!     pub enum Weekday { MONDAY, TUESDAY, WEDNESDAY }
//! }
//!
//! let tue = Weekday::value_of("TUESDAY")?;
//! assert_eq!(tue.ordinal(), 1);
//! assert!(std::ptr::eq(tue, Weekday::TUESDAY()));
//! ```

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EnumError, EnumResult};
use crate::registry::{self, Constants};

/// A closed set of named, ordered singleton variants.
///
/// Implementors provide the declaration table and the construction logic;
/// every lookup goes through the process-wide registry.
pub trait Enumeration: Sized + Send + Sync + 'static {
    /// Type name used in errors and in serialized enum maps.
    const NAME: &'static str;

    /// Arguments bound to a variant at first materialization.
    type Payload: Send + Sync + 'static;

    /// Declared variants in ordinal order.
    ///
    /// Evaluated once per process, on first access to the type.
    fn declare() -> Vec<(&'static str, Self::Payload)>;

    /// Build the data carried by one variant from its payload.
    ///
    /// Must not look up variants of `Self`.
    fn construct(payload: &Self::Payload) -> Self;

    /// Look up a variant by its exact, case-sensitive name.
    fn value_of(name: &str) -> EnumResult<&'static Variant<Self>> {
        registry::value_of::<Self>(name)
    }

    /// Like [`value_of`](Self::value_of), but an undeclared name is `Ok(None)`.
    fn try_value_of(name: &str) -> EnumResult<Option<&'static Variant<Self>>> {
        registry::try_value_of::<Self>(name)
    }

    /// All variants in ascending ordinal order.
    fn values() -> &'static [&'static Variant<Self>] {
        registry::values::<Self>()
    }

    /// The discovered declaration table.
    fn constants() -> &'static Constants<Self> {
        registry::constants::<Self>()
    }

    fn variant_count() -> usize {
        Self::constants().len()
    }
}

/// Type-erased view of a variant, for operations that may cross enumeration
/// types.
pub trait AnyVariant: Send + Sync {
    fn enum_type(&self) -> TypeId;
    fn enum_name(&self) -> &'static str;
    fn variant_name(&self) -> &'static str;
    fn variant_ordinal(&self) -> usize;
}

/// The singleton instance of one declared variant.
///
/// Equality is identity. Ordering follows the ordinal. Dereferences to the
/// data built by [`Enumeration::construct`].
pub struct Variant<E: Enumeration> {
    name: &'static str,
    ordinal: usize,
    data: E,
}

impl<E: Enumeration> Variant<E> {
    pub(crate) fn new(name: &'static str, ordinal: usize, data: E) -> Self {
        Self { name, ordinal, data }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn data(&self) -> &E {
        &self.data
    }

    /// `Type::NAME` form, used in diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", E::NAME, self.name)
    }

    /// Ordinal difference `self - other`.
    ///
    /// Fails with [`EnumError::TypeMismatch`] when `other` belongs to another
    /// enumeration type.
    pub fn compare_to(&self, other: &dyn AnyVariant) -> EnumResult<isize> {
        if other.enum_type() != TypeId::of::<E>() {
            return Err(EnumError::type_mismatch(E::NAME, other.enum_name()));
        }
        Ok(self.ordinal as isize - other.variant_ordinal() as isize)
    }

    /// Variants are singletons. Always fails with
    /// [`EnumError::CloneForbidden`]; share the `&'static` reference instead.
    pub fn try_clone(&self) -> EnumResult<Self> {
        Err(EnumError::CloneForbidden {
            enum_name: E::NAME.to_string(),
        })
    }
}

impl<E: Enumeration> AnyVariant for Variant<E> {
    fn enum_type(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn enum_name(&self) -> &'static str {
        E::NAME
    }

    fn variant_name(&self) -> &'static str {
        self.name
    }

    fn variant_ordinal(&self) -> usize {
        self.ordinal
    }
}

impl<E: Enumeration> Deref for Variant<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.data
    }
}

impl<E: Enumeration> PartialEq for Variant<E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<E: Enumeration> Eq for Variant<E> {}

impl<E: Enumeration> PartialOrd for Variant<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Enumeration> Ord for Variant<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }
}

impl<E: Enumeration> Hash for Variant<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
    }
}

impl<E: Enumeration> fmt::Debug for Variant<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", E::NAME, self.name)
    }
}

impl<E: Enumeration> fmt::Display for Variant<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl<E: Enumeration> Serialize for Variant<E> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(ser::Error::custom(EnumError::SerializeForbidden {
            enum_name: E::NAME.to_string(),
        }))
    }
}

impl<'de, E: Enumeration> Deserialize<'de> for Variant<E> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(de::Error::custom(EnumError::DeserializeForbidden {
            enum_name: E::NAME.to_string(),
        }))
    }
}

/// Name-based serde encoding for `&'static Variant<E>` fields.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Shift {
///     #[serde(with = "enumkit_core::variant::by_name")]
///     day: &'static Variant<Weekday>,
/// }
/// ```
pub mod by_name {
    use super::{Enumeration, Variant};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::borrow::Cow;

    pub fn serialize<E, S>(variant: &&'static Variant<E>, serializer: S) -> Result<S::Ok, S::Error>
    where
        E: Enumeration,
        S: Serializer,
    {
        serializer.serialize_str(variant.name())
    }

    pub fn deserialize<'de, E, D>(deserializer: D) -> Result<&'static Variant<E>, D::Error>
    where
        E: Enumeration,
        D: Deserializer<'de>,
    {
        let name = Cow::<'de, str>::deserialize(deserializer)?;
        E::value_of(&name).map_err(de::Error::custom)
    }
}
