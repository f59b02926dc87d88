//! enumkit-core: closed, ordered, singleton enumerations and enum-keyed maps.
//!
//! # Features
//!
//! - **Declarative variant tables**: an enumeration type lists its variants
//!   and their construction payloads once; ordinals follow declaration order
//! - **Lazy singletons**: each variant is built on first use and shared for
//!   the life of the process; lookups by the same name return the same
//!   instance
//! - **Identity semantics**: variants compare by identity, order by ordinal,
//!   and cannot be cloned or generically serialized; the name is the only
//!   portable form
//! - **Enum maps**: array-backed maps over one enumeration's variants with a
//!   runtime value contract, explicit nulls, ordinal-ordered iteration and a
//!   serde round trip
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use enumkit_core::prelude::*;
//!
//! enumkit_core::enumeration! {
//!     pub enum Weekday { MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY }
//! }
//!
//! let mut hours = EnumMap::<Weekday>::new(ValueType::Int, false);
//! hours.put(Weekday::FRIDAY(), Some(Value::Int(6)))?;
//! hours.put(Weekday::value_of("MONDAY")?, Some(Value::Int(8)))?;
//!
//! for (day, value) in &hours {
//!     println!("{day}: {value:?}");
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`variant`]: the `Enumeration` trait and `Variant` singletons
//! - [`registry`]: process-wide discovery and singleton caches
//! - [`map`]: `EnumMap` and its serialized form
//! - [`value`]: map value domain and value type descriptors
//! - [`error`]: Typed error handling
//!
//! The `enumeration!` macro is exported at the crate root.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod logging;
pub mod map;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod value;
pub mod variant;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{EnumError, EnumResult, MapFact};

// Enumerations
pub use registry::Constants;
pub use variant::{AnyVariant, Enumeration, Variant};

// Enum maps
pub use map::{EnumMap, EnumMapRecord};
pub use value::{Record, Value, ValueType};

// Configuration
pub use config::{load_config, EnumkitConfig, MapConfig, OutputConfig};

// Logging
pub use logging::{init_structured_logging, log_info, log_warn};

// Reporting
pub use report::{print_json, print_json_value, print_plain, variant_reports, VariantReport};
