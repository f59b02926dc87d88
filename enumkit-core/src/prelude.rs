//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use enumkit_core::prelude::*;
//! ```

// Enumerations
pub use crate::variant::{AnyVariant, Enumeration, Variant};

// Enum maps
pub use crate::map::{EnumMap, EnumMapRecord};
pub use crate::value::{Record, Value, ValueType};

// Errors
pub use crate::error::{EnumError, EnumResult};
