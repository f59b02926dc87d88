//! Typed error handling for enumkit.
//!
//! Every error here is a local, synchronous contract violation. None of them
//! is transient, so callers should surface them instead of retrying.

use std::path::PathBuf;
use thiserror::Error;

use crate::value::ValueType;

/// One of the three facts an [`EnumMap`](crate::EnumMap) is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFact {
    KeyType,
    ValueType,
    AllowNull,
}

impl std::fmt::Display for MapFact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::KeyType => "key type",
            Self::ValueType => "value type",
            Self::AllowNull => "null allowance",
        };
        f.write_str(label)
    }
}

/// Main error type for enumeration and enum map operations.
#[derive(Error, Debug)]
pub enum EnumError {
    /// Name lookup miss
    #[error("{enum_name} has no variant named '{name}'")]
    UnknownVariant { enum_name: String, name: String },

    /// Comparing or mapping across incompatible enumeration types
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A map value violating the bound value type or null contract
    #[error("invalid value for {key}: expected {expected}, found {found}")]
    InvalidValue {
        key: String,
        expected: ValueType,
        found: String,
    },

    /// A map's bound facts don't match the caller's asserted contract
    #[error("enum map {fact} mismatch: expected {expected}, found {found}")]
    ExpectationMismatch {
        fact: MapFact,
        expected: String,
        found: String,
    },

    #[error("variants of {enum_name} are singletons and cannot be cloned")]
    CloneForbidden { enum_name: String },

    #[error("variants of {enum_name} cannot be serialized generically; encode the name instead")]
    SerializeForbidden { enum_name: String },

    #[error("variants of {enum_name} cannot be deserialized generically; decode the name instead")]
    DeserializeForbidden { enum_name: String },

    /// Serialized map refers to an ordinal outside the key universe
    #[error("ordinal {ordinal} is out of range for {enum_name} ({count} variants)")]
    OrdinalOutOfRange {
        enum_name: String,
        ordinal: usize,
        count: usize,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl EnumError {
    /// Create an unknown-variant error.
    pub fn unknown_variant(enum_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownVariant {
            enum_name: enum_name.into(),
            name: name.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an expectation mismatch error for one map fact.
    pub fn expectation(
        fact: MapFact,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::ExpectationMismatch {
            fact,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is a programming-contract violation rather than an
    /// environment problem.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }

    /// Get the enumeration type name this error refers to, if any.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Self::UnknownVariant { enum_name, .. }
            | Self::CloneForbidden { enum_name }
            | Self::SerializeForbidden { enum_name }
            | Self::DeserializeForbidden { enum_name }
            | Self::OrdinalOutOfRange { enum_name, .. } => Some(enum_name),
            _ => None,
        }
    }
}

/// Convenience type alias for enumkit results.
pub type EnumResult<T> = Result<T, EnumError>;
