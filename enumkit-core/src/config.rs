//! Configuration loading from enumkit.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{EnumError, EnumResult};
use crate::value::ValueType;

/// Main configuration structure for enumkit.toml.
#[derive(Debug, Deserialize, Default)]
pub struct EnumkitConfig {
    /// Output configuration.
    pub output: Option<OutputConfig>,
    /// Defaults for enum maps built from the command line.
    pub map: Option<MapConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Enum map defaults.
#[derive(Debug, Deserialize, Default)]
pub struct MapConfig {
    /// Value type descriptor, e.g. "int" or a record type name.
    pub value_type: Option<String>,
    /// Whether explicit nulls are accepted.
    pub allow_null: Option<bool>,
}

impl EnumkitConfig {
    /// Whether JSON output was requested.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    /// Configured map value type, `any` when unset.
    pub fn map_value_type(&self) -> ValueType {
        self.map
            .as_ref()
            .and_then(|m| m.value_type.as_deref())
            .map(ValueType::parse)
            .unwrap_or(ValueType::Any)
    }

    /// Configured null allowance, allowed when unset.
    pub fn map_allow_null(&self) -> bool {
        self.map
            .as_ref()
            .and_then(|m| m.allow_null)
            .unwrap_or(true)
    }
}

/// Loads configuration from enumkit.toml if it exists.
pub fn load_config(root: &Path) -> EnumResult<Option<EnumkitConfig>> {
    let path = root.join("enumkit.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| EnumError::config(&path, e.to_string()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| EnumError::config(&path, format!("Invalid enumkit.toml: {}", e)))?;
    Ok(Some(cfg))
}
