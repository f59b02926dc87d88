//! enumkit CLI - inspect enumerations and enum maps from the command line.
//!
//! Features:
//! - List the variants of a built-in enumeration in ordinal order
//! - Resolve names and compare variants
//! - Build enum maps from `KEY=VALUE` pairs and print their serialized form
//! - Check that a serialized enum map survives a round trip

mod demo;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use enumkit_core::{
    init_structured_logging, load_config, log_info, log_warn, print_json, print_json_value,
    print_plain, variant_reports, EnumMap, EnumMapRecord, EnumkitConfig, Enumeration, Value,
    ValueType,
};

use demo::{Planet, Weekday, CATALOG};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect enumkit enumerations and enum maps")]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Directory to read enumkit.toml from
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every variant of an enumeration in ordinal order
    Variants {
        /// Enumeration type name
        enumeration: String,
    },
    /// Resolve a variant by its exact name
    Lookup { enumeration: String, name: String },
    /// Print the ordinal difference of two variants
    Compare {
        enumeration: String,
        left: String,
        right: String,
    },
    /// Build an enum map from KEY=VALUE pairs and print its serialized form
    Map {
        enumeration: String,
        /// Entries such as MONDAY=8, FRIDAY=null or SUNDAY="off"
        entries: Vec<String>,
        /// Value type descriptor (overrides enumkit.toml)
        #[arg(long)]
        value_type: Option<String>,
        /// Reject null values (overrides enumkit.toml)
        #[arg(long)]
        no_null: bool,
    },
    /// Check that a serialized enum map round-trips
    Check {
        /// JSON file holding a serialized enum map
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    init_structured_logging();

    let cli = Cli::parse();

    // Config is optional; a broken file is reported, not fatal.
    let config = match load_config(&cli.config_dir) {
        Ok(Some(cfg)) => {
            log_info("loaded enumkit.toml");
            cfg
        }
        Ok(None) => EnumkitConfig::default(),
        Err(e) => {
            log_warn(&e.to_string());
            eprintln!("[WARN] config load failed: {}", e);
            EnumkitConfig::default()
        }
    };
    let json = cli.json || config.wants_json();

    match &cli.command {
        Command::Variants { enumeration } => {
            let reports = match enumeration.as_str() {
                "Weekday" => variant_reports::<Weekday>(),
                "Planet" => variant_reports::<Planet>(),
                other => return Err(unknown_enumeration(other)),
            };
            if json {
                print_json(&reports);
            } else {
                print_plain(&reports);
            }
        }
        Command::Lookup { enumeration, name } => match enumeration.as_str() {
            "Weekday" => {
                let day = Weekday::value_of(name)?;
                print_lookup(json, day.qualified_name(), day.ordinal(), None);
            }
            "Planet" => {
                let planet = Planet::value_of(name)?;
                let detail = format!(
                    "mass {:.3e} kg, radius {:.3e} m, surface gravity {:.2} m/s^2",
                    planet.mass(),
                    planet.radius(),
                    planet.surface_gravity()
                );
                print_lookup(json, planet.qualified_name(), planet.ordinal(), Some(detail));
            }
            other => return Err(unknown_enumeration(other)),
        },
        Command::Compare {
            enumeration,
            left,
            right,
        } => {
            let diff = match enumeration.as_str() {
                "Weekday" => compare::<Weekday>(left, right)?,
                "Planet" => compare::<Planet>(left, right)?,
                other => return Err(unknown_enumeration(other)),
            };
            if json {
                print_json_value(&serde_json::json!({ "left": left, "right": right, "compare": diff }));
            } else {
                println!("{}", diff);
            }
        }
        Command::Map {
            enumeration,
            entries,
            value_type,
            no_null,
        } => {
            let value_type = value_type
                .as_deref()
                .map(ValueType::parse)
                .unwrap_or_else(|| config.map_value_type());
            let allow_null = !no_null && config.map_allow_null();
            let record = match enumeration.as_str() {
                "Weekday" => build_map::<Weekday>(entries, value_type, allow_null)?.to_record(),
                "Planet" => build_map::<Planet>(entries, value_type, allow_null)?.to_record(),
                other => return Err(unknown_enumeration(other)),
            };
            print_json_value(&record);
        }
        Command::Check { file } => {
            let entries = check_file(file)?;
            if json {
                print_json_value(&serde_json::json!({ "ok": true, "entries": entries }));
            } else {
                println!("OK: {} round-trips ({} entries)", file.display(), entries);
            }
        }
    }

    Ok(())
}

fn unknown_enumeration(name: &str) -> anyhow::Error {
    anyhow!(
        "unknown enumeration '{}' (available: {})",
        name,
        CATALOG.join(", ")
    )
}

fn print_lookup(json: bool, qualified: String, ordinal: usize, detail: Option<String>) {
    if json {
        print_json_value(&serde_json::json!({
            "variant": qualified,
            "ordinal": ordinal,
            "detail": detail,
        }));
    } else {
        match detail {
            Some(d) => println!("{} (ordinal {}): {}", qualified, ordinal, d),
            None => println!("{} (ordinal {})", qualified, ordinal),
        }
    }
}

fn compare<E: Enumeration>(left: &str, right: &str) -> Result<isize> {
    let left = E::value_of(left)?;
    let right = E::value_of(right)?;
    Ok(left.compare_to(right)?)
}

/// Parses one command-line value literal.
///
/// `null` is an explicit null; booleans, integers and floats map to their
/// categories; anything else (optionally double-quoted) is text.
fn parse_literal(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match raw {
        "null" => None,
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Some(Value::Int(i))
            } else if let Ok(f) = raw.parse::<f64>() {
                Some(Value::Float(f))
            } else if let Ok(serde_json::Value::String(s)) = serde_json::from_str(raw) {
                Some(Value::Text(s))
            } else {
                Some(Value::Text(raw.to_string()))
            }
        }
    }
}

fn build_map<E: Enumeration>(
    entries: &[String],
    value_type: ValueType,
    allow_null: bool,
) -> Result<EnumMap<E>> {
    let mut map = EnumMap::<E>::new(value_type, allow_null);
    for entry in entries {
        let (name, raw) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", entry))?;
        let key = E::value_of(name)?;
        map.put(key, parse_literal(raw))
            .with_context(|| format!("Failed to store entry '{}'", entry))?;
    }
    Ok(map)
}

fn round_trip<E: Enumeration>(record: EnumMapRecord) -> Result<usize> {
    let map = EnumMap::<E>::from_record(record.clone())?;
    if map.to_record() != record {
        bail!("{} map changed across a round trip", E::NAME);
    }
    Ok(map.len())
}

/// Reads a serialized enum map and verifies it rebuilds to the same record.
fn check_file(path: &Path) -> Result<usize> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let record: EnumMapRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid enum map in {}", path.display()))?;
    match record.key_type.as_str() {
        "Weekday" => round_trip::<Weekday>(record),
        "Planet" => round_trip::<Planet>(record),
        other => Err(unknown_enumeration(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("enumkit_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_literal("null"), None);
        assert_eq!(parse_literal("8"), Some(Value::Int(8)));
        assert_eq!(parse_literal("2.4"), Some(Value::Float(2.4)));
        assert_eq!(parse_literal("true"), Some(Value::Bool(true)));
        assert_eq!(parse_literal("\"null\""), Some(Value::Text("null".into())));
        assert_eq!(parse_literal("off"), Some(Value::Text("off".into())));
    }

    #[test]
    fn test_build_map_orders_by_ordinal() {
        let entries = vec!["SUNDAY=1".to_string(), "MONDAY=2".to_string()];
        let map = build_map::<Weekday>(&entries, ValueType::Int, false).unwrap();
        let keys: Vec<_> = map.keys().map(|k| k.name()).collect();
        assert_eq!(keys, vec!["MONDAY", "SUNDAY"]);
    }

    #[test]
    fn test_build_map_rejects_bad_entries() {
        let float = vec!["MONDAY=2.4".to_string()];
        assert!(build_map::<Weekday>(&float, ValueType::Int, false).is_err());

        let unknown = vec!["FUNDAY=1".to_string()];
        assert!(build_map::<Weekday>(&unknown, ValueType::Int, false).is_err());

        let malformed = vec!["MONDAY".to_string()];
        assert!(build_map::<Weekday>(&malformed, ValueType::Int, false).is_err());

        let infinite = vec!["MARS=inf".to_string()];
        assert!(build_map::<Planet>(&infinite, ValueType::Float, false).is_err());
        let nan = vec!["MARS=NaN".to_string()];
        assert!(build_map::<Planet>(&nan, ValueType::Any, true).is_err());
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare::<Weekday>("WEDNESDAY", "SUNDAY").unwrap(), -4);
        assert_eq!(compare::<Planet>("EARTH", "EARTH").unwrap(), 0);
        assert!(compare::<Planet>("EARTH", "PLUTO").is_err());
    }

    #[test]
    fn test_planet_payload() {
        let earth = Planet::EARTH();
        assert!((earth.surface_gravity() - 9.80).abs() < 0.01);
        assert!(Planet::JUPITER().mass() > Planet::SATURN().mass());
    }

    #[test]
    fn test_check_file_round_trip() {
        let dir = create_temp_dir("check");
        let entries = vec!["MARS=0.5".to_string(), "VENUS=null".to_string()];
        let map = build_map::<Planet>(&entries, ValueType::Float, true).unwrap();
        let path = dir.join("planets.json");
        fs::write(&path, serde_json::to_string(&map).unwrap()).unwrap();

        assert_eq!(check_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_check_file_rejects_unknown_key_type() {
        let dir = create_temp_dir("unknown");
        let path = dir.join("map.json");
        fs::write(
            &path,
            r#"{"key_type":"Color","value_type":"any","allow_null_values":true,"values":{}}"#,
        )
        .unwrap();
        assert!(check_file(&path).is_err());
    }
}
