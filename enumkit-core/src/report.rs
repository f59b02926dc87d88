//! Output formatting - plaintext and JSON.

use serde::Serialize;
use serde_json::json;

use crate::variant::{Enumeration, Variant};

/// One row of a variant listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VariantReport {
    pub enumeration: String,
    pub ordinal: usize,
    pub name: String,
}

impl VariantReport {
    pub fn of<E: Enumeration>(variant: &Variant<E>) -> Self {
        Self {
            enumeration: E::NAME.to_string(),
            ordinal: variant.ordinal(),
            name: variant.name().to_string(),
        }
    }
}

/// Rows for every variant of `E`, in ordinal order.
pub fn variant_reports<E: Enumeration>() -> Vec<VariantReport> {
    E::values().iter().map(|v| VariantReport::of(*v)).collect()
}

/// Prints a variant listing in plain text format.
pub fn print_plain(reports: &[VariantReport]) {
    match reports.first() {
        None => println!("No variants declared."),
        Some(first) => {
            println!("{} ({} variants):", first.enumeration, reports.len());
            for r in reports {
                println!("{:>4}  {}", r.ordinal, r.name);
            }
        }
    }
}

/// Prints a variant listing in JSON format.
pub fn print_json(reports: &[VariantReport]) {
    print_json_value(&json!({ "variants": reports }));
}

/// Pretty-prints any serializable value.
///
/// Falls back to a one-line error object if serialization fails.
pub fn print_json_value<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", json!({ "error": e.to_string() }));
        }
    }
}
