//! Decimal values are stored as TEXT to keep exact precision in SQLite.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Parses a stored decimal string, falling back through f64 for scientific
/// notation. Unparseable values degrade to zero rather than failing the row.
pub(crate) fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(_) => match f64::from_str(value_str) {
            Ok(f_val) => match Decimal::from_f64(f_val) {
                Some(dec_val) => dec_val,
                None => {
                    log::error!(
                        "Failed to convert {} '{}' (parsed as f64: {}) to Decimal.",
                        field_name,
                        value_str,
                        f_val
                    );
                    Decimal::ZERO
                }
            },
            Err(e) => {
                log::error!("Failed to parse {} '{}': {}", field_name, value_str, e);
                Decimal::ZERO
            }
        },
    }
}

pub(crate) fn parse_opt_decimal(value: Option<&str>, field_name: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal_tolerant(v, field_name))
}

pub(crate) fn decimal_to_text(value: &Decimal) -> String {
    value.to_string()
}

pub(crate) fn opt_decimal_to_text(value: Option<&Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}
