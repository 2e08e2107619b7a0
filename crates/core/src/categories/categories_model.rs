//! Category domain models.
//!
//! Categories are user-facing spending buckets. Auto-created categories keep
//! a link to the provider's detailed classification code so the same code
//! always maps to the same local category.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Parent category for hierarchical grouping. Auto-created categories
    /// are flat; nesting is user-driven.
    pub parent_id: Option<String>,
    /// Provider detailed classification code this category was derived from,
    /// when auto-created. Unique.
    pub plaid_detailed_category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<String>,
    pub plaid_detailed_category: Option<String>,
}

/// Derives a human-readable category name from a provider detailed code.
///
/// The detailed code repeats the primary code as a prefix; the prefix is
/// stripped and the remainder title-cased, so
/// `FOOD_AND_DRINK_RESTAURANTS` under primary `FOOD_AND_DRINK` becomes
/// `Restaurants`. When the detailed code does not extend the primary, the
/// whole code is title-cased.
pub fn derive_category_name(primary: Option<&str>, detailed: &str) -> String {
    let remainder = match primary {
        Some(primary) if !primary.is_empty() => detailed
            .strip_prefix(primary)
            .map(|rest| rest.trim_start_matches('_'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(detailed),
        _ => detailed,
    };

    remainder
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_primary_prefix_and_title_cases() {
        assert_eq!(
            derive_category_name(Some("FOOD_AND_DRINK"), "FOOD_AND_DRINK_RESTAURANTS"),
            "Restaurants"
        );
        assert_eq!(
            derive_category_name(Some("TRANSPORTATION"), "TRANSPORTATION_PUBLIC_TRANSIT"),
            "Public Transit"
        );
    }

    #[test]
    fn falls_back_to_full_code_without_usable_prefix() {
        assert_eq!(
            derive_category_name(None, "GENERAL_MERCHANDISE"),
            "General Merchandise"
        );
        assert_eq!(
            derive_category_name(Some("LOAN_PAYMENTS"), "LOAN_PAYMENTS"),
            "Loan Payments"
        );
    }
}
