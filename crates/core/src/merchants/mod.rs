//! Merchant domain models and repository contract.

mod merchants_model;
mod merchants_traits;

pub use merchants_model::*;
pub use merchants_traits::*;
