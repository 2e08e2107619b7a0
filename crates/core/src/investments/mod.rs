//! Investment domain models and repository contract.

mod investments_model;
mod investments_traits;

pub use investments_model::*;
pub use investments_traits::*;
