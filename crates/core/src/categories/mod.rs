//! Category domain models and repository contract.

mod categories_model;
mod categories_traits;

pub use categories_model::*;
pub use categories_traits::*;
