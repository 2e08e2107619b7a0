//! Tag domain models and repository contract.

mod tags_model;
mod tags_traits;

pub use tags_model::*;
pub use tags_traits::*;
