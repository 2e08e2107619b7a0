mod model;
mod repository;

pub use model::{InvestmentTransactionDB, SecurityDB};
pub use repository::InvestmentRepository;
