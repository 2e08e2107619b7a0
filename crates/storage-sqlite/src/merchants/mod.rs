mod model;
mod repository;

pub use model::MerchantDB;
pub use repository::MerchantRepository;
