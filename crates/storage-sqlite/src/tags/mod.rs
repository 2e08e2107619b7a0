mod model;
mod repository;

pub use model::TagDB;
pub use repository::TagRepository;
