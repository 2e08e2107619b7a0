//! Category repository trait.

use async_trait::async_trait;

use super::categories_model::{Category, NewCategory};
use crate::errors::Result;

#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// Looks a category up by the provider detailed code it was derived from.
    fn find_by_detailed_code(&self, detailed_code: &str) -> Result<Option<Category>>;

    fn get_by_id(&self, category_id: &str) -> Result<Option<Category>>;

    fn list(&self) -> Result<Vec<Category>>;

    async fn create(&self, category: NewCategory) -> Result<Category>;

    /// Returns the category mapped to `detailed_code`, creating it with the
    /// given display name on first sight. Racing creators of the same code
    /// resolve to one winner; everyone gets the winning row back.
    async fn find_or_create_for_code(&self, detailed_code: &str, name: &str) -> Result<Category>;
}
