//! Tag repository trait.

use async_trait::async_trait;

use super::tags_model::{NewTag, Tag};
use crate::errors::Result;

#[async_trait]
pub trait TagRepositoryTrait: Send + Sync {
    fn get_by_id(&self, tag_id: &str) -> Result<Option<Tag>>;

    fn list(&self) -> Result<Vec<Tag>>;

    async fn create(&self, tag: NewTag) -> Result<Tag>;
}
