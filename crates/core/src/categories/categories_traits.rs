use async_trait::async_trait;

use super::categories_model::{Category, CategoryGroup, CategoryInput, NewCategory};
use crate::errors::Result;

/// Trait for category repository operations. Every call is scoped to one user.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// Defaults first, then by name.
    fn list(&self, user_id: &str, group: Option<CategoryGroup>) -> Result<Vec<Category>>;
    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>>;
    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>>;
    async fn insert(&self, new_category: NewCategory) -> Result<Category>;
    async fn rename(
        &self,
        user_id: &str,
        category_id: &str,
        name: String,
    ) -> Result<Option<Category>>;
    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn list_categories(&self, user_id: &str, group: Option<&str>) -> Result<Vec<Category>>;
    async fn create_category(&self, user_id: &str, input: CategoryInput) -> Result<Category>;
    async fn rename_category(
        &self,
        user_id: &str,
        category_id: &str,
        input: CategoryInput,
    ) -> Result<Category>;
    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()>;
}
