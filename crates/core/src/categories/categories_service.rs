use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::categories_model::{validate_category_name, Category, CategoryGroup, CategoryInput};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, FieldErrors, Result};

/// Service for managing a user's categories
pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn list_categories(&self, user_id: &str, group: Option<&str>) -> Result<Vec<Category>> {
        let group = match group.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<CategoryGroup>()?),
        };
        self.repository.list(user_id, group)
    }

    async fn create_category(&self, user_id: &str, input: CategoryInput) -> Result<Category> {
        let new_category = input.validate(user_id)?;
        debug!(
            "Creating category '{}' in group {} for user {}",
            new_category.name, new_category.category_group, user_id
        );
        self.repository.insert(new_category).await
    }

    async fn rename_category(
        &self,
        user_id: &str,
        category_id: &str,
        input: CategoryInput,
    ) -> Result<Category> {
        let mut errors = FieldErrors::new();
        let name = validate_category_name(input.name.as_deref(), &mut errors);
        errors.into_result()?;

        self.repository
            .rename(user_id, category_id, name)
            .await?
            .ok_or_else(|| Error::NotFound("Category".to_string()))
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, category_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Category".to_string()));
        }
        Ok(())
    }
}
