use async_trait::async_trait;

use super::users_model::{NewUser, User, UserCredentials, UserUpdate};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<Option<User>>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Inserts the user and its default categories
    /// ([`crate::categories::NewCategory::defaults_for`]) in one transaction.
    async fn create_with_default_categories(&self, new_user: NewUser) -> Result<User>;

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<Option<User>>;

    /// Removes the user and everything they own in one transaction.
    /// Returns the number of user rows deleted.
    async fn delete_cascade(&self, user_id: &str) -> Result<usize>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn get_credentials(&self, email: &str) -> Result<Option<UserCredentials>>;
    async fn update_profile(&self, user_id: &str, update: UserUpdate) -> Result<User>;
    async fn delete_account(&self, user_id: &str) -> Result<()>;
}
