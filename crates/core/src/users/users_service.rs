use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::users_model::{
    check_email, check_full_name, normalize_email, NewUser, User, UserCredentials, UserUpdate,
};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, FieldErrors, Result};

/// Service for registration and profile management
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn email_taken_by_other(&self, email: &str, user_id: Option<&str>) -> Result<bool> {
        Ok(self
            .repository
            .find_by_email(email)?
            .is_some_and(|existing| Some(existing.id.as_str()) != user_id))
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        let email = normalize_email(&new_user.email);
        let full_name = new_user.full_name.trim().to_string();

        let mut errors = FieldErrors::new();
        check_email(&email, &mut errors);
        check_full_name(&full_name, &mut errors);
        if errors.is_empty() && self.email_taken_by_other(&email, None)? {
            errors.add("email", "Email is already registered");
        }
        errors.into_result()?;

        let user = self
            .repository
            .create_with_default_categories(NewUser {
                email,
                full_name,
                password_hash: new_user.password_hash,
            })
            .await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository
            .get_by_id(user_id)?
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    fn get_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        self.repository
            .get_credentials_by_email(&normalize_email(email))
    }

    async fn update_profile(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let mut errors = FieldErrors::new();
        let full_name = update.full_name.as_deref().map(|n| n.trim().to_string());
        let email = update.email.as_deref().map(normalize_email);

        if let Some(full_name) = &full_name {
            check_full_name(full_name, &mut errors);
        }
        if let Some(email) = &email {
            check_email(email, &mut errors);
            if errors.is_empty() && self.email_taken_by_other(email, Some(user_id))? {
                errors.add("email", "Email is already in use");
            }
        }
        errors.into_result()?;

        debug!("Updating profile for user {}", user_id);
        self.repository
            .update(user_id, UserUpdate { full_name, email })
            .await?
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    async fn delete_account(&self, user_id: &str) -> Result<()> {
        let deleted = self.repository.delete_cascade(user_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("User".to_string()));
        }
        info!("Deleted user {} and all owned records", user_id);
        Ok(())
    }
}
