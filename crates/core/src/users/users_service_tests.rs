#[cfg(test)]
mod tests {
    use crate::categories::NewCategory;
    use crate::errors::{Error, Result};
    use crate::users::{
        NewUser, User, UserCredentials, UserRepositoryTrait, UserService, UserServiceTrait,
        UserUpdate,
    };
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockUserRepository {
        users: Arc<Mutex<Vec<UserCredentials>>>,
        seeded: Arc<Mutex<Vec<NewCategory>>>,
    }

    fn timestamp() -> NaiveDateTime {
        chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc()
    }

    #[async_trait]
    impl UserRepositoryTrait for MockUserRepository {
        fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.user.id == user_id)
                .map(|c| c.user.clone()))
        }

        fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            Ok(self
                .get_credentials_by_email(email)?
                .map(|credentials| credentials.user))
        }

        fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.user.email == email)
                .cloned())
        }

        async fn create_with_default_categories(&self, new_user: NewUser) -> Result<User> {
            let mut users = self.users.lock().unwrap();
            let user = User {
                id: format!("user-{}", users.len() + 1),
                email: new_user.email,
                full_name: new_user.full_name,
                created_at: timestamp(),
                updated_at: timestamp(),
            };
            self.seeded
                .lock()
                .unwrap()
                .extend(NewCategory::defaults_for(&user.id));
            users.push(UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash,
            });
            Ok(user)
        }

        async fn update(&self, user_id: &str, update: UserUpdate) -> Result<Option<User>> {
            let mut users = self.users.lock().unwrap();
            Ok(users
                .iter_mut()
                .find(|c| c.user.id == user_id)
                .map(|c| {
                    if let Some(full_name) = update.full_name {
                        c.user.full_name = full_name;
                    }
                    if let Some(email) = update.email {
                        c.user.email = email;
                    }
                    c.user.clone()
                }))
        }

        async fn delete_cascade(&self, user_id: &str) -> Result<usize> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|c| c.user.id != user_id);
            self.seeded.lock().unwrap().retain(|c| c.user_id != user_id);
            Ok(before - users.len())
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: "Ana Silva".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    fn service() -> (UserService, MockUserRepository) {
        let repository = MockUserRepository::default();
        (UserService::new(Arc::new(repository.clone())), repository)
    }

    fn violated_fields(err: Error) -> Vec<String> {
        match err {
            Error::Validation(v) => v.violations().into_iter().map(|v| v.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_seeds_categories() {
        let (service, repository) = service();
        let user = service.register(new_user(" Ana@Example.com ")).await.unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert_eq!(repository.seeded.lock().unwrap().len(), 18);
        assert!(service.get_credentials("ANA@example.com").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (service, _) = service();
        service.register(new_user("ana@example.com")).await.unwrap();

        let err = service
            .register(new_user("ana@example.com"))
            .await
            .unwrap_err();
        assert_eq!(violated_fields(err), vec!["email"]);
    }

    #[tokio::test]
    async fn test_register_lists_every_invalid_field() {
        let (service, _) = service();
        let err = service
            .register(NewUser {
                email: "not-an-email".to_string(),
                full_name: " ".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(violated_fields(err), vec!["email", "fullName"]);
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let (service, _) = service();
        let ana = service.register(new_user("ana@example.com")).await.unwrap();
        service.register(new_user("bo@example.com")).await.unwrap();

        let err = service
            .update_profile(
                &ana.id,
                UserUpdate {
                    full_name: None,
                    email: Some("bo@example.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(violated_fields(err), vec!["email"]);

        // Keeping one's own email is not a conflict
        let updated = service
            .update_profile(
                &ana.id,
                UserUpdate {
                    full_name: Some("Ana Maria".to_string()),
                    email: Some("ANA@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Ana Maria");
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (service, repository) = service();
        let user = service.register(new_user("ana@example.com")).await.unwrap();

        service.delete_account(&user.id).await.unwrap();
        assert!(repository.seeded.lock().unwrap().is_empty());
        assert!(matches!(service.get_user(&user.id), Err(Error::NotFound(_))));
        assert!(matches!(
            service.delete_account(&user.id).await,
            Err(Error::NotFound(_))
        ));
    }
}
