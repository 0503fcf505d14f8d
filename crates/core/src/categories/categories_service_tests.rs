#[cfg(test)]
mod tests {
    use crate::categories::{CategoryGroup, CategoryInput, CategoryService, CategoryServiceTrait};
    use crate::errors::Error;
    use crate::test_fixtures::MockCategoryRepository;
    use std::sync::Arc;

    fn service() -> (CategoryService, MockCategoryRepository) {
        let repository = MockCategoryRepository::default();
        (CategoryService::new(Arc::new(repository.clone())), repository)
    }

    fn input(group: &str, name: &str) -> CategoryInput {
        CategoryInput {
            category_group: Some(group.to_string()),
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_group() {
        let (service, _) = service();
        let category = service
            .create_category("user-1", input("investment", "Bullion"))
            .await
            .unwrap();
        assert_eq!(category.category_group, CategoryGroup::Investment);
        assert!(!category.is_default);
    }

    #[tokio::test]
    async fn test_list_filters_by_group_and_user() {
        let (service, _) = service();
        service
            .create_category("user-1", input("Income", "Bonus"))
            .await
            .unwrap();
        service
            .create_category("user-1", input("Expense", "Pets"))
            .await
            .unwrap();
        service
            .create_category("user-2", input("Income", "Gifts"))
            .await
            .unwrap();

        let income = service.list_categories("user-1", Some("income")).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Bonus");

        let all = service.list_categories("user-1", None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_group() {
        let (service, _) = service();
        let result = service.list_categories("user-1", Some("savings"));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_rename_other_users_category_is_not_found() {
        let (service, _) = service();
        let category = service
            .create_category("user-1", input("Expense", "Pets"))
            .await
            .unwrap();

        let result = service
            .rename_category("user-2", &category.id, input("Expense", "Animals"))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let renamed = service
            .rename_category("user-1", &category.id, input("Expense", "Animals"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Animals");
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let (service, repository) = service();
        let category = service
            .create_category("user-1", input("Expense", "Pets"))
            .await
            .unwrap();

        assert!(matches!(
            service.delete_category("user-2", &category.id).await,
            Err(Error::NotFound(_))
        ));
        service.delete_category("user-1", &category.id).await.unwrap();
        assert!(repository.categories.lock().unwrap().is_empty());
    }
}
