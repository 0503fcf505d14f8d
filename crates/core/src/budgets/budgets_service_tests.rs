#[cfg(test)]
mod tests {
    use crate::budgets::{
        Budget, BudgetInput, BudgetRepositoryTrait, BudgetSaveResult, BudgetService,
        BudgetServiceTrait, NewBudget,
    };
    use crate::categories::{CategoryGroup, CategoryRepositoryTrait};
    use crate::errors::{Error, Result};
    use crate::test_fixtures::{
        date, timestamp, transaction, MockCategoryRepository, MockTransactionRepository,
    };
    use crate::transactions::TransactionType::{Expense, Income};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockBudgetRepository {
        budgets: Arc<Mutex<Vec<Budget>>>,
        categories: MockCategoryRepository,
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn list_for_month(&self, user_id: &str, month: &str) -> Result<Vec<Budget>> {
            Ok(self
                .budgets
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.user_id == user_id && b.month == month)
                .cloned()
                .collect())
        }

        async fn upsert(&self, new_budget: NewBudget) -> Result<BudgetSaveResult> {
            let category = self
                .categories
                .get_by_id(&new_budget.user_id, &new_budget.category_id)?
                .ok_or_else(|| Error::NotFound("Category".to_string()))?;
            let mut budgets = self.budgets.lock().unwrap();
            if let Some(existing) = budgets.iter_mut().find(|b| {
                b.user_id == new_budget.user_id
                    && b.category_id == new_budget.category_id
                    && b.month == new_budget.month
            }) {
                existing.amount = new_budget.amount;
                return Ok(BudgetSaveResult {
                    budget: existing.clone(),
                    created: false,
                });
            }
            let budget = Budget {
                id: format!("budget-{}", budgets.len() + 1),
                user_id: new_budget.user_id,
                category_id: new_budget.category_id,
                category: category.name,
                amount: new_budget.amount,
                month: new_budget.month,
                created_at: timestamp(0),
                updated_at: timestamp(0),
            };
            budgets.push(budget.clone());
            Ok(BudgetSaveResult {
                budget,
                created: true,
            })
        }

        async fn delete(&self, user_id: &str, budget_id: &str) -> Result<usize> {
            let mut budgets = self.budgets.lock().unwrap();
            let before = budgets.len();
            budgets.retain(|b| !(b.user_id == user_id && b.id == budget_id));
            Ok(before - budgets.len())
        }
    }

    fn service() -> BudgetService {
        let categories = MockCategoryRepository::with(vec![
            ("cat-groceries", "user-1", CategoryGroup::Expense, "Groceries"),
            ("cat-rent", "user-1", CategoryGroup::Expense, "Rent"),
            ("cat-private", "user-2", CategoryGroup::Expense, "Groceries"),
        ]);
        let transactions = MockTransactionRepository::with(vec![
            transaction(Expense, "Groceries", dec!(120), date(2024, 3, 2)),
            transaction(Expense, "Groceries", dec!(30), date(2024, 3, 28)),
            transaction(Expense, "Groceries", dec!(999), date(2024, 4, 1)),
            transaction(Income, "Groceries", dec!(50), date(2024, 3, 5)),
        ]);
        let budgets = MockBudgetRepository {
            budgets: Arc::default(),
            categories: categories.clone(),
        };
        BudgetService::new(Arc::new(budgets), Arc::new(categories), Arc::new(transactions))
    }

    fn input(category: &str, amount: Decimal, month: &str) -> BudgetInput {
        BudgetInput {
            category: Some(category.to_string()),
            category_id: None,
            amount: Some(amount),
            month: Some(month.to_string()),
        }
    }

    #[tokio::test]
    async fn test_repeated_budget_updates_in_place() {
        let service = service();
        let first = service
            .save_budget("user-1", input("Groceries", dec!(500), "2024-03"))
            .await
            .unwrap();
        assert!(first.created);

        let second = service
            .save_budget("user-1", input("Groceries", dec!(400), "2024-03"))
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.budget.id, first.budget.id);
        assert_eq!(second.budget.amount, dec!(400));
    }

    #[tokio::test]
    async fn test_progress_counts_month_expenses_by_label() {
        let service = service();
        service
            .save_budget("user-1", input("Groceries", dec!(600), "2024-03"))
            .await
            .unwrap();
        service
            .save_budget("user-1", input("Rent", dec!(0.01), "2024-03"))
            .await
            .unwrap();

        let progress = service
            .list_budgets("user-1", Some("2024-03"), date(2024, 6, 1))
            .unwrap();
        let groceries = progress
            .iter()
            .find(|p| p.budget.category == "Groceries")
            .unwrap();
        assert_eq!(groceries.spent, dec!(150));
        assert_eq!(groceries.remaining, dec!(450));
        assert_eq!(groceries.percent_used, dec!(25));

        let rent = progress.iter().find(|p| p.budget.category == "Rent").unwrap();
        assert_eq!(rent.spent, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_list_defaults_to_current_month() {
        let service = service();
        service
            .save_budget("user-1", input("Groceries", dec!(100), "2024-04"))
            .await
            .unwrap();
        let progress = service.list_budgets("user-1", None, date(2024, 4, 15)).unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent, dec!(999));
        assert!(progress[0].remaining.is_sign_negative());
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let service = service();
        let result = service
            .save_budget("user-1", input("Holidays", dec!(100), "2024-03"))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let by_foreign_id = BudgetInput {
            category_id: Some("cat-private".to_string()),
            ..input("", dec!(100), "2024-03")
        };
        assert!(matches!(
            service.save_budget("user-1", by_foreign_id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_month_and_delete() {
        let service = service();
        assert!(matches!(
            service.list_budgets("user-1", Some("2024-3"), date(2024, 3, 1)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.delete_budget("user-1", "budget-9").await,
            Err(Error::NotFound(_))
        ));
    }
}
