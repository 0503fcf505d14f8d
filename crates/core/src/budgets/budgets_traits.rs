use async_trait::async_trait;
use chrono::NaiveDate;

use super::budgets_model::{Budget, BudgetInput, BudgetProgress, BudgetSaveResult, NewBudget};
use crate::errors::Result;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Budgets of one month, ordered by category name.
    fn list_for_month(&self, user_id: &str, month: &str) -> Result<Vec<Budget>>;

    /// Inserts, or updates the amount of the existing (category, month) budget,
    /// in one write.
    async fn upsert(&self, new_budget: NewBudget) -> Result<BudgetSaveResult>;

    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<usize>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    /// Budgets with progress for `month` (`YYYY-MM`), or for the month of `today`.
    fn list_budgets(
        &self,
        user_id: &str,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<BudgetProgress>>;
    async fn save_budget(&self, user_id: &str, input: BudgetInput) -> Result<BudgetSaveResult>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()>;
}
