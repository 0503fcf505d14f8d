use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::budgets_model::{BudgetInput, BudgetProgress, BudgetSaveResult, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::utils::time_utils::{month_end, month_key, parse_month_key};

/// Service for monthly budgets and their spending progress
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            category_repository,
            transaction_repository,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(
        &self,
        user_id: &str,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<BudgetProgress>> {
        let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => raw.to_string(),
            None => month_key(today),
        };
        let start = parse_month_key(&month)
            .ok_or_else(|| Error::invalid_field("month", "Month must be formatted as YYYY-MM"))?;

        let budgets = self.repository.list_for_month(user_id, &month)?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }

        // Spending is matched on the category label of expense entries.
        let mut spent_by_category: HashMap<String, Decimal> = HashMap::new();
        for transaction in self
            .transaction_repository
            .list_between(user_id, Some(start), Some(month_end(start)))?
            .into_iter()
            .filter(|t| t.transaction_type == TransactionType::Expense)
        {
            *spent_by_category
                .entry(transaction.category)
                .or_insert(Decimal::ZERO) += transaction.amount;
        }

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let spent = spent_by_category
                    .get(&budget.category)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                BudgetProgress::new(budget, spent)
            })
            .collect())
    }

    async fn save_budget(&self, user_id: &str, input: BudgetInput) -> Result<BudgetSaveResult> {
        let checked = input.check()?;

        let category = match (&checked.category_id, &checked.category_name) {
            (Some(id), _) => self.category_repository.get_by_id(user_id, id)?,
            (None, Some(name)) => self.category_repository.find_by_name(user_id, name)?,
            (None, None) => None,
        }
        .ok_or_else(|| Error::NotFound("Category".to_string()))?;

        debug!(
            "Saving budget of {} for '{}' in {} (user {})",
            checked.amount, category.name, checked.month, user_id
        );
        self.repository
            .upsert(NewBudget {
                user_id: user_id.to_string(),
                category_id: category.id,
                amount: checked.amount,
                month: checked.month,
            })
            .await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, budget_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Budget".to_string()));
        }
        Ok(())
    }
}
