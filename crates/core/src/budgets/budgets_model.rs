//! Budget domain models.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::errors::{FieldErrors, Result};
use crate::utils::time_utils::parse_month_key;

/// Spending target for one category in one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    /// Name of the referenced category
    pub category: String,
    pub amount: Decimal,
    /// `YYYY-MM`
    pub month: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A budget with what has been spent against it so far
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
}

impl BudgetProgress {
    pub fn new(budget: Budget, spent: Decimal) -> Self {
        let remaining = budget.amount - spent;
        let percent_used = if budget.amount > Decimal::ZERO {
            (spent / budget.amount * Decimal::ONE_HUNDRED).round_dp_with_strategy(
                PERCENT_DECIMAL_PRECISION,
                RoundingStrategy::MidpointAwayFromZero,
            )
        } else {
            Decimal::ZERO
        };
        Self {
            budget,
            spent,
            remaining,
            percent_used,
        }
    }
}

/// Validated budget ready to be upserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub user_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub month: String,
}

/// Outcome of an upsert: the stored budget and whether it is new
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSaveResult {
    pub budget: Budget,
    pub created: bool,
}

/// Request payload for creating a budget. The category is referenced by
/// name, or by id when the client has it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub month: Option<String>,
}

/// Field-checked budget request with the category still unresolved
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckedBudgetInput {
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub amount: Decimal,
    pub month: String,
}

impl BudgetInput {
    pub(crate) fn check(&self) -> Result<CheckedBudgetInput> {
        let mut errors = FieldErrors::new();

        let category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let category_name = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if category_id.is_none() && category_name.is_none() {
            errors.add("category", "Category is required");
        }

        let amount = match self.amount {
            None => {
                errors.add("amount", "Amount is required");
                Decimal::ZERO
            }
            Some(amount) if amount <= Decimal::ZERO => {
                errors.add("amount", "Amount must be positive");
                amount
            }
            Some(amount) => {
                errors.check_magnitude("amount", amount);
                amount
            }
        };

        let month = self.month.as_deref().map(str::trim).unwrap_or_default();
        if month.is_empty() {
            errors.add("month", "Month is required");
        } else if parse_month_key(month).is_none() {
            errors.add("month", "Month must be formatted as YYYY-MM");
        }

        errors.into_result()?;
        Ok(CheckedBudgetInput {
            category_id,
            category_name,
            amount,
            month: month.to_string(),
        })
    }
}
