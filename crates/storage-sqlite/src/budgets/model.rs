//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::budgets::Budget;

use crate::errors::StorageError;
use crate::utils::parse_decimal;

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: String,
    pub month: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetDB {
    /// Combines the row with the name of its category.
    pub fn into_budget(self, category: String) -> Result<Budget, StorageError> {
        Ok(Budget {
            amount: parse_decimal("amount", &self.amount)?,
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            category,
            month: self.month,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
