use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use pocketledger_core::budgets::{Budget, BudgetRepositoryTrait, BudgetSaveResult, NewBudget};
use pocketledger_core::{Error, Result};

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{budgets, categories};
use crate::utils::decimal_text;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn list_for_month(&self, user_id: &str, month: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .inner_join(categories::table)
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::month.eq(month))
            .order(categories::name.asc())
            .select((BudgetDB::as_select(), categories::name))
            .load::<(BudgetDB, String)>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|(row, name)| row.into_budget(name).map_err(Into::into))
            .collect()
    }

    async fn upsert(&self, new_budget: NewBudget) -> Result<BudgetSaveResult> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetSaveResult> {
                let now = Utc::now().naive_utc();
                let category_name = categories::table
                    .filter(categories::id.eq(&new_budget.category_id))
                    .filter(categories::user_id.eq(&new_budget.user_id))
                    .select(categories::name)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound("Category".to_string()))?;

                let existing = budgets::table
                    .filter(budgets::user_id.eq(&new_budget.user_id))
                    .filter(budgets::category_id.eq(&new_budget.category_id))
                    .filter(budgets::month.eq(&new_budget.month))
                    .select(BudgetDB::as_select())
                    .first::<BudgetDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let (row, created) = match existing {
                    Some(existing) => {
                        let row = diesel::update(budgets::table.find(&existing.id))
                            .set((
                                budgets::amount.eq(decimal_text(new_budget.amount)),
                                budgets::updated_at.eq(now),
                            ))
                            .returning(BudgetDB::as_returning())
                            .get_result::<BudgetDB>(conn)
                            .map_err(StorageError::from)?;
                        (row, false)
                    }
                    None => {
                        let row = BudgetDB {
                            id: Uuid::new_v4().to_string(),
                            user_id: new_budget.user_id,
                            category_id: new_budget.category_id,
                            amount: decimal_text(new_budget.amount),
                            month: new_budget.month,
                            created_at: now,
                            updated_at: now,
                        };
                        let row = diesel::insert_into(budgets::table)
                            .values(&row)
                            .returning(BudgetDB::as_returning())
                            .get_result::<BudgetDB>(conn)
                            .map_err(StorageError::from)?;
                        (row, true)
                    }
                };

                Ok(BudgetSaveResult {
                    budget: row.into_budget(category_name)?,
                    created,
                })
            })
            .await
    }

    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    budgets::table
                        .filter(budgets::id.eq(budget_id))
                        .filter(budgets::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
