use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::transactions_model::{
    NewTransaction, Pagination, Transaction, TransactionInput, TransactionPage, TransactionQuery,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};

/// Service for managing a user's transactions
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    /// Validates the payload and checks that a referenced category belongs
    /// to the same user. An empty label is filled from that category.
    fn prepare(&self, user_id: &str, input: &TransactionInput) -> Result<NewTransaction> {
        let mut new_transaction = input.validate(user_id)?;

        if let Some(category_id) = new_transaction.category_id.as_deref() {
            match self.category_repository.get_by_id(user_id, category_id)? {
                Some(category) => {
                    if new_transaction.category.is_empty() {
                        new_transaction.category = category.name;
                    }
                }
                None => return Err(Error::invalid_field("categoryId", "Category not found")),
            }
        }
        Ok(new_transaction)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn list_transactions(&self, user_id: &str, query: TransactionQuery) -> Result<TransactionPage> {
        let (transactions, total) = self.repository.search(user_id, &query)?;
        Ok(TransactionPage {
            transactions,
            pagination: Pagination::new(total, query.page, query.limit),
        })
    }

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.repository
            .get_by_id(user_id, transaction_id)?
            .ok_or_else(|| Error::NotFound("Transaction".to_string()))
    }

    async fn create_transaction(
        &self,
        user_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction> {
        let new_transaction = self.prepare(user_id, &input)?;
        debug!(
            "Creating {} transaction of {} for user {}",
            new_transaction.transaction_type, new_transaction.amount, user_id
        );
        self.repository.insert(new_transaction).await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction> {
        let transaction = self.prepare(user_id, &input)?;
        self.repository
            .update(transaction_id, transaction)
            .await?
            .ok_or_else(|| Error::NotFound("Transaction".to_string()))
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, transaction_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Transaction".to_string()));
        }
        Ok(())
    }
}
