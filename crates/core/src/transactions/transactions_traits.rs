use async_trait::async_trait;
use chrono::NaiveDate;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionInput, TransactionPage, TransactionQuery,
};
use crate::errors::Result;

/// Trait for transaction repository operations. Every call is scoped to one user.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// One page of matching transactions plus the total number of matches.
    fn search(&self, user_id: &str, query: &TransactionQuery) -> Result<(Vec<Transaction>, i64)>;

    /// All transactions dated within the inclusive bounds, oldest first.
    fn list_between(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>>;

    fn earliest_date(&self, user_id: &str) -> Result<Option<NaiveDate>>;
    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>>;
    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update(
        &self,
        transaction_id: &str,
        transaction: NewTransaction,
    ) -> Result<Option<Transaction>>;
    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize>;
}

/// Trait for transaction service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn list_transactions(&self, user_id: &str, query: TransactionQuery) -> Result<TransactionPage>;
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    async fn create_transaction(
        &self,
        user_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()>;
}
