//! Transactions module - income, expense and investment entries.

mod transactions_model;
mod transactions_service;
mod transactions_traits;



pub use transactions_model::{
    NewTransaction, Pagination, SortOrder, Transaction, TransactionFilter, TransactionInput,
    TransactionListParams, TransactionPage, TransactionQuery, TransactionSortField,
    TransactionStatus, TransactionType,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
