//! In-memory repositories and record builders shared by the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::categories::{Category, CategoryGroup, CategoryRepositoryTrait, NewCategory};
use crate::errors::Result;
use crate::stocks::{
    merge_position, NewStockLot, StockLot, StockRepositoryTrait, StockSaveResult, TradeType,
};
use crate::transactions::{
    NewTransaction, SortOrder, Transaction, TransactionQuery, TransactionRepositoryTrait,
    TransactionStatus, TransactionType,
};

pub fn timestamp(offset_secs: i64) -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_700_000_000 + offset_secs, 0)
        .unwrap()
        .naive_utc()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn transaction(
    transaction_type: TransactionType,
    category: &str,
    amount: Decimal,
    on: NaiveDate,
) -> Transaction {
    Transaction {
        id: format!("tx-{}-{}-{}", category, on, amount),
        user_id: "user-1".to_string(),
        category_id: None,
        category: category.to_string(),
        sub_category: None,
        transaction_type,
        amount,
        date: on,
        notes: None,
        status: None,
        created_at: timestamp(0),
        updated_at: timestamp(0),
    }
}

pub fn terminated(mut transaction: Transaction) -> Transaction {
    transaction.status = Some(TransactionStatus::Terminated);
    transaction
}

pub fn stock_lot(
    symbol: &str,
    trade_type: TradeType,
    quantity: Decimal,
    price: Decimal,
    trade_date: Option<NaiveDate>,
) -> StockLot {
    StockLot {
        id: format!("lot-{}-{}-{}", symbol, trade_type, quantity),
        user_id: "user-1".to_string(),
        symbol: symbol.to_string(),
        name: None,
        quantity,
        buy_price: price,
        sell_price: None,
        current_price: None,
        broker: None,
        trade_type,
        trade_date,
        total_value: quantity * price,
        created_at: timestamp(0),
        updated_at: timestamp(0),
    }
}

#[derive(Clone, Default)]
pub struct MockCategoryRepository {
    pub categories: Arc<Mutex<Vec<Category>>>,
}

impl MockCategoryRepository {
    pub fn with(categories: Vec<(&str, &str, CategoryGroup, &str)>) -> Self {
        let repository = Self::default();
        repository.categories.lock().unwrap().extend(
            categories
                .into_iter()
                .map(|(id, user_id, category_group, name)| Category {
                    id: id.to_string(),
                    user_id: user_id.to_string(),
                    name: name.to_string(),
                    category_group,
                    is_default: true,
                    created_at: timestamp(0),
                    updated_at: timestamp(0),
                }),
        );
        repository
    }
}

#[async_trait]
impl CategoryRepositoryTrait for MockCategoryRepository {
    fn list(&self, user_id: &str, group: Option<CategoryGroup>) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| group.map_or(true, |g| c.category_group == g))
            .cloned()
            .collect())
    }

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.id == category_id)
            .cloned())
    }

    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.name == name)
            .cloned())
    }

    async fn insert(&self, new_category: NewCategory) -> Result<Category> {
        let mut categories = self.categories.lock().unwrap();
        let category = Category {
            id: format!("cat-{}", categories.len() + 1),
            user_id: new_category.user_id,
            name: new_category.name,
            category_group: new_category.category_group,
            is_default: new_category.is_default,
            created_at: timestamp(0),
            updated_at: timestamp(0),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn rename(
        &self,
        user_id: &str,
        category_id: &str,
        name: String,
    ) -> Result<Option<Category>> {
        let mut categories = self.categories.lock().unwrap();
        Ok(categories
            .iter_mut()
            .find(|c| c.user_id == user_id && c.id == category_id)
            .map(|c| {
                c.name = name;
                c.clone()
            }))
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.user_id == user_id && c.id == category_id));
        Ok(before - categories.len())
    }
}

#[derive(Clone, Default)]
pub struct MockTransactionRepository {
    pub transactions: Arc<Mutex<Vec<Transaction>>>,
    pub earliest_calls: Arc<Mutex<usize>>,
}

impl MockTransactionRepository {
    pub fn with(transactions: Vec<Transaction>) -> Self {
        let repository = Self::default();
        *repository.transactions.lock().unwrap() = transactions;
        repository
    }
}

#[async_trait]
impl TransactionRepositoryTrait for MockTransactionRepository {
    fn search(&self, user_id: &str, query: &TransactionQuery) -> Result<(Vec<Transaction>, i64)> {
        let mut matches: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| {
                query
                    .filter
                    .transaction_type
                    .map_or(true, |kind| t.transaction_type == kind)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.date.cmp(&b.date));
        if query.order == SortOrder::Desc {
            matches.reverse();
        }
        let total = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    fn list_between(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| start.map_or(true, |s| t.date >= s) && end.map_or(true, |e| t.date <= e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }

    fn earliest_date(&self, user_id: &str) -> Result<Option<NaiveDate>> {
        *self.earliest_calls.lock().unwrap() += 1;
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.date)
            .min())
    }

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.user_id == user_id && t.id == transaction_id)
            .cloned())
    }

    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let transaction = Transaction {
            id: format!("tx-{}", transactions.len() + 1),
            user_id: new_transaction.user_id,
            category_id: new_transaction.category_id,
            category: new_transaction.category,
            sub_category: new_transaction.sub_category,
            transaction_type: new_transaction.transaction_type,
            amount: new_transaction.amount,
            date: new_transaction.date,
            notes: new_transaction.notes,
            status: new_transaction.status,
            created_at: timestamp(0),
            updated_at: timestamp(0),
        };
        transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn update(
        &self,
        transaction_id: &str,
        changes: NewTransaction,
    ) -> Result<Option<Transaction>> {
        let mut transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .iter_mut()
            .find(|t| t.id == transaction_id && t.user_id == changes.user_id)
            .map(|t| {
                t.category_id = changes.category_id;
                t.category = changes.category;
                t.sub_category = changes.sub_category;
                t.transaction_type = changes.transaction_type;
                t.amount = changes.amount;
                t.date = changes.date;
                t.notes = changes.notes;
                t.status = changes.status;
                t.clone()
            }))
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let mut transactions = self.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|t| !(t.user_id == user_id && t.id == transaction_id));
        Ok(before - transactions.len())
    }
}

#[derive(Clone, Default)]
pub struct MockStockRepository {
    pub lots: Arc<Mutex<Vec<StockLot>>>,
}

impl MockStockRepository {
    pub fn with(lots: Vec<StockLot>) -> Self {
        let repository = Self::default();
        *repository.lots.lock().unwrap() = lots;
        repository
    }

    fn build(id: String, lot: NewStockLot) -> StockLot {
        StockLot {
            id,
            user_id: lot.user_id,
            symbol: lot.symbol,
            name: lot.name,
            quantity: lot.quantity,
            buy_price: lot.buy_price,
            sell_price: lot.sell_price,
            current_price: None,
            broker: lot.broker,
            trade_type: lot.trade_type,
            trade_date: lot.trade_date,
            total_value: lot.total_value,
            created_at: timestamp(0),
            updated_at: timestamp(0),
        }
    }
}

#[async_trait]
impl StockRepositoryTrait for MockStockRepository {
    fn list(&self, user_id: &str) -> Result<Vec<StockLot>> {
        Ok(self
            .lots
            .lock()
            .unwrap()
            .iter()
            .filter(|lot| lot.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, user_id: &str, stock_id: &str) -> Result<Option<StockLot>> {
        Ok(self
            .lots
            .lock()
            .unwrap()
            .iter()
            .find(|lot| lot.user_id == user_id && lot.id == stock_id)
            .cloned())
    }

    async fn create_or_merge(&self, new_lot: NewStockLot) -> Result<StockSaveResult> {
        let mut lots = self.lots.lock().unwrap();
        if new_lot.trade_type == TradeType::Buy {
            if let Some(existing) = lots.iter_mut().find(|lot| {
                lot.user_id == new_lot.user_id
                    && lot.symbol == new_lot.symbol
                    && lot.trade_type == TradeType::Buy
            }) {
                let merged = merge_position(
                    existing.quantity,
                    existing.buy_price,
                    new_lot.quantity,
                    new_lot.buy_price,
                )?;
                existing.quantity = merged.quantity;
                existing.buy_price = merged.average_price;
                existing.total_value = merged.total_value;
                return Ok(StockSaveResult {
                    stock: existing.clone(),
                    averaged: true,
                });
            }
        }
        let stock = Self::build(format!("lot-{}", lots.len() + 1), new_lot);
        lots.push(stock.clone());
        Ok(StockSaveResult {
            stock,
            averaged: false,
        })
    }

    async fn update(&self, stock_id: &str, lot: NewStockLot) -> Result<Option<StockLot>> {
        let mut lots = self.lots.lock().unwrap();
        Ok(lots
            .iter_mut()
            .find(|existing| existing.id == stock_id && existing.user_id == lot.user_id)
            .map(|existing| {
                let current_price = existing.current_price;
                *existing = Self::build(stock_id.to_string(), lot);
                existing.current_price = current_price;
                existing.clone()
            }))
    }

    async fn delete(&self, user_id: &str, stock_id: &str) -> Result<usize> {
        let mut lots = self.lots.lock().unwrap();
        let before = lots.len();
        lots.retain(|lot| !(lot.user_id == user_id && lot.id == stock_id));
        Ok(before - lots.len())
    }

    async fn update_current_prices(
        &self,
        user_id: &str,
        prices: Vec<(String, Decimal)>,
    ) -> Result<usize> {
        let mut lots = self.lots.lock().unwrap();
        let mut updated = 0;
        for (id, price) in prices {
            if let Some(lot) = lots
                .iter_mut()
                .find(|lot| lot.user_id == user_id && lot.id == id)
            {
                lot.current_price = Some(price);
                updated += 1;
            }
        }
        Ok(updated)
    }
}
