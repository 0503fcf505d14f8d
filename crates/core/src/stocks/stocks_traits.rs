use async_trait::async_trait;
use rust_decimal::Decimal;

use super::stocks_model::{
    Holding, NewStockLot, PriceRefreshResult, StockLot, StockLotInput, StockSaveResult,
};
use crate::errors::Result;

/// Trait for stock lot repository operations
#[async_trait]
pub trait StockRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list(&self, user_id: &str) -> Result<Vec<StockLot>>;
    fn get_by_id(&self, user_id: &str, stock_id: &str) -> Result<Option<StockLot>>;

    /// Records the lot. A BUY for a symbol that already has a BUY lot is
    /// folded into that lot at the weighted average price instead.
    /// Lookup and write happen in the same write job.
    async fn create_or_merge(&self, new_lot: NewStockLot) -> Result<StockSaveResult>;

    async fn update(&self, stock_id: &str, lot: NewStockLot) -> Result<Option<StockLot>>;
    async fn delete(&self, user_id: &str, stock_id: &str) -> Result<usize>;

    /// Stores fetched market prices as `(lot id, price)` pairs.
    async fn update_current_prices(
        &self,
        user_id: &str,
        prices: Vec<(String, Decimal)>,
    ) -> Result<usize>;
}

/// Trait for stock service operations
#[async_trait]
pub trait StockServiceTrait: Send + Sync {
    fn list_stocks(&self, user_id: &str) -> Result<Vec<StockLot>>;
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;
    async fn save_stock(&self, user_id: &str, input: StockLotInput) -> Result<StockSaveResult>;
    async fn update_stock(
        &self,
        user_id: &str,
        stock_id: &str,
        input: StockLotInput,
    ) -> Result<StockLot>;
    async fn delete_stock(&self, user_id: &str, stock_id: &str) -> Result<()>;
    async fn refresh_prices(&self, user_id: &str) -> Result<PriceRefreshResult>;
}
