use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use pocketledger_market_data::{
    qualify_symbol, strip_exchange_suffix, MarketDataError, MarketDataProvider,
};
use rust_decimal::Decimal;

use super::holdings_calculator::open_holdings;
use super::stocks_model::{Holding, PriceRefreshResult, StockLot, StockLotInput, StockSaveResult};
use super::stocks_traits::{StockRepositoryTrait, StockServiceTrait};
use crate::errors::{Error, Result};

/// Service for stock lots, holdings and price refresh
pub struct StockService {
    repository: Arc<dyn StockRepositoryTrait>,
    quote_provider: Option<Arc<dyn MarketDataProvider>>,
}

impl StockService {
    pub fn new(
        repository: Arc<dyn StockRepositoryTrait>,
        quote_provider: Option<Arc<dyn MarketDataProvider>>,
    ) -> Self {
        Self {
            repository,
            quote_provider,
        }
    }

    /// Matches fetched quotes to lots. Quotes are indexed under both the
    /// provider symbol and the bare ticker.
    fn match_prices(lots: &[StockLot], quotes: HashMap<String, Decimal>) -> Vec<(String, Decimal)> {
        let mut by_symbol = HashMap::with_capacity(quotes.len() * 2);
        for (symbol, price) in quotes {
            by_symbol.insert(strip_exchange_suffix(&symbol).to_string(), price);
            by_symbol.insert(symbol, price);
        }

        lots.iter()
            .filter_map(|lot| {
                by_symbol
                    .get(&lot.symbol)
                    .or_else(|| by_symbol.get(&*qualify_symbol(&lot.symbol)))
                    .map(|price| (lot.id.clone(), *price))
            })
            .collect()
    }
}

#[async_trait]
impl StockServiceTrait for StockService {
    fn list_stocks(&self, user_id: &str) -> Result<Vec<StockLot>> {
        self.repository.list(user_id)
    }

    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        let lots = self.repository.list(user_id)?;
        Ok(open_holdings(&lots))
    }

    async fn save_stock(&self, user_id: &str, input: StockLotInput) -> Result<StockSaveResult> {
        let new_lot = input.validate(user_id)?;
        debug!(
            "Recording {} {} x {} for user {}",
            new_lot.trade_type, new_lot.symbol, new_lot.quantity, user_id
        );
        let result = self.repository.create_or_merge(new_lot).await?;
        if result.averaged {
            info!(
                "Averaged {} into existing position {}",
                result.stock.symbol, result.stock.id
            );
        }
        Ok(result)
    }

    async fn update_stock(
        &self,
        user_id: &str,
        stock_id: &str,
        input: StockLotInput,
    ) -> Result<StockLot> {
        let lot = input.validate(user_id)?;
        self.repository
            .update(stock_id, lot)
            .await?
            .ok_or_else(|| Error::NotFound("Stock".to_string()))
    }

    async fn delete_stock(&self, user_id: &str, stock_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, stock_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Stock".to_string()));
        }
        Ok(())
    }

    async fn refresh_prices(&self, user_id: &str) -> Result<PriceRefreshResult> {
        let lots = self.repository.list(user_id)?;
        if lots.is_empty() {
            return Ok(PriceRefreshResult {
                message: "No stocks to update".to_string(),
                stocks: Vec::new(),
                prices_updated: 0,
            });
        }

        let provider = self.quote_provider.as_ref().ok_or_else(|| {
            Error::MarketData(MarketDataError::NotConfigured(
                "no quote provider API key".to_string(),
            ))
        })?;

        let symbols: Vec<String> = lots
            .iter()
            .map(|lot| qualify_symbol(&lot.symbol).into_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let quotes = provider.get_latest_quotes(&symbols).await?;
        debug!(
            "{} returned {} quotes for {} symbols",
            provider.id(),
            quotes.len(),
            symbols.len()
        );

        let prices = Self::match_prices(
            &lots,
            quotes.into_iter().map(|q| (q.symbol, q.price)).collect(),
        );
        let prices_updated = if prices.is_empty() {
            0
        } else {
            self.repository
                .update_current_prices(user_id, prices)
                .await?
        };
        info!("Refreshed {} stock prices for user {}", prices_updated, user_id);

        Ok(PriceRefreshResult {
            message: "Prices updated successfully".to_string(),
            stocks: self.repository.list(user_id)?,
            prices_updated,
        })
    }
}
