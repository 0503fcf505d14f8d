//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use pocketledger_market_data::{MarketDataError, MarketDataProvider, Quote};
///
/// struct FixedPriceProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedPriceProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn get_latest_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, MarketDataError> {
///         Ok(symbols.iter().map(|s| Quote::new(s.clone(), 100.into(), "FIXED")).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for each of the given exchange-qualified symbols.
    ///
    /// Symbols the provider does not know are left out of the result rather
    /// than failing the whole batch. The quotes are returned in provider order.
    async fn get_latest_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, MarketDataError>;
}
