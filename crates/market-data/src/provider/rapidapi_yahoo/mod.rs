//! Yahoo Finance quotes served through RapidAPI.
//!
//! One batched GET per refresh:
//! `https://{host}/api/v1/markets/stock/quotes?ticker=RELIANCE.NS,TCS.NS`
//! authenticated with the `x-rapidapi-key` / `x-rapidapi-host` headers.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

use models::{ErrorResponse, QuotesResponse};

pub const DEFAULT_HOST: &str = "yahoo-finance15.p.rapidapi.com";
const QUOTES_PATH: &str = "/api/v1/markets/stock/quotes";
const PROVIDER_ID: &str = "RAPIDAPI_YAHOO";

/// RapidAPI-hosted Yahoo Finance provider.
pub struct RapidApiYahooProvider {
    client: Client,
    api_key: String,
    host: String,
}

impl RapidApiYahooProvider {
    /// Create a provider for the given RapidAPI key and host.
    pub fn new(api_key: String, host: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            host,
        }
    }

    fn quotes_url(&self) -> String {
        format!("https://{}{}", self.host, QUOTES_PATH)
    }

    async fn fetch(&self, tickers: &str) -> Result<String, MarketDataError> {
        debug!("RapidAPI quotes request for tickers: {}", tickers);

        let response = self
            .client
            .get(self.quotes_url())
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(&[("ticker", tickers)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(message) = error_resp.message {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }
}

/// Parse a quotes payload. Entries without a usable price are skipped.
pub fn parse_quotes(body: &str) -> Result<Vec<Quote>, MarketDataError> {
    let response: QuotesResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse quotes response: {}", e),
        })?;

    let mut quotes = Vec::with_capacity(response.body.len());
    for item in response.body {
        let Some(raw) = item.regular_market_price else {
            warn!("No market price for {} in RapidAPI response", item.symbol);
            continue;
        };
        let Ok(price) = Decimal::try_from(raw) else {
            warn!("Invalid market price {} for {}", raw, item.symbol);
            continue;
        };
        let mut quote = Quote::new(item.symbol, price, PROVIDER_ID);
        quote.currency = item.currency;
        quotes.push(quote);
    }
    Ok(quotes)
}

#[async_trait]
impl MarketDataProvider for RapidApiYahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.fetch(&symbols.join(",")).await?;
        let quotes = parse_quotes(&body)?;
        debug!(
            "RapidAPI returned {} quotes for {} symbols",
            quotes.len(),
            symbols.len()
        );
        Ok(quotes)
    }
}
