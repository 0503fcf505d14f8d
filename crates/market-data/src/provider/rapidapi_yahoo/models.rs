//! Response structures for the RapidAPI Yahoo Finance quotes endpoint.

use serde::Deserialize;

/// Envelope returned by `/api/v1/markets/stock/quotes`
#[derive(Debug, Deserialize)]
pub(super) struct QuotesResponse {
    #[serde(default)]
    pub body: Vec<QuoteItem>,
}

/// One quote entry. The provider sends many more fields; only these are used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QuoteItem {
    pub symbol: String,
    pub regular_market_price: Option<f64>,
    pub currency: Option<String>,
}

/// Error envelope RapidAPI returns on gateway failures
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub message: Option<String>,
}
