use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market price for one provider symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol exactly as the provider returned it (e.g. `RELIANCE.NS`)
    pub symbol: String,

    /// Last traded price
    pub price: Decimal,

    /// Quote currency, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// When the quote was received
    pub timestamp: DateTime<Utc>,

    /// Source of the quote (RAPIDAPI_YAHOO, ...)
    pub source: String,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal, source: &str) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            currency: None,
            timestamp: Utc::now(),
            source: source.to_string(),
        }
    }
}
