//! Stock lot and holding models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FieldErrors, Result, ValidationError};
use crate::utils::time_utils::parse_date;

const MAX_SYMBOL_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeType::Buy),
            "SELL" => Ok(TradeType::Sell),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown trade type '{}'",
                other
            )))),
        }
    }
}

/// One recorded trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockLot {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub sell_price: Option<Decimal>,
    /// Last price fetched from the market data provider
    pub current_price: Option<Decimal>,
    pub broker: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    #[serde(rename = "date")]
    pub trade_date: Option<NaiveDate>,
    pub total_value: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StockLot {
    /// Trade date, or the day the lot was recorded when none was given.
    pub fn effective_date(&self) -> NaiveDate {
        self.trade_date.unwrap_or_else(|| self.created_at.date())
    }

    /// Cash moved by the trade: positive for buys, negative for sells.
    /// Sells are valued at the sell price, falling back to the buy price.
    pub fn signed_flow(&self) -> Decimal {
        match self.trade_type {
            TradeType::Buy => self.quantity * self.buy_price,
            TradeType::Sell => -(self.quantity * self.sell_price.unwrap_or(self.buy_price)),
        }
    }
}

/// Validated lot ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockLot {
    pub user_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub sell_price: Option<Decimal>,
    pub broker: Option<String>,
    pub trade_type: TradeType,
    pub trade_date: Option<NaiveDate>,
    pub total_value: Decimal,
}

/// Request payload for recording or editing a lot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLotInput {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub buy_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
    pub broker: Option<String>,
    /// `BUY` or `SELL`, case-insensitive; defaults to `BUY`
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub date: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '&' | '_')
}

impl StockLotInput {
    pub fn validate(&self, user_id: &str) -> Result<NewStockLot> {
        let mut errors = FieldErrors::new();

        let symbol = non_blank(self.symbol.as_deref())
            .unwrap_or_default()
            .to_uppercase();
        if symbol.is_empty() {
            errors.add("symbol", "Symbol is required");
        } else if symbol.len() > MAX_SYMBOL_LENGTH || !symbol.chars().all(is_symbol_char) {
            errors.add("symbol", "Symbol contains invalid characters");
        }

        let quantity = match self.quantity {
            None => {
                errors.add("quantity", "Quantity is required");
                Decimal::ZERO
            }
            Some(q) if q <= Decimal::ZERO => {
                errors.add("quantity", "Quantity must be positive");
                q
            }
            Some(q) => {
                errors.check_magnitude("quantity", q);
                q
            }
        };

        let buy_price = match self.buy_price {
            None => {
                errors.add("buyPrice", "Buy price is required");
                Decimal::ZERO
            }
            Some(p) if p <= Decimal::ZERO => {
                errors.add("buyPrice", "Buy price must be positive");
                p
            }
            Some(p) => {
                errors.check_magnitude("buyPrice", p);
                p
            }
        };

        match self.sell_price {
            Some(p) if p < Decimal::ZERO => {
                errors.add("sellPrice", "Sell price cannot be negative")
            }
            Some(p) => errors.check_magnitude("sellPrice", p),
            None => {}
        }

        let trade_type = match non_blank(self.trade_type.as_deref()) {
            None => TradeType::Buy,
            Some(raw) => raw.parse::<TradeType>().unwrap_or_else(|_| {
                errors.add("type", "Type must be BUY or SELL");
                TradeType::Buy
            }),
        };

        let trade_date = match non_blank(self.date.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    errors.add("date", "Date must be formatted as YYYY-MM-DD");
                }
                parsed
            }
        };

        errors.into_result()?;
        Ok(NewStockLot {
            user_id: user_id.to_string(),
            symbol,
            name: non_blank(self.name.as_deref()),
            quantity,
            buy_price,
            sell_price: self.sell_price,
            broker: non_blank(self.broker.as_deref()),
            trade_type,
            trade_date,
            total_value: quantity * buy_price,
        })
    }
}

/// Combined position after adding a buy to an existing lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMerge {
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub total_value: Decimal,
}

/// Weighted-average merge:
/// `(q1 * p1 + q2 * p2) / (q1 + q2)`.
///
/// Fails with a `quantity` violation when the combined position overflows.
pub fn merge_position(
    existing_quantity: Decimal,
    existing_price: Decimal,
    added_quantity: Decimal,
    added_price: Decimal,
) -> Result<PositionMerge> {
    let too_large = || Error::invalid_field("quantity", "Combined position is too large");
    let quantity = existing_quantity
        .checked_add(added_quantity)
        .ok_or_else(too_large)?;
    let total_value = existing_quantity
        .checked_mul(existing_price)
        .zip(added_quantity.checked_mul(added_price))
        .and_then(|(existing, added)| existing.checked_add(added))
        .ok_or_else(too_large)?;
    let average_price = if quantity.is_zero() {
        Decimal::ZERO
    } else {
        total_value.checked_div(quantity).ok_or_else(too_large)?
    };
    Ok(PositionMerge {
        quantity,
        average_price,
        total_value,
    })
}

/// Outcome of recording a lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockSaveResult {
    pub stock: StockLot,
    /// True when the buy was folded into an existing position
    pub averaged: bool,
}

impl StockSaveResult {
    pub fn message(&self) -> Option<String> {
        self.averaged.then(|| {
            format!(
                "Stock averaged: {} shares at ₹{:.2} average price",
                self.stock.quantity.normalize(),
                self.stock.buy_price
            )
        })
    }
}

/// Position in one symbol, reconstructed by replaying its lots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub invested: Decimal,
    pub current_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub unrealized_gain: Option<Decimal>,
    pub lot_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshResult {
    pub message: String,
    pub stocks: Vec<StockLot>,
    pub prices_updated: usize,
}
