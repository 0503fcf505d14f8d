//! Database models for stock lots.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketledger_core::stocks::{NewStockLot, StockLot, TradeType};

use crate::errors::StorageError;
use crate::utils::{decimal_text, parse_decimal, parse_enum, parse_optional_decimal};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDB {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: String,
    pub buy_price: String,
    pub sell_price: Option<String>,
    pub current_price: Option<String>,
    pub broker: Option<String>,
    pub trade_type: String,
    pub trade_date: Option<NaiveDate>,
    pub total_value: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StockDB {
    pub fn from_new(id: String, lot: NewStockLot, now: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: lot.user_id,
            symbol: lot.symbol,
            name: lot.name,
            quantity: decimal_text(lot.quantity),
            buy_price: decimal_text(lot.buy_price),
            sell_price: lot.sell_price.map(decimal_text),
            current_price: None,
            broker: lot.broker,
            trade_type: lot.trade_type.as_str().to_string(),
            trade_date: lot.trade_date,
            total_value: decimal_text(lot.total_value),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<StockDB> for StockLot {
    type Error = StorageError;

    fn try_from(db: StockDB) -> Result<Self, Self::Error> {
        Ok(Self {
            quantity: parse_decimal("quantity", &db.quantity)?,
            buy_price: parse_decimal("buy_price", &db.buy_price)?,
            sell_price: parse_optional_decimal("sell_price", db.sell_price.as_deref())?,
            current_price: parse_optional_decimal("current_price", db.current_price.as_deref())?,
            trade_type: parse_enum::<TradeType>("trade_type", &db.trade_type)?,
            total_value: parse_decimal("total_value", &db.total_value)?,
            id: db.id,
            user_id: db.user_id,
            symbol: db.symbol,
            name: db.name,
            broker: db.broker,
            trade_date: db.trade_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
