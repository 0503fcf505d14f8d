use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use pocketledger_core::stocks::{
    merge_position, NewStockLot, StockLot, StockRepositoryTrait, StockSaveResult, TradeType,
};
use pocketledger_core::Result;

use super::model::StockDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::stocks;
use crate::utils::decimal_text;

pub struct StockRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StockRepositoryTrait for StockRepository {
    fn list(&self, user_id: &str) -> Result<Vec<StockLot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = stocks::table
            .filter(stocks::user_id.eq(user_id))
            .order((stocks::created_at.desc(), stocks::id.desc()))
            .select(StockDB::as_select())
            .load::<StockDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| StockLot::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_by_id(&self, user_id: &str, stock_id: &str) -> Result<Option<StockLot>> {
        let mut conn = get_connection(&self.pool)?;
        let row = stocks::table
            .filter(stocks::id.eq(stock_id))
            .filter(stocks::user_id.eq(user_id))
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(StockLot::try_from).transpose()?)
    }

    async fn create_or_merge(&self, new_lot: NewStockLot) -> Result<StockSaveResult> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<StockSaveResult> {
                let now = Utc::now().naive_utc();

                let existing = if new_lot.trade_type == TradeType::Buy {
                    stocks::table
                        .filter(stocks::user_id.eq(&new_lot.user_id))
                        .filter(stocks::symbol.eq(&new_lot.symbol))
                        .filter(stocks::trade_type.eq(TradeType::Buy.as_str()))
                        .order(stocks::created_at.asc())
                        .select(StockDB::as_select())
                        .first::<StockDB>(conn)
                        .optional()
                        .map_err(StorageError::from)?
                } else {
                    None
                };

                if let Some(existing) = existing {
                    let current = StockLot::try_from(existing)?;
                    let merged = merge_position(
                        current.quantity,
                        current.buy_price,
                        new_lot.quantity,
                        new_lot.buy_price,
                    )?;
                    debug!(
                        "Merging {} x {} into lot {}",
                        new_lot.quantity, new_lot.symbol, current.id
                    );
                    let row = diesel::update(stocks::table.find(&current.id))
                        .set((
                            stocks::quantity.eq(decimal_text(merged.quantity)),
                            stocks::buy_price.eq(decimal_text(merged.average_price)),
                            stocks::total_value.eq(decimal_text(merged.total_value)),
                            stocks::updated_at.eq(now),
                        ))
                        .returning(StockDB::as_returning())
                        .get_result::<StockDB>(conn)
                        .map_err(StorageError::from)?;
                    return Ok(StockSaveResult {
                        stock: StockLot::try_from(row)?,
                        averaged: true,
                    });
                }

                let row = StockDB::from_new(Uuid::new_v4().to_string(), new_lot, now);
                let row = diesel::insert_into(stocks::table)
                    .values(&row)
                    .returning(StockDB::as_returning())
                    .get_result::<StockDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(StockSaveResult {
                    stock: StockLot::try_from(row)?,
                    averaged: false,
                })
            })
            .await
    }

    async fn update(&self, stock_id: &str, lot: NewStockLot) -> Result<Option<StockLot>> {
        let stock_id = stock_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<StockLot>> {
                let row = StockDB::from_new(stock_id.clone(), lot, Utc::now().naive_utc());
                let updated = diesel::update(
                    stocks::table
                        .filter(stocks::id.eq(&stock_id))
                        .filter(stocks::user_id.eq(&row.user_id)),
                )
                .set((
                    stocks::symbol.eq(&row.symbol),
                    stocks::name.eq(&row.name),
                    stocks::quantity.eq(&row.quantity),
                    stocks::buy_price.eq(&row.buy_price),
                    stocks::sell_price.eq(&row.sell_price),
                    stocks::broker.eq(&row.broker),
                    stocks::trade_type.eq(&row.trade_type),
                    stocks::trade_date.eq(row.trade_date),
                    stocks::total_value.eq(&row.total_value),
                    stocks::updated_at.eq(row.updated_at),
                ))
                .returning(StockDB::as_returning())
                .get_result::<StockDB>(conn)
                .optional()
                .map_err(StorageError::from)?;
                Ok(updated.map(StockLot::try_from).transpose()?)
            })
            .await
    }

    async fn delete(&self, user_id: &str, stock_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let stock_id = stock_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    stocks::table
                        .filter(stocks::id.eq(stock_id))
                        .filter(stocks::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    async fn update_current_prices(
        &self,
        user_id: &str,
        prices: Vec<(String, Decimal)>,
    ) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let now = Utc::now().naive_utc();
                let mut updated = 0;
                for (stock_id, price) in prices {
                    updated += diesel::update(
                        stocks::table
                            .filter(stocks::id.eq(&stock_id))
                            .filter(stocks::user_id.eq(&user_id)),
                    )
                    .set((
                        stocks::current_price.eq(Some(decimal_text(price))),
                        stocks::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(updated)
            })
            .await
    }
}
