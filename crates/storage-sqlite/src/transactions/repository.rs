use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::{min, sql};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Double};
use diesel::sqlite::{Sqlite, SqliteConnection};
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use pocketledger_core::transactions::{
    NewTransaction, SortOrder, Transaction, TransactionFilter, TransactionQuery,
    TransactionRepositoryTrait, TransactionSortField,
};
use pocketledger_core::Result;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;

// Amounts are TEXT; numeric comparison and ordering go through a cast.
const AMOUNT_AS_REAL: &str = "CAST(transactions.amount AS REAL)";

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn filtered<'a>(
    user_id: &'a str,
    filter: &'a TransactionFilter,
) -> transactions::BoxedQuery<'a, Sqlite> {
    let mut query = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .into_boxed();

    if let Some(kind) = filter.transaction_type {
        query = query.filter(transactions::transaction_type.eq(kind.as_str()));
    }
    if let Some(category) = &filter.category {
        query = query.filter(transactions::category.eq(category));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(transactions::date.ge(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(transactions::date.le(end));
    }
    if let Some(min_amount) = filter.min_amount.and_then(|d| d.to_f64()) {
        query = query.filter(
            sql::<Bool>(AMOUNT_AS_REAL)
                .sql(" >= ")
                .bind::<Double, _>(min_amount),
        );
    }
    if let Some(max_amount) = filter.max_amount.and_then(|d| d.to_f64()) {
        query = query.filter(
            sql::<Bool>(AMOUNT_AS_REAL)
                .sql(" <= ")
                .bind::<Double, _>(max_amount),
        );
    }
    if let Some(term) = &filter.notes_contains {
        // SQLite LIKE is case-insensitive for ASCII
        query = query.filter(
            transactions::notes
                .like(format!("%{}%", escape_like(term)))
                .escape('\\'),
        );
    }
    query
}

fn to_domain(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .map(|row| Transaction::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn search(&self, user_id: &str, query: &TransactionQuery) -> Result<(Vec<Transaction>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total = filtered(user_id, &query.filter)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        let desc = query.order == SortOrder::Desc;
        let mut rows = filtered(user_id, &query.filter);
        rows = match (query.sort_by, desc) {
            (TransactionSortField::Date, true) => rows.order(transactions::date.desc()),
            (TransactionSortField::Date, false) => rows.order(transactions::date.asc()),
            (TransactionSortField::Amount, true) => {
                rows.order(sql::<Double>(AMOUNT_AS_REAL).desc())
            }
            (TransactionSortField::Amount, false) => {
                rows.order(sql::<Double>(AMOUNT_AS_REAL).asc())
            }
            (TransactionSortField::Category, true) => rows.order(transactions::category.desc()),
            (TransactionSortField::Category, false) => rows.order(transactions::category.asc()),
            (TransactionSortField::Type, true) => rows.order(transactions::transaction_type.desc()),
            (TransactionSortField::Type, false) => {
                rows.order(transactions::transaction_type.asc())
            }
        };
        let rows = rows
            .then_order_by(transactions::created_at.desc())
            .limit(query.limit)
            .offset(query.offset())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok((to_domain(rows)?, total))
    }

    fn list_between(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .into_boxed();
        if let Some(start) = start {
            query = query.filter(transactions::date.ge(start));
        }
        if let Some(end) = end {
            query = query.filter(transactions::date.le(end));
        }
        let rows = query
            .order((transactions::date.asc(), transactions::created_at.asc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn earliest_date(&self, user_id: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .filter(transactions::user_id.eq(user_id))
            .select(min(transactions::date))
            .first::<Option<NaiveDate>>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Transaction::try_from).transpose()?)
    }

    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let row = TransactionDB::from_new(
                    Uuid::new_v4().to_string(),
                    new_transaction,
                    Utc::now().naive_utc(),
                );
                let row = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Transaction::try_from(row)?)
            })
            .await
    }

    async fn update(
        &self,
        transaction_id: &str,
        transaction: NewTransaction,
    ) -> Result<Option<Transaction>> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Transaction>> {
                let row = TransactionDB::from_new(
                    transaction_id.clone(),
                    transaction,
                    Utc::now().naive_utc(),
                );
                let updated = diesel::update(
                    transactions::table
                        .filter(transactions::id.eq(&transaction_id))
                        .filter(transactions::user_id.eq(&row.user_id)),
                )
                .set((
                    transactions::category_id.eq(&row.category_id),
                    transactions::category.eq(&row.category),
                    transactions::sub_category.eq(&row.sub_category),
                    transactions::transaction_type.eq(&row.transaction_type),
                    transactions::amount.eq(&row.amount),
                    transactions::date.eq(row.date),
                    transactions::notes.eq(&row.notes),
                    transactions::status.eq(&row.status),
                    transactions::updated_at.eq(row.updated_at),
                ))
                .returning(TransactionDB::as_returning())
                .get_result::<TransactionDB>(conn)
                .optional()
                .map_err(StorageError::from)?;
                Ok(updated.map(Transaction::try_from).transpose()?)
            })
            .await
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    transactions::table
                        .filter(transactions::id.eq(transaction_id))
                        .filter(transactions::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
