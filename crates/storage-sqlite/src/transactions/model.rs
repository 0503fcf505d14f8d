//! Database models for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketledger_core::transactions::{
    NewTransaction, Transaction, TransactionStatus, TransactionType,
};

use crate::errors::StorageError;
use crate::utils::{decimal_text, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub transaction_type: String,
    pub amount: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn from_new(id: String, tx: NewTransaction, now: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: tx.user_id,
            category_id: tx.category_id,
            category: tx.category,
            sub_category: tx.sub_category,
            transaction_type: tx.transaction_type.as_str().to_string(),
            amount: decimal_text(tx.amount),
            date: tx.date,
            notes: tx.notes,
            status: tx.status.map(|s| s.as_str().to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let status = db
            .status
            .as_deref()
            .map(|raw| parse_enum::<TransactionStatus>("status", raw))
            .transpose()?;
        Ok(Self {
            transaction_type: parse_enum::<TransactionType>(
                "transaction_type",
                &db.transaction_type,
            )?,
            amount: parse_decimal("amount", &db.amount)?,
            status,
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            category: db.category,
            sub_category: db.sub_category,
            date: db.date,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
