//! Database models for categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::categories::{Category, CategoryGroup};

use crate::errors::StorageError;
use crate::utils::parse_enum;

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_group: String,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<CategoryDB> for Category {
    type Error = StorageError;

    fn try_from(db: CategoryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            category_group: parse_enum::<CategoryGroup>("category_group", &db.category_group)?,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            is_default: db.is_default,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
