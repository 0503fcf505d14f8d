use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use pocketledger_core::categories::{
    Category, CategoryGroup, CategoryRepositoryTrait, NewCategory,
};
use pocketledger_core::Result;

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;

/// Inserts categories on an open connection. Used by signup to seed the
/// defaults in the same transaction as the user row.
pub fn insert_categories(
    conn: &mut SqliteConnection,
    new_categories: Vec<NewCategory>,
) -> std::result::Result<Vec<CategoryDB>, StorageError> {
    let now = Utc::now().naive_utc();
    let rows: Vec<CategoryDB> = new_categories
        .into_iter()
        .map(|c| CategoryDB {
            id: Uuid::new_v4().to_string(),
            user_id: c.user_id,
            name: c.name,
            category_group: c.category_group.as_str().to_string(),
            is_default: c.is_default,
            created_at: now,
            updated_at: now,
        })
        .collect();
    diesel::insert_into(categories::table)
        .values(&rows)
        .execute(conn)?;
    Ok(rows)
}

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_domain(rows: Vec<CategoryDB>) -> Result<Vec<Category>> {
    rows.into_iter()
        .map(|row| Category::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list(&self, user_id: &str, group: Option<CategoryGroup>) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table
            .filter(categories::user_id.eq(user_id))
            .into_boxed();
        if let Some(group) = group {
            query = query.filter(categories::category_group.eq(group.as_str()));
        }
        let rows = query
            .order((categories::is_default.desc(), categories::name.asc()))
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let row = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::user_id.eq(user_id))
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Category::try_from).transpose()?)
    }

    /// Names can repeat across groups; the expense category wins since
    /// budgets are the main caller.
    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::name.eq(name))
            .order(categories::created_at.asc())
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut matches = to_domain(rows)?;
        let preferred = matches
            .iter()
            .position(|c| c.category_group == CategoryGroup::Expense)
            .unwrap_or(0);
        Ok((!matches.is_empty()).then(|| matches.swap_remove(preferred)))
    }

    async fn insert(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let mut rows = insert_categories(conn, vec![new_category])?;
                let row = rows.pop().ok_or(StorageError::QueryFailed(
                    diesel::result::Error::NotFound,
                ))?;
                Ok(Category::try_from(row)?)
            })
            .await
    }

    async fn rename(
        &self,
        user_id: &str,
        category_id: &str,
        name: String,
    ) -> Result<Option<Category>> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Category>> {
                let row = diesel::update(
                    categories::table
                        .filter(categories::id.eq(&category_id))
                        .filter(categories::user_id.eq(&user_id)),
                )
                .set((
                    categories::name.eq(name),
                    categories::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(CategoryDB::as_returning())
                .get_result::<CategoryDB>(conn)
                .optional()
                .map_err(StorageError::from)?;
                Ok(row.map(Category::try_from).transpose()?)
            })
            .await
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    categories::table
                        .filter(categories::id.eq(category_id))
                        .filter(categories::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
