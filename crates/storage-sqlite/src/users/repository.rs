use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::info;
use uuid::Uuid;

use pocketledger_core::categories::NewCategory;
use pocketledger_core::users::{NewUser, User, UserCredentials, UserRepositoryTrait, UserUpdate};
use pocketledger_core::Result;

use super::model::UserDB;
use crate::categories::insert_categories;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{budgets, categories, stocks, transactions, users};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn find_row_by_email(&self, email: &str) -> Result<Option<UserDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?)
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(User::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.find_row_by_email(email)?.map(User::from))
    }

    fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(self.find_row_by_email(email)?.map(UserCredentials::from))
    }

    async fn create_with_default_categories(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let now = Utc::now().naive_utc();
                let row = UserDB {
                    id: Uuid::new_v4().to_string(),
                    email: new_user.email,
                    full_name: new_user.full_name,
                    password_hash: new_user.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                let row = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .map_err(StorageError::from)?;

                let seeded = insert_categories(conn, NewCategory::defaults_for(&row.id))?;
                info!(
                    "Seeded {} default categories for user {}",
                    seeded.len(),
                    row.id
                );
                Ok(User::from(row))
            })
            .await
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<Option<User>> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<User>> {
                if let Some(full_name) = update.full_name {
                    diesel::update(users::table.find(&user_id))
                        .set(users::full_name.eq(full_name))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                if let Some(email) = update.email {
                    diesel::update(users::table.find(&user_id))
                        .set(users::email.eq(email))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                let row = diesel::update(users::table.find(&user_id))
                    .set(users::updated_at.eq(Utc::now().naive_utc()))
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                Ok(row.map(User::from))
            })
            .await
    }

    async fn delete_cascade(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Owned rows first, then the user
                diesel::delete(stocks::table.filter(stocks::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(budgets::table.filter(budgets::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(transactions::table.filter(transactions::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(categories::table.filter(categories::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let deleted = diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }
}
