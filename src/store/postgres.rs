use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

use super::{Store, StoreError, StoreResult};
use crate::calculations::repo;
use crate::calculations::repo_types::{Calculation, CalculationRow, NewCalculation};
use crate::config::AppConfig;
use crate::users::repo_types::{NewUser, User};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date. Already-applied migrations are skipped.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
        Ok(Self::new(pool))
    }
}

/// Map constraint violations onto the typed variants callers branch on.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some("users_username_key") => return StoreError::DuplicateUsername,
            Some("users_email_key") => return StoreError::DuplicateEmail,
            Some("calculations_user_id_fkey") => return StoreError::MissingUser,
            _ => {}
        }
    }
    StoreError::Database(err)
}

fn to_calculation(row: CalculationRow) -> StoreResult<Calculation> {
    let id = row.id;
    Calculation::try_from(row).map_err(|e| StoreError::Corrupt(format!("calculation {id}: {e}")))
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        User::find_by_id(&self.pool, id).await.map_err(classify)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        User::find_by_username(&self.pool, username)
            .await
            .map_err(classify)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.pool, email).await.map_err(classify)
    }

    async fn list_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>> {
        User::list(&self.pool, skip, limit).await.map_err(classify)
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        User::create(&self.pool, &new).await.map_err(classify)
    }

    async fn find_calculation(&self, id: i64) -> StoreResult<Option<Calculation>> {
        repo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(to_calculation)
            .transpose()
    }

    async fn list_calculations_for_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Calculation>> {
        repo::list_by_user(&self.pool, user_id, skip, limit)
            .await
            .map_err(classify)?
            .into_iter()
            .map(to_calculation)
            .collect()
    }

    async fn insert_calculation(&self, new: NewCalculation) -> StoreResult<Calculation> {
        // Dropping `tx` on an early return rolls back.
        let mut tx = self.pool.begin().await.map_err(classify)?;
        if !User::lock_for_reference(&mut *tx, new.user_id)
            .await
            .map_err(classify)?
        {
            return Err(StoreError::MissingUser);
        }
        let row = repo::insert(&mut *tx, &new).await.map_err(classify)?;
        tx.commit().await.map_err(classify)?;
        debug!(calculation_id = row.id, user_id = row.user_id, "calculation committed");
        to_calculation(row)
    }
}
