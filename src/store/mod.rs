//! Persistence seam. Handlers only see `Arc<dyn Store>`; Postgres backs it in
//! production and an in-memory map backs it in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::calculations::repo_types::{Calculation, NewCalculation};
use crate::users::repo_types::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("email already exists")]
    DuplicateEmail,
    #[error("referenced user does not exist")]
    MissingUser,
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>>;
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;

    async fn find_calculation(&self, id: i64) -> StoreResult<Option<Calculation>>;
    async fn list_calculations_for_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Calculation>>;
    /// Fails with [`StoreError::MissingUser`] when `new.user_id` is unknown;
    /// nothing is written in that case.
    async fn insert_calculation(&self, new: NewCalculation) -> StoreResult<Calculation>;
}
