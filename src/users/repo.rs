use sqlx::PgExecutor;

use super::repo_types::{NewUser, User};

impl User {
    /// Find a user by primary key.
    pub async fn find_by_id<'e>(db: impl PgExecutor<'e>, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_username<'e>(
        db: impl PgExecutor<'e>,
        username: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_email<'e>(
        db: impl PgExecutor<'e>,
        email: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn list<'e>(db: impl PgExecutor<'e>, skip: i64, limit: i64) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await
    }

    /// Insert a user; unique violations surface as database errors.
    pub async fn create<'e>(db: impl PgExecutor<'e>, new: &NewUser) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(db)
        .await
    }

    /// Take a key-share lock so the row cannot be deleted before the caller commits.
    pub async fn lock_for_reference<'e>(db: impl PgExecutor<'e>, id: i64) -> sqlx::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR KEY SHARE
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row.is_some())
    }
}
