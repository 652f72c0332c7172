use anyhow::Context;
use tracing::{info, warn};

use super::dto::UserCreate;
use super::password::hash_password;
use super::repo_types::{NewUser, User};
use crate::error::{ApiError, ApiResult, EMAIL_TAKEN, USERNAME_TAKEN, USER_NOT_FOUND};
use crate::state::AppState;

/// Load a user or fail with 404.
pub async fn require_user(state: &AppState, user_id: i64) -> ApiResult<User> {
    match state.store.find_user(user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id, "user not found");
            Err(ApiError::NotFound(USER_NOT_FOUND))
        }
    }
}

/// Uniqueness is checked before the (expensive) hash; the unique constraints
/// still catch a concurrent registration that slips between check and insert.
pub async fn register(state: &AppState, cmd: UserCreate) -> ApiResult<User> {
    if state.store.find_user_by_username(&cmd.username).await?.is_some() {
        warn!(username = %cmd.username, "username already registered");
        return Err(ApiError::Duplicate(USERNAME_TAKEN));
    }
    if state.store.find_user_by_email(&cmd.email).await?.is_some() {
        warn!(email = %cmd.email, "email already registered");
        return Err(ApiError::Duplicate(EMAIL_TAKEN));
    }

    let UserCreate {
        username,
        email,
        password,
    } = cmd;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join password hashing task")??;

    let user = state
        .store
        .insert_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::verify_password;

    fn cmd(username: &str, email: &str) -> UserCreate {
        UserCreate {
            username: username.into(),
            email: email.into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn register_stores_only_the_hash() {
        let state = AppState::fake();
        let user = register(&state, cmd("alice", "alice@example.com")).await.unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(verify_password("password123", &user.password_hash));
        assert_eq!(require_user(&state, user.id).await.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let state = AppState::fake();
        register(&state, cmd("alice", "alice@example.com")).await.unwrap();

        let err = register(&state, cmd("alice", "other@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(USERNAME_TAKEN)));

        let err = register(&state, cmd("bob", "alice@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(EMAIL_TAKEN)));
    }

    #[tokio::test]
    async fn require_user_reports_missing() {
        let state = AppState::fake();
        let err = require_user(&state, 999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(USER_NOT_FOUND)));
    }
}
