use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Store, StoreError, StoreResult};
use crate::calculations::repo_types::{Calculation, NewCalculation};
use crate::users::repo_types::{NewUser, User};

/// Same constraints as the Postgres schema: unique username/email, FK from
/// calculations to users, id ordering.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    calculations: Vec<Calculation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn calculation_count(&self) -> usize {
        self.inner.lock().unwrap().calculations.len()
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let t = self.inner.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.inner.lock().unwrap();
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.inner.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>> {
        let t = self.inner.lock().unwrap();
        Ok(page(t.users.iter().cloned(), skip, limit))
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.inner.lock().unwrap();
        if t.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::DuplicateUsername);
        }
        if t.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: t.users.last().map_or(1, |u| u.id + 1),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_calculation(&self, id: i64) -> StoreResult<Option<Calculation>> {
        let t = self.inner.lock().unwrap();
        Ok(t.calculations.iter().find(|c| c.id == id).cloned())
    }

    async fn list_calculations_for_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Calculation>> {
        let t = self.inner.lock().unwrap();
        let owned = t.calculations.iter().filter(|c| c.user_id == user_id).cloned();
        Ok(page(owned, skip, limit))
    }

    async fn insert_calculation(&self, new: NewCalculation) -> StoreResult<Calculation> {
        let mut t = self.inner.lock().unwrap();
        if !t.users.iter().any(|u| u.id == new.user_id) {
            return Err(StoreError::MissingUser);
        }
        let calc = Calculation {
            id: t.calculations.last().map_or(1, |c| c.id + 1),
            operation: new.operation,
            operand_a: new.operand_a,
            operand_b: new.operand_b,
            result: new.result,
            timestamp: OffsetDateTime::now_utc(),
            user_id: new.user_id,
        };
        t.calculations.push(calc.clone());
        Ok(calc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::operations::Operation;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn enforces_unique_username_and_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice", "a@example.com")).await.unwrap();

        let err = store
            .insert_user(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));

        let err = store
            .insert_user(new_user("bob", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn calculation_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store
            .insert_calculation(NewCalculation {
                operation: Operation::Add,
                operand_a: 1.0,
                operand_b: 2.0,
                result: 3.0,
                user_id: 42,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingUser));
        assert_eq!(store.calculation_count(), 0);
    }

    #[tokio::test]
    async fn lists_are_paged_in_id_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_user(new_user(&format!("user{i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }
        let users = store.list_users(1, 2).await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, [2, 3]);
        assert!(store.list_users(10, 100).await.unwrap().is_empty());
    }
}
