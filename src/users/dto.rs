use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::repo_types::User;
use crate::validation::{required_str, ValidationErrors};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .expect("email regex compiles");
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.')
        && !email.contains("..")
        && !email.contains(".@")
        && EMAIL_RE.is_match(email)
}

fn is_valid_username(username: &str) -> bool {
    username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Raw body of `POST /users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub username: Option<Value>,
    pub email: Option<Value>,
    pub password: Option<Value>,
}

/// A registration request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserPayload {
    pub fn validate(&self) -> Result<UserCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required_str(&mut errors, "username", &self.username);
        if let Some(u) = username {
            let len = u.chars().count();
            if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
                errors.add(
                    "username",
                    format!("must be between {USERNAME_MIN} and {USERNAME_MAX} characters"),
                );
            } else if !is_valid_username(u) {
                errors.add("username", "must contain only letters and digits");
            }
        }

        let email = required_str(&mut errors, "email", &self.email).map(|e| e.trim().to_lowercase());
        if let Some(e) = &email {
            if !is_valid_email(e) {
                errors.add("email", "value is not a valid email address");
            }
        }

        let password = required_str(&mut errors, "password", &self.password);
        if let Some(p) = password {
            if p.chars().count() < PASSWORD_MIN {
                errors.add("password", format!("must be at least {PASSWORD_MIN} characters"));
            }
        }

        errors.finish(|| UserCreate {
            username: username.unwrap_or_default().to_string(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default().to_string(),
        })
    }
}

/// Public view of a user; the password hash is not part of it.
#[derive(Debug, Serialize)]
pub struct UserRead {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserRead {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 { 100 }

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: default_limit() }
    }
}

impl Pagination {
    pub fn validate(&self) -> Result<(i64, i64), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.skip < 0 {
            errors.add("skip", "must be greater than or equal to 0");
        }
        if self.limit < 0 {
            errors.add("limit", "must be greater than or equal to 0");
        }
        errors.finish(|| (self.skip, self.limit))
    }
}
