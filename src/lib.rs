//! Calculator backend: user registration plus a four-function calculator
//! whose results are recorded per user in Postgres.

pub mod app;
pub mod calculations;
pub mod config;
pub mod error;
pub mod extract;
pub mod pages;
pub mod state;
pub mod store;
pub mod users;
pub mod validation;
