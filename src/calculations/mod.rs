pub mod dto;
pub mod handlers;
pub mod operations;
pub(crate) mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::calculation_routes())
        .merge(handlers::operation_routes())
}
