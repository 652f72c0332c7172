use axum::{response::Html, Json};
use serde_json::{json, Value};

const INDEX_HTML: &str = include_str!("../templates/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
