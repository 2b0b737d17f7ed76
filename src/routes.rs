use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::fetcher::Fetcher;
use crate::sources::{Category, Lang};

/// Hard ceiling on items per response, whatever the caller asks for
pub const MAX_ITEMS: usize = 20;

pub struct AppState {
    pub fetcher: Arc<Fetcher>,
    pub default_max: usize,
}

/// Raw query parameters. Every field is an optional string: a request
/// with a mistyped value falls back to defaults, never to a 400.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub lang: Option<String>,
    pub cat: Option<String>,
    pub max: Option<String>,
}

/// Effective item cap: lenient integer parse, service default when
/// absent or unparsable, clamped into [1, MAX_ITEMS].
pub fn clamp_max(raw: Option<&str>, default_max: usize) -> usize {
    let requested = raw
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(default_max as i64);
    requested.clamp(1, MAX_ITEMS as i64) as usize
}

// Route handlers
pub async fn news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> impl IntoResponse {
    let lang = Lang::parse(query.lang.as_deref().unwrap_or(""));
    let category = Category::parse(query.cat.as_deref().unwrap_or(""));
    let max = clamp_max(query.max.as_deref(), state.default_max);

    let response = state.fetcher.fetch_news(lang, category, max).await;

    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(response),
    )
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/news", get(news))
        .route("/health", get(health))
        .with_state(state)
}
