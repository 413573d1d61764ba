//! HTTP surface: `/trending` runs the fetch fan-out and the pipeline,
//! `/health` reports source readiness. Unexpected failures surface as a
//! generic 500 body; the error chain stays in the logs.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::models::{ScoredItem, TrendParams};
use crate::pipeline::finalize;
use crate::sources::{self, SourceCounts};

pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    geo: Option<String>,
    lang: Option<String>,
    from: Option<String>,
    to: Option<String>,
    limit: Option<i64>,
}

impl From<TrendingQuery> for TrendParams {
    fn from(q: TrendingQuery) -> Self {
        Self {
            geo: q.geo.unwrap_or_else(|| "ID".to_string()),
            lang: q.lang.unwrap_or_else(|| "id".to_string()),
            from: q.from,
            to: q.to,
            limit: q.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub meta: Meta,
    pub items: Vec<ScoredItem>,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub params: TrendParams,
    pub total_items: usize,
    pub sources: SourceCounts,
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, AppError> {
    let params: TrendParams = query.into();
    info!(
        "Trending request - geo={}, lang={}, limit={}",
        params.geo,
        params.lang,
        params.effective_limit()
    );

    let (raw_items, counts) = sources::fetch_all(&state.client, &state.config, &params).await;
    let items = finalize(raw_items, &params);

    Ok(Json(TrendingResponse {
        meta: Meta {
            timestamp: Utc::now(),
            params,
            total_items: items.len(),
            sources: counts,
        },
        items,
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "api_keys": {
            "newsapi": state.config.newsapi_key.is_some(),
        },
        "scraping": {
            "indonesia_news": true,
            "social_trends": true,
            "wikimedia": true,
        },
    }))
}

/// Top-level boundary: any error that escapes a handler becomes a fixed
/// 500 body; internals are logged, never returned to the caller.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Trending endpoint error: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch trending data" })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_fill_geo_and_lang() {
        let q = TrendingQuery {
            geo: None,
            lang: None,
            from: None,
            to: None,
            limit: Some(10),
        };
        let params: TrendParams = q.into();
        assert_eq!(params.geo, "ID");
        assert_eq!(params.lang, "id");
        assert_eq!(params.effective_limit(), 10);
    }
}
