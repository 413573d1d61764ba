use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Social,
    Knowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Article,
    Topic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
}

/// Sparse engagement signals. Each upstream source fills in whichever
/// fields it has; the scorer picks the first usable one in priority order.
/// `mentions_24h` is written by the clusterer, never by a fetcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweet_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views_24h: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions_24h: Option<u64>,
}

/// One item as delivered by a source fetcher, before the pipeline runs.
/// Ephemeral: built per request, consumed once, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub source: String, // origin id, e.g. "newsapi", "detik"
    pub category: Category,
    pub platform: String, // display name, e.g. "CNN Indonesia"
    pub entity_type: EntityType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: Metrics,
    /// Opaque upstream payload, carried for debugging and dropped at scoring.
    #[serde(default)]
    pub raw_data: serde_json::Value,
    /// Dedup identity, filled by the deduplication pass.
    #[serde(skip)]
    pub canonical_key: String,
}

impl RawItem {
    pub fn is_news_article(&self) -> bool {
        self.category == Category::News && self.entity_type == EntityType::Article
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// 0–100 heuristic popularity estimate, one decimal.
    pub viral: f64,
    /// 0–1 trust in the metric the score came from, two decimals.
    pub confidence: f64,
    /// 0–1, two decimals.
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub fetched_at: DateTime<Utc>,
    pub source_api: String,
    pub dedup_key: String,
}

/// Final ranked record: the RawItem fields (minus raw_data) plus score,
/// provenance and a generation-salted id that is not stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: String,
    pub source: String,
    pub category: Category,
    pub platform: String,
    pub entity_type: EntityType,
    pub title: String,
    pub description: String,
    pub url: String,
    pub media: Vec<Media>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub metrics: Metrics,
    pub score: Score,
    pub provenance: Provenance,
}

/// Request context. Only `limit` affects the core pipeline; the rest is
/// pass-through used by the source fetchers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendParams {
    pub geo: String,
    pub lang: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

pub const DEFAULT_LIMIT: usize = 20;

impl TrendParams {
    /// Requested result cap; absent or non-positive values fall back to 20.
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_LIMIT,
        }
    }
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            geo: "ID".to_string(),
            lang: "id".to_string(),
            from: None,
            to: None,
            limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_limit_defaults() {
        let mut p = TrendParams::default();
        assert_eq!(p.effective_limit(), 20);
        p.limit = Some(0);
        assert_eq!(p.effective_limit(), 20);
        p.limit = Some(-3);
        assert_eq!(p.effective_limit(), 20);
        p.limit = Some(5);
        assert_eq!(p.effective_limit(), 5);
    }

    #[test]
    fn sparse_metrics_serialize_compactly() {
        let m = Metrics {
            views_24h: Some(1000),
            rank: Some(3),
            ..Metrics::default()
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!({"views_24h": 1000, "rank": 3}));
    }
}
