//! NewsAPI adapter (newsapi.org/v2/everything). The one curated API source;
//! it is queried first and its items lead the combined list, giving them
//! dedup precedence over scraped duplicates.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::models::{Category, EntityType, Media, RawItem, TrendParams};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    source: ArticleSource,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

pub async fn fetch(client: &Client, api_key: Option<&str>, params: &TrendParams) -> Vec<RawItem> {
    let Some(key) = api_key else {
        debug!("NewsAPI disabled - no API key configured");
        return Vec::new();
    };
    match try_fetch(client, key, params).await {
        Ok(items) => {
            info!("NewsAPI fetch completed - items={}", items.len());
            items
        }
        Err(e) => {
            error!("NewsAPI error: {e:#}");
            Vec::new()
        }
    }
}

async fn try_fetch(client: &Client, key: &str, params: &TrendParams) -> Result<Vec<RawItem>> {
    let from = params
        .from
        .clone()
        .unwrap_or_else(|| (Utc::now() - Duration::days(7)).format("%Y-%m-%d").to_string());
    let to = params
        .to
        .clone()
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    let page_size = params.effective_limit().to_string();
    let envelope: Envelope = client
        .get(ENDPOINT)
        .timeout(TIMEOUT)
        .query(&[
            ("apiKey", key),
            ("q", "trending OR viral OR populer"),
            ("language", params.lang.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("sortBy", "popularity"),
            ("pageSize", page_size.as_str()),
        ])
        .send()
        .await
        .context("NewsAPI request failed")?
        .error_for_status()
        .context("NewsAPI returned an error status")?
        .json()
        .await
        .context("Decoding NewsAPI JSON")?;

    let items = envelope
        .articles
        .into_iter()
        .map(|a| RawItem {
            source: "newsapi".to_string(),
            category: Category::News,
            platform: a
                .source
                .name
                .unwrap_or_else(|| "NewsAPI".to_string()),
            entity_type: EntityType::Article,
            title: a.title.unwrap_or_default(),
            description: a.description.unwrap_or_default(),
            url: a.url.unwrap_or_default(),
            media: a
                .url_to_image
                .map(|url| {
                    vec![Media {
                        media_type: "image".to_string(),
                        url,
                    }]
                })
                .unwrap_or_default(),
            author: a.author,
            published_at: a.published_at,
            metrics: Default::default(),
            raw_data: serde_json::json!({ "source": "newsapi" }),
            canonical_key: String::new(),
        })
        .collect();

    Ok(items)
}
