//! Wikimedia pageviews adapter: yesterday's most-viewed articles for the
//! requested language edition.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::models::{Category, EntityType, Metrics, RawItem};

const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Vec<Day>,
}

#[derive(Debug, Deserialize)]
struct Day {
    #[serde(default)]
    articles: Vec<PageviewArticle>,
}

#[derive(Debug, Deserialize)]
struct PageviewArticle {
    article: String,
    views: u64,
    rank: u64,
}

pub async fn fetch(client: &Client, lang: &str, limit: usize) -> Vec<RawItem> {
    match try_fetch(client, lang, limit).await {
        Ok(items) => {
            info!("Wikimedia fetch completed - items={}", items.len());
            items
        }
        Err(e) => {
            error!("Wikimedia API error: {e:#}");
            Vec::new()
        }
    }
}

async fn try_fetch(client: &Client, lang: &str, limit: usize) -> Result<Vec<RawItem>> {
    let yesterday = Utc::now() - Duration::days(1);
    let url = format!(
        "https://wikimedia.org/api/rest_v1/metrics/pageviews/top/{}.wikipedia/all-access/{}",
        lang,
        yesterday.format("%Y/%m/%d")
    );

    let envelope: Envelope = client
        .get(&url)
        .timeout(TIMEOUT)
        .send()
        .await
        .with_context(|| format!("Request failed for {url}"))?
        .error_for_status()
        .with_context(|| format!("HTTP error for {url}"))?
        .json()
        .await
        .with_context(|| format!("Decoding JSON for {url}"))?;

    let articles = envelope
        .items
        .into_iter()
        .next()
        .map(|day| day.articles)
        .unwrap_or_default();

    let items = articles
        .into_iter()
        .take(limit)
        .map(|a| {
            let title = urlencoding::decode(&a.article)
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| a.article.clone())
                .replace('_', " ");
            RawItem {
                source: "wikimedia".to_string(),
                category: Category::Knowledge,
                platform: "Wikipedia".to_string(),
                entity_type: EntityType::Article,
                title,
                description: format!("{} views yesterday", a.views),
                url: format!("https://{}.wikipedia.org/wiki/{}", lang, a.article),
                media: Vec::new(),
                author: None,
                published_at: None,
                metrics: Metrics {
                    views_24h: Some(a.views),
                    rank: Some(a.rank),
                    ..Metrics::default()
                },
                raw_data: serde_json::json!({ "source": "wikimedia" }),
                canonical_key: String::new(),
            }
        })
        .collect();

    Ok(items)
}
