//! Social trend scrape: GetDayTrends rows become rank-scored topics. When
//! the scrape yields nothing (layout drift, block, outage) the source
//! degrades to relabeled Wikipedia pageview leaders instead of going empty.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info, warn};

use crate::models::{Category, EntityType, Metrics, RawItem};
use crate::sources::{wikipedia, BROWSER_USER_AGENT};

// The slowest upstream in practice; gets a longer leash than the APIs.
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(8);
const FALLBACK_COUNT: usize = 5;

fn leading_rank_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.?\s*").expect("static regex"))
}

fn trailing_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\d+.*$").expect("static regex"))
}

pub async fn fetch(client: &Client, geo: &str, lang: &str, limit: usize) -> Vec<RawItem> {
    let items = match fetch_html(client, geo).await {
        Ok(html) => {
            let found = parse_trends(&html, geo, limit);
            info!("GetDayTrends scrape completed - items={}", found.len());
            found
        }
        Err(e) => {
            error!("GetDayTrends scraping error: {e:#}");
            Vec::new()
        }
    };

    if !items.is_empty() {
        return items;
    }

    // Empty scrape: borrow the Wikipedia pageview leaders as topic stand-ins.
    warn!("GetDayTrends yielded no items - falling back to Wikipedia pageviews");
    wikipedia::fetch(client, lang, FALLBACK_COUNT)
        .await
        .into_iter()
        .map(|item| RawItem {
            source: "wikimedia_fallback".to_string(),
            category: Category::Social,
            platform: "Trending Topics".to_string(),
            entity_type: EntityType::Topic,
            description: format!("Trending: {}", item.description),
            ..item
        })
        .collect()
}

async fn fetch_html(client: &Client, geo: &str) -> Result<String> {
    // Only the Indonesian board is wired up; other geos map to it for now.
    let country = match geo {
        "ID" => "indonesia",
        _ => "indonesia",
    };
    let url = format!("https://getdaytrends.com/{country}/");
    client
        .get(&url)
        .timeout(TIMEOUT)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
        .with_context(|| format!("Request failed for {url}"))?
        .error_for_status()
        .with_context(|| format!("HTTP error for {url}"))?
        .text()
        .await
        .with_context(|| format!("Reading body for {url}"))
}

fn parse_trends(html: &str, geo: &str, limit: usize) -> Vec<RawItem> {
    let document = Html::parse_document(html);
    let row_sel =
        Selector::parse(".trend-card__list li, .trend-card a, table.table tr").unwrap();
    let a_sel = Selector::parse("a").unwrap();

    let mut items = Vec::new();
    for (i, el) in document.select(&row_sel).take(limit).enumerate() {
        let text = el.text().collect::<String>().trim().to_string();
        if text.len() <= 2 || text.len() >= 100 {
            continue;
        }

        let link = el
            .select(&a_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .or_else(|| el.value().attr("href"))
            .unwrap_or_default();

        let title = clean_trend_title(&text);
        if title.is_empty() {
            continue;
        }

        let url = if link.contains("twitter.com") {
            link.to_string()
        } else {
            format!(
                "https://twitter.com/search?q={}",
                urlencoding::encode(&title)
            )
        };

        items.push(RawItem {
            source: "getdaytrends".to_string(),
            category: Category::Social,
            platform: "Twitter Trends".to_string(),
            entity_type: EntityType::Topic,
            title,
            description: format!("Trending in {geo}"),
            url,
            media: Vec::new(),
            author: None,
            published_at: None,
            metrics: Metrics {
                rank: Some(i as u64 + 1),
                ..Metrics::default()
            },
            raw_data: serde_json::json!({ "source": "getdaytrends" }),
            canonical_key: String::new(),
        });
    }
    items
}

/// Trend rows carry positional numbering and tweet counts around the topic
/// name ("3. #Topic 25K tweets"); keep just the name.
fn clean_trend_title(text: &str) -> String {
    let stripped = leading_rank_re().replace(text, "");
    trailing_count_re().replace(&stripped, "").trim().to_string()
}
