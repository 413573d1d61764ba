//! Indonesian "most popular" scrapes: CNN Indonesia and Detik. Each site
//! failure is logged and skipped independently; the combined list is capped
//! at the request limit.
//!
//! HTML is fetched first and parsed in synchronous helpers so no parsed
//! document is held across an await point.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info};

use crate::models::{Category, EntityType, RawItem};
use crate::sources::BROWSER_USER_AGENT;

const CNN_URL: &str = "https://www.cnnindonesia.com/terpopuler";
const DETIK_URL: &str = "https://www.detik.com/terpopuler";
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
const PER_SITE_CAP: usize = 5;

pub async fn fetch(client: &Client, limit: usize) -> Vec<RawItem> {
    let mut items = Vec::new();

    match fetch_html(client, CNN_URL).await {
        Ok(html) => {
            let found = parse_cnn(&html);
            info!("CNN Indonesia scrape completed - items={}", found.len());
            items.extend(found);
        }
        Err(e) => error!("CNN Indonesia scraping error: {e:#}"),
    }

    match fetch_html(client, DETIK_URL).await {
        Ok(html) => {
            let found = parse_detik(&html);
            info!("Detik scrape completed - items={}", found.len());
            items.extend(found);
        }
        Err(e) => error!("Detik scraping error: {e:#}"),
    }

    items.truncate(limit);
    items
}

async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    client
        .get(url)
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

fn parse_cnn(html: &str) -> Vec<RawItem> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse(".media__list .media__link").unwrap();
    let title_sel = Selector::parse(".media__title").unwrap();

    document
        .select(&link_sel)
        .take(PER_SITE_CAP)
        .filter_map(|el| {
            let title = el
                .select(&title_sel)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let href = el.value().attr("href").unwrap_or_default();
            if title.is_empty() || href.is_empty() {
                return None;
            }
            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("https://www.cnnindonesia.com{href}")
            };
            Some(popular_item(
                "cnn_indonesia",
                "CNN Indonesia",
                title,
                "Popular news from CNN Indonesia",
                url,
            ))
        })
        .collect()
}

fn parse_detik(html: &str) -> Vec<RawItem> {
    let document = Html::parse_document(html);
    let article_sel = Selector::parse(".list-content article").unwrap();
    let h3_sel = Selector::parse("h3").unwrap();
    let h2_sel = Selector::parse("h2").unwrap();
    let a_sel = Selector::parse("a").unwrap();

    document
        .select(&article_sel)
        .take(PER_SITE_CAP)
        .filter_map(|el| {
            let title = el
                .select(&h3_sel)
                .next()
                .or_else(|| el.select(&h2_sel).next())
                .map(|t| t.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let url = el
                .select(&a_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_string();
            if title.is_empty() || url.is_empty() {
                return None;
            }
            Some(popular_item(
                "detik",
                "Detik.com",
                title,
                "Popular news from Detik.com",
                url,
            ))
        })
        .collect()
}

fn popular_item(
    source: &str,
    platform: &str,
    title: String,
    description: &str,
    url: String,
) -> RawItem {
    RawItem {
        source: source.to_string(),
        category: Category::News,
        platform: platform.to_string(),
        entity_type: EntityType::Article,
        title,
        description: description.to_string(),
        url,
        media: Vec::new(),
        author: None,
        published_at: Some(Utc::now()),
        metrics: Default::default(),
        raw_data: serde_json::json!({ "source": source }),
        canonical_key: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cnn_extracts_titles_and_resolves_relative_links() {
        let html = r#"
            <div class="media__list">
                <a class="media__link" href="/nasional/story-1">
                    <span class="media__title"> Story One </span>
                </a>
                <a class="media__link" href="https://www.cnnindonesia.com/story-2">
                    <span class="media__title">Story Two</span>
                </a>
                <a class="media__link" href="/no-title"></a>
            </div>"#;
        let items = parse_cnn(html);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Story One");
        assert_eq!(items[0].url, "https://www.cnnindonesia.com/nasional/story-1");
        assert_eq!(items[1].url, "https://www.cnnindonesia.com/story-2");
        assert_eq!(items[0].source, "cnn_indonesia");
    }

    #[test]
    fn parse_detik_prefers_h3_and_skips_incomplete_rows() {
        let html = r#"
            <div class="list-content">
                <article><h3>Headline A</h3><a href="https://www.detik.com/a"></a></article>
                <article><h2>Headline B</h2><a href="https://www.detik.com/b"></a></article>
                <article><h3>No link here</h3></article>
            </div>"#;
        let items = parse_detik(html);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Headline A");
        assert_eq!(items[1].title, "Headline B");
        assert_eq!(items[1].url, "https://www.detik.com/b");
    }
}
