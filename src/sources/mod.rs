//! Source fetchers. Each upstream gets its own adapter that normalizes
//! whatever it returns into `RawItem`s; a failing or timed-out source logs
//! its error and contributes an empty list instead of aborting the request.

pub mod local_news;
pub mod newsapi;
pub mod social;
pub mod wikipedia;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::models::{RawItem, TrendParams};

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Per-source item counts, reported in the response envelope.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SourceCounts {
    pub newsapi: usize,
    pub indonesia_news: usize,
    pub social_trends: usize,
    pub wikimedia: usize,
}

/// Fetch every source concurrently and concatenate the results in dedup
/// priority order: curated API data first, scraped/fallback data after, so
/// the deduplicator's first-seen rule favors the curated copy.
pub async fn fetch_all(
    client: &Client,
    config: &Config,
    params: &TrendParams,
) -> (Vec<RawItem>, SourceCounts) {
    let start = std::time::Instant::now();

    let (newsapi, local, social, wiki) = tokio::join!(
        newsapi::fetch(client, config.newsapi_key.as_deref(), params),
        local_news::fetch(client, params.effective_limit()),
        social::fetch(client, &params.geo, &params.lang, params.effective_limit()),
        wikipedia::fetch(client, &params.lang, params.effective_limit()),
    );

    let counts = SourceCounts {
        newsapi: newsapi.len(),
        indonesia_news: local.len(),
        social_trends: social.len(),
        wikimedia: wiki.len(),
    };

    let mut items = newsapi;
    items.extend(local);
    items.extend(social);
    items.extend(wiki);

    info!(
        "Source fetch completed - duration={:.2}s, items={} (newsapi={}, indonesia_news={}, social_trends={}, wikimedia={})",
        start.elapsed().as_secs_f32(),
        items.len(),
        counts.newsapi,
        counts.indonesia_news,
        counts.social_trends,
        counts.wikimedia
    );

    (items, counts)
}
