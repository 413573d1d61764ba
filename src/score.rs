//! Viral scoring: turn whichever engagement signal an item carries into a
//! 0–100 score with a confidence and engagement rate, then decay by recency.
//!
//! The rules are a priority cascade across unrelated metric vocabularies
//! (social, video, wiki, rank-based). The ladder and its constants are
//! load-bearing calibration; do not consolidate them.

use chrono::{DateTime, Utc};
use rand::Rng;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::{Provenance, RawItem, Score, ScoredItem};

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A zero count carries no signal: it falls through to the next rule.
fn nonzero(v: Option<u64>) -> Option<u64> {
    v.filter(|n| *n > 0)
}

fn log_scaled(count: u64, factor: f64) -> f64 {
    ((count as f64 + 1.0).log10() * factor).min(100.0)
}

/// Score one deduplicated, cluster-annotated item.
///
/// Pure apart from the injected rng, which only feeds the no-signal
/// fallback; `now` drives recency decay and provenance stamps. Callers pass
/// the same `now` for a whole pipeline run.
pub fn score_item<R: Rng>(item: &RawItem, now: DateTime<Utc>, rng: &mut R) -> ScoredItem {
    let m = &item.metrics;

    let (raw_viral, confidence, engagement_rate) = if let Some(tweets) = nonzero(m.tweet_count) {
        // Twitter: log-normalized tweet volume
        let v = log_scaled(tweets, 20.0);
        (v, 0.85, v / 100.0)
    } else if let Some(views) = nonzero(m.view_count) {
        // Video platforms: log-normalized views, engagement from interactions
        let v = log_scaled(views, 12.0);
        let interactions = m.like_count.unwrap_or(0)
            + m.comment_count.unwrap_or(0)
            + m.share_count.unwrap_or(0);
        let eng = (interactions as f64 / views as f64).min(1.0);
        (v, 0.8, eng)
    } else if let (Some(likes), Some(comments)) = (nonzero(m.like_count), m.comments_count) {
        // Social posts: likes + comments (a defined zero comment count is
        // still a signal, unlike the zero counts above)
        let total = likes + comments;
        let v = log_scaled(total, 18.0);
        (v, 0.75, (total as f64 / 10_000.0).min(1.0))
    } else if let Some(views) = nonzero(m.views_24h) {
        // Wikipedia pageviews
        let v = log_scaled(views, 15.0);
        (v, 0.75, v / 100.0)
    } else if let Some(rank) = nonzero(m.rank) {
        // Scraped trend boards: rank 1 = 95, rank 10 = 50, floor 30
        let v = (100.0 - rank as f64 * 5.0).max(30.0);
        (v, 0.65, v / 100.0)
    } else if let Some(mentions) = nonzero(m.mentions_24h) {
        // News: cross-outlet mention count from clustering
        let v = (mentions as f64 * 10.0).min(100.0);
        (v, 0.7, (mentions as f64 / 20.0).min(1.0))
    } else {
        // No usable signal: noisy medium baseline. The [40, 70) range is the
        // contract, not any particular value.
        (rng.gen_range(40.0..70.0), 0.5, 0.5)
    };

    // Recency decay: linear to zero over 7 days, scaling the score between
    // 100% (brand new) and 70% (fully stale). Undated items skip this.
    let viral = match item.published_at {
        Some(published) => {
            let age_hours = (now - published).num_seconds() as f64 / 3600.0;
            let recency_boost = (1.0 - age_hours / 168.0).max(0.0);
            raw_viral * (0.7 + 0.3 * recency_boost)
        }
        None => raw_viral,
    };

    ScoredItem {
        id: generation_id(&item.url, &item.title, now),
        source: item.source.clone(),
        category: item.category,
        platform: item.platform.clone(),
        entity_type: item.entity_type,
        title: item.title.clone(),
        description: item.description.clone(),
        url: item.url.clone(),
        media: item.media.clone(),
        author: item.author.clone(),
        published_at: item.published_at,
        metrics: item.metrics.clone(),
        score: Score {
            viral: round1(viral),
            confidence: round2(confidence),
            engagement_rate: round2(engagement_rate),
        },
        provenance: Provenance {
            fetched_at: now,
            source_api: item.source.clone(),
            dedup_key: item.canonical_key.clone(),
        },
    }
}

/// Response-scoped id, salted with generation time. Not stable across runs.
fn generation_id(url: &str, title: &str, now: DateTime<Utc>) -> String {
    format!(
        "{:016x}",
        xxh3_64(format!("{}{}{}", url, title, now.timestamp_millis()).as_bytes())
    )
}
