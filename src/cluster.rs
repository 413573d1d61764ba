//! Story clustering: near-duplicate news coverage of the same event is
//! grouped by domain + leading title words, and every member gets the
//! cluster's mention count. Clusters are scoped to a single pipeline run.

use std::collections::HashMap;

use tracing::debug;

use crate::dedup::digest;
use crate::models::RawItem;
use crate::normalize::{canonical_url, normalize_title};

/// Grouping identity: digest of the canonical host segment + the first five
/// words of the normalized title.
pub fn cluster_key(url: &str, title: &str) -> String {
    let canonical = canonical_url(url);
    let domain = canonical.split('/').next().unwrap_or("");
    let normalized = normalize_title(title);
    let lead_words = normalized
        .split(' ')
        .take(5)
        .collect::<Vec<_>>()
        .join(" ");
    digest(&format!("{domain}{lead_words}"))
}

/// Annotate every news article with `mentions_24h`, the number of
/// deduplicated items sharing its cluster key (itself included). Items
/// outside category=news / entity_type=article are left untouched.
///
/// Two passes: count membership, then write the counts back.
pub fn annotate_mentions(items: &mut [RawItem]) {
    let mut clusters: HashMap<String, u64> = HashMap::new();
    for item in items.iter() {
        if item.is_news_article() {
            *clusters
                .entry(cluster_key(&item.url, &item.title))
                .or_insert(0) += 1;
        }
    }

    if clusters.is_empty() {
        debug!("Clustering - no news articles to cluster");
        return;
    }

    for item in items.iter_mut() {
        if item.is_news_article() {
            if let Some(&count) = clusters.get(&cluster_key(&item.url, &item.title)) {
                item.metrics.mentions_24h = Some(count);
            }
        }
    }

    let max_size = clusters.values().max().copied().unwrap_or(0);
    debug!(
        "Clustering - clusters={}, largest={}",
        clusters.len(),
        max_size
    );
}
