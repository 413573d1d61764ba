//! Canonical-identity deduplication: collapse items that are the same
//! real-world story reached through cosmetically different URLs/titles.

use std::collections::HashSet;

use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::models::RawItem;
use crate::normalize::{canonical_url, normalize_title};

/// Deterministic digest over the lower-cased input, rendered as fixed-width
/// hex. Collision probability is negligible for per-request key sets.
pub fn digest(s: &str) -> String {
    format!("{:016x}", xxh3_64(s.to_lowercase().as_bytes()))
}

/// Dedup identity: digest of canonical URL + normalized title.
pub fn canonical_key(url: &str, title: &str) -> String {
    digest(&format!(
        "{}{}",
        canonical_url(url),
        normalize_title(title)
    ))
}

/// Keep the first item seen for each canonical key, preserving input order.
/// Sources are concatenated in priority order upstream, so curated API data
/// wins ties against scraped duplicates. The seen-set is local to this call;
/// concurrent pipeline runs never share state.
pub fn dedup_items(items: Vec<RawItem>) -> Vec<RawItem> {
    let before = items.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let mut out: Vec<RawItem> = Vec::with_capacity(before);

    for mut item in items {
        let key = canonical_key(&item.url, &item.title);
        if seen.insert(key.clone()) {
            item.canonical_key = key;
            out.push(item);
        }
    }

    let removed = before - out.len();
    if removed > 0 {
        info!(
            "Deduplication - removed={} duplicates, retained={} unique items",
            removed,
            out.len()
        );
    } else {
        debug!(
            "Deduplication - no duplicates found, retained={} items",
            out.len()
        );
    }
    out
}
