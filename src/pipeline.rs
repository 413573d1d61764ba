//! The aggregation pipeline: dedup → cluster → score → rank → truncate.
//!
//! Synchronous and stateless: all working state (seen-key set, cluster map)
//! is local to one call, so concurrent requests never share anything.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::cluster::annotate_mentions;
use crate::dedup::dedup_items;
use crate::models::{RawItem, ScoredItem, TrendParams};
use crate::score::score_item;

/// Run the full pipeline with the real clock and rng.
pub fn finalize(items: Vec<RawItem>, params: &TrendParams) -> Vec<ScoredItem> {
    finalize_with(items, params, Utc::now(), &mut rand::thread_rng())
}

/// Deterministic seam: same pipeline, caller-supplied clock and rng.
pub fn finalize_with<R: Rng>(
    items: Vec<RawItem>,
    params: &TrendParams,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ScoredItem> {
    let start = std::time::Instant::now();
    let raw_count = items.len();

    let mut items = dedup_items(items);
    annotate_mentions(&mut items);

    let mut scored: Vec<ScoredItem> = items
        .iter()
        .map(|item| score_item(item, now, rng))
        .collect();

    // Stable sort: ties in viral score keep their input (source-priority) order.
    scored.sort_by(|a, b| b.score.viral.total_cmp(&a.score.viral));

    let limit = params.effective_limit();
    scored.truncate(limit);

    debug!(
        "Pipeline - raw={}, deduped={}, limit={}",
        raw_count,
        items.len(),
        limit
    );
    info!(
        "Pipeline completed - duration={:.3}s, ranked={} items",
        start.elapsed().as_secs_f32(),
        scored.len()
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, EntityType, Metrics};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(url: &str, title: &str, metrics: Metrics) -> RawItem {
        RawItem {
            source: "test".to_string(),
            category: Category::News,
            platform: "Test".to_string(),
            entity_type: EntityType::Article,
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            media: Vec::new(),
            author: None,
            published_at: None,
            metrics,
            raw_data: serde_json::Value::Null,
            canonical_key: String::new(),
        }
    }

    fn rank_metrics(rank: u64) -> Metrics {
        Metrics {
            rank: Some(rank),
            ..Metrics::default()
        }
    }

    fn run(items: Vec<RawItem>, limit: Option<i64>) -> Vec<ScoredItem> {
        let params = TrendParams {
            limit,
            ..TrendParams::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        finalize_with(items, &params, Utc::now(), &mut rng)
    }

    #[test]
    fn sorts_descending_and_truncates_to_limit() {
        // rank r scores max(30, 100 - 5r): 2→90, 18→30(floored)… use tweet
        // counts for the low scores so all five are distinct.
        let items = vec![
            item("http://a.com/1", "one", rank_metrics(2)),   // 90
            item(
                "http://a.com/2",
                "two",
                Metrics {
                    tweet_count: Some(2), // log10(3)*20 ≈ 9.5
                    ..Metrics::default()
                },
            ),
            item("http://a.com/3", "three", rank_metrics(4)), // 80
            item("http://a.com/4", "four", rank_metrics(6)),  // 70
            item(
                "http://a.com/5",
                "five",
                Metrics {
                    tweet_count: Some(1), // log10(2)*20 ≈ 6.0
                    ..Metrics::default()
                },
            ),
        ];
        let out = run(items, Some(2));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score.viral, 90.0);
        assert_eq!(out[1].score.viral, 80.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![
            item("http://a.com/1", "first", rank_metrics(3)),
            item("http://b.com/2", "second", rank_metrics(3)),
            item("http://c.com/3", "third", rank_metrics(3)),
        ];
        let out = run(items, None);
        let titles: Vec<&str> = out.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn default_limit_applies_when_unset_or_non_positive() {
        let many: Vec<RawItem> = (0..30)
            .map(|i| {
                item(
                    &format!("http://a.com/{i}"),
                    &format!("title {i}"),
                    rank_metrics(1),
                )
            })
            .collect();
        assert_eq!(run(many.clone(), None).len(), 20);
        assert_eq!(run(many.clone(), Some(0)).len(), 20);
        assert_eq!(run(many, Some(-1)).len(), 20);
    }

    #[test]
    fn dedup_then_cluster_then_score_end_to_end() {
        // Two spellings of the same URL with the same title: one survives,
        // carrying its views_24h score. As the cluster's only member it gets
        // mentions_24h = 1, but the views rule outranks the mentions rule.
        let items = vec![
            item(
                "http://a.com/x",
                "Foo Bar",
                Metrics {
                    views_24h: Some(1000),
                    ..Metrics::default()
                },
            ),
            item("http://www.a.com/x/", "Foo Bar", Metrics::default()),
        ];
        let out = run(items, None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].metrics.views_24h, Some(1000));
        assert_eq!(out[0].metrics.mentions_24h, Some(1));

        let expected = ((1001f64.log10() * 15.0).min(100.0) * 10.0).round() / 10.0;
        assert_eq!(out[0].score.viral, expected);
        assert_eq!(out[0].provenance.source_api, "test");
        assert!(!out[0].provenance.dedup_key.is_empty());
    }

    #[test]
    fn clustered_articles_without_metrics_score_by_mentions() {
        // Three same-story articles from one outlet, no engagement metrics:
        // each scores mentions_24h * 10 = 30.
        let items = vec![
            item(
                "http://n.com/1",
                "big event shakes the city today",
                Metrics::default(),
            ),
            item(
                "http://n.com/2",
                "big event shakes the city again",
                Metrics::default(),
            ),
            item(
                "http://n.com/3",
                "big event shakes the city overnight",
                Metrics::default(),
            ),
        ];
        let out = run(items, None);
        assert_eq!(out.len(), 3);
        for it in &out {
            assert_eq!(it.metrics.mentions_24h, Some(3));
            assert_eq!(it.score.viral, 30.0);
            assert_eq!(it.score.confidence, 0.7);
        }
    }

    #[test]
    fn concurrent_invocations_are_isolated() {
        // Same input from several threads; per-call state means identical
        // outcomes (modulo timestamps) and no cross-talk.
        let build = || {
            vec![
                item("http://a.com/x", "Foo Bar", rank_metrics(1)),
                item("http://www.a.com/x/", "foo  bar", rank_metrics(2)),
            ]
        };
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let items = build();
                std::thread::spawn(move || run(items, None))
            })
            .collect();
        for h in handles {
            let out = h.join().expect("pipeline thread panicked");
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].score.viral, 95.0);
        }
    }
}
