use std::collections::BTreeMap;

use kidscope_common::{Category, CategoryResult, VideoRecord};
use tracing::debug;

use super::{raw_scores, resolve};

/// Classify a whole channel from its videos.
///
/// Each video's raw scores are weighted by `log10(views)` and the weighted
/// mean decides the winner, so a single viral upload can't drown out many
/// moderately watched videos with a clearer signal.
pub fn categorize_channel(videos: &[VideoRecord]) -> CategoryResult {
    if videos.is_empty() {
        return CategoryResult::uncategorized();
    }

    let mut aggregated: BTreeMap<Category, f64> = BTreeMap::new();
    let mut total_weight = 0.0;

    for video in videos {
        let weight = view_weight(video.view_count);
        for (category, score) in raw_scores(video) {
            *aggregated.entry(category).or_insert(0.0) += score * weight;
        }
        total_weight += weight;
    }

    if total_weight > 0.0 {
        for score in aggregated.values_mut() {
            *score /= total_weight;
        }
    }

    let result = resolve(aggregated);
    debug!(
        videos = videos.len(),
        total_weight,
        category = %result.category,
        confidence = result.confidence,
        "Categorized channel"
    );
    result
}

/// Never negative; 0 and 1 views both weigh nothing.
fn view_weight(views: u64) -> f64 {
    (views.max(1) as f64).log10()
}
