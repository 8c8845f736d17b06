//! Keyword and tag weighted content categorization.
//!
//! Every category is scored independently against one video; the highest
//! score wins, ties going to the earlier category in declaration order.

mod channel;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use kidscope_common::{Category, CategoryResult, VideoRecord};
use tracing::debug;

pub use channel::categorize_channel;

/// Keyword found in the title.
pub const TITLE_KEYWORD_WEIGHT: f64 = 3.0;
/// Keyword found only in the description.
pub const TEXT_KEYWORD_WEIGHT: f64 = 1.0;
/// Tag-weight phrase contained in any tag.
pub const TAG_WEIGHT: f64 = 2.0;

/// Classify one video.
pub fn categorize_video(video: &VideoRecord) -> CategoryResult {
    let result = resolve(raw_scores(video));
    debug!(
        video_id = video.id.as_str(),
        category = %result.category,
        confidence = result.confidence,
        "Categorized video"
    );
    result
}

pub fn categorize_videos(videos: &[VideoRecord]) -> Vec<CategoryResult> {
    videos.iter().map(categorize_video).collect()
}

/// Per-video results keyed by video id, as consumed by the pattern detector.
pub fn categorize_videos_by_id(videos: &[VideoRecord]) -> HashMap<String, CategoryResult> {
    videos
        .iter()
        .map(|video| (video.id.clone(), categorize_video(video)))
        .collect()
}

/// Raw (unnormalized) score of every category for one video.
pub fn raw_scores(video: &VideoRecord) -> BTreeMap<Category, f64> {
    let title = video.title.to_lowercase();
    let text = format!("{} {}", title, video.description.to_lowercase());
    let tags: Vec<String> = video.tags.iter().map(|t| t.to_lowercase()).collect();

    Category::ALL
        .into_iter()
        .map(|category| (category, score_category(category, &title, &text, &tags)))
        .collect()
}

fn score_category(category: Category, title: &str, text: &str, tags: &[String]) -> f64 {
    let mut score = 0.0;

    for keyword in category.keywords() {
        if title.contains(keyword) {
            score += TITLE_KEYWORD_WEIGHT;
        } else if text.contains(keyword) {
            score += TEXT_KEYWORD_WEIGHT;
        }
    }

    for phrase in category.tag_weights() {
        if tags.iter().any(|tag| tag.contains(phrase)) {
            score += TAG_WEIGHT;
        }
    }

    score
}

/// Pick the winner from a score table.
///
/// Stable sort over declaration order, then index 0, so equal scores keep
/// the earlier category. A zero top score always resolves to `Other`.
pub(crate) fn resolve(scores: BTreeMap<Category, f64>) -> CategoryResult {
    let mut ranked: Vec<(Category, f64)> = Category::ALL
        .into_iter()
        .map(|category| (category, scores.get(&category).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let (top_category, top_score) = ranked.first().copied().unwrap_or((Category::Other, 0.0));
    let total: f64 = scores.values().sum();

    let confidence = if total > 0.0 {
        round2((top_score / total).clamp(0.0, 1.0))
    } else {
        0.0
    };
    let category = if top_score == 0.0 {
        Category::Other
    } else {
        top_category
    };

    CategoryResult {
        category,
        confidence,
        scores,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, description: &str, tags: &[&str]) -> VideoRecord {
        VideoRecord {
            id: "v".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn title_keyword_scores_three() {
        let scores = raw_scores(&video("Dinosaur Unboxing", "", &[]));
        assert_eq!(scores[&Category::Unboxing], 3.0);
    }

    #[test]
    fn description_keyword_scores_one() {
        let scores = raw_scores(&video("Big day", "we try some unboxing today", &[]));
        assert_eq!(scores[&Category::Unboxing], 1.0);
    }

    #[test]
    fn keyword_in_title_and_description_counts_once_at_title_weight() {
        let scores = raw_scores(&video("Unboxing", "more unboxing", &[]));
        assert_eq!(scores[&Category::Unboxing], 3.0);
    }

    #[test]
    fn tag_phrase_counts_once_even_across_many_tags() {
        let scores = raw_scores(&video("x", "", &["Challenge", "big challenge", "CHALLENGE 2"]));
        assert_eq!(scores[&Category::Challenge], 2.0);
    }

    #[test]
    fn every_category_is_scored() {
        let scores = raw_scores(&video("", "", &[]));
        assert_eq!(scores.len(), Category::ALL.len());
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn ties_go_to_earlier_category() {
        let mut scores: BTreeMap<Category, f64> =
            Category::ALL.into_iter().map(|c| (c, 0.0)).collect();
        scores.insert(Category::Unboxing, 3.0);
        scores.insert(Category::Song, 3.0);

        let result = resolve(scores);

        assert_eq!(result.category, Category::Song);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn zero_scores_resolve_to_other_with_zero_confidence() {
        let result = categorize_video(&video("hello", "world", &[]));
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        let mut scores = BTreeMap::new();
        scores.insert(Category::Story, 2.0);
        scores.insert(Category::Song, 1.0);

        let result = resolve(scores);

        assert_eq!(result.category, Category::Story);
        assert_eq!(result.confidence, 0.67);
    }
}
