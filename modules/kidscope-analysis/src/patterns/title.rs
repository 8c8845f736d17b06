use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use kidscope_common::{Finding, FindingMetadata, KeywordCount, VideoRecord, ViewComparison};
use regex::Regex;
use tracing::debug;

use super::stats::{avg_views, format_views, mean, round_to};
use super::{PatternInput, MIN_RECURRENCE, MIN_SAMPLE};

const TITLE_LENGTH_CONFIDENCE: f64 = 0.6;
const EMOJI_CONFIDENCE: f64 = 0.5;
const NUMBERS_CONFIDENCE: f64 = 0.5;
const KEYWORDS_CONFIDENCE: f64 = 0.7;
const CATEGORY_TITLE_CONFIDENCE: f64 = 0.5;

/// Titles at or under this many characters count as short.
pub const SHORT_TITLE_MAX_CHARS: usize = 40;
/// Top performers are the best `1 / TOP_PERFORMER_DIVISOR` of the corpus.
const TOP_PERFORMER_DIVISOR: usize = 5;
const MAX_KEYWORDS: usize = 10;

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1F300}-\x{1F5FF}\x{1F600}-\x{1F64F}\x{1F680}-\x{1F6FF}\x{1F900}-\x{1F9FF}\x{1FA70}-\x{1FAFF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]",
    )
    .unwrap()
});
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let videos = input.videos;
    if videos.is_empty() {
        return Vec::new();
    }

    let mut findings = vec![title_length(videos)];
    findings.extend(feature_effect(videos, &EMOJI_RE, "emoji"));
    findings.extend(feature_effect(videos, &DIGIT_RE, "numbers"));
    findings.extend(top_keywords(videos));
    findings.extend(category_title_lengths(input));
    findings
}

fn title_len(video: &VideoRecord) -> usize {
    video.title.chars().count()
}

fn title_length(videos: &[VideoRecord]) -> Finding {
    let lengths: Vec<f64> = videos.iter().map(|v| title_len(v) as f64).collect();
    let avg_length = round_to(mean(&lengths), 1);

    let (short, long): (Vec<&VideoRecord>, Vec<&VideoRecord>) = videos
        .iter()
        .partition(|v| title_len(v) <= SHORT_TITLE_MAX_CHARS);
    let short_avg_views = round_to(avg_views(&short), 0);
    let long_avg_views = round_to(avg_views(&long), 0);

    let leader = if short_avg_views >= long_avg_views {
        "Short"
    } else {
        "Long"
    };

    Finding::new(
        None,
        format!(
            "Average title length is {avg_length:.0} characters. {leader} titles perform better: \
             short (≤{SHORT_TITLE_MAX_CHARS} chars) average {} views vs {} for longer titles",
            format_views(short_avg_views),
            format_views(long_avg_views)
        ),
        TITLE_LENGTH_CONFIDENCE,
        videos.len(),
        FindingMetadata::TitleLength {
            avg_length,
            short_count: short.len(),
            long_count: long.len(),
            short_avg_views,
            long_avg_views,
        },
    )
}

/// Compare views of titles with and without a feature. Needs at least
/// [`MIN_SAMPLE`] titles carrying it.
fn feature_effect(videos: &[VideoRecord], feature: &Regex, label: &str) -> Option<Finding> {
    let (with, without): (Vec<&VideoRecord>, Vec<&VideoRecord>) =
        videos.iter().partition(|v| feature.is_match(&v.title));

    if with.len() < MIN_SAMPLE {
        debug!(feature = label, matching = with.len(), "Too few titles for feature comparison");
        return None;
    }

    let comparison = ViewComparison {
        with_count: with.len(),
        without_count: without.len(),
        with_avg_views: round_to(avg_views(&with), 0),
        without_avg_views: round_to(avg_views(&without), 0),
    };
    let text = format!(
        "Titles with {label} average {} views vs {} without ({} of {} videos use {label})",
        format_views(comparison.with_avg_views),
        format_views(comparison.without_avg_views),
        with.len(),
        videos.len()
    );

    let (confidence, metadata) = if label == "emoji" {
        (EMOJI_CONFIDENCE, FindingMetadata::TitleEmoji(comparison))
    } else {
        (NUMBERS_CONFIDENCE, FindingMetadata::TitleNumbers(comparison))
    };

    Some(Finding::new(None, text, confidence, videos.len(), metadata))
}

/// Words recurring across the titles of the best performing fifth of the corpus.
fn top_keywords(videos: &[VideoRecord]) -> Option<Finding> {
    let mut ranked: Vec<&VideoRecord> = videos.iter().collect();
    ranked.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    let top_count = videos.len().div_ceil(TOP_PERFORMER_DIVISOR).max(1);
    let top = &ranked[..top_count.min(ranked.len())];

    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for video in top {
        let title = video.title.to_lowercase();
        let mut seen: HashSet<&str> = HashSet::new();
        for word in title.split(|c: char| !c.is_alphanumeric()) {
            if word.chars().count() <= 3 || !seen.insert(word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push(KeywordCount {
                        keyword: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.retain(|k| k.count >= MIN_RECURRENCE);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(MAX_KEYWORDS);

    if counts.is_empty() {
        return None;
    }

    let listed: Vec<String> = counts
        .iter()
        .map(|k| format!("\"{}\" ({})", k.keyword, k.count))
        .collect();

    Some(Finding::new(
        None,
        format!(
            "Recurring title words among the top {top_count} videos by views: {}",
            listed.join(", ")
        ),
        KEYWORDS_CONFIDENCE,
        top_count,
        FindingMetadata::TitleKeywords {
            top_video_count: top_count,
            keywords: counts,
        },
    ))
}

fn category_title_lengths(input: &PatternInput<'_>) -> Vec<Finding> {
    input
        .by_category(|_| true)
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_SAMPLE)
        .map(|(category, members)| {
            let lengths: Vec<f64> = members.iter().map(|v| title_len(v) as f64).collect();
            let avg_length = round_to(mean(&lengths), 1);
            let mean_views = round_to(avg_views(&members), 0);
            Finding::new(
                Some(category),
                format!(
                    "{category} titles average {avg_length:.0} characters ({} videos, {} avg views)",
                    members.len(),
                    format_views(mean_views)
                ),
                CATEGORY_TITLE_CONFIDENCE,
                members.len(),
                FindingMetadata::CategoryTitleLength {
                    avg_length,
                    avg_views: mean_views,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kidscope_common::PatternType;

    fn video(id: usize, title: &str, views: u64) -> VideoRecord {
        VideoRecord {
            id: format!("v{id}"),
            title: title.to_string(),
            view_count: views,
            ..Default::default()
        }
    }

    #[test]
    fn forty_chars_is_still_short() {
        let title = "a".repeat(40);
        let videos = vec![video(0, &title, 100), video(1, &"b".repeat(41), 50)];

        let finding = title_length(&videos);

        match finding.metadata {
            FindingMetadata::TitleLength {
                short_count,
                long_count,
                short_avg_views,
                long_avg_views,
                ..
            } => {
                assert_eq!(short_count, 1);
                assert_eq!(long_count, 1);
                assert_eq!(short_avg_views, 100.0);
                assert_eq!(long_avg_views, 50.0);
            }
            other => panic!("unexpected metadata {other:?}"),
        }
    }

    #[test]
    fn emoji_comparison_needs_five_matching_titles() {
        let mut videos: Vec<VideoRecord> =
            (0..4).map(|i| video(i, "Fun day 🎉", 1000)).collect();
        videos.push(video(9, "Plain", 10));
        assert!(feature_effect(&videos, &EMOJI_RE, "emoji").is_none());

        videos.push(video(4, "Party 🌟", 1000));
        let finding = feature_effect(&videos, &EMOJI_RE, "emoji").unwrap();
        assert_eq!(finding.pattern_type, PatternType::TitleEmoji);
        assert_eq!(finding.sample_size, 6);
    }

    #[test]
    fn emoji_comparison_survives_empty_without_group() {
        let videos: Vec<VideoRecord> = (0..5).map(|i| video(i, "🐶 dog", 500)).collect();

        let finding = feature_effect(&videos, &EMOJI_RE, "emoji").unwrap();

        match finding.metadata {
            FindingMetadata::TitleEmoji(c) => {
                assert_eq!(c.without_count, 0);
                assert_eq!(c.without_avg_views, 0.0);
            }
            other => panic!("unexpected metadata {other:?}"),
        }
    }

    #[test]
    fn digit_titles_are_detected() {
        let videos: Vec<VideoRecord> = (0..5).map(|i| video(i, "Top 10 songs", 500)).collect();
        let finding = feature_effect(&videos, &DIGIT_RE, "numbers").unwrap();
        assert_eq!(finding.pattern_type, PatternType::TitleNumbers);
    }

    #[test]
    fn keywords_come_from_top_fifth_and_need_three_videos() {
        // 15 videos: top 3 by views all say "dinosaur"; the rest say "tractor".
        let mut videos: Vec<VideoRecord> = (0..3)
            .map(|i| video(i, "Dinosaur dance party", 10_000 + i as u64))
            .collect();
        videos.extend((3..15).map(|i| video(i, "Tractor time", 10)));

        let finding = top_keywords(&videos).unwrap();

        match finding.metadata {
            FindingMetadata::TitleKeywords {
                top_video_count,
                keywords,
            } => {
                assert_eq!(top_video_count, 3);
                let words: Vec<&str> = keywords.iter().map(|k| k.keyword.as_str()).collect();
                assert_eq!(words, vec!["dinosaur", "dance", "party"]);
                assert!(keywords.iter().all(|k| k.count == 3));
            }
            other => panic!("unexpected metadata {other:?}"),
        }
    }

    #[test]
    fn repeated_word_in_one_title_counts_once() {
        let videos: Vec<VideoRecord> = (0..5)
            .map(|i| video(i, "Bubbles bubbles bubbles", 100))
            .collect();
        // Top fifth of 5 videos is a single video, so nothing can recur 3 times.
        assert!(top_keywords(&videos).is_none());
    }

    #[test]
    fn short_words_are_ignored() {
        let videos: Vec<VideoRecord> = (0..15).map(|i| video(i, "The cat and dog", 100)).collect();
        assert!(top_keywords(&videos).is_none());
    }
}
