use std::collections::{HashMap, HashSet};

use kidscope_common::{Finding, FindingMetadata, TagStat, VideoRecord};
use tracing::debug;

use super::stats::{format_views, round_to};
use super::{PatternInput, MIN_RECURRENCE, MIN_SAMPLE};

const POPULAR_CONFIDENCE: f64 = 0.8;
const HIGH_PERFORMING_CONFIDENCE: f64 = 0.6;
const TAG_COUNT_CONFIDENCE: f64 = 0.6;
const CATEGORY_CONFIDENCE: f64 = 0.7;

const POPULAR_KEPT: usize = 30;
const POPULAR_SHOWN: usize = 15;
const HIGH_PERFORMING_KEPT: usize = 15;
const CATEGORY_KEPT: usize = 10;

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let tagged: Vec<&VideoRecord> = input.videos.iter().filter(|v| !v.tags.is_empty()).collect();
    if tagged.len() < MIN_SAMPLE {
        debug!(tagged = tagged.len(), "Too few tagged videos");
        return Vec::new();
    }

    let table = tally_tags(&tagged);

    let mut findings = Vec::new();
    findings.extend(popular_tags(&table, tagged.len()));
    findings.extend(high_performing_tags(&table, tagged.len()));
    findings.push(tag_count(&tagged));
    findings.extend(category_tags(input));
    findings
}

/// Lowercased, trimmed tags with usage count and mean views, in first-seen
/// order. A tag repeated on one video counts once.
pub(crate) fn tally_tags(videos: &[&VideoRecord]) -> Vec<TagStat> {
    let mut totals: Vec<(String, usize, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for video in videos {
        let mut seen: HashSet<String> = HashSet::new();
        for tag in &video.tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() || !seen.insert(tag.clone()) {
                continue;
            }
            let i = *index.entry(tag.clone()).or_insert_with(|| {
                totals.push((tag, 0, 0.0));
                totals.len() - 1
            });
            totals[i].1 += 1;
            totals[i].2 += video.view_count as f64;
        }
    }

    totals
        .into_iter()
        .map(|(tag, count, total_views)| TagStat {
            tag,
            count,
            avg_views: round_to(total_views / count.max(1) as f64, 0),
        })
        .collect()
}

fn tag_names(tags: &[TagStat], limit: usize) -> String {
    tags.iter()
        .take(limit)
        .map(|t| t.tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn popular_tags(table: &[TagStat], tagged: usize) -> Option<Finding> {
    let mut popular: Vec<TagStat> = table
        .iter()
        .filter(|t| t.count >= MIN_RECURRENCE)
        .cloned()
        .collect();
    popular.sort_by(|a, b| b.count.cmp(&a.count));
    popular.truncate(POPULAR_KEPT);

    if popular.is_empty() {
        return None;
    }

    Some(Finding::new(
        None,
        format!("Most used tags: {}", tag_names(&popular, POPULAR_SHOWN)),
        POPULAR_CONFIDENCE,
        tagged,
        FindingMetadata::PopularTags { tags: popular },
    ))
}

fn high_performing_tags(table: &[TagStat], tagged: usize) -> Option<Finding> {
    let mut strong: Vec<TagStat> = table
        .iter()
        .filter(|t| t.count >= MIN_SAMPLE)
        .cloned()
        .collect();
    strong.sort_by(|a, b| b.avg_views.total_cmp(&a.avg_views));
    strong.truncate(HIGH_PERFORMING_KEPT);

    let lead = strong.first()?;
    let text = format!(
        "Highest performing tags (used 5+ times): {}; \"{}\" leads with {} avg views",
        tag_names(&strong, HIGH_PERFORMING_KEPT),
        lead.tag,
        format_views(lead.avg_views)
    );

    Some(Finding::new(
        None,
        text,
        HIGH_PERFORMING_CONFIDENCE,
        tagged,
        FindingMetadata::HighPerformingTags { tags: strong },
    ))
}

fn tag_count(tagged: &[&VideoRecord]) -> Finding {
    let total: usize = tagged.iter().map(|v| v.tags.len()).sum();
    let avg_tags_per_video = round_to(total as f64 / tagged.len().max(1) as f64, 1);

    Finding::new(
        None,
        format!("Tagged videos carry {avg_tags_per_video:.1} tags on average"),
        TAG_COUNT_CONFIDENCE,
        tagged.len(),
        FindingMetadata::TagCount { avg_tags_per_video },
    )
}

fn category_tags(input: &PatternInput<'_>) -> Vec<Finding> {
    input
        .by_category(|v| !v.tags.is_empty())
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_SAMPLE)
        .filter_map(|(category, members)| {
            let mut tags = tally_tags(&members);
            tags.sort_by(|a, b| b.count.cmp(&a.count));
            tags.truncate(CATEGORY_KEPT);
            if tags.is_empty() {
                return None;
            }
            Some(Finding::new(
                Some(category),
                format!("Top {category} tags: {}", tag_names(&tags, CATEGORY_KEPT)),
                CATEGORY_CONFIDENCE,
                members.len(),
                FindingMetadata::CategoryTags { tags },
            ))
        })
        .collect()
}
