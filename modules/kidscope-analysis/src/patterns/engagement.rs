use kidscope_common::{Finding, FindingMetadata, VideoRecord};
use tracing::debug;

use super::stats::{avg_views, format_views, mean, round_to};
use super::{PatternInput, MIN_SAMPLE};

const RATE_CONFIDENCE: f64 = 0.8;
const CATEGORY_CONFIDENCE: f64 = 0.6;

/// (likes + comments) / views, with the view divisor floored at 1.
fn engagement_rate(video: &VideoRecord) -> f64 {
    (video.like_count as f64 + video.comment_count as f64) / video.view_count.max(1) as f64
}

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let viewed: Vec<&VideoRecord> = input.videos.iter().filter(|v| v.view_count > 0).collect();
    if viewed.is_empty() {
        debug!("No viewed videos; engagement undefined");
        return Vec::new();
    }

    let rates: Vec<f64> = viewed.iter().map(|v| engagement_rate(v)).collect();
    let avg_rate_percent = round_to(mean(&rates) * 100.0, 2);

    let mut findings = vec![Finding::new(
        None,
        format!(
            "Average engagement rate (likes + comments per view) is {avg_rate_percent:.2}%"
        ),
        RATE_CONFIDENCE,
        viewed.len(),
        FindingMetadata::EngagementRate { avg_rate_percent },
    )];
    findings.extend(category_engagement(input));
    findings
}

/// Unlike the corpus-wide rate, unwatched videos stay in and count as 0.
fn category_engagement(input: &PatternInput<'_>) -> Vec<Finding> {
    input
        .by_category(|_| true)
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_SAMPLE)
        .map(|(category, members)| {
            let rates: Vec<f64> = members.iter().map(|v| engagement_rate(v)).collect();
            let avg_rate_percent = round_to(mean(&rates) * 100.0, 2);
            let mean_views = round_to(avg_views(&members), 0);
            Finding::new(
                Some(category),
                format!(
                    "{category} videos engage at {avg_rate_percent:.2}% with {} avg views",
                    format_views(mean_views)
                ),
                CATEGORY_CONFIDENCE,
                members.len(),
                FindingMetadata::CategoryEngagement {
                    avg_rate_percent,
                    avg_views: mean_views,
                },
            )
        })
        .collect()
}
