use kidscope_common::{DurationBucket, Finding, FindingMetadata, VideoRecord};
use tracing::debug;

use super::stats::{avg_views, format_views, mean, median, round_to};
use super::{PatternInput, MIN_SAMPLE};

const STATS_CONFIDENCE: f64 = 0.8;
const OPTIMAL_CONFIDENCE: f64 = 0.6;
const CATEGORY_CONFIDENCE: f64 = 0.6;

/// (label, inclusive lower bound, exclusive upper bound) in seconds.
const BUCKETS: [(&str, i64, Option<i64>); 4] = [
    ("0-2min", 0, Some(120)),
    ("2-5min", 120, Some(300)),
    ("5-10min", 300, Some(600)),
    ("10min+", 600, None),
];

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let valid: Vec<&VideoRecord> = input.videos.iter().filter(|v| v.duration > 0).collect();
    if valid.is_empty() {
        debug!("No videos with a known duration");
        return Vec::new();
    }

    let mut findings = vec![duration_stats(&valid)];
    findings.extend(optimal_bucket(&valid));
    findings.extend(category_durations(input));
    findings
}

fn duration_stats(valid: &[&VideoRecord]) -> Finding {
    let seconds: Vec<f64> = valid.iter().map(|v| v.duration as f64).collect();
    let avg_seconds = round_to(mean(&seconds), 0);
    let median_seconds = round_to(median(&seconds), 0);

    Finding::new(
        None,
        format!(
            "Average video length is {} (median {})",
            format_duration(avg_seconds),
            format_duration(median_seconds)
        ),
        STATS_CONFIDENCE,
        valid.len(),
        FindingMetadata::DurationStats {
            avg_seconds,
            median_seconds,
        },
    )
}

pub(crate) fn bucket_stats(valid: &[&VideoRecord]) -> Vec<DurationBucket> {
    BUCKETS
        .iter()
        .map(|&(label, min_seconds, max_seconds)| {
            let members: Vec<&VideoRecord> = valid
                .iter()
                .copied()
                .filter(|v| v.duration >= min_seconds && max_seconds.map_or(true, |max| v.duration < max))
                .collect();
            DurationBucket {
                label: label.to_string(),
                min_seconds,
                max_seconds,
                count: members.len(),
                avg_views: round_to(avg_views(&members), 0),
            }
        })
        .collect()
}

/// Every bucket competes on mean views; only the winner is then required
/// to have [`MIN_SAMPLE`] videos. A thin bucket that wins suppresses the
/// finding rather than handing it to the runner-up.
fn optimal_bucket(valid: &[&VideoRecord]) -> Option<Finding> {
    let buckets = bucket_stats(valid);
    let best = buckets.iter().skip(1).fold(buckets.first()?, |best, bucket| {
        if bucket.avg_views > best.avg_views {
            bucket
        } else {
            best
        }
    });

    if best.count < MIN_SAMPLE {
        debug!(bucket = best.label.as_str(), count = best.count, "Best duration bucket too thin");
        return None;
    }

    let best_bucket = best.label.clone();
    let text = format!(
        "Videos {} long perform best, averaging {} views across {} videos",
        best_bucket,
        format_views(best.avg_views),
        best.count
    );

    Some(Finding::new(
        None,
        text,
        OPTIMAL_CONFIDENCE,
        valid.len(),
        FindingMetadata::OptimalDuration {
            best_bucket,
            buckets,
        },
    ))
}

fn category_durations(input: &PatternInput<'_>) -> Vec<Finding> {
    input
        .by_category(|v| v.duration > 0)
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_SAMPLE)
        .map(|(category, members)| {
            let seconds: Vec<f64> = members.iter().map(|v| v.duration as f64).collect();
            let avg_seconds = round_to(mean(&seconds), 0);
            Finding::new(
                Some(category),
                format!(
                    "{category} videos average {} ({} videos)",
                    format_duration(avg_seconds),
                    members.len()
                ),
                CATEGORY_CONFIDENCE,
                members.len(),
                FindingMetadata::CategoryDuration { avg_seconds },
            )
        })
        .collect()
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}m {:02}s", total / 60, total % 60)
}
