//! Text-on-thumbnail proxy.
//!
//! We never look at pixels. Channels that shout in their titles ("BIG
//! SURPRISE") almost always shout on the thumbnail too, so a run of capital
//! letters in the title stands in for bold thumbnail text.

use std::sync::LazyLock;

use kidscope_common::{Finding, FindingMetadata, VideoRecord, ViewComparison};
use regex::Regex;
use tracing::debug;

use super::stats::{avg_views, format_views, round_to};
use super::{PatternInput, MIN_SAMPLE};

const THUMBNAIL_CONFIDENCE: f64 = 0.4;

static CAPS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]{3,}").unwrap());

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let (caps, plain): (Vec<&VideoRecord>, Vec<&VideoRecord>) =
        input.videos.iter().partition(|v| CAPS_RE.is_match(&v.title));

    if caps.len() < MIN_SAMPLE {
        debug!(caps = caps.len(), "Too few all-caps titles for thumbnail proxy");
        return Vec::new();
    }

    let comparison = ViewComparison {
        with_count: caps.len(),
        without_count: plain.len(),
        with_avg_views: round_to(avg_views(&caps), 0),
        without_avg_views: round_to(avg_views(&plain), 0),
    };
    let ratio = comparison.with_avg_views / comparison.without_avg_views.max(1.0);

    vec![Finding::new(
        None,
        format!(
            "Titles with ALL-CAPS words (a proxy for bold thumbnail text) average {} views vs {} \
             without ({ratio:.1}x)",
            format_views(comparison.with_avg_views),
            format_views(comparison.without_avg_views)
        ),
        THUMBNAIL_CONFIDENCE,
        input.videos.len(),
        FindingMetadata::ThumbnailText(comparison),
    )]
}
