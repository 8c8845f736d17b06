//! Statistical pattern mining over a categorized video corpus.
//!
//! Six independent sub-detectors each look at one facet of the corpus
//! (titles, durations, upload timing, tags, thumbnail text, engagement)
//! and emit zero or more [`Finding`]s. None of them share state, so they
//! can run on the rayon pool without changing the output.

mod duration;
mod engagement;
mod stats;
mod tags;
mod thumbnail;
mod title;
mod upload;

use std::collections::HashMap;

use kidscope_common::{AnalysisConfig, Category, CategoryResult, Finding, VideoRecord};
use rayon::prelude::*;
use tracing::{debug, info};

/// Smallest group worth reporting on for most comparisons.
pub const MIN_SAMPLE: usize = 5;
/// Smallest recurrence count for keywords, popular tags and upload hours.
pub const MIN_RECURRENCE: usize = 3;
/// Dated videos required before upload timing is analyzed.
pub const MIN_DATED_VIDEOS: usize = 10;
/// Most recent dated videos used for upload frequency.
pub const FREQUENCY_WINDOW: usize = 20;

/// Everything the detectors look at. Videos missing from `categories` are
/// left out of per-category findings but still count corpus-wide.
#[derive(Debug, Clone, Copy)]
pub struct PatternInput<'a> {
    pub videos: &'a [VideoRecord],
    pub categories: &'a HashMap<String, CategoryResult>,
}

impl<'a> PatternInput<'a> {
    pub fn new(
        videos: &'a [VideoRecord],
        categories: &'a HashMap<String, CategoryResult>,
    ) -> Self {
        Self { videos, categories }
    }

    pub(crate) fn category_of(&self, video: &VideoRecord) -> Option<Category> {
        self.categories.get(&video.id).map(|c| c.category)
    }

    /// Videos passing `keep`, grouped by category in declaration order.
    pub(crate) fn by_category<F>(&self, keep: F) -> Vec<(Category, Vec<&'a VideoRecord>)>
    where
        F: Fn(&VideoRecord) -> bool,
    {
        let mut groups: Vec<(Category, Vec<&'a VideoRecord>)> = Category::ALL
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();

        for video in self.videos.iter().filter(|v| keep(v)) {
            if let Some(category) = self.category_of(video) {
                if let Some((_, members)) = groups.iter_mut().find(|(c, _)| *c == category) {
                    members.push(video);
                }
            }
        }

        groups.retain(|(_, members)| !members.is_empty());
        groups
    }
}

type Detector = fn(&PatternInput<'_>) -> Vec<Finding>;

const DETECTORS: [(&str, Detector); 6] = [
    ("title", title::detect),
    ("duration", duration::detect),
    ("upload_time", upload::detect),
    ("tags", tags::detect),
    ("thumbnail", thumbnail::detect),
    ("engagement", engagement::detect),
];

/// Run every sub-detector sequentially.
pub fn detect_patterns(input: &PatternInput<'_>) -> Vec<Finding> {
    detect_patterns_with(input, &AnalysisConfig::default())
}

/// Run every sub-detector, on the rayon pool if the config asks for it.
/// Findings come back in detector order either way.
pub fn detect_patterns_with(input: &PatternInput<'_>, config: &AnalysisConfig) -> Vec<Finding> {
    if input.videos.is_empty() {
        return Vec::new();
    }

    let detectors: &[(&str, Detector)] = &DETECTORS;
    let batches: Vec<Vec<Finding>> = if config.parallel_detectors {
        detectors
            .par_iter()
            .map(|(name, detector)| run_detector(name, *detector, input))
            .collect()
    } else {
        detectors
            .iter()
            .map(|(name, detector)| run_detector(name, *detector, input))
            .collect()
    };

    let findings: Vec<Finding> = batches.into_iter().flatten().collect();
    info!(
        videos = input.videos.len(),
        findings = findings.len(),
        parallel = config.parallel_detectors,
        "Pattern detection complete"
    );
    findings
}

fn run_detector(name: &str, detector: Detector, input: &PatternInput<'_>) -> Vec<Finding> {
    let findings = detector(input);
    debug!(detector = name, findings = findings.len(), "Detector finished");
    findings
}
