use chrono::{DateTime, Datelike, Timelike, Utc};
use kidscope_common::{Finding, FindingMetadata, TimeSlot, VideoRecord};
use tracing::debug;

use super::stats::{format_views, round_to, ViewTally};
use super::{PatternInput, FREQUENCY_WINDOW, MIN_DATED_VIDEOS, MIN_RECURRENCE};

const DAY_CONFIDENCE: f64 = 0.5;
const HOUR_CONFIDENCE: f64 = 0.4;
const FREQUENCY_CONFIDENCE: f64 = 0.7;

const TOP_DAYS: usize = 3;
const TOP_HOURS: usize = 5;
const SECONDS_PER_WEEK: f64 = 7.0 * 24.0 * 3600.0;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub(crate) fn detect(input: &PatternInput<'_>) -> Vec<Finding> {
    let dated: Vec<(&VideoRecord, DateTime<Utc>)> = input
        .videos
        .iter()
        .filter_map(|v| v.published_at.map(|at| (v, at)))
        .collect();

    if dated.len() < MIN_DATED_VIDEOS {
        debug!(dated = dated.len(), "Too few dated videos for upload timing");
        return Vec::new();
    }

    let mut findings = vec![best_days(&dated)];
    findings.extend(best_hours(&dated));
    findings.extend(upload_frequency(&dated));
    findings
}

/// Occupied slots ranked by exact mean views; ties keep slot order. Only
/// the reported mean is rounded.
fn ranked_slots(tallies: &[ViewTally], label: impl Fn(usize) -> String) -> Vec<TimeSlot> {
    let mut occupied: Vec<(usize, &ViewTally)> = tallies
        .iter()
        .enumerate()
        .filter(|(_, t)| t.count > 0)
        .collect();
    occupied.sort_by(|(_, a), (_, b)| b.avg_views().total_cmp(&a.avg_views()));

    occupied
        .into_iter()
        .map(|(slot, t)| TimeSlot {
            slot: slot as u32,
            label: label(slot),
            count: t.count,
            avg_views: round_to(t.avg_views(), 0),
        })
        .collect()
}

fn describe(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|s| format!("{} ({} avg views)", s.label, format_views(s.avg_views)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn best_days(dated: &[(&VideoRecord, DateTime<Utc>)]) -> Finding {
    let mut tallies = [ViewTally::default(); 7];
    for (video, at) in dated {
        tallies[at.weekday().num_days_from_sunday() as usize].add(video.view_count);
    }

    let mut top_days = ranked_slots(&tallies, |day| DAY_NAMES[day].to_string());
    top_days.truncate(TOP_DAYS);

    Finding::new(
        None,
        format!("Best upload days (UTC): {}", describe(&top_days)),
        DAY_CONFIDENCE,
        dated.len(),
        FindingMetadata::UploadDay { top_days },
    )
}

fn best_hours(dated: &[(&VideoRecord, DateTime<Utc>)]) -> Option<Finding> {
    let mut tallies = [ViewTally::default(); 24];
    for (video, at) in dated {
        tallies[at.hour() as usize].add(video.view_count);
    }
    for tally in tallies.iter_mut().filter(|t| t.count < MIN_RECURRENCE) {
        *tally = ViewTally::default();
    }

    let mut top_hours = ranked_slots(&tallies, |hour| format!("{hour:02}:00"));
    top_hours.truncate(TOP_HOURS);

    if top_hours.is_empty() {
        debug!("No upload hour used often enough");
        return None;
    }

    Some(Finding::new(
        None,
        format!("Best upload hours (UTC): {}", describe(&top_hours)),
        HOUR_CONFIDENCE,
        dated.len(),
        FindingMetadata::UploadHour { top_hours },
    ))
}

fn upload_frequency(dated: &[(&VideoRecord, DateTime<Utc>)]) -> Option<Finding> {
    let mut recent: Vec<DateTime<Utc>> = dated.iter().map(|(_, at)| *at).collect();
    recent.sort_by(|a, b| b.cmp(a));
    recent.truncate(FREQUENCY_WINDOW);

    let newest = *recent.first()?;
    let oldest = *recent.last()?;
    let weeks = (newest - oldest).num_seconds() as f64 / SECONDS_PER_WEEK;
    if weeks <= 0.0 {
        debug!("Recent uploads share one timestamp; frequency undefined");
        return None;
    }

    let videos_per_week = round_to(recent.len() as f64 / weeks, 1);

    Some(Finding::new(
        None,
        format!(
            "Uploads roughly {videos_per_week:.1} videos per week (last {} uploads)",
            recent.len()
        ),
        FREQUENCY_CONFIDENCE,
        recent.len(),
        FindingMetadata::UploadFrequency {
            videos_per_week,
            weeks_spanned: round_to(weeks, 1),
        },
    ))
}
