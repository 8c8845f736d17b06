use kidscope_common::VideoRecord;

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; even-length input averages the two middle values.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Mean view count with the divisor floored at 1.
pub(crate) fn avg_views(videos: &[&VideoRecord]) -> f64 {
    let total: f64 = videos.iter().map(|v| v.view_count as f64).sum();
    total / videos.len().max(1) as f64
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Running count and view total for one bucket.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ViewTally {
    pub count: usize,
    pub total_views: f64,
}

impl ViewTally {
    pub fn add(&mut self, views: u64) {
        self.count += 1;
        self.total_views += views as f64;
    }

    pub fn avg_views(&self) -> f64 {
        self.total_views / self.count.max(1) as f64
    }
}

/// `1,234,567` style formatting for finding text.
pub(crate) fn format_views(views: f64) -> String {
    let digits = format!("{:.0}", views.max(0.0));
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
