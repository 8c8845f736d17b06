//! JSON boundary for records handed over by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::types::{ScoreableContent, VideoRecord};

/// Decode a JSON array of video records.
pub fn parse_videos(json: &str) -> Result<Vec<VideoRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Decode one generated script object.
pub fn parse_script(json: &str) -> Result<ScoreableContent> {
    Ok(serde_json::from_str(json)?)
}

/// JSON schema of [`ScoreableContent`], for structured LLM output.
pub fn script_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(ScoreableContent);
    Ok(serde_json::to_value(&schema)?)
}

/// Accepts `null`, `""`, garbage or RFC 3339. Anything unusable becomes `None`.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
