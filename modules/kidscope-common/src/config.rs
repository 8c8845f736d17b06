use std::env;

use tracing::info;

use crate::error::{KidscopeError, Result};

const PARALLEL_DETECTORS_VAR: &str = "KIDSCOPE_PARALLEL_DETECTORS";

/// Runtime knobs for the analysis engines, loaded from environment variables.
///
/// Scoring thresholds are fixed constants and do not live here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Run the pattern sub-detectors on the rayon pool.
    pub parallel_detectors: bool,
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parallel_detectors = match lookup(PARALLEL_DETECTORS_VAR) {
            Some(raw) => parse_bool(PARALLEL_DETECTORS_VAR, &raw)?,
            None => false,
        };

        Ok(Self { parallel_detectors })
    }

    pub fn log(&self) {
        info!(
            parallel_detectors = self.parallel_detectors,
            "Analysis config loaded"
        );
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(KidscopeError::Config(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}
