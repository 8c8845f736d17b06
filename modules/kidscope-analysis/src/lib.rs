//! Scoring engines for children's video content.
//!
//! Three deterministic engines over in-memory records:
//! - [`categorizer`]: keyword/tag weighted categories for videos and channels
//! - [`patterns`]: metadata/performance correlations across a corpus
//! - [`quality`]: the educational quality gate for generated scripts
//!
//! Nothing here performs I/O. Sparse or degenerate input yields empty or
//! low-confidence results, never errors.

pub mod categorizer;
pub mod patterns;
pub mod quality;

pub use categorizer::{
    categorize_channel, categorize_video, categorize_videos, categorize_videos_by_id,
};
pub use patterns::{detect_patterns, detect_patterns_with, PatternInput};
pub use quality::{check_anti_brain_rot_rules, score_content, PASSING_THRESHOLD};
