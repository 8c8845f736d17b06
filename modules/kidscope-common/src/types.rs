use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::KidscopeError;

// --- Video Records ---

/// One video as fetched from the platform. Produced upstream and never mutated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `None` when the upstream record had no usable publish date.
    #[serde(default, deserialize_with = "crate::wire::lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    /// Seconds. Zero (or negative) means the duration is unknown.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: String,
}

// --- Categories ---

/// Closed set of content labels. Declaration order is the tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NurseryRhyme,
    Song,
    Educational,
    Story,
    Animation,
    Roleplay,
    Challenge,
    Unboxing,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::NurseryRhyme,
        Category::Song,
        Category::Educational,
        Category::Story,
        Category::Animation,
        Category::Roleplay,
        Category::Challenge,
        Category::Unboxing,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NurseryRhyme => "nursery_rhyme",
            Category::Song => "song",
            Category::Educational => "educational",
            Category::Story => "story",
            Category::Animation => "animation",
            Category::Roleplay => "roleplay",
            Category::Challenge => "challenge",
            Category::Unboxing => "unboxing",
            Category::Other => "other",
        }
    }

    /// Phrases matched against the lowercased title and description.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::NurseryRhyme => &[
                "nursery rhyme",
                "rhymes",
                "baby shark",
                "wheels on the bus",
                "twinkle twinkle",
                "old macdonald",
                "itsy bitsy",
                "humpty dumpty",
                "finger family",
                "lullaby",
                "johny johny",
            ],
            Category::Song => &[
                "song",
                "sing along",
                "sing-along",
                "music",
                "dance",
                "karaoke",
                "lyrics",
            ],
            Category::Educational => &[
                "learn",
                "abc",
                "alphabet",
                "numbers",
                "counting",
                "colors",
                "shapes",
                "phonics",
                "educational",
                "preschool",
                "math",
                "science",
            ],
            Category::Story => &[
                "story",
                "stories",
                "fairy tale",
                "bedtime",
                "read aloud",
                "once upon a time",
                "storytime",
            ],
            Category::Animation => &[
                "cartoon",
                "animation",
                "animated",
                "full episode",
                "episodes",
                "3d",
            ],
            Category::Roleplay => &[
                "pretend play",
                "pretend",
                "role play",
                "roleplay",
                "dress up",
                "playing house",
                "play doctor",
            ],
            Category::Challenge => &[
                "challenge",
                "24 hours",
                "last to leave",
                "try not to laugh",
                "versus",
            ],
            Category::Unboxing => &[
                "unboxing",
                "toy review",
                "surprise eggs",
                "surprise toys",
                "opening",
                "toy haul",
            ],
            Category::Other => &[],
        }
    }

    /// Phrases matched as substrings of the lowercased tags.
    pub fn tag_weights(&self) -> &'static [&'static str] {
        match self {
            Category::NurseryRhyme => &["nursery rhyme", "kids songs", "baby songs", "rhymes"],
            Category::Song => &["song", "music", "sing"],
            Category::Educational => &[
                "education",
                "learning",
                "preschool",
                "toddler learning",
                "abc",
            ],
            Category::Story => &["story", "bedtime", "fairy tale"],
            Category::Animation => &["cartoon", "animation"],
            Category::Roleplay => &["pretend", "role play", "roleplay"],
            Category::Challenge => &["challenge"],
            Category::Unboxing => &["unboxing", "toys", "surprise"],
            Category::Other => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = KidscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| KidscopeError::UnknownCategory(s.to_string()))
    }
}

/// Weighted category distribution for one video or one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    /// Winning score's share of the total, rounded to 2 decimals.
    pub confidence: f64,
    pub scores: BTreeMap<Category, f64>,
}

impl CategoryResult {
    /// The result for an input with nothing to classify.
    pub fn uncategorized() -> Self {
        Self {
            category: Category::Other,
            confidence: 0.0,
            scores: BTreeMap::new(),
        }
    }
}

// --- Findings ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    TitleLength,
    TitleEmoji,
    TitleNumbers,
    TitleKeywords,
    CategoryTitleLength,
    DurationStats,
    OptimalDuration,
    CategoryDuration,
    UploadDay,
    UploadHour,
    UploadFrequency,
    PopularTags,
    HighPerformingTags,
    TagCount,
    CategoryTags,
    ThumbnailText,
    EngagementRate,
    CategoryEngagement,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternType::TitleLength => "title_length",
            PatternType::TitleEmoji => "title_emoji",
            PatternType::TitleNumbers => "title_numbers",
            PatternType::TitleKeywords => "title_keywords",
            PatternType::CategoryTitleLength => "category_title_length",
            PatternType::DurationStats => "duration_stats",
            PatternType::OptimalDuration => "optimal_duration",
            PatternType::CategoryDuration => "category_duration",
            PatternType::UploadDay => "upload_day",
            PatternType::UploadHour => "upload_hour",
            PatternType::UploadFrequency => "upload_frequency",
            PatternType::PopularTags => "popular_tags",
            PatternType::HighPerformingTags => "high_performing_tags",
            PatternType::TagCount => "tag_count",
            PatternType::CategoryTags => "category_tags",
            PatternType::ThumbnailText => "thumbnail_text",
            PatternType::EngagementRate => "engagement_rate",
            PatternType::CategoryEngagement => "category_engagement",
        };
        write!(f, "{name}")
    }
}

/// One statistical observation over a video corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub pattern_type: PatternType,
    /// `None` for corpus-wide findings.
    pub category: Option<Category>,
    pub finding: String,
    /// Fixed per finding type, not derived from the data.
    pub confidence: f64,
    pub sample_size: usize,
    pub metadata: FindingMetadata,
}

impl Finding {
    pub fn new(
        category: Option<Category>,
        finding: String,
        confidence: f64,
        sample_size: usize,
        metadata: FindingMetadata,
    ) -> Self {
        Self {
            pattern_type: metadata.pattern_type(),
            category,
            finding,
            confidence: confidence.clamp(0.0, 1.0),
            sample_size,
            metadata,
        }
    }
}

/// Mean views of videos with and without some title/thumbnail feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewComparison {
    pub with_count: usize,
    pub without_count: usize,
    pub with_avg_views: f64,
    pub without_avg_views: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBucket {
    pub label: String,
    pub min_seconds: i64,
    /// `None` for the open-ended top bucket.
    pub max_seconds: Option<i64>,
    pub count: usize,
    pub avg_views: f64,
}

/// A day-of-week (0 = Sunday) or hour-of-day (UTC) upload slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub slot: u32,
    pub label: String,
    pub count: usize,
    pub avg_views: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStat {
    pub tag: String,
    pub count: usize,
    pub avg_views: f64,
}

/// Finding-specific payload, tagged by the pattern it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingMetadata {
    #[serde(rename_all = "camelCase")]
    TitleLength {
        avg_length: f64,
        short_count: usize,
        long_count: usize,
        short_avg_views: f64,
        long_avg_views: f64,
    },
    TitleEmoji(ViewComparison),
    TitleNumbers(ViewComparison),
    #[serde(rename_all = "camelCase")]
    TitleKeywords {
        top_video_count: usize,
        keywords: Vec<KeywordCount>,
    },
    #[serde(rename_all = "camelCase")]
    CategoryTitleLength { avg_length: f64, avg_views: f64 },
    #[serde(rename_all = "camelCase")]
    DurationStats {
        avg_seconds: f64,
        median_seconds: f64,
    },
    #[serde(rename_all = "camelCase")]
    OptimalDuration {
        best_bucket: String,
        buckets: Vec<DurationBucket>,
    },
    #[serde(rename_all = "camelCase")]
    CategoryDuration { avg_seconds: f64 },
    #[serde(rename_all = "camelCase")]
    UploadDay { top_days: Vec<TimeSlot> },
    #[serde(rename_all = "camelCase")]
    UploadHour { top_hours: Vec<TimeSlot> },
    #[serde(rename_all = "camelCase")]
    UploadFrequency {
        videos_per_week: f64,
        weeks_spanned: f64,
    },
    PopularTags { tags: Vec<TagStat> },
    HighPerformingTags { tags: Vec<TagStat> },
    #[serde(rename_all = "camelCase")]
    TagCount { avg_tags_per_video: f64 },
    CategoryTags { tags: Vec<TagStat> },
    ThumbnailText(ViewComparison),
    #[serde(rename_all = "camelCase")]
    EngagementRate { avg_rate_percent: f64 },
    #[serde(rename_all = "camelCase")]
    CategoryEngagement {
        avg_rate_percent: f64,
        avg_views: f64,
    },
}

impl FindingMetadata {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            FindingMetadata::TitleLength { .. } => PatternType::TitleLength,
            FindingMetadata::TitleEmoji(_) => PatternType::TitleEmoji,
            FindingMetadata::TitleNumbers(_) => PatternType::TitleNumbers,
            FindingMetadata::TitleKeywords { .. } => PatternType::TitleKeywords,
            FindingMetadata::CategoryTitleLength { .. } => PatternType::CategoryTitleLength,
            FindingMetadata::DurationStats { .. } => PatternType::DurationStats,
            FindingMetadata::OptimalDuration { .. } => PatternType::OptimalDuration,
            FindingMetadata::CategoryDuration { .. } => PatternType::CategoryDuration,
            FindingMetadata::UploadDay { .. } => PatternType::UploadDay,
            FindingMetadata::UploadHour { .. } => PatternType::UploadHour,
            FindingMetadata::UploadFrequency { .. } => PatternType::UploadFrequency,
            FindingMetadata::PopularTags { .. } => PatternType::PopularTags,
            FindingMetadata::HighPerformingTags { .. } => PatternType::HighPerformingTags,
            FindingMetadata::TagCount { .. } => PatternType::TagCount,
            FindingMetadata::CategoryTags { .. } => PatternType::CategoryTags,
            FindingMetadata::ThumbnailText(_) => PatternType::ThumbnailText,
            FindingMetadata::EngagementRate { .. } => PatternType::EngagementRate,
            FindingMetadata::CategoryEngagement { .. } => PatternType::CategoryEngagement,
        }
    }
}

// --- Generated Scripts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EngagementHook {
    CallResponse,
    RewardLoop,
    Repetition,
    CuriosityGap,
    CharacterAttachment,
    MusicalCue,
    MovementPrompt,
    SurpriseReveal,
}

impl EngagementHook {
    pub const ALL: [EngagementHook; 8] = [
        EngagementHook::CallResponse,
        EngagementHook::RewardLoop,
        EngagementHook::Repetition,
        EngagementHook::CuriosityGap,
        EngagementHook::CharacterAttachment,
        EngagementHook::MusicalCue,
        EngagementHook::MovementPrompt,
        EngagementHook::SurpriseReveal,
    ];

    /// Hooks every episode is expected to carry.
    pub const CRITICAL: [EngagementHook; 2] =
        [EngagementHook::CallResponse, EngagementHook::RewardLoop];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementHook::CallResponse => "call_response",
            EngagementHook::RewardLoop => "reward_loop",
            EngagementHook::Repetition => "repetition",
            EngagementHook::CuriosityGap => "curiosity_gap",
            EngagementHook::CharacterAttachment => "character_attachment",
            EngagementHook::MusicalCue => "musical_cue",
            EngagementHook::MovementPrompt => "movement_prompt",
            EngagementHook::SurpriseReveal => "surprise_reveal",
        }
    }
}

impl std::fmt::Display for EngagementHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngagementHook {
    type Err = KidscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngagementHook::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| KidscopeError::UnknownHook(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Toddler,
    Preschool,
    EarlyElementary,
}

impl AgeBracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Toddler => "toddler",
            AgeBracket::Preschool => "preschool",
            AgeBracket::EarlyElementary => "early_elementary",
        }
    }

    /// Acceptable episode length in seconds, inclusive on both ends.
    pub fn duration_window(&self) -> (u32, u32) {
        match self {
            AgeBracket::Toddler => (120, 300),
            AgeBracket::Preschool => (180, 480),
            AgeBracket::EarlyElementary => (300, 720),
        }
    }

    pub fn accepts_duration(&self, seconds: u32) -> bool {
        let (min, max) = self.duration_window();
        (min..=max).contains(&seconds)
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgeBracket {
    type Err = KidscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toddler" => Ok(AgeBracket::Toddler),
            "preschool" => Ok(AgeBracket::Preschool),
            "early_elementary" => Ok(AgeBracket::EarlyElementary),
            other => Err(KidscopeError::UnknownAgeBracket(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EpisodeSegment {
    /// Seconds.
    pub duration: u32,
    #[serde(default)]
    pub description: String,
}

/// The five-part episode arc every generated script follows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStructure {
    pub hook: EpisodeSegment,
    pub problem: EpisodeSegment,
    pub exploration: EpisodeSegment,
    pub resolution: EpisodeSegment,
    pub next_preview: EpisodeSegment,
}

impl EpisodeStructure {
    pub fn segments(&self) -> [(&'static str, &EpisodeSegment); 5] {
        [
            ("hook", &self.hook),
            ("problem", &self.problem),
            ("exploration", &self.exploration),
            ("resolution", &self.resolution),
            ("nextPreview", &self.next_preview),
        ]
    }

    /// Combined length of every segment except `exploration`. Summed as
    /// `u64` so four `u32` segments cannot overflow.
    pub fn wrapper_duration(&self) -> u64 {
        [
            self.hook.duration,
            self.problem.duration,
            self.resolution.duration,
            self.next_preview.duration,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

/// A machine-generated episode script awaiting the quality gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreableContent {
    pub title: String,
    pub script: String,
    #[serde(default)]
    pub educational_objective: String,
    #[serde(default)]
    pub learning_takeaways: Vec<String>,
    #[serde(default)]
    pub engagement_hooks: Vec<EngagementHook>,
    #[serde(default)]
    pub episode_structure: EpisodeStructure,
    pub age_bracket: AgeBracket,
    /// Seconds.
    pub estimated_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    pub educational_value: f64,
    pub engagement_potential: f64,
    pub passed: bool,
    pub feedback: Vec<String>,
}

impl QualityScore {
    /// One-line summary for logs and retry prompts.
    pub fn summary(&self) -> String {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        format!(
            "{verdict} educational={:.1} engagement={:.1} issues={}",
            self.educational_value,
            self.engagement_potential,
            self.feedback.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_matches_declaration() {
        assert_eq!(Category::ALL[0], Category::NurseryRhyme);
        assert_eq!(Category::ALL[8], Category::Other);
        assert!(Category::NurseryRhyme < Category::Other);
    }

    #[test]
    fn other_has_no_keywords() {
        assert!(Category::Other.keywords().is_empty());
        assert!(Category::Other.tag_weights().is_empty());
    }

    #[test]
    fn every_real_category_has_keywords_and_tag_weights() {
        for category in Category::ALL.into_iter().filter(|c| *c != Category::Other) {
            assert!(!category.keywords().is_empty(), "{category} has no keywords");
            assert!(!category.tag_weights().is_empty(), "{category} has no tag weights");
        }
    }

    #[test]
    fn category_parses_from_its_wire_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("cooking".parse::<Category>().is_err());
    }

    #[test]
    fn hook_parses_from_its_wire_name() {
        assert_eq!(
            "call_response".parse::<EngagementHook>().unwrap(),
            EngagementHook::CallResponse
        );
        assert!("jump_scare".parse::<EngagementHook>().is_err());
    }

    #[test]
    fn age_bracket_windows_are_inclusive() {
        assert!(AgeBracket::Toddler.accepts_duration(120));
        assert!(AgeBracket::Toddler.accepts_duration(300));
        assert!(!AgeBracket::Toddler.accepts_duration(301));
        assert!(!AgeBracket::Preschool.accepts_duration(179));
        assert!(AgeBracket::EarlyElementary.accepts_duration(720));
    }

    #[test]
    fn finding_takes_pattern_type_from_metadata() {
        let finding = Finding::new(
            None,
            "test".to_string(),
            1.4,
            3,
            FindingMetadata::TagCount {
                avg_tags_per_video: 2.0,
            },
        );
        assert_eq!(finding.pattern_type, PatternType::TagCount);
        assert_eq!(finding.confidence, 1.0);
    }

    #[test]
    fn wrapper_duration_excludes_exploration() {
        let structure = EpisodeStructure {
            hook: EpisodeSegment { duration: 10, description: String::new() },
            problem: EpisodeSegment { duration: 20, description: String::new() },
            exploration: EpisodeSegment { duration: 500, description: String::new() },
            resolution: EpisodeSegment { duration: 30, description: String::new() },
            next_preview: EpisodeSegment { duration: 5, description: String::new() },
        };
        assert_eq!(structure.wrapper_duration(), 65);
    }

    #[test]
    fn wrapper_duration_does_not_overflow_u32() {
        let big = EpisodeSegment { duration: u32::MAX, description: String::new() };
        let structure = EpisodeStructure {
            hook: big.clone(),
            problem: big.clone(),
            exploration: EpisodeSegment::default(),
            resolution: big.clone(),
            next_preview: big,
        };
        assert_eq!(structure.wrapper_duration(), 4 * u32::MAX as u64);
    }

    #[test]
    fn summary_reports_verdict_and_scores() {
        let score = QualityScore {
            educational_value: 8.3,
            engagement_potential: 6.0,
            passed: false,
            feedback: vec!["x".to_string()],
        };
        assert_eq!(score.summary(), "FAIL educational=8.3 engagement=6.0 issues=1");
    }
}
