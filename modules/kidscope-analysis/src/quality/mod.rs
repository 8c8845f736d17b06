//! Quality gate for generated episode scripts.
//!
//! A script is scored on two 0-10 axes, educational value and engagement
//! potential, and must clear [`PASSING_THRESHOLD`] on both. The feedback
//! list doubles as the instruction set for the caller's regeneration loop.

mod rules;
mod text;

use kidscope_common::{EngagementHook, QualityScore, ScoreableContent};
use tracing::{info, warn};

pub use rules::{
    check_anti_brain_rot_rules, is_vague_objective, takeaway_count, MAX_EXCLAMATION_DENSITY,
    MIN_OBJECTIVE_CHARS,
};

use text::{content_words, educational_marker_count, word_count};

/// Both axes must reach this score for a script to pass.
pub const PASSING_THRESHOLD: f64 = 7.0;

const MAX_SCORE: f64 = 10.0;

// Educational value
const EDUCATIONAL_BASE: f64 = 3.0;
const OBJECTIVE_CREDIT: f64 = 1.5;
const VAGUE_OBJECTIVE_PENALTY: f64 = 3.0;
const MISSING_TAKEAWAYS_PENALTY: f64 = 3.0;
const FIRST_TAKEAWAY_CREDIT: f64 = 1.5;
const EXTRA_TAKEAWAY_CREDIT: f64 = 0.5;
const MAX_EXTRA_TAKEAWAYS: usize = 3;
/// Markers per 100 words that earn the full marker credit.
const FULL_MARKER_DENSITY: f64 = 4.0;
const MARKER_CREDIT: f64 = 2.0;
const DURATION_CREDIT: f64 = 1.0;
const RESOLUTION_CREDIT: f64 = 1.0;

// Engagement potential
const ENGAGEMENT_BASE: f64 = 1.0;
const HOOK_CREDIT: f64 = 0.75;
const MAX_CREDITED_HOOKS: usize = 4;
const CRITICAL_HOOK_CREDIT: f64 = 1.0;
const CRITICAL_PAIR_BONUS: f64 = 1.0;
const FULL_STRUCTURE_CREDIT: f64 = 2.0;
const PARTIAL_SEGMENT_CREDIT: f64 = 0.4;
const TITLE_CREDIT: f64 = 1.0;

/// Score a script and decide whether it may go to production.
pub fn score_content(content: &ScoreableContent) -> QualityScore {
    let mut feedback = Vec::new();

    let educational_value = educational_value(content, &mut feedback);
    let engagement_potential = engagement_potential(content, &mut feedback);

    feedback.extend(check_anti_brain_rot_rules(content));

    if educational_value < PASSING_THRESHOLD {
        feedback.push(format!(
            "Educational value {educational_value:.1}/10 is below the passing threshold of {PASSING_THRESHOLD}"
        ));
    }
    if engagement_potential < PASSING_THRESHOLD {
        feedback.push(format!(
            "Engagement potential {engagement_potential:.1}/10 is below the passing threshold of {PASSING_THRESHOLD}"
        ));
    }

    let passed = educational_value >= PASSING_THRESHOLD && engagement_potential >= PASSING_THRESHOLD;
    let score = QualityScore {
        educational_value,
        engagement_potential,
        passed,
        feedback,
    };

    if passed {
        info!(
            title = content.title.as_str(),
            educational_value, engagement_potential, "Script passed quality gate"
        );
    } else {
        warn!(
            title = content.title.as_str(),
            educational_value,
            engagement_potential,
            issues = score.feedback.len(),
            "Script failed quality gate"
        );
    }

    score
}

fn finalize(raw: f64) -> f64 {
    (raw.clamp(0.0, MAX_SCORE) * 10.0).round() / 10.0
}

fn educational_value(content: &ScoreableContent, feedback: &mut Vec<String>) -> f64 {
    let mut score = EDUCATIONAL_BASE;

    if is_vague_objective(&content.educational_objective) {
        score -= VAGUE_OBJECTIVE_PENALTY;
        feedback.push(
            "Missing or generic educational objective: state exactly what the child will learn"
                .to_string(),
        );
    } else {
        score += OBJECTIVE_CREDIT;
    }

    match takeaway_count(content) {
        0 => {
            score -= MISSING_TAKEAWAYS_PENALTY;
            feedback.push("Missing learning takeaways: list at least one".to_string());
        }
        n => {
            let extra = (n - 1).min(MAX_EXTRA_TAKEAWAYS);
            score += FIRST_TAKEAWAY_CREDIT + EXTRA_TAKEAWAY_CREDIT * extra as f64;
        }
    }

    score += marker_credit(&content.script);

    if content.age_bracket.accepts_duration(content.estimated_duration) {
        score += DURATION_CREDIT;
    } else {
        score -= DURATION_CREDIT;
    }

    if resolution_references_concept(content) {
        score += RESOLUTION_CREDIT;
    }

    finalize(score)
}

fn marker_credit(script: &str) -> f64 {
    let words = word_count(script);
    if words == 0 {
        return 0.0;
    }
    let per_hundred = educational_marker_count(script) as f64 * 100.0 / words as f64;
    (per_hundred / FULL_MARKER_DENSITY).min(1.0) * MARKER_CREDIT
}

/// The resolution should name what was learned, not just celebrate.
fn resolution_references_concept(content: &ScoreableContent) -> bool {
    let resolution = content_words(&content.episode_structure.resolution.description);
    if resolution.is_empty() {
        return false;
    }

    let mut concept = content_words(&content.educational_objective);
    for takeaway in &content.learning_takeaways {
        concept.extend(content_words(takeaway));
    }

    !resolution.is_disjoint(&concept)
}

fn engagement_potential(content: &ScoreableContent, feedback: &mut Vec<String>) -> f64 {
    let mut score = ENGAGEMENT_BASE;
    let hooks = &content.engagement_hooks;

    if hooks.is_empty() {
        feedback.push(
            "Missing engagement hooks: include at least call_response and reward_loop".to_string(),
        );
    }

    let distinct = EngagementHook::ALL
        .iter()
        .filter(|hook| hooks.contains(hook))
        .count();
    score += HOOK_CREDIT * distinct.min(MAX_CREDITED_HOOKS) as f64;

    let mut critical_present = 0;
    for hook in EngagementHook::CRITICAL {
        if hooks.contains(&hook) {
            score += CRITICAL_HOOK_CREDIT;
            critical_present += 1;
        } else {
            score -= CRITICAL_HOOK_CREDIT;
        }
    }
    if critical_present == EngagementHook::CRITICAL.len() {
        score += CRITICAL_PAIR_BONUS;
    }

    let filled = content
        .episode_structure
        .segments()
        .iter()
        .filter(|(_, segment)| !segment.description.trim().is_empty())
        .count();
    if filled == 5 {
        score += FULL_STRUCTURE_CREDIT;
    } else {
        score += PARTIAL_SEGMENT_CREDIT * filled as f64;
    }

    if content
        .title
        .chars()
        .any(|c| c == '?' || c == '!' || c.is_ascii_digit())
    {
        score += TITLE_CREDIT;
    }

    finalize(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kidscope_common::{AgeBracket, EpisodeSegment, EpisodeStructure};

    fn segment(duration: u32, description: &str) -> EpisodeSegment {
        EpisodeSegment {
            duration,
            description: description.to_string(),
        }
    }

    fn content() -> ScoreableContent {
        ScoreableContent {
            title: "Shapes Everywhere!".to_string(),
            script: "Can you find a circle? Let's look around the park.".to_string(),
            educational_objective: "Recognize circles and triangles in everyday objects"
                .to_string(),
            learning_takeaways: vec!["Circles are round".to_string()],
            engagement_hooks: vec![EngagementHook::CallResponse, EngagementHook::RewardLoop],
            episode_structure: EpisodeStructure {
                hook: segment(15, "Ball rolls in"),
                problem: segment(20, "Lost shapes"),
                exploration: segment(150, "Find shapes in the park"),
                resolution: segment(30, "We found circles and triangles everywhere"),
                next_preview: segment(10, "Next time: squares"),
            },
            age_bracket: AgeBracket::Preschool,
            estimated_duration: 225,
        }
    }

    #[test]
    fn scores_are_clamped_and_rounded() {
        assert_eq!(finalize(12.3), 10.0);
        assert_eq!(finalize(-4.0), 0.0);
        assert_eq!(finalize(6.44), 6.4);
    }

    #[test]
    fn marker_credit_caps_at_full_density() {
        assert_eq!(marker_credit(""), 0.0);
        assert_eq!(marker_credit("Can you? Can you? Can you?"), MARKER_CREDIT);
    }

    #[test]
    fn marker_credit_scales_with_density() {
        // One question in 50 words = 2 per hundred = half credit.
        let mut script = "word ".repeat(49);
        script.push_str("why?");
        assert!((marker_credit(&script) - MARKER_CREDIT / 2.0).abs() < 1e-9);
    }

    #[test]
    fn resolution_naming_the_concept_earns_credit() {
        let mut c = content();
        let mut feedback = Vec::new();
        let with_reference = educational_value(&c, &mut feedback);

        c.episode_structure.resolution.description = "Yay! Great job everyone!".to_string();
        let celebration_only = educational_value(&c, &mut feedback);

        assert!((with_reference - celebration_only - RESOLUTION_CREDIT).abs() < 1e-9);
    }

    #[test]
    fn extra_takeaways_have_diminishing_credit() {
        let mut c = content();
        // Out-of-window duration keeps the score clear of the 10 cap.
        c.estimated_duration = 1_000;
        let mut feedback = Vec::new();
        let one = educational_value(&c, &mut feedback);

        c.learning_takeaways = (0..10).map(|i| format!("Takeaway number {i}")).collect();
        let ten = educational_value(&c, &mut feedback);

        let gain = ten - one;
        assert!(gain > 0.0);
        assert!(gain <= EXTRA_TAKEAWAY_CREDIT * MAX_EXTRA_TAKEAWAYS as f64 + 1e-9);
    }

    #[test]
    fn duplicate_hooks_count_once() {
        let mut c = content();
        let mut feedback = Vec::new();
        let base = engagement_potential(&c, &mut feedback);

        c.engagement_hooks.push(EngagementHook::CallResponse);
        c.engagement_hooks.push(EngagementHook::CallResponse);
        assert_eq!(engagement_potential(&c, &mut feedback), base);
    }

    #[test]
    fn empty_segments_earn_partial_structure_credit() {
        let mut c = content();
        let mut feedback = Vec::new();
        let full = engagement_potential(&c, &mut feedback);

        c.episode_structure.next_preview.description.clear();
        let partial = engagement_potential(&c, &mut feedback);

        assert!((full - partial - (FULL_STRUCTURE_CREDIT - 4.0 * PARTIAL_SEGMENT_CREDIT)).abs() < 1e-9);
    }

    #[test]
    fn title_punctuation_or_digit_earns_credit() {
        let mut c = content();
        let mut feedback = Vec::new();
        let exclaimed = engagement_potential(&c, &mut feedback);

        c.title = "Shapes Everywhere".to_string();
        let flat = engagement_potential(&c, &mut feedback);
        c.title = "5 Shapes".to_string();
        let numbered = engagement_potential(&c, &mut feedback);

        assert!((exclaimed - flat - TITLE_CREDIT).abs() < 1e-9);
        assert_eq!(numbered, exclaimed);
    }
}
