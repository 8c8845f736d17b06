//! Anti-brain-rot checklist.
//!
//! Each rule blocks a way a script can be engaging while teaching nothing,
//! or overstimulating instead of teaching. Every violated rule yields one
//! human-readable message suitable for a regeneration prompt.

use kidscope_common::ScoreableContent;

use super::text::{exclamation_density, has_interactive_markers};

/// Exclamation marks may make up at most this share of the script's characters.
pub const MAX_EXCLAMATION_DENSITY: f64 = 0.05;
/// Objectives shorter than this are too vague to teach from.
pub const MIN_OBJECTIVE_CHARS: usize = 15;

/// Empty, a single word, or too short to name a concrete concept.
pub fn is_vague_objective(objective: &str) -> bool {
    let trimmed = objective.trim();
    trimmed.is_empty()
        || trimmed.split_whitespace().count() < 2
        || trimmed.chars().count() < MIN_OBJECTIVE_CHARS
}

/// Takeaways with actual text in them.
pub fn takeaway_count(content: &ScoreableContent) -> usize {
    content
        .learning_takeaways
        .iter()
        .filter(|t| !t.trim().is_empty())
        .count()
}

pub fn check_anti_brain_rot_rules(content: &ScoreableContent) -> Vec<String> {
    let mut violations = Vec::new();

    if takeaway_count(content) == 0 {
        violations.push(
            "No learning takeaway: every episode must leave the child with at least one \
             concrete thing they learned"
                .to_string(),
        );
    }

    if is_vague_objective(&content.educational_objective) {
        violations.push(format!(
            "Educational objective {:?} is too vague: name the specific concept or skill \
             being taught",
            content.educational_objective.trim()
        ));
    }

    if !has_interactive_markers(&content.script) {
        violations.push(
            "Script is not interactive: add questions or direct prompts (\"can you...\", \
             \"let's...\") so the child participates instead of just watching"
                .to_string(),
        );
    }

    let density = exclamation_density(&content.script);
    if density > MAX_EXCLAMATION_DENSITY {
        violations.push(format!(
            "Too many exclamation marks ({:.1}% of characters): risk of sensory overload, \
             calm the delivery",
            density * 100.0
        ));
    }

    let structure = &content.episode_structure;
    let wrapper = structure.wrapper_duration();
    if u64::from(structure.exploration.duration) < wrapper {
        violations.push(format!(
            "Teaching section (exploration, {}s) is shorter than the wrapper segments \
             combined ({}s): the lesson must take up most of the runtime",
            structure.exploration.duration, wrapper
        ));
    }

    if !content.age_bracket.accepts_duration(content.estimated_duration) {
        let (min, max) = content.age_bracket.duration_window();
        violations.push(format!(
            "Duration {}s is outside the {}-{}s window for {} viewers",
            content.estimated_duration, min, max, content.age_bracket
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_vagueness() {
        assert!(is_vague_objective(""));
        assert!(is_vague_objective("   "));
        assert!(is_vague_objective("learning"));
        assert!(is_vague_objective("fun stuff"));
        assert!(!is_vague_objective("Count objects from one to five"));
    }

    #[test]
    fn blank_takeaways_do_not_count() {
        let content = ScoreableContent {
            title: String::new(),
            script: String::new(),
            educational_objective: String::new(),
            learning_takeaways: vec!["  ".to_string(), "Red and blue make purple".to_string()],
            engagement_hooks: vec![],
            episode_structure: Default::default(),
            age_bracket: kidscope_common::AgeBracket::Preschool,
            estimated_duration: 240,
        };
        assert_eq!(takeaway_count(&content), 1);
    }
}
