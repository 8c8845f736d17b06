//! Script text heuristics shared by the scorer and the rule checklist.

use std::collections::HashSet;

/// Phrases that address the child directly and ask them to do something.
const ADDRESS_PHRASES: [&str; 7] = [
    "can you",
    "let's",
    "how many",
    "what do you",
    "count with me",
    "say it with me",
    "your turn",
];

/// Any of these (or a `?`) makes a script interactive.
const INTERACTIVE_PHRASES: [&str; 9] = [
    "can you",
    "let's",
    "lets ",
    "your turn",
    "say it with me",
    "show me",
    "point to",
    "clap",
    "tell me",
];

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

const STOP_WORDS: [&str; 24] = [
    "that", "this", "with", "from", "they", "them", "their", "there", "what", "when", "where",
    "which", "will", "have", "about", "into", "your", "yours", "then", "than", "some", "just",
    "very", "learn",
];

const MIN_CONTENT_WORD_CHARS: usize = 4;

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn normalize_apostrophes(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

/// Question marks, direct-address phrases and counting runs.
pub(crate) fn educational_marker_count(script: &str) -> usize {
    let lowered = normalize_apostrophes(script);
    let questions = lowered.matches('?').count();
    let addresses: usize = ADDRESS_PHRASES
        .iter()
        .map(|phrase| lowered.matches(phrase).count())
        .sum();
    questions + addresses + counting_sequences(&lowered)
}

pub(crate) fn has_interactive_markers(script: &str) -> bool {
    let lowered = normalize_apostrophes(script);
    lowered.contains('?') || INTERACTIVE_PHRASES.iter().any(|p| lowered.contains(p))
}

fn number_value(word: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .position(|n| *n == word)
        .map(|i| i as u32)
        .or_else(|| word.parse().ok())
}

/// Runs of three consecutive ascending numbers ("one, two, three" or
/// "4 5 6"). Runs don't overlap.
pub(crate) fn counting_sequences(lowered: &str) -> usize {
    let values: Vec<Option<u32>> = words(lowered).map(number_value).collect();
    let mut count = 0;
    let mut i = 0;
    while i + 2 < values.len() {
        match (values[i], values[i + 1], values[i + 2]) {
            (Some(a), Some(b), Some(c))
                if a.checked_add(1) == Some(b) && b.checked_add(1) == Some(c) =>
            {
                count += 1;
                i += 3;
            }
            _ => i += 1,
        }
    }
    count
}

/// Lowercased words long enough to carry meaning, minus stop words.
pub(crate) fn content_words(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    words(&lowered)
        .filter(|w| w.chars().count() >= MIN_CONTENT_WORD_CHARS)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Share of the script's characters that are `!`.
pub(crate) fn exclamation_density(script: &str) -> f64 {
    let total = script.chars().count();
    if total == 0 {
        return 0.0;
    }
    script.chars().filter(|c| *c == '!').count() as f64 / total as f64
}
