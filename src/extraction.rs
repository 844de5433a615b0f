//! Entity mention extraction
//!
//! The pipeline only depends on the [`EntityExtractor`] port. The bundled
//! [`PatternEntityExtractor`] is a deterministic rule-based tagger: it picks up
//! runs of capitalised words plus date expressions and labels them with the
//! PERSON / ORG / GPE / DATE / MISC scheme.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A span of source text referring to a real-world entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    /// Original text of the mention
    pub text: String,
    /// Type tag (PERSON, ORG, GPE, DATE, ...)
    pub label: String,
    /// Start byte offset in the document
    pub start: usize,
    /// End byte offset in the document (exclusive)
    pub end: usize,
}

impl EntityMention {
    pub fn new(text: impl Into<String>, label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for EntityMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.label)
    }
}

/// Port for turning raw text into entity mentions
pub trait EntityExtractor: Send + Sync {
    /// Mentions in order of appearance. Never fails; no entities is an empty Vec.
    fn extract(&self, text: &str) -> Vec<EntityMention>;
}

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Lowercase words allowed inside a capitalised run ("Duchy of Warsaw")
const CONNECTORS: &[&str] = &["of", "de", "du", "del", "von", "van", "der", "la", "le", "di"];

/// Capitalised words that never start an entity on their own
const STOPWORDS: &[&str] = &[
    "A", "After", "Although", "An", "And", "As", "At", "Before", "But", "By", "During", "For",
    "From", "He", "Her", "His", "However", "I", "If", "In", "It", "Its", "On", "She", "That",
    "The", "Their", "There", "These", "They", "This", "Those", "To", "We", "When", "While",
    "With",
];

const ORG_WORDS: &[&str] = &[
    "Academy", "Bank", "Church", "College", "Company", "Corporation", "Council", "Inc",
    "Institute", "Ltd", "Museum", "Party", "Press", "School", "Society", "University",
];

const PLACE_WORDS: &[&str] = &[
    "City", "Empire", "Governorate", "Island", "Kingdom", "Province", "Republic", "River",
];

const KNOWN_PLACES: &[&str] = &[
    "america", "baden-baden", "berlin", "dresden", "england", "europe", "florence", "france",
    "geneva", "germany", "italy", "kazakhstan", "london", "moscow", "omsk", "paris", "russia",
    "saint petersburg", "semipalatinsk", "siberia", "switzerland", "tver", "ukraine",
];

/// Word tokens: a letter followed by letters, marks, digits, apostrophes or hyphens
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}][\p{L}\p{M}\p{Nd}'’-]*").expect("valid word pattern"));

/// Month-day-year, day-month-year, month-year and bare years 1000-2099
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\b(?:(?:{m})\s+\d{{1,2}},\s+\d{{4}}|\d{{1,2}}\s+(?:{m})\s+\d{{4}}|(?:{m})\s+\d{{4}}|1[0-9]{{3}}|20[0-9]{{2}})\b",
        m = MONTHS
    );
    Regex::new(&pattern).expect("valid date pattern")
});

/// Rule-based extractor over capitalised runs and date patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEntityExtractor;

impl PatternEntityExtractor {
    pub fn new() -> Self {
        Self
    }

    fn capitalised_runs(&self, text: &str, dates: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let words: Vec<(usize, usize)> = WORD_RE
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .filter(|(s, e)| !dates.iter().any(|(ds, de)| s < de && e > ds))
            .collect();

        let mut runs = Vec::new();
        let mut i = 0;
        while i < words.len() {
            if !is_capitalised(&text[words[i].0..words[i].1]) {
                i += 1;
                continue;
            }

            let mut tokens = vec![words[i]];
            let mut j = i + 1;
            while j < words.len() {
                let prev = tokens[tokens.len() - 1];
                let word = &text[words[j].0..words[j].1];
                if !joined_by_space(text, prev.1, words[j].0) {
                    break;
                }
                if is_capitalised(word) {
                    tokens.push(words[j]);
                    j += 1;
                } else if CONNECTORS.contains(&word)
                    && j + 1 < words.len()
                    && joined_by_space(text, words[j].1, words[j + 1].0)
                    && is_capitalised(&text[words[j + 1].0..words[j + 1].1])
                {
                    tokens.push(words[j]);
                    tokens.push(words[j + 1]);
                    j += 2;
                } else {
                    break;
                }
            }
            i = j;

            while let Some(first) = tokens.first() {
                let word = &text[first.0..first.1];
                if STOPWORDS.contains(&word) || CONNECTORS.contains(&word) {
                    tokens.remove(0);
                } else {
                    break;
                }
            }
            if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
                runs.push((first.0, last.1));
            }
        }
        runs
    }
}

impl EntityExtractor for PatternEntityExtractor {
    fn extract(&self, text: &str) -> Vec<EntityMention> {
        let dates: Vec<(usize, usize)> = DATE_RE
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut mentions: Vec<EntityMention> = dates
            .iter()
            .map(|&(s, e)| EntityMention::new(&text[s..e], "DATE", s, e))
            .collect();

        for (s, e) in self.capitalised_runs(text, &dates) {
            let span = &text[s..e];
            mentions.push(EntityMention::new(span, classify(span), s, e));
        }

        mentions.sort_by_key(|m| m.start);
        mentions
    }
}

fn is_capitalised(word: &str) -> bool {
    word.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// Tokens belong to one run only when separated by spaces on a single line
fn joined_by_space(text: &str, end: usize, next_start: usize) -> bool {
    let gap = &text[end..next_start];
    !gap.is_empty() && gap.chars().all(|c| c == ' ' || c == '\t')
}

/// Label a capitalised span; first matching cue wins
fn classify(span: &str) -> &'static str {
    let words: Vec<&str> = span.split_whitespace().collect();

    if words.iter().any(|w| ORG_WORDS.contains(w)) {
        return "ORG";
    }
    if KNOWN_PLACES.contains(&span.to_lowercase().as_str())
        || words.last().map(|w| PLACE_WORDS.contains(w)).unwrap_or(false)
    {
        return "GPE";
    }
    if words.len() > 1 {
        "PERSON"
    } else {
        "MISC"
    }
}
