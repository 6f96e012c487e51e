//! Keyword Engine — job description tokenization and weighted keyword
//! matching against resume text.
//!
//! Matching is lexical on word boundaries, never semantic. A keyword either
//! occurs at least once and contributes its tier weight exactly once, or it
//! contributes nothing; occurrence counts never scale the weight.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::models::resume::KeywordMatch;

/// Tier weight for a required skill.
pub const REQUIRED_SKILL_WEIGHT: f64 = 0.3;
/// Tier weight for a preferred skill.
pub const PREFERRED_SKILL_WEIGHT: f64 = 0.1;
/// Flat weight of the legacy single-list pass.
pub const KEYWORD_WEIGHT: f64 = 0.1;

/// Default cap on keywords extracted from a job description.
pub const DEFAULT_MAX_KEYWORDS: usize = 20;

lazy_static! {
    static ref NON_WORD_RUN: Regex = Regex::new(r"\W+").unwrap();
}

/// English stop words plus domain terms that carry no signal in a job
/// description (experience, years, skills, ...).
const STOP_WORDS: [&str; 63] = [
    "the", "and", "for", "with", "that", "have", "this", "from", "are", "was", "but", "not",
    "all", "can", "has", "will", "one", "their", "about", "which", "when", "make", "like",
    "time", "just", "know", "take", "into", "your", "some", "them", "other", "than", "then",
    "now", "look", "only", "come", "its", "over", "think", "also", "back", "after", "use",
    "two", "how", "our", "work", "first", "well", "way", "even", "new", "want", "because",
    "any", "these", "give", "most", "us", "experience", "years",
];

const DOMAIN_STOP_WORDS: [&str; 4] = ["skills", "education", "job", "position"];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token) || DOMAIN_STOP_WORDS.contains(&token)
}

/// Extracts the most frequent keywords from a job description.
///
/// Lower-cases, splits on non-word runs, discards short tokens and stop
/// words, then orders by descending frequency. Ties resolve to first
/// occurrence in the description (stable sort over grouping order), which
/// makes the output deterministic for identical input.
pub fn extract_keywords(job_description: &str, max_keywords: usize) -> Vec<String> {
    let lowered = job_description.to_lowercase();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in NON_WORD_RUN.split(&lowered) {
        if token.len() <= 2 || is_stop_word(token) {
            continue;
        }
        if !counts.contains_key(token) {
            order.push(token.to_string());
        }
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }

    order.sort_by_key(|token| std::cmp::Reverse(counts[token]));
    order.truncate(max_keywords);
    order
}

/// Builds the boundary-anchored pattern for one keyword. Anchors are applied
/// only against word-character keyword edges: a trailing `\b` after `c#`
/// could never match, and the skill lists legitimately contain such terms.
fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(&keyword.to_lowercase());
    let mut pattern = String::new();
    if keyword
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&escaped);
    if keyword
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        pattern.push_str(r"\b");
    }
    pattern
}

/// Tests each keyword for at least one whole-word occurrence in the resume
/// text and emits one `KeywordMatch` at the given flat weight per present
/// keyword.
pub fn match_keywords(resume_text: &str, keywords: &[String], weight: f64) -> Vec<KeywordMatch> {
    let lowered = resume_text.to_lowercase();
    let mut matches = Vec::new();
    for keyword in keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        let pattern = keyword_pattern(keyword);
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Unusable keyword pattern for {keyword:?}: {e}");
                continue;
            }
        };
        if regex.is_match(&lowered) {
            matches.push(KeywordMatch {
                keyword: keyword.clone(),
                weight,
            });
        }
    }
    matches
}

/// Tiered pass used by scoring: required skills at 0.3, preferred skills at
/// 0.1, concatenated. A keyword present in both lists contributes two
/// independent entries.
pub fn match_skill_tiers(
    resume_text: &str,
    required_skills: &[String],
    preferred_skills: &[String],
) -> Vec<KeywordMatch> {
    let mut matches = match_keywords(resume_text, required_skills, REQUIRED_SKILL_WEIGHT);
    matches.extend(match_keywords(
        resume_text,
        preferred_skills,
        PREFERRED_SKILL_WEIGHT,
    ));
    matches
}
