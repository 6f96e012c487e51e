//! Ranking Aggregator — scores resumes against a matching request and
//! produces the sorted, rank-numbered view.
//!
//! Processing is best-effort across the whole input set: text extraction and
//! contact extraction recover locally (see `extract`), so no single resume
//! can abort the rest.

use std::cmp::Ordering;

use tracing::debug;

use crate::extract::contact::{extract_email_with_sender, extract_name, extract_phone};
use crate::extract::text::resume_text;
use crate::matching::keywords::{match_keywords, match_skill_tiers, KEYWORD_WEIGHT};
use crate::models::request::MatchingRequest;
use crate::models::resume::{
    EnrichedResume, KeywordMatch, RankingResult, RawResume,
};

/// Runs text and contact extraction for one sourced resume. Contact fields
/// already present on the record (e.g. persisted database rows) are kept;
/// only the gaps are filled from the extracted text.
pub fn enrich_resume(resume: &RawResume) -> EnrichedResume {
    let content = resume_text(resume);

    let email = resume
        .email
        .clone()
        .or_else(|| extract_email_with_sender(&content, resume.email_sender.as_deref()));
    let phone = resume.phone.clone().or_else(|| extract_phone(&content));
    let candidate_name = extract_name(&content);

    EnrichedResume {
        id: resume.id.clone(),
        file_name: resume.file_name.clone(),
        file_path: resume.file_path.clone(),
        content,
        email_subject: resume.email_subject.clone(),
        email_sender: resume.email_sender.clone(),
        email,
        phone,
        candidate_name,
        email_date: resume.email_date,
        source: resume.source,
        created_at: resume.created_at,
        processed_at: resume.processed_at,
        status: resume.status,
    }
}

/// Scores and ranks all resumes for a request.
///
/// Sort order is descending score with ties broken by ascending sender/email
/// string; 1-based ranks are assigned only after the full sort. With
/// `exclude_unmatched` set, zero-score entries are dropped after rank
/// assignment and the surviving ranks are not renumbered — callers see rank
/// gaps, which is the documented contract.
pub fn rank_resumes(resumes: &[RawResume], request: &MatchingRequest) -> Vec<RankingResult> {
    let required = request.required_skills.clone().unwrap_or_default();
    let preferred = request.preferred_skills.clone().unwrap_or_default();

    let mut results: Vec<RankingResult> = resumes
        .iter()
        .map(|resume| {
            let enriched = enrich_resume(resume);
            let keyword_matches = match_skill_tiers(&enriched.content, &required, &preferred);
            score_result(enriched, keyword_matches, &required)
        })
        .collect();

    sort_and_assign_ranks(&mut results);

    if request.exclude_unmatched {
        results.retain(|r| r.score > 0.0);
    }

    debug!("Ranked {} resumes", results.len());
    results
}

/// Legacy single-resume pass: flat-weight matching over keywords extracted
/// from the job description. Rank is left at 0; it only means something
/// relative to a full sorted set.
pub fn rank_single(resume: &RawResume, keywords: &[String]) -> RankingResult {
    let enriched = enrich_resume(resume);
    let keyword_matches = match_keywords(&enriched.content, keywords, KEYWORD_WEIGHT);
    score_result(enriched, keyword_matches, &[])
}

fn score_result(
    enriched: EnrichedResume,
    keyword_matches: Vec<KeywordMatch>,
    required: &[String],
) -> RankingResult {
    let score: f64 = keyword_matches.iter().map(|m| m.weight).sum();
    let summary = build_summary(&keyword_matches, required);
    let resume_source = enriched.source;
    RankingResult {
        resume: enriched,
        score,
        rank: 0,
        keyword_matches,
        summary,
        resume_source,
    }
}

fn sort_and_assign_ranks(results: &mut [RankingResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| tie_break_key(a).cmp(&tie_break_key(b)))
    });
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = (i + 1) as u32;
    }
}

/// Deterministic tie-break: ascending sender string, falling back to the
/// extracted email, then empty.
fn tie_break_key(result: &RankingResult) -> String {
    result
        .resume
        .email_sender
        .clone()
        .or_else(|| result.resume.email.clone())
        .unwrap_or_default()
}

/// Human-readable match summary split by tier. `None` when nothing matched.
fn build_summary(matches: &[KeywordMatch], required: &[String]) -> Option<String> {
    if matches.is_empty() {
        return None;
    }

    let is_required = |m: &KeywordMatch| {
        required
            .iter()
            .any(|skill| skill.eq_ignore_ascii_case(&m.keyword))
    };

    let required_hits: Vec<&str> = matches
        .iter()
        .filter(|m| is_required(m))
        .map(|m| m.keyword.as_str())
        .collect();
    let preferred_hits: Vec<&str> = matches
        .iter()
        .filter(|m| !is_required(m))
        .map(|m| m.keyword.as_str())
        .collect();

    let mut parts = Vec::new();
    if !required_hits.is_empty() {
        parts.push(format!("Matched required skills: {}", required_hits.join(", ")));
    }
    if !preferred_hits.is_empty() {
        parts.push(format!(
            "Matched preferred skills: {}",
            preferred_hits.join(", ")
        ));
    }
    Some(parts.join(". ") + ".")
}
