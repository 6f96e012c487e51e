//! Matching request / response contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::resume::{RankingResult, RankingSummary, ResumeSource};

fn default_max_results() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// One matching request: the job description plus sourcing and filtering
/// knobs. `job_description` is the only required field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_true")]
    pub include_email_resumes: bool,
    #[serde(default = "default_true")]
    pub include_database_resumes: bool,
    /// Restrict the inbox fetch to unread messages.
    #[serde(default)]
    pub unread_only: bool,
    /// Drop zero-score entries from the response. Applied after rank
    /// assignment; surviving ranks are not renumbered.
    #[serde(default)]
    pub exclude_unmatched: bool,
}

impl Default for MatchingRequest {
    fn default() -> Self {
        MatchingRequest {
            job_description: String::new(),
            job_title: None,
            company: None,
            required_skills: None,
            preferred_skills: None,
            max_results: default_max_results(),
            include_email_resumes: true,
            include_database_resumes: true,
            unread_only: false,
            exclude_unmatched: false,
        }
    }
}

/// Response to one matching request. Ranking entries exclude the resume body;
/// the candidate lists are distinct display names in ranking order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResponse {
    pub request_id: String,
    pub processed_at: DateTime<Utc>,
    pub total_resumes_processed: usize,
    pub rankings: Vec<RankingSummary>,
    pub job_description: String,
    pub job_title: Option<String>,
    pub extracted_keywords: Vec<String>,
    pub email_resumes_count: usize,
    pub database_resumes_count: usize,
    pub email_candidates: Vec<String>,
    pub database_candidates: Vec<String>,
    pub all_candidates: Vec<String>,
}

impl MatchingResponse {
    /// Assembles the response from ranked results. Per-source counts and the
    /// candidate lists are computed over the rankings actually returned.
    pub fn build(
        request: &MatchingRequest,
        rankings: &[RankingResult],
        total_resumes_processed: usize,
        extracted_keywords: Vec<String>,
    ) -> Self {
        let summaries: Vec<RankingSummary> = rankings.iter().map(RankingSummary::from).collect();

        let email_resumes_count = summaries
            .iter()
            .filter(|r| r.resume_source == ResumeSource::Email)
            .count();
        let database_resumes_count = summaries
            .iter()
            .filter(|r| r.resume_source == ResumeSource::Database)
            .count();

        let email_candidates = distinct_candidates(&summaries, Some(ResumeSource::Email));
        let database_candidates = distinct_candidates(&summaries, Some(ResumeSource::Database));
        let all_candidates = distinct_candidates(&summaries, None);

        MatchingResponse {
            request_id: uuid::Uuid::new_v4().to_string(),
            processed_at: Utc::now(),
            total_resumes_processed,
            rankings: summaries,
            job_description: request.job_description.clone(),
            job_title: request.job_title.clone(),
            extracted_keywords,
            email_resumes_count,
            database_resumes_count,
            email_candidates,
            database_candidates,
            all_candidates,
        }
    }
}

fn distinct_candidates(
    rankings: &[RankingSummary],
    source: Option<ResumeSource>,
) -> Vec<String> {
    let mut seen = Vec::new();
    for r in rankings {
        if source.is_some_and(|s| r.resume_source != s) {
            continue;
        }
        if !seen.contains(&r.candidate_name) {
            seen.push(r.candidate_name.clone());
        }
    }
    seen
}
