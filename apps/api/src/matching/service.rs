//! Matching pipeline orchestration.
//!
//! One request runs the whole pipeline: validate, fetch from the enabled
//! sources, rank, build the response, then hand the top candidates to the
//! notifier as a detached side channel. Every per-resume and per-source
//! failure is recovered locally; only a malformed request is rejected.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::matching::keywords::{extract_keywords, DEFAULT_MAX_KEYWORDS};
use crate::matching::ranking::{enrich_resume, rank_resumes, rank_single};
use crate::models::request::{MatchingRequest, MatchingResponse};
use crate::models::resume::{RankingResult, ResumeSummary};
use crate::notify::NotificationDispatcher;
use crate::sources::SourceAggregator;

pub struct MatchingService {
    aggregator: Arc<SourceAggregator>,
    notifier: Arc<NotificationDispatcher>,
}

impl MatchingService {
    pub fn new(aggregator: Arc<SourceAggregator>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self {
            aggregator,
            notifier,
        }
    }

    /// Runs one matching request end to end and returns the ranked response.
    pub async fn match_resumes(
        &self,
        request: &MatchingRequest,
    ) -> Result<MatchingResponse, AppError> {
        if request.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Job description is required".to_string(),
            ));
        }

        let resumes = self.aggregator.fetch_all(request).await;
        info!(
            "Fetched {} resumes for matching request (job: {})",
            resumes.len(),
            request.job_title.as_deref().unwrap_or("untitled")
        );

        let mut rankings = rank_resumes(&resumes, request);

        // Side channel: detached, never awaited, never surfaced to the
        // caller. Fed the full ranking — the caller's page size does not
        // decide who gets notified.
        self.notifier
            .dispatch_top_candidates(request, &rankings, resumes.len());

        rankings.truncate(request.max_results);

        let extracted_keywords =
            extract_keywords(&request.job_description, DEFAULT_MAX_KEYWORDS);

        Ok(MatchingResponse::build(
            request,
            &rankings,
            resumes.len(),
            extracted_keywords,
        ))
    }

    /// Lists every resume currently visible across all sources, content
    /// excluded. Uses default sourcing knobs (both sources, read and unread).
    pub async fn available_resumes(&self) -> Result<Vec<ResumeSummary>, AppError> {
        let request = MatchingRequest::default();
        let resumes = self.aggregator.fetch_all(&request).await;
        Ok(resumes
            .iter()
            .map(|raw| ResumeSummary::from(&enrich_resume(raw)))
            .collect())
    }

    /// Ranks one resume, looked up by id across all sources, against keywords
    /// extracted from the job description at the flat legacy weight.
    pub async fn resume_ranking(
        &self,
        resume_id: &str,
        job_description: &str,
    ) -> Result<RankingResult, AppError> {
        let request = MatchingRequest::default();
        let resumes = self.aggregator.fetch_all(&request).await;
        let resume = resumes
            .iter()
            .find(|r| r.id == resume_id)
            .ok_or_else(|| AppError::NotFound(format!("Resume '{resume_id}' not found")))?;

        let keywords = extract_keywords(job_description, DEFAULT_MAX_KEYWORDS);
        Ok(rank_single(resume, &keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{RawResume, ResumeSource, ResumeStatus};
    use crate::sources::database::RecordStore;
    use crate::sources::inbox::DisabledInbox;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    struct FixedStore {
        resumes: Vec<RawResume>,
    }

    #[async_trait]
    impl RecordStore for FixedStore {
        async fn fetch_resumes(&self) -> anyhow::Result<Vec<RawResume>> {
            Ok(self.resumes.clone())
        }
    }

    fn stored(id: &str, content: &str) -> RawResume {
        RawResume {
            id: id.to_string(),
            file_name: format!("{id}.pdf"),
            file_path: format!("/sample/{id}.pdf"),
            content: Some(content.to_string()),
            email_subject: None,
            email_sender: None,
            email: Some(format!("{id}@example.com")),
            phone: None,
            email_date: None,
            source: ResumeSource::Database,
            created_at: Utc::now(),
            processed_at: None,
            status: ResumeStatus::Pending,
            payload: None,
        }
    }

    fn service(resumes: Vec<RawResume>) -> MatchingService {
        let aggregator = SourceAggregator::new(
            Arc::new(FixedStore { resumes }),
            Arc::new(DisabledInbox),
            "resume".to_string(),
            vec![".pdf".to_string()],
            50,
            Duration::from_secs(30),
            Duration::from_secs(300),
        );
        let notifier = NotificationDispatcher::new(None).unwrap();
        MatchingService::new(Arc::new(aggregator), Arc::new(notifier))
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let svc = service(vec![]);
        let request = MatchingRequest {
            job_description: "   ".to_string(),
            ..MatchingRequest::default()
        };
        let err = svc.match_resumes(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_match_resumes_ranks_and_counts() {
        let svc = service(vec![
            stored("a", "Rust and Python developer"),
            stored("b", "marketing specialist"),
        ]);
        let request = MatchingRequest {
            job_description: "Looking for Rust developer".to_string(),
            required_skills: Some(vec!["Rust".to_string()]),
            preferred_skills: Some(vec!["Python".to_string()]),
            ..MatchingRequest::default()
        };

        let response = svc.match_resumes(&request).await.unwrap();
        assert_eq!(response.total_resumes_processed, 2);
        assert_eq!(response.rankings.len(), 2);
        assert_eq!(response.rankings[0].resume.id, "a");
        assert_eq!(response.rankings[0].rank, 1);
        assert!((response.rankings[0].score - 0.4).abs() < f64::EPSILON);
        assert_eq!(response.database_resumes_count, 2);
        assert_eq!(response.email_resumes_count, 0);
        assert!(response.extracted_keywords.contains(&"rust".to_string()));
    }

    #[tokio::test]
    async fn test_max_results_truncates_rankings() {
        let svc = service(vec![
            stored("a", "Rust developer"),
            stored("b", "Rust developer"),
            stored("c", "Rust developer"),
        ]);
        let request = MatchingRequest {
            job_description: "Rust developer".to_string(),
            max_results: 2,
            ..MatchingRequest::default()
        };

        let response = svc.match_resumes(&request).await.unwrap();
        assert_eq!(response.rankings.len(), 2);
        // Total still reflects everything processed, not the truncated page.
        assert_eq!(response.total_resumes_processed, 3);
    }

    #[tokio::test]
    async fn test_resume_ranking_by_id_uses_flat_weight() {
        let svc = service(vec![stored("a", "Rust and Python developer")]);
        let ranking = svc
            .resume_ranking("a", "Rust Python developer")
            .await
            .unwrap();
        // Three keywords matched at the flat legacy weight.
        assert!((ranking.score - 0.3).abs() < 1e-9);
        assert_eq!(ranking.rank, 0);
    }

    #[tokio::test]
    async fn test_resume_ranking_unknown_id_is_not_found() {
        let svc = service(vec![stored("a", "anything")]);
        let err = svc.resume_ranking("missing", "Rust").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_available_resumes_excludes_content() {
        let svc = service(vec![stored("a", "secret body text")]);
        let resumes = svc.available_resumes().await.unwrap();
        assert_eq!(resumes.len(), 1);
        let json = serde_json::to_value(&resumes[0]).unwrap();
        assert!(json.get("content").is_none());
    }
}
