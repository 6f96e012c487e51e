//! Outbound notification of top-ranked candidates.
//!
//! A side channel, not part of the ranking response: the top 2 candidates are
//! POSTed to a configured webhook inside a detached task. Delivery failure is
//! logged and swallowed; the caller never waits on or learns about it.

use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::request::MatchingRequest;
use crate::models::resume::RankingResult;

const TOP_CANDIDATES: usize = 2;
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload {
    prompt_id: String,
    job_description: String,
    job_title: Option<String>,
    resumes: Vec<CandidatePayload>,
    timestamp: String,
    total_resumes_found: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePayload {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    content: String,
}

pub struct NotificationDispatcher {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(webhook_url: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DISPATCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Hands the top candidates to the webhook in a detached task. Returns
    /// immediately; a request cancellation does not abort the dispatch.
    pub fn dispatch_top_candidates(
        &self,
        request: &MatchingRequest,
        rankings: &[RankingResult],
        total_resumes_found: usize,
    ) {
        let Some(url) = self.webhook_url.clone() else {
            debug!("No notification webhook configured, skipping dispatch");
            return;
        };
        if rankings.is_empty() {
            debug!("No ranked candidates, skipping notification dispatch");
            return;
        }

        let payload = build_payload(request, rankings, total_resumes_found);
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(
                        "Notified webhook of {} top candidates (prompt {})",
                        payload.resumes.len(),
                        payload.prompt_id
                    );
                }
                Ok(response) => {
                    warn!(
                        "Notification webhook returned {} (prompt {})",
                        response.status(),
                        payload.prompt_id
                    );
                }
                Err(e) => {
                    warn!("Notification dispatch failed: {e}");
                }
            }
        });
    }
}

fn build_payload(
    request: &MatchingRequest,
    rankings: &[RankingResult],
    total_resumes_found: usize,
) -> NotificationPayload {
    let resumes = rankings
        .iter()
        .take(TOP_CANDIDATES)
        .map(|r| CandidatePayload {
            id: r.resume.id.clone(),
            name: r.resume.display_name(),
            email: r.resume.email.clone(),
            phone: r.resume.phone.clone(),
            content: r.resume.content.clone(),
        })
        .collect();

    NotificationPayload {
        prompt_id: Uuid::new_v4().to_string(),
        job_description: request.job_description.clone(),
        job_title: request.job_title.clone(),
        resumes,
        timestamp: Utc::now().to_rfc3339(),
        total_resumes_found,
    }
}
