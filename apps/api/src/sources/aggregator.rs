//! Resume Source Aggregator — merges resumes from the enabled sources,
//! tolerating partial source failure.
//!
//! Each source fetch is wrapped so a failing source is logged and skipped,
//! never propagated: a request returns whatever sources succeeded. The two
//! fetches run concurrently and the inbox fetch is bounded by a timeout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::models::request::MatchingRequest;
use crate::models::resume::RawResume;
use crate::sources::database::RecordStore;
use crate::sources::inbox::{resumes_from_messages, InboxTransport};

/// Dedup key for inbox fetches: identical (filter, unread, hour) requests
/// within the cache window short-circuit to an empty increment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FetchKey {
    subject_filter: String,
    unread_only: bool,
    hour_bucket: String,
}

pub struct SourceAggregator {
    store: Arc<dyn RecordStore>,
    inbox: Arc<dyn InboxTransport>,
    subject_filter: String,
    allowed_extensions: Vec<String>,
    max_messages: usize,
    inbox_timeout: Duration,
    dedup_window: Duration,
    /// Only cross-request shared state in the pipeline. Guarded by a single
    /// mutation point; the lock is never held across an await.
    recent_fetches: Mutex<HashMap<FetchKey, Instant>>,
}

impl SourceAggregator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        inbox: Arc<dyn InboxTransport>,
        subject_filter: String,
        allowed_extensions: Vec<String>,
        max_messages: usize,
        inbox_timeout: Duration,
        dedup_window: Duration,
    ) -> Self {
        Self {
            store,
            inbox,
            subject_filter,
            allowed_extensions,
            max_messages,
            inbox_timeout,
            dedup_window,
            recent_fetches: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches from every enabled source concurrently and concatenates the
    /// results. A failed source contributes nothing; no error propagates.
    pub async fn fetch_all(&self, request: &MatchingRequest) -> Vec<RawResume> {
        let (email, database) = tokio::join!(
            self.fetch_from_email(request),
            self.fetch_from_database(request)
        );

        let mut resumes = email;
        resumes.extend(database);
        resumes
    }

    async fn fetch_from_database(&self, request: &MatchingRequest) -> Vec<RawResume> {
        if !request.include_database_resumes {
            return Vec::new();
        }
        match self.store.fetch_resumes().await {
            Ok(resumes) => {
                debug!("Database source returned {} resumes", resumes.len());
                resumes
            }
            Err(e) => {
                warn!("Database source failed, skipping: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_from_email(&self, request: &MatchingRequest) -> Vec<RawResume> {
        if !request.include_email_resumes {
            return Vec::new();
        }

        let key = FetchKey {
            subject_filter: self.subject_filter.clone(),
            unread_only: request.unread_only,
            hour_bucket: Utc::now().format("%Y-%m-%d %H").to_string(),
        };
        if self.recently_fetched(&key) {
            debug!("Inbox fetch for {key:?} served from dedup cache (empty increment)");
            return Vec::new();
        }

        let fetch = self
            .inbox
            .fetch_messages(&self.subject_filter, request.unread_only, self.max_messages);
        let messages = match tokio::time::timeout(self.inbox_timeout, fetch).await {
            Ok(Ok(messages)) => messages,
            Ok(Err(e)) => {
                warn!("Inbox source failed, skipping: {e}");
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    "Inbox fetch timed out after {:?}, skipping",
                    self.inbox_timeout
                );
                return Vec::new();
            }
        };

        // Recorded only after a successful fetch so a canceled or failed
        // request never poisons the cache.
        self.record_fetch(key);

        let resumes = resumes_from_messages(messages, &self.allowed_extensions);
        debug!("Email source returned {} resumes", resumes.len());
        resumes
    }

    fn recently_fetched(&self, key: &FetchKey) -> bool {
        let fetches = self
            .recent_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        fetches
            .get(key)
            .is_some_and(|at| at.elapsed() < self.dedup_window)
    }

    fn record_fetch(&self, key: FetchKey) {
        let mut fetches = self
            .recent_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let window = self.dedup_window;
        fetches.retain(|_, at| at.elapsed() < window);
        fetches.insert(key, Instant::now());
    }
}
