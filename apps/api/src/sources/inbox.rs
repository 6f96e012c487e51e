//! Inbox source — turns fetched mail messages into sourced resumes.
//!
//! The transport itself (connection, authentication, message retrieval) is an
//! external collaborator behind the `InboxTransport` trait; the pipeline only
//! consumes attachment name/bytes and the subject/from/date headers. When no
//! transport is configured a `DisabledInbox` stands in and contributes
//! nothing.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::{RawResume, ResumeSource, ResumeStatus};

/// One attachment of a fetched message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content: Bytes,
}

/// The slice of a mail message the pipeline consumes.
#[derive(Debug, Clone)]
pub struct InboxMessage {
    pub subject: String,
    pub from: String,
    pub date: Option<DateTime<Utc>>,
    pub attachments: Vec<Attachment>,
}

#[async_trait]
pub trait InboxTransport: Send + Sync {
    /// Fetches messages whose subject contains `subject_filter`, optionally
    /// restricted to unread messages, up to `max_messages`.
    async fn fetch_messages(
        &self,
        subject_filter: &str,
        unread_only: bool,
        max_messages: usize,
    ) -> anyhow::Result<Vec<InboxMessage>>;
}

/// Stand-in transport used when inbox credentials are not configured.
pub struct DisabledInbox;

#[async_trait]
impl InboxTransport for DisabledInbox {
    async fn fetch_messages(
        &self,
        _subject_filter: &str,
        _unread_only: bool,
        _max_messages: usize,
    ) -> anyhow::Result<Vec<InboxMessage>> {
        debug!("Inbox transport disabled; returning no messages");
        Ok(Vec::new())
    }
}

/// Builds sourced resumes from fetched messages: one resume per attachment
/// whose extension is on the allow-list. Content stays unextracted; the
/// attachment bytes ride along for the text extractor.
pub fn resumes_from_messages(
    messages: Vec<InboxMessage>,
    allowed_extensions: &[String],
) -> Vec<RawResume> {
    let mut resumes = Vec::new();
    for message in messages {
        for attachment in message.attachments {
            let file_name = attachment.file_name;
            let allowed = allowed_extensions
                .iter()
                .any(|ext| file_name.to_lowercase().ends_with(&ext.to_lowercase()));
            if !allowed {
                debug!("Skipping attachment with disallowed extension: {file_name}");
                continue;
            }
            resumes.push(RawResume {
                id: Uuid::new_v4().to_string(),
                file_path: file_name.clone(),
                file_name,
                content: None,
                email_subject: Some(message.subject.clone()),
                email_sender: Some(message.from.clone()),
                email: None,
                phone: None,
                email_date: message.date,
                source: ResumeSource::Email,
                created_at: Utc::now(),
                processed_at: None,
                status: ResumeStatus::Pending,
                payload: Some(attachment.content),
            });
        }
    }
    resumes
}
