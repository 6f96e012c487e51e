//! Record store source — read-only query over persisted resumes.
//!
//! The store is an external collaborator; the pipeline consumes it through
//! the `RecordStore` trait so tests can inject fakes, the same way `AppState`
//! carries every source behind an `Arc<dyn Trait>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::resume::{RawResume, ResumeSource, ResumeStatus};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All persisted resumes, newest first.
    async fn fetch_resumes(&self) -> anyhow::Result<Vec<RawResume>>;
}

/// Row shape of the `resumes` table. `status` is the integer encoding
/// (0=pending, 1=processing, 2=processed, 3=failed); `source` is a plain
/// string tag.
#[derive(Debug, FromRow)]
struct ResumeRow {
    id: String,
    file_name: String,
    file_path: String,
    content: Option<String>,
    email_subject: Option<String>,
    email_sender: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    email_date: Option<DateTime<Utc>>,
    source: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    status: i32,
}

impl From<ResumeRow> for RawResume {
    fn from(row: ResumeRow) -> Self {
        let source = match row.source.as_deref() {
            Some("Email") => ResumeSource::Email,
            _ => ResumeSource::Database,
        };
        RawResume {
            id: row.id,
            file_name: row.file_name,
            file_path: row.file_path,
            content: row.content,
            email_subject: row.email_subject,
            email_sender: row.email_sender,
            email: row.email,
            phone: row.phone,
            email_date: row.email_date,
            source,
            created_at: row.created_at,
            processed_at: row.processed_at,
            status: ResumeStatus::from_i32(row.status),
            payload: None,
        }
    }
}

/// Production record store backed by PostgreSQL.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_resumes(&self) -> anyhow::Result<Vec<RawResume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT id, file_name, file_path, content, email_subject, email_sender, \
                    email, phone, email_date, source, created_at, processed_at, status \
             FROM resumes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RawResume::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: Option<&str>, status: i32) -> ResumeRow {
        ResumeRow {
            id: "db_001".to_string(),
            file_name: "john_doe_resume.pdf".to_string(),
            file_path: "/sample/resumes/john_doe_resume.pdf".to_string(),
            content: Some("John Doe".to_string()),
            email_subject: None,
            email_sender: None,
            email: None,
            phone: None,
            email_date: None,
            source: source.map(String::from),
            created_at: Utc::now(),
            processed_at: None,
            status,
        }
    }

    #[test]
    fn test_row_conversion_decodes_status_and_source() {
        let resume = RawResume::from(row(Some("Email"), 2));
        assert_eq!(resume.source, ResumeSource::Email);
        assert_eq!(resume.status, ResumeStatus::Processed);
    }

    #[test]
    fn test_missing_or_unknown_source_defaults_to_database() {
        assert_eq!(RawResume::from(row(None, 0)).source, ResumeSource::Database);
        assert_eq!(
            RawResume::from(row(Some("weird"), 0)).source,
            ResumeSource::Database
        );
    }
}
