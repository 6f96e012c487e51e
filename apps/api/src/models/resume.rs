//! Resume records and ranking results.
//!
//! Resumes move through two phases: `RawResume` is what a source hands back
//! (content possibly absent, contact fields possibly absent), `EnrichedResume`
//! is what the ranking pipeline produces after text and contact extraction.
//! Keeping the phases as separate types means no half-enriched record is ever
//! visible to a caller.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a resume. Serialized as `"Database"` / `"Email"` to match the
/// record store and the response contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeSource {
    Database,
    Email,
}

impl std::fmt::Display for ResumeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResumeSource::Database => write!(f, "Database"),
            ResumeSource::Email => write!(f, "Email"),
        }
    }
}

/// Processing state. The record store persists this as an integer
/// (0=pending, 1=processing, 2=processed, 3=failed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeStatus {
    #[default]
    Pending,
    Processing,
    Processed,
    Failed,
}

impl ResumeStatus {
    /// Decodes the store's integer encoding. Unknown values fall back to
    /// `Pending` rather than failing the row.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => ResumeStatus::Processing,
            2 => ResumeStatus::Processed,
            3 => ResumeStatus::Failed,
            _ => ResumeStatus::Pending,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            ResumeStatus::Pending => 0,
            ResumeStatus::Processing => 1,
            ResumeStatus::Processed => 2,
            ResumeStatus::Failed => 3,
        }
    }
}

/// A resume as sourced, immutable once constructed.
///
/// `content` is lazy: absent until the text extractor runs. Inbox-sourced
/// resumes additionally carry the raw attachment bytes in `payload` so
/// extraction never has to re-contact the transport; the field never leaves
/// the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResume {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub content: Option<String>,
    pub email_subject: Option<String>,
    pub email_sender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_date: Option<DateTime<Utc>>,
    pub source: ResumeSource,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: ResumeStatus,
    #[serde(skip)]
    pub payload: Option<Bytes>,
}

/// A resume after text and contact-field extraction. `content` is always
/// populated (possibly with extractor fallback text) and the derived identity
/// fields are attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResume {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub content: String,
    pub email_subject: Option<String>,
    pub email_sender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub candidate_name: Option<String>,
    pub email_date: Option<DateTime<Utc>>,
    pub source: ResumeSource,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: ResumeStatus,
}

impl EnrichedResume {
    /// Best display name for the candidate: extracted name, else the sender's
    /// display part (angle-bracket payload and quotes stripped), else the file
    /// stem with separators spaced out, else a fixed placeholder.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.candidate_name {
            if !name.trim().is_empty() {
                return name.trim().to_string();
            }
        }

        if let Some(sender) = &self.email_sender {
            let mut display = sender.as_str();
            if let Some(idx) = display.find('<') {
                display = &display[..idx];
            }
            let display = display.replace('"', "");
            let display = display.trim();
            if !display.is_empty() {
                return display.to_string();
            }
        }

        if !self.file_name.is_empty() {
            let stem = self
                .file_name
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(&self.file_name);
            return stem.replace(['_', '-'], " ");
        }

        "Unknown Candidate".to_string()
    }
}

/// One matched keyword for one (resume, keyword-list) evaluation. The weight
/// is a tier constant; presence, not occurrence count, decides inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub keyword: String,
    pub weight: f64,
}

/// A scored, ranked resume for one matching request. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResult {
    pub resume: EnrichedResume,
    pub score: f64,
    pub rank: u32,
    pub keyword_matches: Vec<KeywordMatch>,
    pub summary: Option<String>,
    pub resume_source: ResumeSource,
}

/// Resume projection for external exposure. The body text is deliberately
/// excluded from responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub email_subject: Option<String>,
    pub email_sender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_date: Option<DateTime<Utc>>,
    pub source: ResumeSource,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: ResumeStatus,
}

/// Ranking entry as returned to callers: the content-free resume projection
/// plus the derived ranking fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSummary {
    pub resume: ResumeSummary,
    pub score: f64,
    pub rank: u32,
    pub keyword_matches: Vec<KeywordMatch>,
    pub summary: Option<String>,
    pub resume_source: ResumeSource,
    pub candidate_name: String,
}

impl From<&EnrichedResume> for ResumeSummary {
    fn from(resume: &EnrichedResume) -> Self {
        ResumeSummary {
            id: resume.id.clone(),
            file_name: resume.file_name.clone(),
            file_path: resume.file_path.clone(),
            email_subject: resume.email_subject.clone(),
            email_sender: resume.email_sender.clone(),
            email: resume.email.clone(),
            phone: resume.phone.clone(),
            email_date: resume.email_date,
            source: resume.source,
            created_at: resume.created_at,
            processed_at: resume.processed_at,
            status: resume.status,
        }
    }
}

impl From<&RankingResult> for RankingSummary {
    fn from(r: &RankingResult) -> Self {
        let resume = &r.resume;
        RankingSummary {
            resume: ResumeSummary::from(resume),
            score: r.score,
            rank: r.rank,
            keyword_matches: r.keyword_matches.clone(),
            summary: r.summary.clone(),
            resume_source: r.resume_source,
            candidate_name: resume.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(
        file_name: &str,
        email_sender: Option<&str>,
        candidate_name: Option<&str>,
    ) -> EnrichedResume {
        EnrichedResume {
            id: "r1".to_string(),
            file_name: file_name.to_string(),
            file_path: format!("/resumes/{file_name}"),
            content: "body".to_string(),
            email_subject: None,
            email_sender: email_sender.map(String::from),
            email: None,
            phone: None,
            candidate_name: candidate_name.map(String::from),
            email_date: None,
            source: ResumeSource::Email,
            created_at: Utc::now(),
            processed_at: None,
            status: ResumeStatus::Pending,
        }
    }

    #[test]
    fn test_display_name_prefers_extracted_name() {
        let r = enriched("x.pdf", Some("Jane <j@e.com>"), Some("John Doe"));
        assert_eq!(r.display_name(), "John Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_sender_display_part() {
        let r = enriched("x.pdf", Some("\"Jane Smith\" <jane@corp.com>"), None);
        assert_eq!(r.display_name(), "Jane Smith");
    }

    #[test]
    fn test_display_name_falls_back_to_file_stem() {
        let r = enriched("john_doe-resume.pdf", Some("<jd@e.com>"), None);
        assert_eq!(r.display_name(), "john doe resume");
    }

    #[test]
    fn test_display_name_placeholder_when_nothing_available() {
        let r = enriched("", None, None);
        assert_eq!(r.display_name(), "Unknown Candidate");
    }

    #[test]
    fn test_status_integer_round_trip() {
        for status in [
            ResumeStatus::Pending,
            ResumeStatus::Processing,
            ResumeStatus::Processed,
            ResumeStatus::Failed,
        ] {
            assert_eq!(ResumeStatus::from_i32(status.as_i32()), status);
        }
    }

    #[test]
    fn test_unknown_status_decodes_as_pending() {
        assert_eq!(ResumeStatus::from_i32(42), ResumeStatus::Pending);
        assert_eq!(ResumeStatus::from_i32(-1), ResumeStatus::Pending);
    }

    #[test]
    fn test_source_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&ResumeSource::Email).unwrap(),
            "\"Email\""
        );
        assert_eq!(
            serde_json::to_string(&ResumeSource::Database).unwrap(),
            "\"Database\""
        );
    }
}
