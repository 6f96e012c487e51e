//! Text Extractor — turns binary resume documents into plain text.
//!
//! Extraction is best-effort by contract: a document that cannot be parsed
//! produces a per-format placeholder string, never an error, so one bad file
//! cannot abort a pipeline run. The output only has to be good enough for
//! keyword search, not faithful document conversion.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::models::resume::RawResume;

/// Declared document format, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// Legacy binary Word format. Not supported for extraction.
    Doc,
    Unknown,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else if lower.ends_with(".doc") {
            DocumentFormat::Doc
        } else {
            DocumentFormat::Unknown
        }
    }
}

fn parse_failure_placeholder(format: &str, file_name: &str) -> String {
    format!("{format} file: {file_name} - Content could not be extracted due to parsing error.")
}

/// Extracts plain text from a document blob with a declared format.
///
/// Parse failures for a supported format return a placeholder naming the
/// format and file; unrecognized formats return an empty string. Never panics,
/// never errors.
pub fn extract_document(bytes: &[u8], format: DocumentFormat, file_name: &str) -> String {
    match format {
        DocumentFormat::Pdf => match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("PDF parsing failed for {file_name}: {e}");
                parse_failure_placeholder("PDF", file_name)
            }
        },
        DocumentFormat::Docx => match extract_docx_text(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("DOCX parsing failed for {file_name}: {e}");
                parse_failure_placeholder("DOCX", file_name)
            }
        },
        DocumentFormat::Doc => format!(
            "DOC file: {file_name} - Legacy Word format is not supported for text extraction."
        ),
        DocumentFormat::Unknown => String::new(),
    }
}

/// Reads `word/document.xml` out of the DOCX zip container and concatenates
/// all `w:t` text runs in document order, with a newline per paragraph.
fn extract_docx_text(bytes: &[u8]) -> anyhow::Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut document = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut out = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text_run = false,
            Event::End(e) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Event::Text(e) if in_text_run => out.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Resolves the text body for a resume.
///
/// A populated `content` is returned unchanged with no file access. Otherwise
/// the in-memory attachment payload is extracted; otherwise the file on disk
/// is read. When the file is unreachable a fallback line is synthesized from
/// the source metadata so ranking can still proceed on what is known.
pub fn resume_text(resume: &RawResume) -> String {
    if let Some(content) = &resume.content {
        if !content.is_empty() {
            return content.clone();
        }
    }

    let format = DocumentFormat::from_file_name(&resume.file_name);

    if let Some(payload) = &resume.payload {
        return extract_document(payload, format, &resume.file_name);
    }

    if Path::new(&resume.file_path).is_file() {
        match std::fs::read(&resume.file_path) {
            Ok(bytes) => return extract_document(&bytes, format, &resume.file_name),
            Err(e) => warn!("Failed to read {}: {e}", resume.file_path),
        }
    }

    warn!(
        "File not found for {}, using fallback text",
        resume.file_name
    );
    format!(
        "Resume: {} - {} - {}",
        resume.file_name,
        resume.email_sender.as_deref().unwrap_or(""),
        resume.email_subject.as_deref().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ResumeSource, ResumeStatus};
    use chrono::Utc;
    use std::io::Write;

    fn raw(file_name: &str, content: Option<&str>, payload: Option<&[u8]>) -> RawResume {
        RawResume {
            id: "r1".to_string(),
            file_name: file_name.to_string(),
            file_path: format!("/nonexistent/{file_name}"),
            content: content.map(String::from),
            email_subject: Some("Application".to_string()),
            email_sender: Some("Jane <jane@corp.com>".to_string()),
            email: None,
            phone: None,
            email_date: None,
            source: ResumeSource::Email,
            created_at: Utc::now(),
            processed_at: None,
            status: ResumeStatus::Pending,
            payload: payload.map(|b| bytes::Bytes::copy_from_slice(b)),
        }
    }

    /// Minimal DOCX: a zip archive holding only word/document.xml.
    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_format_from_file_name_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_file_name("a.PDF"), DocumentFormat::Pdf);
        assert_eq!(
            DocumentFormat::from_file_name("a.Docx"),
            DocumentFormat::Docx
        );
        assert_eq!(DocumentFormat::from_file_name("a.doc"), DocumentFormat::Doc);
        assert_eq!(
            DocumentFormat::from_file_name("a.txt"),
            DocumentFormat::Unknown
        );
    }

    #[test]
    fn test_unparsable_pdf_returns_placeholder() {
        let text = extract_document(b"not a pdf", DocumentFormat::Pdf, "cv.pdf");
        assert_eq!(
            text,
            "PDF file: cv.pdf - Content could not be extracted due to parsing error."
        );
    }

    #[test]
    fn test_unparsable_docx_returns_placeholder() {
        let text = extract_document(b"not a zip", DocumentFormat::Docx, "cv.docx");
        assert_eq!(
            text,
            "DOCX file: cv.docx - Content could not be extracted due to parsing error."
        );
    }

    #[test]
    fn test_legacy_doc_returns_explanatory_placeholder() {
        let text = extract_document(b"\xd0\xcf\x11\xe0", DocumentFormat::Doc, "cv.doc");
        assert!(text.starts_with("DOC file: cv.doc"));
        assert!(text.contains("not supported"));
    }

    #[test]
    fn test_unknown_format_returns_empty_string() {
        assert_eq!(
            extract_document(b"hello", DocumentFormat::Unknown, "cv.txt"),
            ""
        );
    }

    #[test]
    fn test_docx_text_runs_concatenated_in_order() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>John Doe</w:t></w:r></w:p>
                <w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let text = extract_document(&docx_bytes(xml), DocumentFormat::Docx, "cv.docx");
        assert_eq!(text, "John Doe\nSenior Engineer\n");
    }

    #[test]
    fn test_docx_without_document_xml_is_a_parse_failure() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let text = extract_document(&cursor.into_inner(), DocumentFormat::Docx, "cv.docx");
        assert!(text.contains("could not be extracted"));
    }

    #[test]
    fn test_stored_content_bypasses_extraction() {
        // file_path points nowhere; a populated content must come back
        // unchanged without any file access.
        let resume = raw("cv.pdf", Some("stored body"), None);
        assert_eq!(resume_text(&resume), "stored body");
    }

    #[test]
    fn test_payload_extracted_when_content_absent() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>从payload</w:t></w:r></w:p></w:body></w:document>"#;
        let resume = raw("cv.docx", None, Some(&docx_bytes(xml)));
        assert_eq!(resume_text(&resume), "从payload\n");
    }

    #[test]
    fn test_missing_file_synthesizes_metadata_fallback() {
        let resume = raw("cv.pdf", None, None);
        assert_eq!(
            resume_text(&resume),
            "Resume: cv.pdf - Jane <jane@corp.com> - Application"
        );
    }

    #[test]
    fn test_file_on_disk_is_read_and_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>on disk</w:t></w:r></w:p></w:body></w:document>"#;
        std::fs::write(&path, docx_bytes(xml)).unwrap();

        let mut resume = raw("cv.docx", None, None);
        resume.file_path = path.to_string_lossy().into_owned();
        assert_eq!(resume_text(&resume), "on disk\n");
    }
}
