use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───── Structured record ─────────────────────────────────────────────

/// The normalized, in-memory representation of a resume's content. Built by
/// the form normalizer on every submit/preview/save/edit request and
/// serialized to `resumes.data_json` as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub desc: String,
}

impl ExperienceEntry {
    /// Inclusion rule shared by the normalizer and all renderers: an entry
    /// counts only if company, role, or description carries text.
    pub fn has_content(&self) -> bool {
        !self.company.is_empty() || !self.role.is_empty() || !self.desc.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub years: String,
}

impl EducationEntry {
    pub fn has_content(&self) -> bool {
        !self.school.is_empty() || !self.degree.is_empty()
    }
}

impl StructuredResume {
    /// The value a QR code should encode, preferring LinkedIn over the
    /// personal website.
    pub fn qr_payload(&self) -> Option<&str> {
        if !self.linkedin.is_empty() {
            Some(&self.linkedin)
        } else if !self.website.is_empty() {
            Some(&self.website)
        } else {
            None
        }
    }

    pub fn display_title(&self) -> String {
        if self.full_name.is_empty() {
            "Untitled".to_string()
        } else {
            self.full_name.clone()
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub data_json: String,
    pub html_preview: String,
    pub pdf_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRecord {
    /// Deserializes the stored snapshot. A corrupted snapshot surfaces as a
    /// recoverable error, never a panic.
    pub fn structured(&self) -> Result<StructuredResume, serde_json::Error> {
        serde_json::from_str(&self.data_json)
    }
}

#[derive(Debug)]
pub struct ResumeInsert {
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub data_json: String,
    pub html_preview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ResumeUpdate {
    pub title: String,
    pub data_json: String,
    pub html_preview: String,
    pub pdf_path: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub template: String,
    pub has_pdf: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResumeRecord> for ResumeSummary {
    fn from(record: &ResumeRecord) -> Self {
        ResumeSummary {
            id: record.id,
            title: record.title.clone(),
            template: record.template.clone(),
            has_pdf: record.pdf_path.is_some(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeSavedResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
}

// ───── Download formats ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Json,
    Txt,
    Docx,
    Pdf,
}

impl DownloadFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            DownloadFormat::Json => "application/json",
            DownloadFormat::Txt => "text/plain; charset=utf-8",
            DownloadFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DownloadFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DownloadFormat::Json => "json",
            DownloadFormat::Txt => "txt",
            DownloadFormat::Docx => "docx",
            DownloadFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for DownloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DownloadFormat::Json),
            "txt" => Ok(DownloadFormat::Txt),
            "docx" => Ok(DownloadFormat::Docx),
            "pdf" => Ok(DownloadFormat::Pdf),
            other => Err(other.to_string()),
        }
    }
}

/// A rendered download: bytes plus the headers a handler needs to serve it.
#[derive(Debug)]
pub struct DownloadFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}
