use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// File extensions accepted for resume uploads.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "docx", "txt"];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UploadedFile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub filepath: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct UploadedFileInsert {
    pub user_id: Uuid,
    pub filename: String,
    pub filepath: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub message: String,
}

/// Extension-based gate applied before anything touches the disk.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
