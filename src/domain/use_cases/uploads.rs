use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::{
    entities::upload::{allowed_file, UploadResponse, UploadedFile, UploadedFileInsert},
    errors::AppError,
    repositories::upload::UploadRepository,
};

pub struct UploadHandler<R>
where
    R: UploadRepository,
{
    pub upload_repo: R,
    root: PathBuf,
    max_bytes: usize,
}

/// A stored file read back for download.
#[derive(Debug)]
pub struct UploadDownload {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl<R> UploadHandler<R>
where
    R: UploadRepository,
{
    pub fn new(upload_repo: R, root: impl Into<PathBuf>, max_bytes: usize) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(UploadHandler {
            upload_repo,
            root,
            max_bytes,
        })
    }

    /// Stores an uploaded file under a timestamped name after the extension
    /// and content-sniff gates pass. The row and the file land together: if
    /// the insert fails the file is removed again.
    pub async fn store(
        &self,
        user_id: Uuid,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<UploadResponse, AppError> {
        let filename = safe_filename(original_name);
        if filename.is_empty() || !allowed_file(&filename) {
            return Err(AppError::InvalidInput(
                "File type not allowed. Use png, docx, or txt.".into(),
            ));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("Empty file".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::InvalidInput(format!(
                "File exceeds the {} MiB limit",
                self.max_bytes / (1024 * 1024)
            )));
        }
        if !content_matches_extension(&filename, bytes) {
            return Err(AppError::InvalidInput(
                "File content does not match its extension".into(),
            ));
        }

        let stored_name = format!("{}_{}", Utc::now().format("%Y%m%d%H%M%S"), filename);
        let path = self.root.join(&stored_name);
        fs::write(&path, bytes).await?;

        let insert = UploadedFileInsert {
            user_id,
            filename: filename.clone(),
            filepath: path.to_string_lossy().into_owned(),
            uploaded_at: Utc::now(),
        };
        let id = match self.upload_repo.create_upload(&insert).await {
            Ok(id) => id,
            Err(e) => {
                let _ = fs::remove_file(&path).await;
                return Err(e);
            }
        };

        Ok(UploadResponse {
            id,
            filename,
            message: "File uploaded successfully!".to_string(),
        })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<UploadedFile>, AppError> {
        self.upload_repo.list_uploads(&user_id).await
    }

    /// Reads a stored file back for download. A row whose file has gone
    /// missing surfaces as not-found, never a crash.
    pub async fn download(&self, user_id: Uuid, id: &Uuid) -> Result<UploadDownload, AppError> {
        let upload = self
            .upload_repo
            .get_upload(id, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".into()))?;

        let bytes = match fs::read(&upload.filepath).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("Stored file is missing".into()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(UploadDownload {
            mime: sniff_mime(&upload.filename, &bytes),
            filename: upload.filename,
            bytes,
        })
    }

    /// Deletes the row and the file on disk; a file that is already gone is
    /// not an error.
    pub async fn delete(&self, user_id: Uuid, id: &Uuid) -> Result<(), AppError> {
        let filepath = self.upload_repo.delete_upload(id, &user_id).await?;
        match fs::remove_file(Path::new(&filepath)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::warn!("Upload {} deleted but file removal failed: {}", id, e);
                Ok(())
            }
        }
    }
}

/// Strips path components and shell-hostile characters from a client-supplied
/// filename, keeping the extension.
fn safe_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

/// The extension gate alone is spoofable; the first bytes must agree with it.
/// Plain text has no magic number, so `txt` passes only when nothing else is
/// detected.
fn content_matches_extension(filename: &str, bytes: &[u8]) -> bool {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match infer::get(bytes) {
        Some(kind) => match ext.as_str() {
            "png" => kind.extension() == "png",
            // DOCX is a ZIP container; `infer` reports either depending on
            // how much of the central directory it can see.
            "docx" => matches!(kind.extension(), "docx" | "zip"),
            _ => false,
        },
        None => ext == "txt",
    }
}

fn sniff_mime(filename: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    if filename.to_ascii_lowercase().ends_with(".txt") {
        "text/plain; charset=utf-8".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn filenames_are_stripped_of_path_components() {
        assert_eq!(safe_filename("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(safe_filename("C:\\temp\\cv.docx"), "cv.docx");
        assert_eq!(safe_filename("my resume (1).txt"), "myresume1.txt");
    }

    #[test]
    fn png_magic_must_match_png_extension() {
        assert!(content_matches_extension("photo.png", PNG_MAGIC));
        assert!(!content_matches_extension("photo.png", b"plain text here"));
        assert!(!content_matches_extension("notes.txt", PNG_MAGIC));
    }

    #[test]
    fn text_without_magic_passes_as_txt() {
        assert!(content_matches_extension("notes.txt", b"hello world"));
    }

    #[test]
    fn docx_accepts_zip_container_magic() {
        let zip_magic = b"PK\x03\x04rest-of-archive";
        assert!(content_matches_extension("cv.docx", zip_magic));
    }
}
