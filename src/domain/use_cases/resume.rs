use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    entities::resume::{
        DownloadFile, DownloadFormat, PreviewResponse, ResumeInsert, ResumeRecord,
        ResumeSavedResponse, ResumeSummary, ResumeUpdate, StructuredResume,
    },
    errors::AppError,
    render::{
        docx::generate_docx,
        form::{form_to_structured, RawForm},
        pdf::generate_pdf,
        template::{TemplateRenderer, DEFAULT_TEMPLATE},
        text::structured_to_plaintext,
    },
    repositories::resume::ResumeRepository,
    storage::artifacts::ArtifactStore,
    utils::valid_uuid::valid_uuid,
};

pub struct ResumeHandler<R>
where
    R: ResumeRepository,
{
    pub resume_repo: R,
    templates: Arc<TemplateRenderer>,
    artifacts: ArtifactStore,
}

impl<R> ResumeHandler<R>
where
    R: ResumeRepository,
{
    pub fn new(resume_repo: R, templates: Arc<TemplateRenderer>, artifacts: ArtifactStore) -> Self {
        ResumeHandler {
            resume_repo,
            templates,
            artifacts,
        }
    }

    /// Normalizes a submission and renders it into the requested template,
    /// without persisting anything.
    pub fn preview(&self, form: &RawForm) -> Result<PreviewResponse, AppError> {
        let template = chosen_template(form);
        if !self.templates.is_allowed(&template) {
            return Err(AppError::InvalidTemplate(template));
        }

        let structured = form_to_structured(form);
        let html = self.templates.render(&template, &structured, true)?;

        Ok(PreviewResponse { html })
    }

    /// Normalizes and persists a submission, rendering the HTML preview and
    /// the PDF artifact. The row and the artifact land together: if the
    /// artifact cannot be written, the freshly inserted row is deleted again
    /// and the whole save fails.
    pub async fn save(&self, user_id: Uuid, form: &RawForm) -> Result<ResumeSavedResponse, AppError> {
        let template = chosen_template(form);
        if !self.templates.is_allowed(&template) {
            return Err(AppError::InvalidTemplate(template));
        }

        let structured = form_to_structured(form);
        if structured.full_name.is_empty() {
            return Err(AppError::InvalidInput("Please enter your name".into()));
        }

        let html = self.templates.render(&template, &structured, true)?;
        let pdf_bytes = generate_pdf(&structured)?;
        let title = structured.display_title();

        let insert = ResumeInsert {
            user_id,
            title: title.clone(),
            template,
            data_json: snapshot_json(&structured)?,
            html_preview: html,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = self.resume_repo.create_resume(&insert).await?;

        let pdf_path = self.artifacts.pdf_path(&id);
        if let Err(e) = self.artifacts.write_atomic(&pdf_path, &pdf_bytes).await {
            self.undo_save(&id, &user_id).await;
            return Err(AppError::InternalError(format!(
                "Failed to write PDF artifact: {}",
                e
            )));
        }

        if let Err(e) = self
            .resume_repo
            .set_pdf_path(&id, &pdf_path.to_string_lossy())
            .await
        {
            let _ = self.artifacts.remove(&pdf_path).await;
            self.undo_save(&id, &user_id).await;
            return Err(e);
        }

        Ok(ResumeSavedResponse {
            id,
            title,
            message: "Resume saved successfully!".to_string(),
        })
    }

    async fn undo_save(&self, id: &Uuid, user_id: &Uuid) {
        if let Err(e) = self.resume_repo.delete_resume(id, user_id).await {
            tracing::error!("Failed to roll back resume row {}: {}", id, e);
        }
    }

    /// Re-normalizes a submission against an existing record: the stored
    /// snapshot is overwritten and both derived artifacts are regenerated.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: &str,
        form: &RawForm,
    ) -> Result<ResumeSavedResponse, AppError> {
        let id = valid_uuid(id)?;
        let record = self
            .resume_repo
            .get_resume(&id, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Resume not found".into()))?;

        if !self.templates.is_allowed(&record.template) {
            return Err(AppError::InvalidTemplate(record.template));
        }

        let structured = form_to_structured(form);
        if structured.full_name.is_empty() {
            return Err(AppError::InvalidInput("Please enter your name".into()));
        }

        let html = self.templates.render(&record.template, &structured, true)?;
        let pdf_bytes = generate_pdf(&structured)?;
        let title = structured.display_title();

        // The artifact is replaced first; a failure leaves the old snapshot
        // and the old file fully intact.
        let pdf_path = record
            .pdf_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.artifacts.pdf_path(&id));
        self.artifacts
            .write_atomic(&pdf_path, &pdf_bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write PDF artifact: {}", e)))?;

        let update = ResumeUpdate {
            title: title.clone(),
            data_json: snapshot_json(&structured)?,
            html_preview: html,
            pdf_path: Some(pdf_path.to_string_lossy().into_owned()),
            updated_at: Utc::now(),
        };
        self.resume_repo.update_resume(&id, &user_id, &update).await?;

        Ok(ResumeSavedResponse {
            id,
            title,
            message: "Resume updated successfully!".to_string(),
        })
    }

    pub async fn get_resume(&self, user_id: Uuid, id: &str) -> Result<ResumeRecord, AppError> {
        let id = valid_uuid(id)?;
        self.resume_repo
            .get_resume(&id, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Resume not found".into()))
    }

    pub async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeSummary>, AppError> {
        let records = self.resume_repo.list_resumes(&user_id).await?;
        Ok(records.iter().map(ResumeSummary::from).collect())
    }

    /// The template identifiers a client may currently pick from.
    pub fn available_templates(&self) -> Vec<String> {
        self.templates.allowed_templates().into_iter().collect()
    }

    /// Renders the stored snapshot into its template for on-screen viewing.
    pub async fn render_stored(&self, user_id: Uuid, id: &str) -> Result<String, AppError> {
        let record = self.get_resume(user_id, id).await?;

        if !self.templates.is_allowed(&record.template) {
            return Err(AppError::InvalidTemplate(record.template));
        }
        let data = record
            .structured()
            .map_err(|e| AppError::CorruptRecord(e.to_string()))?;

        Ok(self.templates.render(&record.template, &data, false)?)
    }

    /// Deletes the record and its generated PDF file.
    pub async fn delete(&self, user_id: Uuid, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        let pdf_path = self.resume_repo.delete_resume(&id, &user_id).await?;

        if let Some(path) = pdf_path {
            if let Err(e) = self.artifacts.remove(Path::new(&path)).await {
                tracing::warn!("Resume {} deleted but artifact removal failed: {}", id, e);
            }
        }
        Ok(())
    }

    /// Renders the stored snapshot into the requested download format. The
    /// stored record is never touched; PDF bytes are regenerated fresh so a
    /// missing artifact file does not matter here.
    pub async fn download(
        &self,
        user_id: Uuid,
        id: &str,
        format: &str,
    ) -> Result<DownloadFile, AppError> {
        let format = DownloadFormat::from_str(format)
            .map_err(AppError::UnsupportedFormat)?;
        let record = self.get_resume(user_id, id).await?;
        let data = record
            .structured()
            .map_err(|e| AppError::CorruptRecord(e.to_string()))?;

        render_download(&data, format)
    }
}

/// Pure download rendering, shared by the handler and its tests.
pub fn render_download(
    data: &StructuredResume,
    format: DownloadFormat,
) -> Result<DownloadFile, AppError> {
    let bytes = match format {
        DownloadFormat::Json => serde_json::to_string_pretty(data)
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .into_bytes(),
        DownloadFormat::Txt => structured_to_plaintext(data).into_bytes(),
        DownloadFormat::Docx => generate_docx(data)?,
        DownloadFormat::Pdf => generate_pdf(data)?,
    };

    let mut stem = slug::slugify(data.display_title());
    if stem.is_empty() {
        stem = "resume".to_string();
    }

    Ok(DownloadFile {
        filename: format!("{}.{}", stem, format.extension()),
        mime: format.mime(),
        bytes,
    })
}

fn chosen_template(form: &RawForm) -> String {
    let template = form.scalar("template").trim();
    if template.is_empty() {
        DEFAULT_TEMPLATE.to_string()
    } else {
        template.to_string()
    }
}

fn snapshot_json(structured: &StructuredResume) -> Result<String, AppError> {
    serde_json::to_string(structured).map_err(|e| AppError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::resume::ExperienceEntry;

    fn sample() -> StructuredResume {
        StructuredResume {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            skills: vec!["Go".to_string(), "Python".to_string()],
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                role: "Engineer".to_string(),
                ..ExperienceEntry::default()
            }],
            ..StructuredResume::default()
        }
    }

    #[test]
    fn json_download_is_pretty_printed_with_two_space_indent() {
        let file = render_download(&sample(), DownloadFormat::Json).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.contains("\n  \"full_name\": \"Jane Doe\""));
        assert_eq!(file.filename, "jane-doe.json");
        assert_eq!(file.mime, "application/json");
    }

    #[test]
    fn txt_download_contains_the_expected_lines() {
        let file = render_download(&sample(), DownloadFormat::Txt).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.contains("Full name: Jane Doe"));
        assert!(text.contains("jane@x.com"));
        assert!(text.contains("Skills:\nGo,Python"));
        assert!(text.contains("Engineer at Acme"));
    }

    #[test]
    fn untitled_resume_gets_a_fallback_filename() {
        let file = render_download(&StructuredResume::default(), DownloadFormat::Txt).unwrap();
        assert_eq!(file.filename, "untitled.txt");
    }
}
