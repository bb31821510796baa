mod common;

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use uuid::Uuid;

use resumecraft_backend::{
    entities::resume::{ResumeInsert, ResumeRecord, ResumeUpdate, StructuredResume},
    errors::AppError,
    render::template::TemplateRenderer,
    repositories::resume::ResumeRepository,
    storage::artifacts::ArtifactStore,
    use_cases::resume::ResumeHandler,
};

use common::{form, full_form};

mock! {
    pub ResumeRepo {}

    #[async_trait]
    impl ResumeRepository for ResumeRepo {
        async fn create_resume(&self, resume: &ResumeInsert) -> Result<Uuid, AppError>;
        async fn set_pdf_path(&self, id: &Uuid, pdf_path: &str) -> Result<(), AppError>;
        async fn get_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<ResumeRecord>, AppError>;
        async fn list_resumes(&self, user_id: &Uuid) -> Result<Vec<ResumeRecord>, AppError>;
        async fn update_resume(&self, id: &Uuid, user_id: &Uuid, update: &ResumeUpdate) -> Result<(), AppError>;
        async fn delete_resume(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<String>, AppError>;
        async fn list_pdf_paths(&self) -> Result<Vec<String>, AppError>;
    }
}

struct Fixture {
    _template_dir: tempfile::TempDir,
    artifact_dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let template_dir = tempfile::tempdir().unwrap();
        fs::write(
            template_dir.path().join("template_modern.html"),
            "<h1>{{ data.full_name }}</h1>{% if preview %}<em>preview</em>{% endif %}",
        )
        .unwrap();
        Fixture {
            _template_dir: template_dir,
            artifact_dir: tempfile::tempdir().unwrap(),
        }
    }

    fn handler(&self, repo: MockResumeRepo) -> ResumeHandler<MockResumeRepo> {
        let templates = Arc::new(
            TemplateRenderer::new(self._template_dir.path()).expect("template dir loads"),
        );
        let artifacts = ArtifactStore::new(self.artifact_dir.path()).unwrap();
        ResumeHandler::new(repo, templates, artifacts)
    }

    fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.artifact_dir.path()).unwrap()
    }
}

fn stored_record(id: Uuid, user_id: Uuid, data: &StructuredResume) -> ResumeRecord {
    ResumeRecord {
        id,
        user_id,
        title: data.display_title(),
        template: "template_modern.html".to_string(),
        data_json: serde_json::to_string(data).unwrap(),
        html_preview: "<h1>stored</h1>".to_string(),
        pdf_path: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn preview_renders_without_touching_the_repository() {
    let fixture = Fixture::new();
    let handler = fixture.handler(MockResumeRepo::new());

    let response = handler.preview(&full_form("template_modern.html")).unwrap();
    assert!(response.html.contains("<h1>Jane Doe</h1>"));
    assert!(response.html.contains("<em>preview</em>"));
}

#[tokio::test]
async fn preview_rejects_an_unknown_template() {
    let fixture = Fixture::new();
    let handler = fixture.handler(MockResumeRepo::new());

    let err = handler.preview(&full_form("stolen_template.html")).unwrap_err();
    assert!(matches!(err, AppError::InvalidTemplate(_)));
}

#[tokio::test]
async fn save_rejects_a_missing_name_before_any_write() {
    let fixture = Fixture::new();
    let handler = fixture.handler(MockResumeRepo::new());

    let err = handler
        .save(Uuid::new_v4(), &form(&[("email", "jane@x.com")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn save_persists_row_and_pdf_artifact_together() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut repo = MockResumeRepo::new();
    repo.expect_create_resume()
        .withf(move |insert| {
            insert.user_id == user_id
                && insert.title == "Jane Doe"
                && insert.template == "template_modern.html"
                && insert.data_json.contains("\"full_name\":\"Jane Doe\"")
        })
        .times(1)
        .returning(move |_| Ok(id));
    repo.expect_set_pdf_path()
        .withf(move |got_id, path| *got_id == id && path.ends_with(&format!("resume_{}.pdf", id)))
        .times(1)
        .returning(|_, _| Ok(()));

    let handler = fixture.handler(repo);
    let response = handler
        .save(user_id, &full_form("template_modern.html"))
        .await
        .unwrap();

    assert_eq!(response.id, id);
    assert_eq!(response.title, "Jane Doe");

    let pdf = fs::read(fixture.artifacts().pdf_path(&id)).unwrap();
    assert_eq!(&pdf[..5], b"%PDF-");
}

#[tokio::test]
async fn save_rolls_back_the_row_when_the_artifact_cannot_be_recorded() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut repo = MockResumeRepo::new();
    repo.expect_create_resume().times(1).returning(move |_| Ok(id));
    repo.expect_set_pdf_path()
        .times(1)
        .returning(|_, _| Err(AppError::InternalError("connection lost".into())));
    repo.expect_delete_resume()
        .withf(move |got_id, got_user| *got_id == id && *got_user == user_id)
        .times(1)
        .returning(|_, _| Ok(None));

    let handler = fixture.handler(repo);
    let result = handler.save(user_id, &full_form("template_modern.html")).await;

    assert!(result.is_err());
    assert!(!fixture.artifacts().pdf_path(&id).exists());
}

#[tokio::test]
async fn update_overwrites_the_snapshot_and_regenerates_the_artifact() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let stored = stored_record(
        id,
        user_id,
        &StructuredResume {
            full_name: "Old Name".to_string(),
            ..StructuredResume::default()
        },
    );

    let mut repo = MockResumeRepo::new();
    repo.expect_get_resume()
        .times(1)
        .returning(move |_, _| Ok(Some(stored.clone())));
    repo.expect_update_resume()
        .withf(|_, _, update| {
            update.title == "Jane Doe"
                && update.data_json.contains("\"full_name\":\"Jane Doe\"")
                && update.pdf_path.is_some()
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let handler = fixture.handler(repo);
    let response = handler
        .update(user_id, &id.to_string(), &full_form("template_modern.html"))
        .await
        .unwrap();

    assert_eq!(response.title, "Jane Doe");
    assert!(fixture.artifacts().pdf_path(&id).exists());
}

#[tokio::test]
async fn delete_removes_the_row_and_the_artifact_file() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let artifacts = fixture.artifacts();
    let pdf_path = artifacts.pdf_path(&id);
    artifacts.write_atomic(&pdf_path, b"%PDF-1.3").await.unwrap();

    let path_str = pdf_path.to_string_lossy().into_owned();
    let mut repo = MockResumeRepo::new();
    repo.expect_delete_resume()
        .times(1)
        .returning(move |_, _| Ok(Some(path_str.clone())));

    let handler = fixture.handler(repo);
    handler.delete(user_id, &id.to_string()).await.unwrap();

    assert!(!pdf_path.exists());
}

#[tokio::test]
async fn download_of_an_unknown_id_is_not_found() {
    let fixture = Fixture::new();
    let mut repo = MockResumeRepo::new();
    repo.expect_get_resume().returning(|_, _| Ok(None));

    let handler = fixture.handler(repo);
    let err = handler
        .download(Uuid::new_v4(), &Uuid::new_v4().to_string(), "pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn unsupported_format_is_rejected_before_the_repository_is_asked() {
    let fixture = Fixture::new();
    // No expectations: any repository call would panic the test.
    let handler = fixture.handler(MockResumeRepo::new());

    let err = handler
        .download(Uuid::new_v4(), &Uuid::new_v4().to_string(), "xyz")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnsupportedFormat(f) if f == "xyz"));
}

#[tokio::test]
async fn corrupted_snapshot_surfaces_as_a_recoverable_error() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut record = stored_record(id, user_id, &StructuredResume::default());
    record.data_json = "{not valid json".to_string();

    let mut repo = MockResumeRepo::new();
    repo.expect_get_resume()
        .returning(move |_, _| Ok(Some(record.clone())));

    let handler = fixture.handler(repo);
    let err = handler
        .download(user_id, &id.to_string(), "txt")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CorruptRecord(_)));
}

#[tokio::test]
async fn download_renders_every_supported_format_from_the_snapshot() {
    let fixture = Fixture::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let data = StructuredResume {
        full_name: "Jane Doe".to_string(),
        skills: vec!["Go".to_string(), "Python".to_string()],
        ..StructuredResume::default()
    };
    let record = stored_record(id, user_id, &data);

    let mut repo = MockResumeRepo::new();
    repo.expect_get_resume()
        .returning(move |_, _| Ok(Some(record.clone())));

    let handler = fixture.handler(repo);
    for (format, mime_prefix) in [
        ("json", "application/json"),
        ("txt", "text/plain"),
        ("docx", "application/vnd.openxmlformats"),
        ("pdf", "application/pdf"),
    ] {
        let file = handler.download(user_id, &id.to_string(), format).await.unwrap();
        assert!(
            file.mime.starts_with(mime_prefix),
            "format {} served as {}",
            format,
            file.mime
        );
        assert!(file.filename.ends_with(&format!(".{}", format)));
        assert!(!file.bytes.is_empty());
    }
}
