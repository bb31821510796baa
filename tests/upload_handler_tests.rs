use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use resumecraft_backend::{
    entities::upload::{UploadedFile, UploadedFileInsert},
    errors::AppError,
    repositories::upload::UploadRepository,
    use_cases::uploads::UploadHandler,
};

mock! {
    pub UploadRepo {}

    #[async_trait]
    impl UploadRepository for UploadRepo {
        async fn create_upload(&self, upload: &UploadedFileInsert) -> Result<Uuid, AppError>;
        async fn get_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<UploadedFile>, AppError>;
        async fn list_uploads(&self, user_id: &Uuid) -> Result<Vec<UploadedFile>, AppError>;
        async fn delete_upload(&self, id: &Uuid, user_id: &Uuid) -> Result<String, AppError>;
    }
}

const MAX_BYTES: usize = 1024;

fn handler(
    repo: MockUploadRepo,
    dir: &tempfile::TempDir,
) -> UploadHandler<MockUploadRepo> {
    UploadHandler::new(repo, dir.path(), MAX_BYTES).unwrap()
}

#[tokio::test]
async fn stores_a_text_file_under_a_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let user_id = Uuid::new_v4();

    let mut repo = MockUploadRepo::new();
    repo.expect_create_upload()
        .withf(move |insert| {
            insert.user_id == user_id
                && insert.filename == "notes.txt"
                && insert.filepath.ends_with("_notes.txt")
        })
        .times(1)
        .returning(|_| Ok(Uuid::new_v4()));

    let response = handler(repo, &dir)
        .store(user_id, "notes.txt", b"plain text body")
        .await
        .unwrap();
    assert_eq!(response.filename, "notes.txt");

    let stored: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].file_name().to_string_lossy().ends_with("_notes.txt"));
}

#[tokio::test]
async fn rejects_disallowed_extensions_before_touching_the_disk() {
    let dir = tempfile::tempdir().unwrap();
    let err = handler(MockUploadRepo::new(), &dir)
        .store(Uuid::new_v4(), "script.sh", b"#!/bin/sh")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn rejects_files_above_the_size_cap() {
    let dir = tempfile::tempdir().unwrap();
    let big = vec![b'a'; MAX_BYTES + 1];
    let err = handler(MockUploadRepo::new(), &dir)
        .store(Uuid::new_v4(), "big.txt", &big)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn rejects_content_that_contradicts_the_extension() {
    let dir = tempfile::tempdir().unwrap();
    let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    let err = handler(MockUploadRepo::new(), &dir)
        .store(Uuid::new_v4(), "fake.txt", &png_magic)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn removes_the_file_again_when_the_row_insert_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = MockUploadRepo::new();
    repo.expect_create_upload()
        .returning(|_| Err(AppError::InternalError("db down".into())));

    let result = handler(repo, &dir)
        .store(Uuid::new_v4(), "notes.txt", b"plain text")
        .await;
    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn download_of_a_row_whose_file_vanished_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let ghost_path = dir.path().join("20240101000000_gone.txt");

    let mut repo = MockUploadRepo::new();
    let path_str = ghost_path.to_string_lossy().into_owned();
    repo.expect_get_upload().returning(move |_, _| {
        Ok(Some(UploadedFile {
            id,
            user_id,
            filename: "gone.txt".to_string(),
            filepath: path_str.clone(),
            uploaded_at: chrono::Utc::now(),
        }))
    });

    let err = handler(repo, &dir)
        .download(user_id, &id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_both_the_row_and_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let stored = dir.path().join("20240101000000_cv.txt");
    std::fs::write(&stored, b"body").unwrap();

    let mut repo = MockUploadRepo::new();
    let path_str = stored.to_string_lossy().into_owned();
    repo.expect_delete_upload()
        .times(1)
        .returning(move |_, _| Ok(path_str.clone()));

    handler(repo, &dir)
        .delete(Uuid::new_v4(), &Uuid::new_v4())
        .await
        .unwrap();
    assert!(!stored.exists());
}
