use std::collections::HashSet;
use std::path::PathBuf;

use tokio::time::{interval, Duration};

use crate::repositories::{resume::ResumeRepository, sqlx_repo::SqlxResumeRepo};
use crate::storage::artifacts::ArtifactStore;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Hourly sweep deleting PDF artifacts no resume row references anymore.
/// Rows and files land together on save, but a deleted row whose file
/// removal failed would otherwise leak the file forever.
pub async fn start_artifact_sweep(repo: SqlxResumeRepo, artifacts: ArtifactStore) {
    let mut interval = interval(SWEEP_INTERVAL);

    loop {
        interval.tick().await;

        let referenced: HashSet<PathBuf> = match repo.list_pdf_paths().await {
            Ok(paths) => paths.into_iter().map(PathBuf::from).collect(),
            Err(e) => {
                tracing::error!("Artifact sweep could not list referenced PDFs: {}", e);
                continue;
            }
        };

        match artifacts.sweep_orphans(&referenced).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Swept {} orphaned PDF artifacts", count),
            Err(e) => tracing::error!("Artifact sweep failed: {}", e),
        }
    }
}
