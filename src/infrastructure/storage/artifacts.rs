use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use uuid::Uuid;

/// Grace period before an unreferenced artifact file is considered orphaned.
const ORPHAN_MIN_AGE: Duration = Duration::from_secs(60 * 60);

/// On-disk store for generated PDF artifacts. Writes go through a temp file
/// plus rename so readers never observe a half-written PDF.
#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(ArtifactStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pdf_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("resume_{}.pdf", id))
    }

    pub async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let tmp = path.with_extension(format!("tmp{:08x}", rand::random::<u32>()));
        fs::write(&tmp, bytes).await?;
        match fs::rename(&tmp, path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&tmp).await;
                Err(e)
            }
        }
    }

    /// Removes an artifact; a file that is already gone is not an error
    /// (callers must tolerate a dangling `pdf_path`).
    pub async fn remove(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Deletes artifact files no row references anymore. Files younger than
    /// the grace period are skipped so in-flight saves are never swept.
    pub async fn sweep_orphans(&self, referenced: &HashSet<PathBuf>) -> io::Result<u64> {
        let mut removed = 0u64;
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_artifact = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("resume_") && n.ends_with(".pdf"))
                .unwrap_or(false);
            if !is_artifact || referenced.contains(&path) {
                continue;
            }

            let old_enough = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .map(|age| age >= ORPHAN_MIN_AGE)
                .unwrap_or(false);
            if !old_enough {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to sweep orphaned artifact {:?}: {}", path, e),
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_atomic_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        let path = store.pdf_path(&Uuid::new_v4());

        store.write_atomic(&path, b"%PDF-1.3").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        store.remove(&store.pdf_path(&Uuid::new_v4())).await.unwrap();
    }

    #[tokio::test]
    async fn sweep_skips_referenced_and_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let kept = store.pdf_path(&Uuid::new_v4());
        let fresh_orphan = store.pdf_path(&Uuid::new_v4());
        store.write_atomic(&kept, b"kept").await.unwrap();
        store.write_atomic(&fresh_orphan, b"orphan").await.unwrap();

        let referenced = HashSet::from([kept.clone()]);
        // Both files were written moments ago, so neither is old enough.
        let removed = store.sweep_orphans(&referenced).await.unwrap();
        assert_eq!(removed, 0);
        assert!(fresh_orphan.exists());
    }
}
