//! Local staging files and their cleanup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tubely_storage::RandomId;

/// Path of the staged copy of an upload, `<staging_dir>/<hex id>.mp4`.
pub fn staging_path(staging_dir: &Path, id: &RandomId) -> PathBuf {
    staging_dir.join(format!("{}.mp4", id.to_hex()))
}

/// Write the raw upload to `path`. Fails if the file already exists.
pub(crate) async fn write_staged(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}

/// Remove a local artifact. A file that is already gone is not an error,
/// and other failures are logged rather than returned.
pub async fn remove_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed local artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove local artifact"
        ),
    }
}

/// Local files created by one ingestion.
///
/// Paths are registered before the step that creates them runs, so partial
/// output from a failed step is covered too. [`LocalArtifacts::cleanup`] is
/// the normal path; if the owning future is dropped first, `Drop` removes
/// whatever is still registered.
#[derive(Debug, Default)]
pub struct LocalArtifacts {
    paths: Vec<PathBuf>,
}

impl LocalArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every registered file. Safe to call more than once.
    pub async fn cleanup(&mut self) {
        while let Some(path) = self.paths.last() {
            remove_artifact(path).await;
            self.paths.pop();
        }
    }
}

impl Drop for LocalArtifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(
                    path = %path.display(),
                    "Removed local artifact of abandoned ingestion"
                ),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove local artifact of abandoned ingestion"
                ),
            }
        }
    }
}
