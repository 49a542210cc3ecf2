//! Startup ingestion of a documents directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{RetrievalError, Retriever};

/// Ingests every regular file directly under `dir`, using the file name as
/// the source. Files are processed in name order. Files that are not valid
/// UTF-8 are skipped with a warning.
///
/// Returns the number of documents created.
pub async fn ingest_dir(retriever: &Retriever, dir: &Path) -> Result<usize, RetrievalError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| RetrievalError::Io { path, source }
    };

    let mut files: Vec<PathBuf> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err(dir))?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err(dir))? {
        let file_type = entry.file_type().await.map_err(io_err(&entry.path()))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut total = 0;
    for path in files {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping non UTF-8 file {}", path.display());
                continue;
            }
            Err(e) => return Err(io_err(&path)(e)),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        total += retriever.ingest(&name, &content).await?.len();
    }

    info!("Loaded {} documents from {}", total, dir.display());
    Ok(total)
}
