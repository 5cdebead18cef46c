use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Backup directory {path} is unreadable: {reason}")]
    DirectoryUnreadable { path: PathBuf, reason: String },

    #[error("Failed to read file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file found in the backup directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Read every regular file directly under `dir`, except `exclude_name`.
///
/// Files are returned sorted by name. Any unreadable file fails the whole scan.
pub async fn scan_backup_dir(dir: &Path, exclude_name: &str) -> Result<Vec<LocalFile>, ScanError> {
    let mut files = Vec::new();

    for name in list_file_names(dir, exclude_name)? {
        let content = read_local_file(dir.join(&name)).await?;

        debug!("Read {} ({} bytes)", name, content.len());
        files.push(LocalFile { name, content });
    }

    Ok(files)
}

async fn read_local_file(path: PathBuf) -> Result<Vec<u8>, ScanError> {
    fs::read(&path)
        .await
        .map_err(|source| ScanError::FileUnreadable { path, source })
}

/// Names of the candidate files directly under `dir`, sorted
fn list_file_names(dir: &Path, exclude_name: &str) -> Result<Vec<String>, ScanError> {
    let unreadable = |reason: String| ScanError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(dir).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(unreadable("not a directory".to_string()));
    }

    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| unreadable(e.to_string()))?;

        // Symlinks are not followed, so only plain files qualify
        if !entry.file_type().is_file() {
            debug!("Skipping non-file entry {}", entry.path().display());
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            return Err(unreadable(format!(
                "file name {} is not valid UTF-8",
                entry.file_name().to_string_lossy()
            )));
        };

        if name == exclude_name {
            continue;
        }

        names.push(name.to_string());
    }

    Ok(names)
}
