use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Failed to read commit message file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the commit message used for every write of a run.
///
/// The file content is taken verbatim; bytes that are not valid UTF-8 are replaced.
pub async fn read_commit_message(dir: &Path, file_name: &str) -> Result<String, MessageError> {
    let path = dir.join(file_name);
    let bytes = fs::read(&path)
        .await
        .map_err(|source| MessageError::FileUnreadable { path, source })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_commit_message_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("commit.log"), "Nightly backup\n\n  r1, r2\n").unwrap();

        let message = read_commit_message(dir.path(), "commit.log").await.unwrap();
        assert_eq!(message, "Nightly backup\n\n  r1, r2\n");
    }

    #[tokio::test]
    async fn test_read_commit_message_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_commit_message(dir.path(), "commit.log").await.unwrap_err();
        match err {
            MessageError::FileUnreadable { path, .. } => {
                assert!(path.ends_with("commit.log"));
            }
        }
    }

    #[tokio::test]
    async fn test_read_commit_message_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("commit.log"), [b'o', b'k', 0xff]).unwrap();

        let message = read_commit_message(dir.path(), "commit.log").await.unwrap();
        assert!(message.starts_with("ok"));
        assert!(message.ends_with('\u{FFFD}'));
    }
}
