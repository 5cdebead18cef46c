mod gitea;
mod types;

pub use gitea::GiteaClient;
pub use types::{RemoteContent, RemoteEntry, RepoId};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote unavailable during {operation}: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },

    #[error("Remote path not found: {0}")]
    NotFound(String),

    #[error("Remote conflict on {path}: {reason}")]
    Conflict { path: String, reason: String },

    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("Malformed response during {operation}: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },
}

impl RemoteError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}

/// Operations a git-hosting content API must offer for a backup run.
///
/// Content is passed as raw bytes; transport encoding is the implementation's concern.
/// Create and update mutate the remote repository and must not be retried blindly:
/// an update with a stale `expected_marker` has to fail with [`RemoteError::Conflict`].
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// List the top-level entries of the repository at `git_ref`
    async fn list_entries(
        &self,
        repo: &RepoId,
        git_ref: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Fetch the bytes and version marker of one path
    async fn get_content(
        &self,
        repo: &RepoId,
        git_ref: &str,
        path: &str,
    ) -> Result<RemoteContent, RemoteError>;

    /// Create a new file, returning its version marker
    async fn create_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
    ) -> Result<String, RemoteError>;

    /// Replace an existing file whose current marker must equal `expected_marker`
    async fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
        expected_marker: &str,
    ) -> Result<String, RemoteError>;
}
