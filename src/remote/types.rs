use serde::{Deserialize, Serialize};

/// Owner and name of the repository being backed up to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of the remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    pub version_marker: String,
}

/// Current bytes of a remote file together with its version marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteContent {
    pub content: Vec<u8>,
    pub version_marker: String,
}

/// Entry of the Gitea `contents` API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentsResponse {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type", default)]
    pub entry_type: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl From<ContentsResponse> for RemoteEntry {
    fn from(entry: ContentsResponse) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            version_marker: entry.sha,
        }
    }
}

/// Response to create and update calls
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileResponse {
    pub content: Option<ContentsResponse>,
}

/// Body shared by create (`sha` absent) and update (`sha` = expected marker)
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileOptions<'a> {
    pub content: String,
    pub message: &'a str,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

/// Error body returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
