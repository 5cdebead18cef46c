use super::types::{ApiErrorBody, ContentsResponse, FileOptions, FileResponse};
use super::{RemoteContent, RemoteEntry, RemoteError, RemoteRepository, RepoId};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const LIST_ENTRIES: &str = "list entries";
const GET_CONTENT: &str = "get content";
const CREATE_FILE: &str = "create file";
const UPDATE_FILE: &str = "update file";

/// Client for the Gitea repository contents API (`/api/v1/repos/{owner}/{repo}/contents`)
pub struct GiteaClient {
    base_url: Url,
    token: String,
    client: Client,
}

impl GiteaClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Root URL of the Gitea instance (e.g., "https://git.example.com")
    /// * `token` - Access token sent as a bearer credential on every request
    /// * `timeout` - Upper bound for each request, connect included
    pub fn new(base_url: Url, token: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Unavailable {
                operation: "build client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url,
            token: token.into(),
            client,
        })
    }

    /// URL of the contents endpoint, optionally for a single path
    fn contents_url(&self, repo: &RepoId, path: Option<&str>) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", "repos", repo.owner.as_str(), repo.name.as_str(), "contents"]);
            if let Some(path) = path {
                segments.extend(path.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    async fn write_file(
        &self,
        operation: &'static str,
        repo: &RepoId,
        path: &str,
        body: FileOptions<'_>,
    ) -> Result<String, RemoteError> {
        let url = self.contents_url(repo, Some(path))?;
        let request = if body.sha.is_some() {
            debug!("PUT {} ({} in {})", url, operation, repo);
            self.client.put(url)
        } else {
            debug!("POST {} ({} in {})", url, operation, repo);
            self.client.post(url)
        };

        let response = request
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let response = check_status(response, operation, path).await?;
        let file: FileResponse = parse_json(response, operation).await?;

        file.content
            .map(|c| c.sha)
            .ok_or_else(|| RemoteError::MalformedResponse {
                operation,
                reason: format!("no content metadata returned for {path}"),
            })
    }
}

#[async_trait]
impl RemoteRepository for GiteaClient {
    async fn list_entries(
        &self,
        repo: &RepoId,
        git_ref: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        let url = self.contents_url(repo, None)?;
        debug!("GET {} (ref {})", url, git_ref);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("ref", git_ref)])
            .send()
            .await
            .map_err(|e| transport_error(LIST_ENTRIES, e))?;

        // The repository root itself missing is an access problem, not a per-file race
        let response = match check_status(response, LIST_ENTRIES, "").await {
            Err(RemoteError::NotFound(_)) => {
                return Err(RemoteError::Unavailable {
                    operation: LIST_ENTRIES,
                    reason: format!("repository {repo} or ref '{git_ref}' not found"),
                })
            }
            other => other?,
        };

        let entries: Vec<ContentsResponse> = parse_json(response, LIST_ENTRIES).await?;
        Ok(entries.into_iter().map(RemoteEntry::from).collect())
    }

    async fn get_content(
        &self,
        repo: &RepoId,
        git_ref: &str,
        path: &str,
    ) -> Result<RemoteContent, RemoteError> {
        let url = self.contents_url(repo, Some(path))?;
        debug!("GET {} (ref {})", url, git_ref);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("ref", git_ref)])
            .send()
            .await
            .map_err(|e| transport_error(GET_CONTENT, e))?;

        let response = check_status(response, GET_CONTENT, path).await?;
        let entry: ContentsResponse = parse_json(response, GET_CONTENT).await?;
        decode_contents(entry)
    }

    async fn create_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
    ) -> Result<String, RemoteError> {
        let body = FileOptions {
            content: STANDARD.encode(content),
            message,
            branch,
            sha: None,
        };
        self.write_file(CREATE_FILE, repo, path, body).await
    }

    async fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
        expected_marker: &str,
    ) -> Result<String, RemoteError> {
        let body = FileOptions {
            content: STANDARD.encode(content),
            message,
            branch,
            sha: Some(expected_marker),
        };
        self.write_file(UPDATE_FILE, repo, path, body).await
    }
}

fn transport_error(operation: &'static str, err: reqwest::Error) -> RemoteError {
    RemoteError::Unavailable {
        operation,
        reason: err.to_string(),
    }
}

/// Map a non-success status onto the remote error taxonomy
pub(crate) fn classify_status(
    status: StatusCode,
    operation: &'static str,
    path: &str,
    message: &str,
) -> RemoteError {
    let reason = if message.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {message}")
    };

    match status {
        StatusCode::NOT_FOUND => RemoteError::NotFound(path.to_string()),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Conflict {
                path: path.to_string(),
                reason,
            }
        }
        _ => RemoteError::Unavailable { operation, reason },
    }
}

async fn check_status(
    response: Response,
    operation: &'static str,
    path: &str,
) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    Err(classify_status(status, operation, path, message.trim()))
}

async fn parse_json<T: DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> Result<T, RemoteError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(operation, e))?;

    serde_json::from_slice(&bytes).map_err(|e| RemoteError::MalformedResponse {
        operation,
        reason: e.to_string(),
    })
}

/// Decode the base64 payload of a single file entry
pub(crate) fn decode_contents(entry: ContentsResponse) -> Result<RemoteContent, RemoteError> {
    if let Some(encoding) = entry.encoding.as_deref() {
        if encoding != "base64" {
            return Err(RemoteError::MalformedResponse {
                operation: GET_CONTENT,
                reason: format!("unsupported encoding '{encoding}' for {}", entry.path),
            });
        }
    }

    let encoded = entry.content.ok_or_else(|| RemoteError::MalformedResponse {
        operation: GET_CONTENT,
        reason: format!("{} ({}) has no inline content", entry.path, entry.entry_type),
    })?;

    // The API may wrap long payloads across lines
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let content = STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::MalformedResponse {
            operation: GET_CONTENT,
            reason: format!("invalid base64 for {}: {e}", entry.path),
        })?;

    Ok(RemoteContent {
        content,
        version_marker: entry.sha,
    })
}
