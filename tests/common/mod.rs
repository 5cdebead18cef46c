#![allow(dead_code)]

use async_trait::async_trait;
use config_backup::remote::{RemoteContent, RemoteEntry, RemoteError, RemoteRepository, RepoId};
use config_backup::BackupConfig;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `files` into `dir`
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(dir.join(name), content).expect("Failed to write test file");
    }
}

/// A remote call as observed by [`FakeRemote`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(String),
    Create(String),
    Update { path: String, expected_marker: String },
}

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, (Vec<u8>, String)>,
    next_marker: u32,
    calls: Vec<Call>,
    messages: Vec<String>,
}

/// In-memory repository enforcing marker checks on update and name checks on create
#[derive(Debug, Default)]
pub struct FakeRemote {
    state: Mutex<State>,
    /// Paths listed but answering 404 on fetch, as if deleted after the listing
    pub vanished: HashSet<String>,
    /// Paths whose update always conflicts, as if changed concurrently
    pub conflicting: HashSet<String>,
    /// Fail every call as unreachable
    pub offline: bool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with an explicit marker
    pub fn with_file(self, path: &str, content: &str, marker: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), (content.as_bytes().to_vec(), marker.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create(_) | Call::Update { .. }))
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|(content, _)| content.clone())
    }

    pub fn marker(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|(_, marker)| marker.clone())
    }

    /// Listing as the real API would report it
    pub fn snapshot(&self) -> Vec<RemoteEntry> {
        self.state
            .lock()
            .unwrap()
            .files
            .iter()
            .map(|(path, (_, marker))| RemoteEntry {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.clone(),
                version_marker: marker.clone(),
            })
            .collect()
    }

    fn offline_error(&self, operation: &'static str) -> Result<(), RemoteError> {
        if self.offline {
            Err(RemoteError::Unavailable {
                operation,
                reason: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn new_marker(state: &mut State) -> String {
    state.next_marker += 1;
    format!("gen{}", state.next_marker)
}

#[async_trait]
impl RemoteRepository for FakeRemote {
    async fn list_entries(
        &self,
        _repo: &RepoId,
        _git_ref: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        self.state.lock().unwrap().calls.push(Call::List);
        self.offline_error("list entries")?;
        Ok(self.snapshot())
    }

    async fn get_content(
        &self,
        _repo: &RepoId,
        _git_ref: &str,
        path: &str,
    ) -> Result<RemoteContent, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get(path.to_string()));
        self.offline_error("get content")?;

        if self.vanished.contains(path) {
            return Err(RemoteError::NotFound(path.to_string()));
        }

        state
            .files
            .get(path)
            .map(|(content, marker)| RemoteContent {
                content: content.clone(),
                version_marker: marker.clone(),
            })
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))
    }

    async fn create_file(
        &self,
        _repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        _branch: &str,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(path.to_string()));
        self.offline_error("create file")?;

        if state.files.contains_key(path) {
            return Err(RemoteError::Conflict {
                path: path.to_string(),
                reason: "file already exists".to_string(),
            });
        }

        let marker = new_marker(&mut state);
        state
            .files
            .insert(path.to_string(), (content.to_vec(), marker.clone()));
        state.messages.push(message.to_string());
        Ok(marker)
    }

    async fn update_file(
        &self,
        _repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        _branch: &str,
        expected_marker: &str,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update {
            path: path.to_string(),
            expected_marker: expected_marker.to_string(),
        });
        self.offline_error("update file")?;

        let current = state.files.get(path).map(|(_, marker)| marker.clone());
        match current {
            None => return Err(RemoteError::NotFound(path.to_string())),
            Some(marker) if marker != expected_marker || self.conflicting.contains(path) => {
                return Err(RemoteError::Conflict {
                    path: path.to_string(),
                    reason: "sha does not match".to_string(),
                })
            }
            Some(_) => {}
        }

        let marker = new_marker(&mut state);
        state
            .files
            .insert(path.to_string(), (content.to_vec(), marker.clone()));
        state.messages.push(message.to_string());
        Ok(marker)
    }
}

/// Configuration pointing at `backup_folder`, with `commit.log` as the message file
pub fn test_config(backup_folder: &Path) -> BackupConfig {
    BackupConfig {
        gitea_url: "https://git.example.com".to_string(),
        gitea_token: "token".to_string(),
        repo_owner: "ops".to_string(),
        repo_name: "configs".to_string(),
        backup_folder: backup_folder.to_path_buf(),
        git_log_file: "commit.log".to_string(),
        log_level: String::new(),
        branch: "master".to_string(),
        request_timeout_secs: 30,
    }
}
