use crate::commit_message::{read_commit_message, MessageError};
use crate::config::BackupConfig;
use crate::reconciliation::{reconcile_with_policy, FailurePolicy, RunContext, RunReport};
use crate::remote::{RemoteError, RemoteRepository, RepoId};
use crate::scanner::{scan_backup_dir, ScanError};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Scan error: {0}")]
    ScanError(#[from] ScanError),

    #[error("Failed to list remote files: {0}")]
    ListingError(#[source] RemoteError),

    #[error("Commit message error: {0}")]
    MessageError(#[from] MessageError),
}

/// Build the run context from configuration and the commit message
pub fn run_context(config: &BackupConfig, commit_message: String) -> RunContext {
    RunContext {
        repo: RepoId::new(config.repo_owner.trim(), config.repo_name.trim()),
        branch: config.branch.trim().to_string(),
        commit_message,
    }
}

/// Run one backup: scan the folder, snapshot the remote listing once,
/// read the commit message, then reconcile every file.
pub async fn run_backup<R>(
    config: &BackupConfig,
    client: &R,
    policy: FailurePolicy,
) -> Result<RunReport, BackupError>
where
    R: RemoteRepository + ?Sized,
{
    info!(
        "Scanning {} for configuration files",
        config.backup_folder.display()
    );
    let local_files = scan_backup_dir(&config.backup_folder, &config.git_log_file).await?;
    info!("Found {} local file(s)", local_files.len());

    let repo = RepoId::new(config.repo_owner.trim(), config.repo_name.trim());
    info!("Listing files on branch {} of {}", config.branch, repo);
    let snapshot = client
        .list_entries(&repo, config.branch.trim())
        .await
        .map_err(BackupError::ListingError)?;
    info!("Remote snapshot holds {} entries", snapshot.len());

    info!("Reading commit message from {}", config.git_log_file);
    let commit_message = read_commit_message(&config.backup_folder, &config.git_log_file).await?;

    info!("Pushing local changes");
    let ctx = run_context(config, commit_message);
    let report = reconcile_with_policy(&local_files, &snapshot, client, &ctx, policy).await;

    info!(
        "Run finished: {} created, {} updated, {} unchanged, {} failed",
        report.created().len(),
        report.updated().len(),
        report.skipped().len(),
        report.failures().len()
    );

    Ok(report)
}
