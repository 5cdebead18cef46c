use super::plan::{digests_match, find_remote_entry, Decision};
use super::report::{FileOutcome, Operation, Outcome, RunReport};
use crate::remote::{RemoteEntry, RemoteRepository, RepoId};
use crate::scanner::LocalFile;
use crate::utils::compute_hash;
use tracing::{debug, error, info, warn};

/// Values fixed for the whole run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub repo: RepoId,
    /// Branch written to; also the ref the remote is read at
    pub branch: String,
    pub commit_message: String,
}

/// What to do with the remaining files after one fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the batch at the first failure
    #[default]
    StopOnFirstError,
    /// Record the failure and carry on with the next file
    ContinueOnError,
}

/// Reconcile local files against the remote snapshot, stopping at the first failure
pub async fn reconcile<R>(
    local_files: &[LocalFile],
    snapshot: &[RemoteEntry],
    client: &R,
    ctx: &RunContext,
) -> RunReport
where
    R: RemoteRepository + ?Sized,
{
    reconcile_with_policy(local_files, snapshot, client, ctx, FailurePolicy::StopOnFirstError).await
}

/// Reconcile local files against the remote snapshot.
///
/// Files are processed sequentially in the given order. Each one is created when the
/// snapshot has no entry of that name, otherwise its current remote content is fetched
/// and it is updated only if the SHA-256 digests differ. A conflict is never retried
/// with a fresh marker.
pub async fn reconcile_with_policy<R>(
    local_files: &[LocalFile],
    snapshot: &[RemoteEntry],
    client: &R,
    ctx: &RunContext,
    policy: FailurePolicy,
) -> RunReport
where
    R: RemoteRepository + ?Sized,
{
    let mut report = RunReport::default();

    for (index, file) in local_files.iter().enumerate() {
        let outcome = reconcile_file(file, snapshot, client, ctx).await;

        let failed = if let Outcome::Failed {
            operation, error, ..
        } = &outcome
        {
            error!("Failed to {} {} in {}: {}", operation, file.name, ctx.repo, error);
            true
        } else {
            false
        };

        report.outcomes.push(FileOutcome {
            name: file.name.clone(),
            outcome,
        });

        if failed && policy == FailurePolicy::StopOnFirstError {
            report.not_attempted = local_files[index + 1..]
                .iter()
                .map(|f| f.name.clone())
                .collect();
            if !report.not_attempted.is_empty() {
                error!(
                    "Aborting run, {} file(s) not processed",
                    report.not_attempted.len()
                );
            }
            break;
        }
    }

    report
}

async fn reconcile_file<R>(
    file: &LocalFile,
    snapshot: &[RemoteEntry],
    client: &R,
    ctx: &RunContext,
) -> Outcome
where
    R: RemoteRepository + ?Sized,
{
    let Some(entry) = find_remote_entry(snapshot, &file.name) else {
        info!("Creating {} in {}", file.name, ctx.repo);
        return match client
            .create_file(&ctx.repo, &file.name, &file.content, &ctx.commit_message, &ctx.branch)
            .await
        {
            Ok(marker) => Outcome::Created { marker },
            Err(error) => Outcome::Failed {
                decision: Some(Decision::Create),
                operation: Operation::CreateFile,
                error,
            },
        };
    };

    let remote = match client.get_content(&ctx.repo, &ctx.branch, &entry.path).await {
        Ok(remote) => remote,
        Err(error) => {
            return Outcome::Failed {
                decision: None,
                operation: Operation::GetContent,
                error,
            }
        }
    };

    let local_digest = compute_hash(&file.content);
    let remote_digest = compute_hash(&remote.content);
    debug!(
        "{}: local {} remote {} (marker {})",
        file.name, local_digest, remote_digest, remote.version_marker
    );

    if digests_match(&local_digest, &remote_digest) {
        warn!("No local changes detected in {}", file.name);
        return Outcome::Skipped;
    }

    info!("Updating {} in {}", entry.path, ctx.repo);
    match client
        .update_file(
            &ctx.repo,
            &entry.path,
            &file.content,
            &ctx.commit_message,
            &ctx.branch,
            &remote.version_marker,
        )
        .await
    {
        Ok(marker) => Outcome::Updated {
            previous_marker: remote.version_marker,
            marker,
        },
        Err(error) => Outcome::Failed {
            decision: Some(Decision::Update),
            operation: Operation::UpdateFile,
            error,
        },
    }
}
