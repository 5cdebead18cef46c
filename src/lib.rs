pub mod backup;
pub mod commit_message;
pub mod config;
pub mod reconciliation;
pub mod remote;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use backup::{run_backup, BackupError};
pub use commit_message::{read_commit_message, MessageError};
pub use config::{read_config, BackupConfig, ConfigError};
pub use reconciliation::{
    reconcile, reconcile_with_policy, Decision, FailurePolicy, FileOutcome, Operation, Outcome,
    RunContext, RunReport,
};
pub use remote::{GiteaClient, RemoteContent, RemoteEntry, RemoteError, RemoteRepository, RepoId};
pub use scanner::{scan_backup_dir, LocalFile, ScanError};
pub use utils::compute_hash;
