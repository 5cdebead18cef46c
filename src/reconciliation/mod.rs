mod execute;
mod plan;
mod report;

pub use execute::{reconcile, reconcile_with_policy, FailurePolicy, RunContext};
pub use plan::{digests_match, find_remote_entry, Decision};
pub use report::{FileOutcome, Operation, Outcome, RunReport};
