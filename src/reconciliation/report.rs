use super::plan::Decision;
use crate::remote::RemoteError;

/// Remote call a per-file failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetContent,
    CreateFile,
    UpdateFile,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::GetContent => write!(f, "fetch"),
            Operation::CreateFile => write!(f, "create"),
            Operation::UpdateFile => write!(f, "update"),
        }
    }
}

/// What happened to one local file
#[derive(Debug)]
pub enum Outcome {
    Created {
        marker: String,
    },
    Updated {
        previous_marker: String,
        marker: String,
    },
    Skipped,
    Failed {
        /// `None` when the failure happened before a decision could be made
        decision: Option<Decision>,
        operation: Operation,
        error: RemoteError,
    },
}

impl Outcome {
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Outcome::Created { .. } => Some(Decision::Create),
            Outcome::Updated { .. } => Some(Decision::Update),
            Outcome::Skipped => Some(Decision::Skip),
            Outcome::Failed { decision, .. } => *decision,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub outcome: Outcome,
}

/// Result of one reconciliation run
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per processed file, in processing order
    pub outcomes: Vec<FileOutcome>,
    /// Files left unprocessed because the run stopped at a failure
    pub not_attempted: Vec<String>,
}

impl RunReport {
    pub fn created(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, Outcome::Created { .. }))
    }

    pub fn updated(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, Outcome::Updated { .. }))
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, Outcome::Skipped))
    }

    pub fn failures(&self) -> Vec<&FileOutcome> {
        self.outcomes
            .iter()
            .filter(|f| f.outcome.is_failure())
            .collect()
    }

    /// Decision per processed file, in processing order
    pub fn decisions(&self) -> Vec<(&str, Option<Decision>)> {
        self.outcomes
            .iter()
            .map(|f| (f.name.as_str(), f.outcome.decision()))
            .collect()
    }

    pub fn aborted(&self) -> bool {
        !self.not_attempted.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty() && !self.aborted()
    }

    fn names_where(&self, predicate: impl Fn(&Outcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|f| predicate(&f.outcome))
            .map(|f| f.name.as_str())
            .collect()
    }
}
