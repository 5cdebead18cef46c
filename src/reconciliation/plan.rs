use crate::remote::RemoteEntry;

/// Verdict for one local file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No remote entry of that name in the snapshot
    Create,
    /// Remote entry exists with different content
    Update,
    /// Remote entry exists with identical content
    Skip,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Create => write!(f, "create"),
            Decision::Update => write!(f, "update"),
            Decision::Skip => write!(f, "skip"),
        }
    }
}

/// Find the snapshot entry for a local file name (exact, case-sensitive match)
pub fn find_remote_entry<'a>(snapshot: &'a [RemoteEntry], name: &str) -> Option<&'a RemoteEntry> {
    snapshot.iter().find(|entry| entry.name == name)
}

/// Whether local and remote content digests are equal; a mismatch means update
pub fn digests_match(local_digest: &str, remote_digest: &str) -> bool {
    local_digest == remote_digest
}
