use std::fmt;

use common::storage::metadata_store::RepoRecord;

/// Why a repository contributed nothing to a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotUuid,
    NoBlob,
    NoValidBlock,
    Transport(String),
    Storage(String),
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotUuid => "not-uuid",
            Self::NoBlob => "no-blob",
            Self::NoValidBlock => "no-valid-block",
            Self::Transport(_) => "transport-error",
            Self::Storage(_) => "storage-error",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) | Self::Storage(detail) => {
                write!(f, "{}: {detail}", self.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Unchanged,
    Updated(RepoRecord),
    Skipped(SkipReason),
}

/// Summary of one completed refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: Vec<String>,
    pub unchanged: usize,
    pub skipped: Vec<(String, SkipReason)>,
    pub rebuilt: bool,
    pub node_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    AlreadyRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reasons_render_their_label() {
        assert_eq!(SkipReason::NotUuid.to_string(), "not-uuid");
        assert_eq!(SkipReason::NoValidBlock.to_string(), "no-valid-block");
        assert_eq!(
            SkipReason::Transport("timed out".into()).to_string(),
            "transport-error: timed out"
        );
    }
}
