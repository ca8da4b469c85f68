use std::fmt;
use chrono::{DateTime, Utc};
use thiserror::Error;
use crate::error::KuduUpdateError;
use crate::flag::GuardOutcome;
use crate::upload::{ArchiveDigest, UploadReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeployStage {
    Resolving,
    Guarding,
    Uploading,
    Finalizing,
    Done,
}

impl DeployStage {
    pub fn next(self) -> Self {
        match self {
            DeployStage::Resolving => DeployStage::Guarding,
            DeployStage::Guarding => DeployStage::Uploading,
            DeployStage::Uploading => DeployStage::Finalizing,
            DeployStage::Finalizing | DeployStage::Done => DeployStage::Done,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == DeployStage::Done
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::Resolving => "resolve",
            DeployStage::Guarding => "guard",
            DeployStage::Uploading => "upload",
            DeployStage::Finalizing => "finalize",
            DeployStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct DeployReport {
    pub site_name: String,
    pub subscription_id: String,
    pub completed: Vec<DeployStage>,
    pub guard: GuardOutcome,
    pub upload: UploadReceipt,
    pub archive: ArchiveDigest,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// The absorbing failed state: which stage broke and what had already finished.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {error}")]
pub struct DeployFailure {
    pub stage: DeployStage,
    pub completed: Vec<DeployStage>,
    #[source]
    pub error: KuduUpdateError,
}

impl DeployFailure {
    /// True when the archive went out but the flag was never set.
    pub fn leaves_site_inconsistent(&self) -> bool {
        self.stage == DeployStage::Finalizing
    }
}

/// Walks the stages forward and records what finished.
#[derive(Debug)]
pub(crate) struct StageTracker {
    current: DeployStage,
    completed: Vec<DeployStage>,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: DeployStage::Resolving,
            completed: Vec::new(),
        }
    }

    pub(crate) fn current(&self) -> DeployStage {
        self.current
    }

    pub(crate) fn advance(&mut self) {
        if !self.current.is_terminal() {
            self.completed.push(self.current);
            self.current = self.current.next();
        }
    }

    pub(crate) fn fail(&self, error: KuduUpdateError) -> DeployFailure {
        DeployFailure {
            stage: self.current,
            completed: self.completed.clone(),
            error,
        }
    }

    pub(crate) fn into_completed(self) -> Vec<DeployStage> {
        self.completed
    }
}
