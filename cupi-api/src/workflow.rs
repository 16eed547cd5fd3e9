//! Outcome type for operations that chain several requests.
//!
//! Workflows run their stages strictly in order. The first stage the
//! server rejects ends the workflow; objects created by earlier stages are
//! left in place and reported back so the caller can delete them.

use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::response::{ApiOutcome, Oid, Rejection};

/// A single request within a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ScheduleSet,
    Schedule,
    ScheduleSetMember,
    ScheduleDetail,
    User,
    UserPin,
    TempVoiceFile,
    VoiceFileUpload,
    GreetingStreamFile,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::ScheduleSet => "create schedule set",
            Stage::Schedule => "create schedule",
            Stage::ScheduleSetMember => "map schedule to schedule set",
            Stage::ScheduleDetail => "add schedule detail",
            Stage::User => "create user",
            Stage::UserPin => "clear pin must-change flag",
            Stage::TempVoiceFile => "create temporary voice file",
            Stage::VoiceFileUpload => "upload voice file",
            Stage::GreetingStreamFile => "assign greeting stream file",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of a multi-request workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// Every stage succeeded.
    Completed {
        message: String,
        created_oids: Vec<Oid>,
    },
    /// `stage` was rejected; later stages were not attempted.
    Failed {
        stage: Stage,
        rejection: Rejection,
        /// Objects created before the failing stage, in creation order.
        created_oids: Vec<Oid>,
    },
    /// A local input file does not exist. Nothing was sent.
    FileNotFound { path: PathBuf },
}

impl WorkflowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed { .. })
    }

    /// Objects the workflow created, whether or not it completed.
    pub fn created_oids(&self) -> &[Oid] {
        match self {
            WorkflowOutcome::Completed { created_oids, .. }
            | WorkflowOutcome::Failed { created_oids, .. } => created_oids,
            WorkflowOutcome::FileNotFound { .. } => &[],
        }
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            WorkflowOutcome::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            WorkflowOutcome::Completed { message, .. } => message.clone(),
            WorkflowOutcome::Failed { stage, rejection, .. } => {
                format!("Failed to {stage}: {}", rejection.message())
            }
            WorkflowOutcome::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            }
        }
    }
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Tracks the objects created so far while a workflow runs.
#[derive(Debug, Default)]
pub(crate) struct Pipeline {
    created: Vec<Oid>,
}

impl Pipeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pass a stage's outcome through, or turn a rejection into the
    /// workflow's final `Failed` outcome.
    pub(crate) fn stage<T>(&self, stage: Stage, outcome: ApiOutcome<T>) -> Result<T, WorkflowOutcome> {
        outcome.split().map_err(|rejection| {
            warn!(
                stage = %stage,
                status = rejection.status(),
                created = self.created.len(),
                "workflow stopped: {}",
                rejection
            );
            WorkflowOutcome::Failed {
                stage,
                rejection,
                created_oids: self.created.clone(),
            }
        })
    }

    pub(crate) fn record(&mut self, oid: Oid) {
        self.created.push(oid);
    }

    pub(crate) fn complete(self, message: impl Into<String>) -> WorkflowOutcome {
        WorkflowOutcome::Completed {
            message: message.into(),
            created_oids: self.created,
        }
    }
}
