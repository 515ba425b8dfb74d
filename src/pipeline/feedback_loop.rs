// Feedback loop: generate, review, fix until the reviewer passes every file
//
// One loop per role per run. Each loop owns its RevisionState; nothing is
// shared with the other role's loop.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agents::{CodeGenerator, FileSet, ReviewReport, Reviewer, Role, Specification};
use crate::config::constants::DEFAULT_MAX_REVISIONS;
use crate::error::{ForgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Generating,
    Reviewing,
    Fixing,
    /// Terminal: every file passed
    Accepted,
    /// Terminal: failures remain and the revision budget is spent
    Exhausted,
}

/// Mutable state threaded through one role's loop
#[derive(Debug, Clone)]
pub struct RevisionState {
    pub file_set: FileSet,
    pub revision_count: u32,
    pub max_revisions: u32,
}

impl RevisionState {
    pub fn new(file_set: FileSet, max_revisions: u32) -> Self {
        Self {
            file_set,
            revision_count: 0,
            max_revisions,
        }
    }

    /// State to move to after `report` reviewed the current file set
    pub fn next_state(&self, report: &ReviewReport) -> LoopState {
        if report.all_pass() {
            LoopState::Accepted
        } else if self.revision_count < self.max_revisions {
            LoopState::Fixing
        } else {
            LoopState::Exhausted
        }
    }

    /// Replace the file set wholesale with a fixed one
    pub fn apply_fix(&mut self, fixed: FileSet) {
        self.file_set = fixed;
        self.revision_count += 1;
    }
}

/// Result of a loop that reached `Accepted`
#[derive(Debug, Clone)]
pub struct AcceptedArtifact {
    pub file_set: FileSet,
    /// Fix calls made before acceptance
    pub revisions: u32,
    /// Every review report, oldest first; the last one is all-pass
    pub reviews: Vec<ReviewReport>,
}

pub struct FeedbackLoop {
    generator: Arc<dyn CodeGenerator>,
    reviewer: Arc<dyn Reviewer>,
    max_revisions: u32,
}

impl FeedbackLoop {
    pub fn new(generator: Arc<dyn CodeGenerator>, reviewer: Arc<dyn Reviewer>) -> Self {
        Self {
            generator,
            reviewer,
            max_revisions: DEFAULT_MAX_REVISIONS,
        }
    }

    pub fn with_max_revisions(mut self, max_revisions: u32) -> Self {
        self.max_revisions = max_revisions;
        self
    }

    pub fn role(&self) -> Role {
        self.generator.role()
    }

    /// Drive the loop to a terminal state.
    ///
    /// The whole file set is re-reviewed after every fix, including files the
    /// previous review passed. Errors from any call abort immediately; only a
    /// failing review leads to another attempt.
    pub async fn run(&self, spec: &Specification) -> Result<AcceptedArtifact> {
        let role = self.role();

        log_transition(role, LoopState::Generating, 0);
        let initial = self.generator.generate(spec).await?;
        let mut state = RevisionState::new(initial, self.max_revisions);
        let mut reviews: Vec<ReviewReport> = Vec::new();

        loop {
            log_transition(role, LoopState::Reviewing, state.revision_count);
            let report = self.reviewer.review(&state.file_set).await?;
            let next = state.next_state(&report);
            debug!(
                role = %role,
                files = report.files.len(),
                failing = report.failing().count(),
                critical = report.critical_count(),
                "Review complete"
            );
            match next {
                LoopState::Accepted => {
                    log_transition(role, next, state.revision_count);
                    reviews.push(report);
                    return Ok(AcceptedArtifact {
                        file_set: state.file_set,
                        revisions: state.revision_count,
                        reviews,
                    });
                }
                LoopState::Exhausted => {
                    warn!(
                        role = %role,
                        revisions = state.revision_count,
                        "Revision budget spent with failing files"
                    );
                    return Err(ForgeError::MaxRevisionsExceeded {
                        role,
                        revisions: state.revision_count,
                    });
                }
                _ => {
                    log_transition(role, LoopState::Fixing, state.revision_count);
                    let fixed = self.generator.fix(spec, &state.file_set, &report).await?;
                    reviews.push(report);
                    state.apply_fix(fixed);
                }
            }
        }
    }
}

fn log_transition(role: Role, to: LoopState, revision: u32) {
    info!(role = %role, state = ?to, revision, "Feedback loop transition");
}
