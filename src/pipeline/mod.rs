// Orchestration: per-role feedback loops and the run coordinator

pub mod coordinator;
pub mod feedback_loop;

pub use coordinator::{RolePipeline, RunCoordinator, RunResult};
pub use feedback_loop::{AcceptedArtifact, FeedbackLoop, LoopState, RevisionState};
