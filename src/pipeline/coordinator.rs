// Run coordinator
//
// Phase 1 runs the backend and frontend pipelines (spec, then feedback loop)
// side by side. Phase 2 documents both accepted file sets side by side.
// Any failure fails the run and drops the other role's in-flight work.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::agents::{
    DocBundle, Documenter, FileSet, LlmReviewer, Role, RoleGenerator, RoleProfile, SpecWriter,
};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::LlmGateway;
use crate::logging::{RunLog, RunSummary};

use super::feedback_loop::{AcceptedArtifact, FeedbackLoop};

/// Final artifact of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub backend_code: FileSet,
    pub frontend_code: FileSet,
    pub backend_doc: DocBundle,
    pub frontend_doc: DocBundle,
}

/// One role's profile and feedback loop
pub struct RolePipeline {
    pub profile: RoleProfile,
    pub feedback: FeedbackLoop,
}

impl RolePipeline {
    pub fn new(profile: RoleProfile, feedback: FeedbackLoop) -> Self {
        Self { profile, feedback }
    }

    /// Profile-driven generator and LLM reviewer on a shared gateway
    pub fn with_gateway(profile: RoleProfile, gateway: &LlmGateway, config: &Config) -> Self {
        let generator = Arc::new(RoleGenerator::new(gateway.clone(), profile.clone()));
        let reviewer = Arc::new(
            LlmReviewer::new(gateway.clone()).with_max_concurrent(config.review.max_concurrent),
        );
        // Revision budget stays at the fixed default
        Self::new(profile, FeedbackLoop::new(generator, reviewer))
    }
}

pub struct RunCoordinator {
    gateway: LlmGateway,
    spec_writer: SpecWriter,
    documenter: Documenter,
    backend: RolePipeline,
    frontend: RolePipeline,
    run_log: Option<RunLog>,
}

impl RunCoordinator {
    pub fn new(gateway: LlmGateway, backend: RolePipeline, frontend: RolePipeline) -> Self {
        Self {
            spec_writer: SpecWriter::new(gateway.clone()),
            documenter: Documenter::new(gateway.clone()),
            gateway,
            backend,
            frontend,
            run_log: None,
        }
    }

    /// Wire every role from configuration onto one gateway
    pub fn from_config(config: &Config, gateway: LlmGateway) -> anyhow::Result<Self> {
        let backend = RolePipeline::with_gateway(
            RoleProfile::backend().with_overrides(&config.roles.backend),
            &gateway,
            config,
        );
        let frontend = RolePipeline::with_gateway(
            RoleProfile::frontend().with_overrides(&config.roles.frontend),
            &gateway,
            config,
        );

        let mut coordinator = Self::new(gateway, backend, frontend);
        if let Some(path) = &config.logging.run_log_path {
            coordinator = coordinator.with_run_log(RunLog::new(path)?);
        }
        Ok(coordinator)
    }

    pub fn with_run_log(mut self, run_log: RunLog) -> Self {
        self.run_log = Some(run_log);
        self
    }

    pub fn gateway(&self) -> &LlmGateway {
        &self.gateway
    }

    /// Run both pipelines for `task` and document the results
    pub async fn run(&self, task: &str) -> Result<RunResult> {
        let mut summary =
            RunSummary::begin(task, self.gateway.provider_name(), self.gateway.model_name());
        info!(run_id = %summary.run_id, task_chars = summary.task_chars, "Run started");

        let outcome = self.run_phases(task).await;

        match &outcome {
            Ok((result, backend_revisions, frontend_revisions)) => {
                summary.succeed(*backend_revisions, *frontend_revisions);
                info!(
                    run_id = %summary.run_id,
                    backend_files = result.backend_code.len(),
                    frontend_files = result.frontend_code.len(),
                    backend_revisions,
                    frontend_revisions,
                    "Run succeeded"
                );
            }
            Err(e) => {
                summary.fail(e);
                warn!(run_id = %summary.run_id, error = %e, "Run failed");
            }
        }
        summary.finish();

        if let Some(run_log) = &self.run_log {
            if let Err(e) = run_log.append(&summary) {
                warn!(error = %e, "Failed to write run log");
            }
        }

        outcome.map(|(result, _, _)| result)
    }

    async fn run_phases(&self, task: &str) -> Result<(RunResult, u32, u32)> {
        let (backend, frontend) = tokio::try_join!(
            self.run_role(&self.backend, task),
            self.run_role(&self.frontend, task),
        )?;

        info!("Both roles accepted; writing documentation");

        let (backend_doc, frontend_doc) = tokio::try_join!(
            self.documenter.document(&self.backend.profile, &backend.file_set),
            self.documenter.document(&self.frontend.profile, &frontend.file_set),
        )?;

        Ok((
            RunResult {
                backend_code: backend.file_set,
                frontend_code: frontend.file_set,
                backend_doc,
                frontend_doc,
            },
            backend.revisions,
            frontend.revisions,
        ))
    }

    async fn run_role(&self, pipeline: &RolePipeline, task: &str) -> Result<AcceptedArtifact> {
        let role: Role = pipeline.profile.role;
        let spec = self.spec_writer.write(task, &pipeline.profile).await?;
        let accepted = pipeline.feedback.run(&spec).await?;
        info!(role = %role, revisions = accepted.revisions, "Role accepted");
        Ok(accepted)
    }
}
