// Run log: one JSON line per orchestration run

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Success,
    Failure,
}

/// Summary of a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique ID for this run
    pub run_id: String,

    pub started_at: DateTime<Utc>,

    /// Length of the task text in characters
    pub task_chars: usize,

    /// Provider and model that served the run
    pub provider: String,
    pub model: String,

    /// Fix calls per role; absent when the role did not finish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_revisions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_revisions: Option<u32>,

    pub duration_ms: u64,

    pub outcome: RunOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    /// Start a summary; the outcome defaults to failure until `succeed`
    pub fn begin(task: &str, provider: &str, model: &str) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            task_chars: task.chars().count(),
            provider: provider.to_string(),
            model: model.to_string(),
            backend_revisions: None,
            frontend_revisions: None,
            duration_ms: 0,
            outcome: RunOutcome::Failure,
            error: None,
        }
    }

    pub fn succeed(&mut self, backend_revisions: u32, frontend_revisions: u32) {
        self.backend_revisions = Some(backend_revisions);
        self.frontend_revisions = Some(frontend_revisions);
        self.outcome = RunOutcome::Success;
        self.error = None;
    }

    pub fn fail(&mut self, error: impl ToString) {
        self.outcome = RunOutcome::Failure;
        self.error = Some(error.to_string());
    }

    /// Stamp the elapsed time since `started_at`
    pub fn finish(&mut self) {
        let elapsed = Utc::now() - self.started_at;
        self.duration_ms = elapsed.num_milliseconds().max(0) as u64;
    }
}

/// Append-only JSONL sink for run summaries. Never read back by the server.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create run log directory")?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &RunSummary) -> Result<()> {
        let json = serde_json::to_string(summary).context("Failed to serialize run summary")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open run log {}", self.path.display()))?;
        writeln!(file, "{json}").context("Failed to write run summary")?;

        debug!(run_id = %summary.run_id, path = %self.path.display(), "Run summary logged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_writes_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path().join("logs/runs.jsonl")).unwrap();

        let mut ok = RunSummary::begin("build a todo app", "groq", "llama");
        ok.succeed(1, 0);
        ok.finish();
        log.append(&ok).unwrap();

        let mut failed = RunSummary::begin("x", "groq", "llama");
        failed.fail("max revisions exceeded for backend after 3 revision(s)");
        failed.finish();
        log.append(&failed).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<RunSummary> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].outcome, RunOutcome::Success);
        assert_eq!(lines[0].backend_revisions, Some(1));
        assert_eq!(lines[0].task_chars, 16);
        assert_eq!(lines[1].outcome, RunOutcome::Failure);
        assert!(lines[1].error.as_deref().unwrap().contains("backend"));
        assert_ne!(lines[0].run_id, lines[1].run_id);
    }

    #[test]
    fn test_failure_omits_revisions() {
        let summary = RunSummary::begin("t", "deepseek", "deepseek-chat");
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["outcome"], "failure");
        assert!(value.get("backend_revisions").is_none());
    }
}
