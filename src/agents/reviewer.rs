// Per-file reviewer role
//
// Each file is reviewed on its own, with no cross-file context. Calls run
// concurrently up to a cap; the report keeps the input order.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::constants::DEFAULT_REVIEW_CONCURRENCY;
use crate::error::{ForgeError, Result};
use crate::gateway::LlmGateway;

use super::prompts;
use super::types::{FileArtifact, FileReview, FileSet, Issue, ReviewReport, Severity};

#[async_trait]
pub trait Reviewer: Send + Sync {
    /// One `FileReview` per input file, same paths, same order.
    ///
    /// Any per-file failure fails the whole review; no partial report.
    async fn review(&self, files: &FileSet) -> Result<ReviewReport>;
}

pub struct LlmReviewer {
    gateway: LlmGateway,
    max_concurrent: usize,
}

impl LlmReviewer {
    pub fn new(gateway: LlmGateway) -> Self {
        Self {
            gateway,
            max_concurrent: DEFAULT_REVIEW_CONCURRENCY,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    async fn review_file(&self, file: &FileArtifact) -> Result<FileReview> {
        let prompt = prompts::review_prompt(&file.path, &file.content);
        let value = self
            .gateway
            .send_structured(&prompt)
            .await
            .map_err(|e| ForgeError::Review {
                path: file.path.clone(),
                reason: e.to_string(),
            })?;

        let review = parse_file_review(&file.path, &value)?;
        debug!(
            path = %review.path,
            status = ?review.status(),
            issues = review.issues.len(),
            "File reviewed"
        );
        Ok(review)
    }
}

#[async_trait]
impl Reviewer for LlmReviewer {
    async fn review(&self, files: &FileSet) -> Result<ReviewReport> {
        info!(files = files.len(), "Reviewing file set");

        // Futures are built up front; `buffered` then polls them in input order
        let pending: Vec<_> = files.files.iter().map(|f| self.review_file(f)).collect();
        let reviews: Vec<FileReview> = stream::iter(pending)
            .buffered(self.max_concurrent)
            .try_collect()
            .await
            .map_err(|e| {
                warn!(error = %e, "Review failed");
                e
            })?;

        Ok(ReviewReport::new(reviews))
    }
}

/// Normalize one model verdict.
///
/// The reviewed `path` is authoritative, whatever path the model echoes.
/// Status is recomputed from severities; the model's own status is ignored.
pub fn parse_file_review(path: &str, value: &Value) -> Result<FileReview> {
    let fail = |reason: String| ForgeError::Review {
        path: path.to_string(),
        reason,
    };

    let items = match value.get("issues") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => return Err(fail("\"issues\" is not an array".to_string())),
    };

    let mut issues = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(message) = item.get("message").and_then(Value::as_str) else {
            return Err(fail(format!("issue #{index} has no message")));
        };
        let label = item
            .get("severity")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let Some(severity) = Severity::parse(label) else {
            return Err(fail(format!("issue #{index} has unknown severity '{label}'")));
        };
        let line = item
            .get("line")
            .and_then(Value::as_u64)
            .and_then(|l| u32::try_from(l).ok());

        issues.push(Issue::new(message, line, severity));
    }

    Ok(FileReview::new(path, issues))
}
