// Code generator role
//
// Backend and frontend share one implementation; the `RoleProfile` carries
// everything that differs between them.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ForgeError, Result};
use crate::gateway::LlmGateway;

use super::profile::RoleProfile;
use super::prompts;
use super::types::{FileArtifact, FileSet, ReviewReport, Role, Specification};

/// Produces and revises a role's file set.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    fn role(&self) -> Role;

    /// First file set for a specification
    async fn generate(&self, spec: &Specification) -> Result<FileSet>;

    /// Complete replacement for `prior`, addressing `review`
    async fn fix(&self, spec: &Specification, prior: &FileSet, review: &ReviewReport)
        -> Result<FileSet>;
}

pub struct RoleGenerator {
    gateway: LlmGateway,
    profile: RoleProfile,
}

impl RoleGenerator {
    pub fn new(gateway: LlmGateway, profile: RoleProfile) -> Self {
        Self { gateway, profile }
    }

    pub fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    async fn request(&self, prompt: String) -> Result<FileSet> {
        let value = self.gateway.send_structured(&prompt).await?;
        let files = parse_file_set(self.profile.role, &value)?;
        self.profile
            .check(&files)
            .map_err(|reason| ForgeError::generation(self.profile.role, reason))?;
        debug!(
            role = %self.profile.role,
            files = files.len(),
            words = files.word_count(),
            "Generator produced file set"
        );
        Ok(files)
    }
}

#[async_trait]
impl CodeGenerator for RoleGenerator {
    fn role(&self) -> Role {
        self.profile.role
    }

    async fn generate(&self, spec: &Specification) -> Result<FileSet> {
        info!(role = %self.profile.role, "Generating code");
        self.request(prompts::generation_prompt(&self.profile, spec))
            .await
    }

    async fn fix(
        &self,
        spec: &Specification,
        prior: &FileSet,
        review: &ReviewReport,
    ) -> Result<FileSet> {
        info!(
            role = %self.profile.role,
            failing = review.failing().count(),
            "Fixing code after review"
        );
        self.request(prompts::fix_prompt(&self.profile, spec, prior, review))
            .await
    }
}

/// Validate the `{"files": [{"path", "content"}, ...]}` shape.
pub fn parse_file_set(role: Role, value: &Value) -> Result<FileSet> {
    let Some(items) = value.get("files").and_then(Value::as_array) else {
        return Err(ForgeError::generation(role, "response has no \"files\" array"));
    };

    let mut files = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = item.get("path").and_then(Value::as_str);
        let content = item.get("content").and_then(Value::as_str);
        match (path, content) {
            (Some(path), Some(content)) if !path.trim().is_empty() => {
                files.push(FileArtifact::new(path, content));
            }
            (Some(_), Some(_)) => {
                return Err(ForgeError::generation(
                    role,
                    format!("file #{index} has an empty path"),
                ))
            }
            _ => {
                return Err(ForgeError::generation(
                    role,
                    format!("file #{index} is not a {{path, content}} object of strings"),
                ))
            }
        }
    }

    let set = FileSet::new(files);
    if let Some(dup) = set.duplicate_path() {
        return Err(ForgeError::generation(role, format!("duplicate path '{dup}'")));
    }
    Ok(set)
}
