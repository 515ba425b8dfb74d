// Specification writer
//
// Turns the task description into one requirements card per role.

use tracing::info;

use crate::error::{ForgeError, Result};
use crate::gateway::LlmGateway;

use super::profile::RoleProfile;
use super::prompts;
use super::types::Specification;

pub struct SpecWriter {
    gateway: LlmGateway,
}

impl SpecWriter {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    pub async fn write(&self, task: &str, profile: &RoleProfile) -> Result<Specification> {
        let text = self
            .gateway
            .send_raw(&prompts::spec_prompt(profile, task))
            .await?;

        if text.is_empty() {
            return Err(ForgeError::generation(
                profile.role,
                "specification response was empty",
            ));
        }

        info!(role = %profile.role, chars = text.len(), "Specification written");
        Ok(Specification::new(profile.role, text))
    }
}
