#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stackwright::agents::prompts::{DOC_MARKER, FIX_MARKER, REVIEW_MARKER, SPEC_MARKER};
use stackwright::agents::{Role, RoleProfile};
use stackwright::config::{Config, ProviderEntry};
use stackwright::gateway::LlmGateway;
use stackwright::pipeline::RunCoordinator;
use stackwright::providers::{LlmProvider, ProviderRequest, ProviderResponse};

/// Marker the fake reviewer flags as a critical issue
pub const BROKEN: &str = "BROKEN";

/// Behaviour of one role in the fake completion service
#[derive(Debug, Clone, Copy)]
pub struct RoleScript {
    /// Fix calls after which the role's code stops being broken.
    /// `None` never recovers; `Some(0)` is clean from the start.
    pub clean_after: Option<u32>,
    /// Fail the first generation call with an upstream error
    pub fail_generate: bool,
    /// Latency of every generation and fix call
    pub latency: Duration,
}

impl RoleScript {
    pub fn clean() -> Self {
        Self {
            clean_after: Some(0),
            fail_generate: false,
            latency: Duration::ZERO,
        }
    }

    pub fn clean_after(fixes: u32) -> Self {
        Self {
            clean_after: Some(fixes),
            ..Self::clean()
        }
    }

    pub fn never_clean() -> Self {
        Self {
            clean_after: None,
            ..Self::clean()
        }
    }
}

/// Completion service that plays every agent.
///
/// Prompts are routed by their section markers. Generated files carry
/// `BROKEN` until the role's script says otherwise, and the reviewer
/// reports a critical issue for any file containing it.
pub struct FakeLlm {
    backend: RoleScript,
    frontend: RoleScript,
    backend_fixes: AtomicU32,
    frontend_fixes: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(backend: RoleScript, frontend: RoleScript) -> Self {
        Self {
            backend,
            frontend,
            backend_fixes: AtomicU32::new(0),
            frontend_fixes: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn count(&self, marker: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(marker)).count()
    }

    pub fn fixes(&self, role: Role) -> u32 {
        match role {
            Role::Backend => self.backend_fixes.load(Ordering::SeqCst),
            Role::Frontend => self.frontend_fixes.load(Ordering::SeqCst),
        }
    }

    fn script(&self, role: Role) -> RoleScript {
        match role {
            Role::Backend => self.backend,
            Role::Frontend => self.frontend,
        }
    }

    fn code_role(prompt: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|r| prompt.starts_with(&RoleProfile::for_role(*r).persona))
    }

    async fn respond(&self, prompt: &str) -> Result<String> {
        if prompt.contains(REVIEW_MARKER) {
            return Ok(review_response(prompt.contains(BROKEN)));
        }
        if prompt.contains(DOC_MARKER) {
            return Ok(json!({
                "title": "Technical Documentation",
                "sections": [{"heading": "System Overview", "content": ["Generated in tests."]}]
            })
            .to_string());
        }
        if prompt.contains(SPEC_MARKER) {
            return Ok("## Overview\nItem tracker\n\n## API Contracts\n- GET /api/items".to_string());
        }

        let Some(role) = Self::code_role(prompt) else {
            anyhow::bail!("unroutable prompt");
        };
        let script = self.script(role);
        tokio::time::sleep(script.latency).await;

        let version = if prompt.contains(FIX_MARKER) {
            let counter = match role {
                Role::Backend => &self.backend_fixes,
                Role::Frontend => &self.frontend_fixes,
            };
            counter.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            if script.fail_generate {
                anyhow::bail!("503 Service Unavailable");
            }
            0
        };

        let broken = script.clean_after.map_or(true, |n| version < n);
        Ok(files_response(role, version, broken))
    }
}

fn review_response(broken: bool) -> String {
    let issues = if broken {
        json!([{"type": "review", "message": "crashes on startup", "line": 1, "severity": "critical"}])
    } else {
        json!([{"type": "review", "message": "prefer const", "line": null, "severity": "minor"}])
    };
    // The fake reviewer always claims "pass"; status is recomputed from issues
    json!({"path": "ignored", "status": "pass", "issues": issues}).to_string()
}

fn files_response(role: Role, version: u32, broken: bool) -> String {
    let state = if broken { BROKEN } else { "ok" };
    let paths: &[&str] = match role {
        Role::Backend => &["backend/app/main.py", "backend/app/models.py"],
        Role::Frontend => &["frontend/src/main.tsx", "frontend/src/App.tsx"],
    };
    let files: Vec<_> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            // Only the first file carries the defect
            let content = if i == 0 {
                format!("// {state} v{version}")
            } else {
                format!("// ok v{version}")
            };
            json!({"path": path, "content": content})
        })
        .collect();
    format!("```json\n{}\n```", json!({ "files": files }))
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let text = self.respond(&request.prompt).await?;
        Ok(ProviderResponse {
            id: "fake".to_string(),
            model: request.model.clone(),
            text,
            stop_reason: Some("stop".to_string()),
            provider: "fake".to_string(),
        })
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }
}

pub fn test_config() -> Config {
    Config::with_provider(ProviderEntry::from_parts("deepseek", "sk-test".to_string(), None).unwrap())
}

pub fn coordinator_with(llm: Arc<FakeLlm>, config: &Config) -> RunCoordinator {
    RunCoordinator::from_config(config, LlmGateway::new(llm)).unwrap()
}

pub fn coordinator(llm: Arc<FakeLlm>) -> RunCoordinator {
    coordinator_with(llm, &test_config())
}
