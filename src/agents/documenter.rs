// Documentation role
//
// Reads an accepted file set and produces a structured DocBundle.

use serde_json::Value;
use tracing::info;

use crate::error::{ForgeError, Result};
use crate::gateway::LlmGateway;

use super::profile::RoleProfile;
use super::prompts;
use super::types::{DocBundle, FileSet, Role};

pub struct Documenter {
    gateway: LlmGateway,
}

impl Documenter {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    pub async fn document(&self, profile: &RoleProfile, files: &FileSet) -> Result<DocBundle> {
        let value = self
            .gateway
            .send_structured(&prompts::documentation_prompt(profile, files))
            .await?;
        let bundle = parse_doc_bundle(profile.role, value)?;
        info!(
            role = %profile.role,
            sections = bundle.sections.len(),
            "Documentation written"
        );
        Ok(bundle)
    }
}

pub fn parse_doc_bundle(role: Role, value: Value) -> Result<DocBundle> {
    if value.get("title").and_then(Value::as_str).is_none() {
        return Err(ForgeError::Documentation {
            role,
            reason: "response has no \"title\" string".to_string(),
        });
    }
    if !value.get("sections").is_some_and(Value::is_array) {
        return Err(ForgeError::Documentation {
            role,
            reason: "response has no \"sections\" array".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| ForgeError::Documentation {
        role,
        reason: format!("invalid section: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::types::FileArtifact;
    use crate::test_support::ScriptedProvider;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_doc_bundle() {
        let bundle = parse_doc_bundle(
            Role::Backend,
            json!({"title": "Backend Technical Documentation", "sections": [
                {"heading": "System Overview", "content": ["One", "Two"]}
            ]}),
        )
        .unwrap();
        assert_eq!(bundle.sections[0].content.len(), 2);
    }

    #[test]
    fn test_missing_fields_are_documentation_errors() {
        for value in [
            json!({"sections": []}),
            json!({"title": "T"}),
            json!({"title": "T", "sections": [{"heading": "H"}]}),
        ] {
            let err = parse_doc_bundle(Role::Frontend, value).unwrap_err();
            assert!(matches!(err, ForgeError::Documentation { role: Role::Frontend, .. }));
        }
    }

    #[tokio::test]
    async fn test_document_embeds_accepted_code() {
        let provider = Arc::new(ScriptedProvider::queue([
            r#"{"title": "Frontend Technical Documentation", "sections": []}"#,
        ]));
        let documenter = Documenter::new(LlmGateway::new(provider.clone()));
        let files = FileSet::new(vec![FileArtifact::new("src/App.tsx", "const marker = 42;")]);
        let bundle = documenter
            .document(&RoleProfile::frontend(), &files)
            .await
            .unwrap();
        assert_eq!(bundle.title, "Frontend Technical Documentation");
        assert!(provider.prompts()[0].contains("const marker = 42;"));
    }
}
