// Error taxonomy for the generation / review / fix pipeline

use crate::agents::types::Role;

/// Errors produced while orchestrating a run.
///
/// Every variant aborts the role (and therefore the run) it occurs in.
/// The only retry mechanism is the feedback loop, and it retries on
/// failing reviews, never on errors.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// The completion service call failed (network, auth, quota, timeout).
    #[error("upstream call to {provider} failed: {message}")]
    Upstream { provider: String, message: String },

    /// Response text could not be coerced into a JSON object.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// A generator response parsed but is not a valid file set for the role.
    #[error("{role} generation failed: {reason}")]
    Generation { role: Role, reason: String },

    /// A per-file review call failed; the whole review is discarded.
    #[error("review of {path} failed: {reason}")]
    Review { path: String, reason: String },

    /// The documentation response is missing required fields.
    #[error("{role} documentation failed: {reason}")]
    Documentation { role: Role, reason: String },

    /// Reviews were still failing after the revision budget was spent.
    #[error("max revisions exceeded for {role} after {revisions} revision(s)")]
    MaxRevisionsExceeded { role: Role, revisions: u32 },
}

impl ForgeError {
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation(role: Role, reason: impl Into<String>) -> Self {
        Self::Generation {
            role,
            reason: reason.into(),
        }
    }

    /// True for failures caused by the external service rather than by
    /// the content it returned.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_revisions_message_names_role() {
        let err = ForgeError::MaxRevisionsExceeded {
            role: Role::Backend,
            revisions: 3,
        };
        assert_eq!(
            err.to_string(),
            "max revisions exceeded for backend after 3 revision(s)"
        );
    }

    #[test]
    fn test_upstream_helper() {
        let err = ForgeError::upstream("groq", "429 Too Many Requests");
        assert!(err.is_upstream());
        assert!(err.to_string().contains("groq"));
        assert!(!ForgeError::MalformedResponse("x".into()).is_upstream());
    }

    #[test]
    fn test_every_variant_names_its_subject() {
        let errors = [
            ForgeError::upstream("deepseek", "401"),
            ForgeError::MalformedResponse("no object".into()),
            ForgeError::generation(Role::Frontend, "too long"),
            ForgeError::Review {
                path: "src/App.tsx".into(),
                reason: "timed out".into(),
            },
            ForgeError::Documentation {
                role: Role::Backend,
                reason: "missing title".into(),
            },
            ForgeError::MaxRevisionsExceeded {
                role: Role::Frontend,
                revisions: 3,
            },
        ];
        for err in &errors {
            // Exhaustive: a new variant must be added here with its subject
            let subject = match err {
                ForgeError::Upstream { provider, .. } => provider.clone(),
                ForgeError::MalformedResponse(detail) => detail.clone(),
                ForgeError::Generation { role, .. }
                | ForgeError::Documentation { role, .. }
                | ForgeError::MaxRevisionsExceeded { role, .. } => role.to_string(),
                ForgeError::Review { path, .. } => path.clone(),
            };
            assert!(err.to_string().contains(&subject), "{err}");
        }
    }
}
