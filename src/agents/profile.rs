// Role profiles
//
// Everything that distinguishes the backend pipeline from the frontend one
// lives here as data. The generator, spec writer and documenter read a
// profile; none of them branch on the role.

use crate::config::constants::DEFAULT_FRONTEND_MAX_WORDS;
use crate::config::RoleOverrides;

use super::types::{FileSet, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct RoleProfile {
    pub role: Role,
    /// Persona line opening the generator prompt
    pub persona: String,
    pub rules: Vec<String>,
    /// Example paths shown in the output-format block
    pub example_paths: Vec<String>,
    /// Extensions a generated file must not have (lowercase, with dot)
    pub forbidden_extensions: Vec<String>,
    /// UI components the generator is told to avoid
    pub forbidden_components: Vec<String>,
    /// Word ceiling over all file contents
    pub max_output_words: Option<usize>,
    /// Focus line for the specification writer
    pub spec_focus: String,
    pub doc_title: String,
    pub doc_topics: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RoleProfile {
    pub fn backend() -> Self {
        Self {
            role: Role::Backend,
            persona: "You are the Backend Engineer Agent. Your task is to generate a backend \
                      service as described in the specification."
                .to_string(),
            rules: strings(&[
                "Use FastAPI unless the specification asks for something else.",
                "Any SQL schema in the specification is for reference only.",
                "DO NOT output SQL, markdown, or code blocks.",
                "DO NOT include explanations or comments.",
                "Include proper error handling.",
                "Follow clean architecture principles.",
            ]),
            example_paths: strings(&["backend/app/main.py", "backend/app/routes/items.py"]),
            forbidden_extensions: strings(&[".sql", ".md", ".markdown"]),
            forbidden_components: Vec::new(),
            max_output_words: None,
            spec_focus: "Focus ONLY on backend concerns (APIs, models, validation, services, \
                         error handling)."
                .to_string(),
            doc_title: "Backend Technical Documentation".to_string(),
            doc_topics: strings(&[
                "System overview",
                "Architecture (layers, modules, services)",
                "Technology stack",
                "API design and endpoints",
                "Data models",
                "Authentication and authorization",
                "Error handling and logging",
                "Deployment, scaling, and monitoring notes",
                "Key design decisions and trade-offs",
            ]),
        }
    }

    pub fn frontend() -> Self {
        Self {
            role: Role::Frontend,
            persona: "You are the Frontend Engineer Agent. Your task is to generate a frontend \
                      application based on the given specification."
                .to_string(),
            rules: strings(&[
                "Implement ONLY a minimal UI required to verify API integration.",
                "Use a single page with basic form inputs and simple lists.",
                "Avoid third-party visualization libraries.",
                "Use React with TypeScript and Vite unless otherwise specified.",
                "Organize code into components, pages, services, and utilities where appropriate.",
                "Do NOT include backend code.",
                "If the implementation would grow large, simplify instead of adding features.",
            ]),
            example_paths: strings(&["frontend/src/main.tsx", "frontend/src/App.tsx"]),
            forbidden_extensions: Vec::new(),
            forbidden_components: strings(&["charts", "dialogs", "modals", "tabs"]),
            max_output_words: Some(DEFAULT_FRONTEND_MAX_WORDS),
            spec_focus: "Focus ONLY on frontend concerns (UI, state management, API consumption, \
                         UX states)."
                .to_string(),
            doc_title: "Frontend Technical Documentation".to_string(),
            doc_topics: strings(&[
                "System overview",
                "Architecture",
                "Technology stack",
                "Application structure",
                "State management strategy",
                "Routing strategy",
                "Build and deployment notes",
                "Key design decisions",
            ]),
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Backend => Self::backend(),
            Role::Frontend => Self::frontend(),
        }
    }

    /// Built-in profile with configured overrides applied
    pub fn with_overrides(mut self, overrides: &RoleOverrides) -> Self {
        if let Some(words) = overrides.max_output_words {
            self.max_output_words = Some(words);
        }
        if let Some(exts) = &overrides.forbidden_extensions {
            self.forbidden_extensions = exts.iter().map(|e| normalize_extension(e)).collect();
        }
        self
    }

    /// Check a generated file set against the profile's constraints.
    ///
    /// Returns the reason for the first violation found.
    pub fn check(&self, files: &FileSet) -> std::result::Result<(), String> {
        for file in &files.files {
            let lower = file.path.to_ascii_lowercase();
            if let Some(ext) = self
                .forbidden_extensions
                .iter()
                .find(|ext| lower.ends_with(ext.as_str()))
            {
                return Err(format!("file '{}' has forbidden extension {}", file.path, ext));
            }
        }

        if let Some(limit) = self.max_output_words {
            let words = files.word_count();
            if words > limit {
                return Err(format!("output is {words} words, limit is {limit}"));
            }
        }

        Ok(())
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
