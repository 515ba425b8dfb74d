// Prompt construction for every agent call
//
// Prompt wording is not a contract; tests match only on the section markers
// defined as constants here.

use super::profile::RoleProfile;
use super::types::{FileSet, ReviewReport, Specification};

pub const FIX_MARKER: &str = "The reviewer found issues";
pub const REVIEW_MARKER: &str = "You will review EXACTLY ONE source file.";
pub const DOC_MARKER: &str = "Technical Writer";
pub const SPEC_MARKER: &str = "SPECIFICATION CARD";

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize for embedding in a prompt. Serializing these plain types cannot
/// fail, but a debug rendering is still better than an empty prompt section.
fn to_pretty_json<T: serde::Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Prompt asking for a role's specification card
pub fn spec_prompt(profile: &RoleProfile, task: &str) -> String {
    let role_upper = profile.role.as_str().to_ascii_uppercase();
    format!(
        "You are the Manager Agent.\n\n\
         Your responsibility is to generate a {SPEC_MARKER} for the {role_upper} agent. \
         An autonomous agent will use it to generate production code.\n\n\
         TASK CONTEXT:\n{task}\n\n\
         GENERAL RULES:\n\
         - Describe a MINIMUM VIABLE PRODUCT only.\n\
         - Exclude analytics, charts, dialogs, modals, tabs, and complex UI flows.\n\
         - Assume a single-page implementation unless otherwise required.\n\
         - This is a technical specification, NOT code.\n\
         - Do NOT include SQL, migrations, or persistence details.\n\
         - Do NOT include code blocks or commentary.\n\
         - Use markdown headers and bullet points only.\n\n\
         AGENT-SPECIFIC RULES:\n\
         - {focus}\n\
         - Do NOT reference the other agent's implementation details.\n\
         - Clearly define integration contracts where applicable.\n\n\
         Use exactly these sections:\n\
         ## Overview\n\
         ## Functional Requirements\n\
         ## Data Models (runtime objects only, one `field: type` bullet per field, no braces)\n\
         ## API Contracts (METHOD /api/path, then Request and Response field bullets)\n\
         ## Error Handling\n\
         ## Output Expectations\n\n\
         This spec must be sufficient for the {role} agent to implement the system without \
         assumptions. Output ONLY the specification.",
        focus = profile.spec_focus,
        role = profile.role,
    )
}

/// Instruction prompt for a first generation
pub fn generation_prompt(profile: &RoleProfile, spec: &Specification) -> String {
    let mut rules = profile.rules.clone();
    if !profile.forbidden_components.is_empty() {
        rules.push(format!(
            "Do NOT include {} or other advanced UI components.",
            profile.forbidden_components.join(", ")
        ));
    }
    if !profile.forbidden_extensions.is_empty() {
        rules.push(format!(
            "Do NOT output files with these extensions: {}.",
            profile.forbidden_extensions.join(", ")
        ));
    }
    if let Some(limit) = profile.max_output_words {
        rules.push(format!(
            "DO NOT EXCEED {limit} words across all file contents, even when fixing issues."
        ));
    }
    rules.push("OUTPUT MUST BE VALID JSON ONLY, with no text before or after it.".to_string());

    let examples = profile
        .example_paths
        .iter()
        .map(|p| format!("    {{\"path\": \"{p}\", \"content\": \"...\"}}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "{persona}\n\n\
         RULES:\n{rules}\n\n\
         SPECIFICATION:\n{spec}\n\n\
         OUTPUT FORMAT (MANDATORY):\n\
         {{\n  \"files\": [\n{examples}\n  ]\n}}\n\n\
         Only return valid JSON.",
        persona = profile.persona,
        rules = bullets(&rules),
        spec = spec.text(),
    )
}

/// Generation instructions plus the prior files and their review
pub fn fix_prompt(
    profile: &RoleProfile,
    spec: &Specification,
    prior: &FileSet,
    review: &ReviewReport,
) -> String {
    format!(
        "{base}\n\n\
         {FIX_MARKER} in your {role} code. Fix the code accordingly and return the \
         complete corrected file set in the same format.\n\n\
         CODE:\n{code}\n\n\
         REVIEW REPORT:\n{report}",
        base = generation_prompt(profile, spec),
        role = profile.role,
        code = to_pretty_json(prior),
        report = to_pretty_json(review),
    )
}

/// Prompt reviewing a single file in isolation
pub fn review_prompt(path: &str, content: &str) -> String {
    format!(
        "You are a strict code reviewer.\n\n\
         {REVIEW_MARKER}\n\n\
         RULES:\n\
         - Review only the code provided.\n\
         - Do NOT reference other files or project context.\n\
         - Return ONLY valid JSON, with no markdown or extra text.\n\n\
         Return one JSON object with:\n\
         - \"path\": string\n\
         - \"status\": \"pass\" or \"fail\"\n\
         - \"issues\": array of objects with \"type\": \"review\", \"message\": string, \
         \"line\": 1-based integer or null, \"severity\": \"critical\" | \"major\" | \"minor\"\n\n\
         SEVERITY RULES:\n\
         - critical: runtime error, crash, data loss, security issue, or incorrect behavior\n\
         - major: likely bug in edge cases\n\
         - minor: style, best practices, deprecations, readability\n\n\
         STATUS RULES:\n\
         - \"fail\" if and only if at least one issue is critical, otherwise \"pass\"\n\n\
         CODE (path: \"{path}\"):\n{content}\n\n\
         VALID OUTPUT EXAMPLE:\n\
         {{\"path\": \"{path}\", \"status\": \"pass\", \"issues\": []}}"
    )
}

/// Documentation prompt embedding the accepted code
pub fn documentation_prompt(profile: &RoleProfile, files: &FileSet) -> String {
    format!(
        "You are a Senior {role} Engineer and {DOC_MARKER}.\n\n\
         Produce formal technical documentation for the {role} system below.\n\n\
         RULES:\n\
         - This is NOT a code generation task.\n\
         - Write in a professional, concise, implementation-focused tone.\n\
         - Do NOT include markdown or text outside the JSON.\n\n\
         DOCUMENTATION SHOULD COVER:\n{topics}\n\n\
         CODE:\n{code}\n\n\
         OUTPUT FORMAT (MANDATORY):\n\
         {{\"title\": \"{title}\", \"sections\": [{{\"heading\": \"System Overview\", \
         \"content\": [\"Paragraph 1\", \"Paragraph 2\"]}}]}}\n\n\
         Only return valid JSON.",
        role = capitalize(profile.role.as_str()),
        topics = bullets(&profile.doc_topics),
        code = to_pretty_json(files),
        title = profile.doc_title,
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
