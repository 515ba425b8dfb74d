// Role data model: file sets, review verdicts, specifications, doc bundles

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Backend,
    Frontend,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Backend, Role::Frontend];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Backend => "backend",
            Role::Frontend => "frontend",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirements document for one role, generated once per run.
///
/// There are no mutating methods: once written it is only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    role: Role,
    text: String,
}

impl Specification {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A single generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArtifact {
    pub path: String,
    pub content: String,
}

impl FileArtifact {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Complete output of a generator for one role.
///
/// Serializes as `{"files": [...]}`, the same shape the generator is asked
/// to produce. Revisions replace the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    pub files: Vec<FileArtifact>,
}

impl FileSet {
    pub fn new(files: Vec<FileArtifact>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// First path that occurs more than once, if any.
    pub fn duplicate_path(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.paths().find(|p| !seen.insert(*p))
    }

    /// Whitespace-separated word count over all file contents.
    pub fn word_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.content.split_whitespace().count())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    /// Case-insensitive parse of the reviewer's severity label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "major" => Some(Severity::Major),
            "minor" => Some(Severity::Minor),
            _ => None,
        }
    }
}

/// One reviewer finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub line: Option<u32>,
    pub severity: Severity,
}

impl Issue {
    pub const KIND: &'static str = "review";

    pub fn new(message: impl Into<String>, line: Option<u32>, severity: Severity) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            message: message.into(),
            line,
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pass,
    Fail,
}

/// Verdict for one file.
///
/// `status` is always derived from the issues: fail iff at least one issue
/// is critical. It cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReview {
    pub path: String,
    status: ReviewStatus,
    pub issues: Vec<Issue>,
}

impl FileReview {
    pub fn new(path: impl Into<String>, issues: Vec<Issue>) -> Self {
        let status = if issues.iter().any(|i| i.severity == Severity::Critical) {
            ReviewStatus::Fail
        } else {
            ReviewStatus::Pass
        };
        Self {
            path: path.into(),
            status,
            issues,
        }
    }

    pub fn pass(path: impl Into<String>) -> Self {
        Self::new(path, Vec::new())
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    pub fn is_pass(&self) -> bool {
        self.status == ReviewStatus::Pass
    }
}

/// Review of a whole file set, aligned with the reviewed set's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
    pub files: Vec<FileReview>,
}

impl ReviewReport {
    pub fn new(files: Vec<FileReview>) -> Self {
        Self { files }
    }

    pub fn all_pass(&self) -> bool {
        self.files.iter().all(FileReview::is_pass)
    }

    pub fn failing(&self) -> impl Iterator<Item = &FileReview> {
        self.files.iter().filter(|r| !r.is_pass())
    }

    pub fn critical_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|r| r.issues.iter())
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSection {
    pub heading: String,
    pub content: Vec<String>,
}

/// Structured documentation produced from an accepted file set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocBundle {
    pub title: String,
    pub sections: Vec<DocSection>,
}
