// Agent roles: specification writer, code generator, reviewer, documenter
//
// Each role is one prompt template plus response validation on top of the
// shared `LlmGateway`.

pub mod documenter;
pub mod generator;
pub mod profile;
pub mod prompts;
pub mod reviewer;
pub mod spec_writer;
pub mod types;

pub use documenter::Documenter;
pub use generator::{CodeGenerator, RoleGenerator};
pub use profile::RoleProfile;
pub use reviewer::{LlmReviewer, Reviewer};
pub use spec_writer::SpecWriter;
pub use types::{
    DocBundle, DocSection, FileArtifact, FileReview, FileSet, Issue, ReviewReport, ReviewStatus,
    Role, Severity, Specification,
};
