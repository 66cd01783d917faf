//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod issue_type_repo;
pub mod status_repo;
pub mod workflow_repo;

pub use issue_type_repo::IssueTypeRepo;
pub use status_repo::StatusRepo;
pub use workflow_repo::WorkflowRepo;
