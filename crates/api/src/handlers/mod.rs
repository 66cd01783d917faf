pub mod issue_type;
pub mod status;
pub mod workflow;
