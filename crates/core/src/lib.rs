//! Domain logic for the issueflow workflow service.
//!
//! This crate has no I/O. The database and HTTP layers call into it for
//! the workflow chain algorithm, status ordering rules and the
//! transition legality check.

pub mod error;
pub mod status_order;
pub mod transition_check;
pub mod types;
pub mod workflow_chain;
