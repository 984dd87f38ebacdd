//! Credit cooperative intake: affiliate registration, credit application evaluation
//! against an external risk service, and the approval rules applied to the result.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
