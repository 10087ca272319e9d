//! Stage orchestrator — sequences capture, normalization, persistence,
//! diffing and policy evaluation over every (device, state-kind) unit,
//! aggregating per-unit verdicts into a run-level result.
//!
//! Units are independent and embarrassingly parallel: no unit reads or
//! mutates another's data, and one unit's failure never aborts the rest.

pub mod report;
pub mod run;

pub use report::{DiffRecord, RunReport, VerdictRecord};
pub use run::{check_stage, execute, RunConfig, RunMode};
