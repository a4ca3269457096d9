//! # docguard-core
//!
//! Structural and semantic validation of JSON documents.
//!
//! A document is checked against a JSON Schema first. Only if that passes is
//! it sent to a semantic judge, which decides whether it honours a list of
//! natural-language rules. Both outcomes end up in one [`ValidationReport`].
//!
//! ## Key Guarantees
//!
//! 1. **Always completes**: schema faults, judge outages and garbled judge
//!    answers are recorded in the report, never returned as errors
//! 2. **Short-circuits**: a structurally invalid document never reaches the judge
//! 3. **No I/O**: this crate never talks to the network; judges are injected
//!    through [`SemanticJudge`]
//! 4. **Reentrant**: every run owns its own state
//!
//! ## Example
//!
//! ```rust,ignore
//! use docguard_core::{samples, validate};
//!
//! let report = validate(
//!     samples::valid_document(),
//!     samples::sample_schema(),
//!     samples::business_rules(),
//!     judge,
//! )?;
//!
//! if report.overall_valid {
//!     println!("OK: {}", report.summary);
//! }
//! ```

pub mod judge;
pub mod prompts;
pub mod report;
pub mod samples;
pub mod state;
pub mod structural;
pub mod types;
pub mod workflow;

// Re-export main types at crate root
pub use judge::{JudgeError, JudgeRequest, SemanticAdapter, SemanticJudge};
pub use report::ReportBuilder;
pub use state::{FinalState, WorkflowState};
pub use structural::StructuralValidator;
pub use types::{
    FailureKind, Phase, RequestError, SectionReport, SemanticOutcome, StructuralOutcome,
    ValidationReport, ValidationRequest,
};
pub use workflow::{Workflow, WorkflowBuilder};

use std::sync::Arc;

use serde_json::Value;

/// Validate a document against a schema and semantic rules.
///
/// Convenience wrapper that builds a one-off [`Workflow`]. Fails only when the
/// request itself is malformed (see [`RequestError`]).
pub fn validate(
    document: Value,
    schema: Value,
    rules: Vec<String>,
    judge: Arc<dyn SemanticJudge>,
) -> Result<ValidationReport, RequestError> {
    let request = ValidationRequest::new(document, schema, rules)?;
    Ok(Workflow::new(judge).validate(&request))
}
