//! Validation workflow engine.
//!
//! A fixed state machine, one branch:
//!
//! ```text
//! Pending ──structural──▶ StructuralPassed ──judge──▶ SemanticPassed ─┐
//!    │                                      └────────▶ SemanticFailed ─┼─▶ Done
//!    └─────────────────▶ StructuralFailed ──skip────▶ SemanticSkipped ─┘
//! ```
//!
//! Each call to [`Workflow::run`] owns a fresh [`WorkflowState`], so a single
//! `Workflow` can serve concurrent callers.

use std::sync::Arc;

use crate::judge::{SemanticAdapter, SemanticJudge};
use crate::report::ReportBuilder;
use crate::state::{FinalState, WorkflowState};
use crate::structural::StructuralValidator;
use crate::types::{Phase, ValidationReport, ValidationRequest};

/// Result of one step of the state machine.
enum Step {
    Next(WorkflowState),
    Finished(FinalState),
}

/// Runs structural then semantic validation and builds the report.
#[derive(Debug)]
pub struct Workflow {
    structural: StructuralValidator,
    semantic: SemanticAdapter,
    reporter: ReportBuilder,
}

impl Workflow {
    /// Create a workflow with the default structural validator.
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self {
            structural: StructuralValidator::new(),
            semantic: SemanticAdapter::new(judge),
            reporter: ReportBuilder::new(),
        }
    }

    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Validate a request and return its report.
    ///
    /// Never fails: every fault is recorded in the report.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationReport {
        let state = self.run(request);
        self.reporter.build(&state)
    }

    /// Drive the state machine to `Done`.
    pub fn run(&self, request: &ValidationRequest) -> FinalState {
        let mut state = WorkflowState::new();
        loop {
            match self.step(state, request) {
                Step::Next(next) => state = next,
                Step::Finished(done) => {
                    tracing::info!(
                        overall_valid = done.overall_valid(),
                        structural_errors = done.structural_errors().len(),
                        semantic_errors = done.semantic_errors().len(),
                        failures = ?done.failures(),
                        "Validation complete"
                    );
                    return done;
                }
            }
        }
    }

    /// Transition table.
    fn step(&self, state: WorkflowState, request: &ValidationRequest) -> Step {
        match state.phase() {
            Phase::Pending => {
                let outcome = self.structural.validate(request.document(), request.schema());
                Step::Next(state.record_structural(outcome))
            }
            Phase::StructuralPassed => {
                let outcome = self.semantic.judge(request.document(), request.rules());
                Step::Next(state.record_semantic(outcome))
            }
            Phase::StructuralFailed => {
                tracing::debug!("Structural check failed, skipping semantic judge");
                Step::Next(state.skip_semantic())
            }
            Phase::SemanticPassed | Phase::SemanticFailed | Phase::SemanticSkipped => {
                Step::Finished(state.finish())
            }
            // Only a FinalState can be in Done.
            Phase::Done => unreachable!("workflow state reached Done outside finish()"),
        }
    }
}

/// Builder for [`Workflow`].
#[derive(Default)]
pub struct WorkflowBuilder {
    judge: Option<Arc<dyn SemanticJudge>>,
    structural: StructuralValidator,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the semantic judge.
    pub fn judge(mut self, judge: Arc<dyn SemanticJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Replace the structural validator.
    pub fn structural(mut self, validator: StructuralValidator) -> Self {
        self.structural = validator;
        self
    }

    /// Build the workflow. Returns `None` if no judge was set.
    pub fn build(self) -> Option<Workflow> {
        let judge = self.judge?;
        Some(Workflow {
            structural: self.structural,
            semantic: SemanticAdapter::new(judge),
            reporter: ReportBuilder::new(),
        })
    }
}
