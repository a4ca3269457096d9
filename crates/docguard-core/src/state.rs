//! Workflow state.
//!
//! A `WorkflowState` is owned by exactly one run and moved through the
//! pipeline by value. Its fields can only change through the transition
//! methods below, each of which is valid from one phase family only.

use crate::types::{FailureKind, Phase, SemanticOutcome, StructuralOutcome};

/// Sentinel recorded when semantic judging is bypassed.
pub const SEMANTIC_SKIPPED_MESSAGE: &str = "Skipped due to schema validation failure";

/// Mutable state of an in-flight validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    phase: Phase,
    structural_errors: Vec<String>,
    semantic_errors: Vec<String>,
    semantic_warnings: Vec<String>,
    failures: Vec<FailureKind>,
    overall_valid: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Pending,
            structural_errors: vec![],
            semantic_errors: vec![],
            semantic_warnings: vec![],
            failures: vec![],
            overall_valid: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn structural_errors(&self) -> &[String] {
        &self.structural_errors
    }

    pub fn semantic_errors(&self) -> &[String] {
        &self.semantic_errors
    }

    pub fn semantic_warnings(&self) -> &[String] {
        &self.semantic_warnings
    }

    /// Failure kinds recorded so far, in order.
    pub fn failures(&self) -> &[FailureKind] {
        &self.failures
    }

    fn note_failure(&mut self, kind: Option<FailureKind>, errors: usize) {
        if let Some(kind) = kind {
            tracing::debug!(phase = ?self.phase, failure = ?kind, errors, "Recorded failure");
            self.failures.push(kind);
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(from = ?self.phase, to = ?next, "Workflow transition");
        self.phase = next;
    }

    /// `Pending` -> `StructuralPassed` | `StructuralFailed`.
    pub(crate) fn record_structural(mut self, outcome: StructuralOutcome) -> Self {
        if outcome.passed {
            self.advance(Phase::StructuralPassed);
        } else {
            self.note_failure(outcome.failure, outcome.errors.len());
            self.structural_errors = outcome.errors;
            self.advance(Phase::StructuralFailed);
        }
        self
    }

    /// `StructuralPassed` -> `SemanticPassed` | `SemanticFailed`.
    pub(crate) fn record_semantic(mut self, outcome: SemanticOutcome) -> Self {
        self.semantic_warnings = outcome.warnings;
        if outcome.passed {
            self.advance(Phase::SemanticPassed);
        } else {
            self.note_failure(outcome.failure, outcome.errors.len());
            self.semantic_errors = outcome.errors;
            self.advance(Phase::SemanticFailed);
        }
        self
    }

    /// `StructuralFailed` -> `SemanticSkipped`.
    pub(crate) fn skip_semantic(mut self) -> Self {
        self.note_failure(Some(FailureKind::SemanticSkipped), 1);
        self.semantic_errors = vec![SEMANTIC_SKIPPED_MESSAGE.to_string()];
        self.advance(Phase::SemanticSkipped);
        self
    }

    /// `SemanticPassed` | `SemanticFailed` | `SemanticSkipped` -> `Done`.
    ///
    /// Semantic judging only runs after a structural pass, so "structural ok"
    /// is read off the semantic phase.
    pub(crate) fn finish(mut self) -> FinalState {
        let structural_ok = self.phase.structural_passed();
        let semantic_ok = self.phase == Phase::SemanticPassed;
        self.overall_valid = structural_ok && semantic_ok;
        self.advance(Phase::Done);
        FinalState(self)
    }
}

/// A workflow state that has reached `Done`.
///
/// Only obtainable by finishing a run, so anything holding one can rely on
/// the verdict being computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalState(WorkflowState);

impl FinalState {
    pub fn overall_valid(&self) -> bool {
        self.0.overall_valid
    }

    pub fn phase(&self) -> Phase {
        self.0.phase
    }

    pub fn structural_errors(&self) -> &[String] {
        &self.0.structural_errors
    }

    pub fn semantic_errors(&self) -> &[String] {
        &self.0.semantic_errors
    }

    pub fn semantic_warnings(&self) -> &[String] {
        &self.0.semantic_warnings
    }

    pub fn failures(&self) -> &[FailureKind] {
        &self.0.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureKind;

    #[test]
    fn test_happy_path() {
        let state = WorkflowState::new()
            .record_structural(StructuralOutcome::pass())
            .record_semantic(SemanticOutcome::pass(vec!["note".to_string()]));
        assert_eq!(state.phase(), Phase::SemanticPassed);

        let done = state.finish();
        assert_eq!(done.phase(), Phase::Done);
        assert!(done.overall_valid());
        assert!(done.structural_errors().is_empty());
        assert!(done.semantic_errors().is_empty());
        assert_eq!(done.semantic_warnings(), ["note"]);
        assert!(done.failures().is_empty());
    }

    #[test]
    fn test_semantic_failure_is_invalid() {
        let done = WorkflowState::new()
            .record_structural(StructuralOutcome::pass())
            .record_semantic(SemanticOutcome::rejected(vec!["bad".to_string()], vec![]))
            .finish();

        assert!(!done.overall_valid());
        assert_eq!(done.semantic_errors(), ["bad"]);
    }

    #[test]
    fn test_skip_path_records_sentinel() {
        let state = WorkflowState::new().record_structural(StructuralOutcome::fail(
            FailureKind::StructuralViolation,
            vec!["x at /".to_string()],
        ));
        assert_eq!(state.phase(), Phase::StructuralFailed);

        let done = state.skip_semantic().finish();
        assert!(!done.overall_valid());
        assert_eq!(done.structural_errors(), ["x at /"]);
        assert_eq!(done.semantic_errors(), [SEMANTIC_SKIPPED_MESSAGE]);
        assert_eq!(
            done.failures(),
            [FailureKind::StructuralViolation, FailureKind::SemanticSkipped]
        );
    }

    #[test]
    fn test_judge_fault_is_recorded() {
        let done = WorkflowState::new()
            .record_structural(StructuralOutcome::pass())
            .record_semantic(SemanticOutcome::fault(
                FailureKind::SemanticResponseMalformed,
                "unparseable",
            ))
            .finish();

        assert_eq!(done.failures(), [FailureKind::SemanticResponseMalformed]);
    }

    #[test]
    #[should_panic(expected = "illegal transition")]
    #[cfg(debug_assertions)]
    fn test_illegal_transition_is_caught() {
        // Skipping straight from Pending is not in the table.
        let _ = WorkflowState::new().skip_semantic();
    }
}
