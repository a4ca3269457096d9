//! Report builder: turns a finished workflow into a [`ValidationReport`].
//!
//! Section pass flags are derived from the error lists, not from the phase,
//! so a skipped semantic section reads as failed with the skip sentinel.

use crate::state::FinalState;
use crate::types::{SectionReport, ValidationReport};

/// Summary for a document that passed both checks.
pub const VALID_SUMMARY: &str = "JSON data is valid according to both schema and semantic rules.";

const INVALID_PREFIX: &str = "JSON data is invalid. Issues found: ";
const ERROR_DELIMITER: &str = "; ";
const SECTION_DELIMITER: &str = " | ";

/// Builds reports from finished workflow states.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, state: &FinalState) -> ValidationReport {
        let structural = SectionReport {
            passed: state.structural_errors().is_empty(),
            errors: state.structural_errors().to_vec(),
            warnings: vec![],
        };
        let semantic = SectionReport {
            passed: state.semantic_errors().is_empty(),
            errors: state.semantic_errors().to_vec(),
            warnings: state.semantic_warnings().to_vec(),
        };

        ValidationReport {
            overall_valid: state.overall_valid(),
            summary: self.build_summary(state),
            structural,
            semantic,
        }
    }

    fn build_summary(&self, state: &FinalState) -> String {
        if state.overall_valid() {
            return VALID_SUMMARY.to_string();
        }

        let mut issues = Vec::new();
        if !state.structural_errors().is_empty() {
            issues.push(format!(
                "Schema validation failed: {}",
                state.structural_errors().join(ERROR_DELIMITER)
            ));
        }
        if !state.semantic_errors().is_empty() {
            issues.push(format!(
                "Semantic validation failed: {}",
                state.semantic_errors().join(ERROR_DELIMITER)
            ));
        }

        format!("{}{}", INVALID_PREFIX, issues.join(SECTION_DELIMITER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WorkflowState;
    use crate::types::{FailureKind, SemanticOutcome, StructuralOutcome};

    #[test]
    fn test_valid_report() {
        let state = WorkflowState::new()
            .record_structural(StructuralOutcome::pass())
            .record_semantic(SemanticOutcome::pass(vec![]))
            .finish();

        let report = ReportBuilder::new().build(&state);
        assert!(report.overall_valid);
        assert!(report.structural.passed);
        assert!(report.semantic.passed);
        assert_eq!(report.summary, VALID_SUMMARY);
    }

    #[test]
    fn test_structural_failure_summary_lists_both_sections() {
        let state = WorkflowState::new()
            .record_structural(StructuralOutcome::fail(
                FailureKind::StructuralViolation,
                vec!["a".to_string(), "b".to_string()],
            ))
            .skip_semantic()
            .finish();

        let report = ReportBuilder::new().build(&state);
        assert!(!report.overall_valid);
        assert!(!report.structural.passed);
        assert!(!report.semantic.passed);
        assert_eq!(
            report.summary,
            "JSON data is invalid. Issues found: Schema validation failed: a; b | \
             Semantic validation failed: Skipped due to schema validation failure"
        );
    }

    #[test]
    fn test_semantic_failure_summary_omits_empty_structural_section() {
        let state = WorkflowState::new()
            .record_structural(StructuralOutcome::pass())
            .record_semantic(SemanticOutcome::rejected(
                vec!["Email is personal".to_string()],
                vec!["Name is short".to_string()],
            ))
            .finish();

        let report = ReportBuilder::new().build(&state);
        assert!(report.structural.passed);
        assert_eq!(report.semantic.warnings, vec!["Name is short"]);
        assert_eq!(
            report.summary,
            "JSON data is invalid. Issues found: Semantic validation failed: Email is personal"
        );
    }
}
