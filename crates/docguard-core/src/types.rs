//! Core types for docguard validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised before a workflow starts.
///
/// These are programmer errors in how a request was assembled. Everything
/// that goes wrong *during* validation is recorded in the report instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Schema must be a JSON object or boolean, got {0}")]
    InvalidSchemaShape(&'static str),

    #[error("Failed to parse {what} as JSON: {reason}")]
    Json { what: &'static str, reason: String },
}

/// Input to a single validation run.
///
/// Immutable once constructed; the workflow only ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRequest {
    document: Value,
    schema: Value,
    rules: Vec<String>,
}

impl ValidationRequest {
    /// Build a request, rejecting schemas that cannot be JSON Schema documents.
    ///
    /// Rules are opaque and kept as given, blank ones included.
    pub fn new(document: Value, schema: Value, rules: Vec<String>) -> Result<Self, RequestError> {
        match &schema {
            Value::Object(_) | Value::Bool(_) => {}
            other => return Err(RequestError::InvalidSchemaShape(json_kind(other))),
        }

        Ok(Self {
            document,
            schema,
            rules,
        })
    }

    /// Parse document and schema from JSON text.
    pub fn from_json_strs(
        document: &str,
        schema: &str,
        rules: Vec<String>,
    ) -> Result<Self, RequestError> {
        let document = serde_json::from_str(document).map_err(|e| RequestError::Json {
            what: "document",
            reason: e.to_string(),
        })?;
        let schema = serde_json::from_str(schema).map_err(|e| RequestError::Json {
            what: "schema",
            reason: e.to_string(),
        })?;
        Self::new(document, schema, rules)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Workflow phase.
///
/// Phases form a DAG with a single entry (`Pending`) and a single terminal
/// (`Done`). See [`Phase::successors`] for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Pending,
    StructuralPassed,
    StructuralFailed,
    SemanticPassed,
    SemanticFailed,
    SemanticSkipped,
    Done,
}

impl Phase {
    /// Phases reachable in one step from this one.
    pub fn successors(self) -> &'static [Phase] {
        match self {
            Phase::Pending => &[Phase::StructuralPassed, Phase::StructuralFailed],
            Phase::StructuralPassed => &[Phase::SemanticPassed, Phase::SemanticFailed],
            Phase::StructuralFailed => &[Phase::SemanticSkipped],
            Phase::SemanticPassed | Phase::SemanticFailed | Phase::SemanticSkipped => {
                &[Phase::Done]
            }
            Phase::Done => &[],
        }
    }

    pub fn can_advance_to(self, next: Phase) -> bool {
        self.successors().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Done
    }

    /// Whether the structural check has run and passed on the way to this phase.
    pub fn structural_passed(self) -> bool {
        matches!(
            self,
            Phase::StructuralPassed | Phase::SemanticPassed | Phase::SemanticFailed
        )
    }
}

/// Kinds of failure the workflow recovers from.
///
/// None of these ever escape the engine; they are recorded as error-list
/// entries and used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The document broke one or more schema constraints.
    StructuralViolation,
    /// The schema itself could not be evaluated.
    StructuralCheckFault,
    /// The semantic judge could not be reached or errored.
    SemanticJudgeUnreachable,
    /// The judge answered, but not in the expected shape.
    SemanticResponseMalformed,
    /// Semantic judging was bypassed after a structural failure.
    SemanticSkipped,
}

/// Result of the structural check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralOutcome {
    pub passed: bool,
    pub errors: Vec<String>,
    /// Set when the check failed, to say why.
    pub failure: Option<FailureKind>,
}

impl StructuralOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            errors: vec![],
            failure: None,
        }
    }

    pub fn fail(kind: FailureKind, errors: Vec<String>) -> Self {
        Self {
            passed: false,
            errors,
            failure: Some(kind),
        }
    }
}

/// Result of semantic judging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticOutcome {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Set when the judge could not produce a usable verdict.
    pub failure: Option<FailureKind>,
}

impl SemanticOutcome {
    pub fn pass(warnings: Vec<String>) -> Self {
        Self {
            passed: true,
            errors: vec![],
            warnings,
            failure: None,
        }
    }

    /// The judge produced a verdict and it was negative.
    pub fn rejected(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            passed: false,
            errors,
            warnings,
            failure: None,
        }
    }

    /// The judge could not produce a verdict at all.
    pub fn fault(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            warnings: vec![],
            failure: Some(kind),
        }
    }
}

/// One section (structural or semantic) of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub passed: bool,
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Final output of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub overall_valid: bool,

    #[serde(rename = "schema_validation")]
    pub structural: SectionReport,

    #[serde(rename = "semantic_validation")]
    pub semantic: SectionReport,

    pub summary: String,
}

impl ValidationReport {
    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        // A report holds only strings and booleans, so serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
