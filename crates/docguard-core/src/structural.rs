//! Structural validation against JSON Schema.
//!
//! Compiles the caller's schema with `jsonschema` and collects every
//! violation. A schema that fails to compile is a recovered failure, never a
//! panic or an `Err`.

use serde_json::Value;

use crate::types::{FailureKind, StructuralOutcome};

/// Prefix for failures of the checking routine itself.
pub const SCHEMA_FAULT_PREFIX: &str = "Schema validation error: ";

/// Checks documents against JSON Schema definitions.
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    validate_formats: bool,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralValidator {
    /// Create a validator. `format` keywords are annotations only.
    pub fn new() -> Self {
        Self {
            validate_formats: false,
        }
    }

    /// Toggle assertion of `format` keywords (`email`, `date-time`, ...).
    pub fn with_format_validation(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    pub fn validates_formats(&self) -> bool {
        self.validate_formats
    }

    /// Validate `document` against `schema`.
    ///
    /// Every violation is reported as `"<message> at <instance path>"`.
    pub fn validate(&self, document: &Value, schema: &Value) -> StructuralOutcome {
        let validator = match jsonschema::options()
            .should_validate_formats(self.validate_formats)
            .build(schema)
        {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Schema could not be compiled");
                return StructuralOutcome::fail(
                    FailureKind::StructuralCheckFault,
                    vec![format!("{}{}", SCHEMA_FAULT_PREFIX, e)],
                );
            }
        };

        let errors: Vec<String> = validator
            .iter_errors(document)
            .map(|e| format!("{} at {}", e, display_path(&e.instance_path.to_string())))
            .collect();

        if errors.is_empty() {
            StructuralOutcome::pass()
        } else {
            tracing::debug!(violations = errors.len(), "Document violates schema");
            StructuralOutcome::fail(FailureKind::StructuralViolation, errors)
        }
    }
}

fn display_path(pointer: &str) -> &str {
    if pointer.is_empty() {
        "/"
    } else {
        pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use serde_json::json;

    #[test]
    fn test_valid_document_passes() {
        let outcome =
            StructuralValidator::new().validate(&samples::valid_document(), &samples::sample_schema());
        assert!(outcome.passed);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.failure, None);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let outcome = StructuralValidator::new()
            .validate(&samples::invalid_schema_document(), &samples::sample_schema());

        assert!(!outcome.passed);
        assert_eq!(outcome.failure, Some(FailureKind::StructuralViolation));
        // id type, name length, age minimum, roles minItems, missing version
        assert_eq!(outcome.errors.len(), 5, "got {:?}", outcome.errors);
        assert!(outcome.errors.iter().any(|e| e.contains("/user/id")));
        assert!(outcome.errors.iter().any(|e| e.contains("version")));
        assert!(!outcome.errors.iter().any(|e| e.contains("/user/email")));
    }

    #[test]
    fn test_formats_are_annotations_by_default() {
        let schema = json!({"type": "string", "format": "email"});
        let document = json!("invalid-email");

        let lenient = StructuralValidator::new().validate(&document, &schema);
        assert!(lenient.passed);
        assert!(!StructuralValidator::default().validates_formats());

        let strict = StructuralValidator::new()
            .with_format_validation(true)
            .validate(&document, &schema);
        assert!(!strict.passed);
    }

    #[test]
    fn test_bad_formats_alone_pass_the_sample_schema() {
        let mut document = samples::valid_document();
        document["user"]["email"] = json!("invalid-email");
        document["metadata"]["created_at"] = json!("invalid-date");

        let outcome = StructuralValidator::new().validate(&document, &samples::sample_schema());
        assert!(outcome.passed, "got {:?}", outcome.errors);

        let strict = StructuralValidator::new()
            .with_format_validation(true)
            .validate(&document, &samples::sample_schema());
        assert_eq!(strict.errors.len(), 2);
    }

    #[test]
    fn test_root_violation_path() {
        let outcome = StructuralValidator::new().validate(&json!(42), &json!({"type": "object"}));
        assert!(!outcome.passed);
        assert!(outcome.errors[0].ends_with(" at /"), "got {}", outcome.errors[0]);
    }

    #[test]
    fn test_malformed_schema_is_recovered() {
        let schema = json!({"type": "not-a-real-type"});
        let outcome = StructuralValidator::new().validate(&json!({}), &schema);

        assert!(!outcome.passed);
        assert_eq!(outcome.failure, Some(FailureKind::StructuralCheckFault));
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with(SCHEMA_FAULT_PREFIX));
    }

    #[test]
    fn test_false_schema_rejects_everything() {
        let outcome = StructuralValidator::new().validate(&json!({}), &json!(false));
        assert!(!outcome.passed);
        assert_eq!(outcome.failure, Some(FailureKind::StructuralViolation));
    }
}
