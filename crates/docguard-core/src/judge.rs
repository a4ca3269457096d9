//! Semantic judge contract and adapter.
//!
//! The judge itself lives outside this crate (see `docguard-runtime` for the
//! LLM-backed one). This module defines what a judge is asked, what shape its
//! answer must take, and how every kind of bad answer is recovered into a
//! [`SemanticOutcome`].

use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::prompts;
use crate::types::{FailureKind, SemanticOutcome};

/// Message recorded when the judge's answer is not the expected shape.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Failed to parse semantic validation response";

/// Prefix for failures to reach the judge.
pub const JUDGE_ERROR_PREFIX: &str = "Semantic validation error: ";

/// Recorded when the judge rejects a document without saying why.
pub const UNSPECIFIED_REJECTION_MESSAGE: &str = "Semantic validation failed";

lazy_static! {
    /// A response wrapped in a Markdown code fence, optionally tagged `json`.
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\s*```\s*$").unwrap();
}

/// Errors from invoking a semantic judge.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JudgeError {
    #[error("{0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("judge not configured: {0}")]
    NotConfigured(String),
}

/// What the judge is asked.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeRequest {
    /// Fixed task description.
    pub instruction: String,

    /// Rules in caller order.
    pub rules: Vec<String>,

    /// Canonical text of the document.
    pub document: String,
}

impl JudgeRequest {
    pub fn new(document: &Value, rules: &[String]) -> Self {
        Self {
            instruction: prompts::JUDGE_SYSTEM_PROMPT.trim().to_string(),
            rules: rules.to_vec(),
            document: canonical_json(document),
        }
    }

    /// System prompt text.
    pub fn system_prompt(&self) -> &str {
        &self.instruction
    }

    /// User prompt text: document, then rules.
    pub fn user_prompt(&self) -> String {
        prompts::user_prompt(&self.document, &self.rules)
    }
}

/// Canonical encoding of a document: pretty-printed, two-space indent.
///
/// `serde_json` maps keep keys sorted, so equal documents encode identically.
pub fn canonical_json(document: &Value) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
}

/// An external capability that judges a document against natural-language
/// rules.
///
/// Implementations make a single blocking call and return the raw response
/// text; parsing belongs to [`SemanticAdapter`].
pub trait SemanticJudge: Send + Sync {
    fn judge(&self, request: &JudgeRequest) -> Result<String, JudgeError>;

    /// Name for logs.
    fn name(&self) -> &str;
}

/// Expected response shape.
#[derive(Debug, Deserialize)]
struct JudgeResponse {
    is_valid: bool,
    #[serde(default, deserialize_with = "lenient_messages")]
    errors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_messages")]
    warnings: Vec<String>,
}

/// Message lists are best effort: `null` is empty, a lone string is one
/// message, and non-string entries are kept as compact JSON.
fn lenient_messages<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    fn message(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(message)
            .collect(),
        other => vec![message(other)],
    })
}

/// Turns a judge's raw response into a [`SemanticOutcome`].
pub struct SemanticAdapter {
    judge: Arc<dyn SemanticJudge>,
}

impl std::fmt::Debug for SemanticAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticAdapter")
            .field("judge", &self.judge.name())
            .finish()
    }
}

impl SemanticAdapter {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }

    /// Judge `document` against `rules`.
    ///
    /// An empty rule list passes without calling the judge.
    pub fn judge(&self, document: &Value, rules: &[String]) -> SemanticOutcome {
        if rules.is_empty() {
            tracing::debug!("No semantic rules, skipping judge call");
            return SemanticOutcome::pass(vec![]);
        }

        let request = JudgeRequest::new(document, rules);
        tracing::debug!(judge = self.judge.name(), rules = rules.len(), "Invoking semantic judge");

        match self.judge.judge(&request) {
            Ok(raw) => parse_response(&raw),
            Err(e) => {
                tracing::warn!(judge = self.judge.name(), error = %e, "Semantic judge call failed");
                SemanticOutcome::fault(
                    FailureKind::SemanticJudgeUnreachable,
                    format!("{}{}", JUDGE_ERROR_PREFIX, e),
                )
            }
        }
    }
}

/// Parse a raw judge response.
pub fn parse_response(raw: &str) -> SemanticOutcome {
    let body = strip_code_fence(raw);

    let response: JudgeResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Semantic judge response is malformed");
            return SemanticOutcome::fault(
                FailureKind::SemanticResponseMalformed,
                MALFORMED_RESPONSE_MESSAGE,
            );
        }
    };

    if response.is_valid {
        // The verdict wins; stray errors become warnings.
        let mut warnings = response.errors;
        warnings.extend(response.warnings);
        return SemanticOutcome::pass(warnings);
    }

    let errors = if response.errors.is_empty() {
        vec![UNSPECIFIED_REJECTION_MESSAGE.to_string()]
    } else {
        response.errors
    };
    SemanticOutcome::rejected(errors, response.warnings)
}

fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Judge that returns a fixed response and records what it was asked.
    struct FixedJudge {
        response: Result<String, JudgeError>,
        seen: Mutex<Vec<JudgeRequest>>,
    }

    impl FixedJudge {
        fn new(response: Result<&str, JudgeError>) -> Arc<Self> {
            Arc::new(Self {
                response: response.map(str::to_string),
                seen: Mutex::new(vec![]),
            })
        }
    }

    impl SemanticJudge for FixedJudge {
        fn judge(&self, request: &JudgeRequest) -> Result<String, JudgeError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn rules() -> Vec<String> {
        vec!["Version should follow semantic versioning".to_string()]
    }

    #[test]
    fn test_pass_response() {
        let judge = FixedJudge::new(Ok(r#"{"is_valid": true, "errors": []}"#));
        let outcome = SemanticAdapter::new(judge).judge(&json!({"v": "1.0.0"}), &rules());
        assert_eq!(outcome, SemanticOutcome::pass(vec![]));
    }

    #[test]
    fn test_rejection_keeps_errors_and_warnings() {
        let judge = FixedJudge::new(Ok(
            r#"{"is_valid": false, "errors": ["bad version"], "warnings": ["old"]}"#,
        ));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());

        assert!(!outcome.passed);
        assert_eq!(outcome.errors, vec!["bad version"]);
        assert_eq!(outcome.warnings, vec!["old"]);
        assert_eq!(outcome.failure, None);
    }

    #[test]
    fn test_rejection_without_errors_gets_default_message() {
        let judge = FixedJudge::new(Ok(r#"{"is_valid": false}"#));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());
        assert_eq!(outcome.errors, vec![UNSPECIFIED_REJECTION_MESSAGE]);
    }

    #[test]
    fn test_pass_demotes_stray_errors_to_warnings() {
        let judge = FixedJudge::new(Ok(
            r#"{"is_valid": true, "errors": ["minor"], "warnings": ["note"]}"#,
        ));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());

        assert!(outcome.passed);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.warnings, vec!["minor", "note"]);
    }

    #[test]
    fn test_non_json_response_is_malformed() {
        let judge = FixedJudge::new(Ok("The document looks fine to me."));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());

        assert!(!outcome.passed);
        assert_eq!(outcome.errors, vec![MALFORMED_RESPONSE_MESSAGE]);
        assert_eq!(outcome.failure, Some(FailureKind::SemanticResponseMalformed));
    }

    #[test]
    fn test_missing_verdict_is_malformed() {
        let judge = FixedJudge::new(Ok(r#"{"errors": []}"#));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());
        assert_eq!(outcome.errors, vec![MALFORMED_RESPONSE_MESSAGE]);
    }

    #[test]
    fn test_null_warnings_on_pass() {
        let outcome = parse_response(r#"{"is_valid": true, "errors": [], "warnings": null}"#);
        assert_eq!(outcome, SemanticOutcome::pass(vec![]));
    }

    #[test]
    fn test_null_errors_on_pass() {
        let outcome = parse_response(r#"{"is_valid": true, "errors": null}"#);
        assert_eq!(outcome, SemanticOutcome::pass(vec![]));
    }

    #[test]
    fn test_structured_warnings_are_stringified() {
        let outcome = parse_response(
            r#"{"is_valid": true, "errors": [], "warnings": [{"field": "name"}, "plain", null]}"#,
        );
        assert!(outcome.passed);
        assert_eq!(outcome.warnings, vec![r#"{"field":"name"}"#, "plain"]);
    }

    #[test]
    fn test_null_errors_on_rejection_get_default_message() {
        let outcome = parse_response(r#"{"is_valid": false, "errors": null, "warnings": "odd"}"#);
        assert!(!outcome.passed);
        assert_eq!(outcome.errors, vec![UNSPECIFIED_REJECTION_MESSAGE]);
        assert_eq!(outcome.warnings, vec!["odd"]);
    }

    #[test]
    fn test_non_boolean_verdict_is_malformed() {
        for raw in [r#"{"is_valid": "true"}"#, r#"{"is_valid": null}"#] {
            let outcome = parse_response(raw);
            assert_eq!(outcome.errors, vec![MALFORMED_RESPONSE_MESSAGE], "{raw}");
            assert_eq!(outcome.failure, Some(FailureKind::SemanticResponseMalformed));
        }
    }

    #[test]
    fn test_fenced_response_is_unwrapped() {
        let judge = FixedJudge::new(Ok("```json\n{\"is_valid\": true, \"errors\": []}\n```"));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());
        assert!(outcome.passed);
    }

    #[test]
    fn test_call_failure_is_recovered() {
        let judge = FixedJudge::new(Err(JudgeError::Transport("connection refused".into())));
        let outcome = SemanticAdapter::new(judge).judge(&json!({}), &rules());

        assert!(!outcome.passed);
        assert_eq!(
            outcome.errors,
            vec!["Semantic validation error: connection refused"]
        );
        assert_eq!(outcome.failure, Some(FailureKind::SemanticJudgeUnreachable));
    }

    #[test]
    fn test_empty_rules_skip_the_judge() {
        let judge = FixedJudge::new(Err(JudgeError::Transport("unreachable".into())));
        let outcome = SemanticAdapter::new(judge.clone()).judge(&json!({}), &[]);

        assert!(outcome.passed);
        assert!(judge.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_carries_rules_and_canonical_document() {
        let judge = FixedJudge::new(Ok(r#"{"is_valid": true, "errors": []}"#));
        SemanticAdapter::new(judge.clone()).judge(&json!({"b": 1, "a": 2}), &rules());

        let seen = judge.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].rules, rules());
        assert_eq!(seen[0].document, "{\n  \"a\": 2,\n  \"b\": 1\n}");
        assert!(seen[0].system_prompt().contains("is_valid"));
        assert!(seen[0].user_prompt().contains("- Version should follow"));
    }
}
