//! Instruction text sent to the semantic judge.
//!
//! The system prompt is fixed so providers can cache it; the rules and the
//! document go in the user prompt.

/// System prompt for the semantic judge.
///
/// Frames the judge as a rule checker and pins down the response shape that
/// [`crate::judge::SemanticAdapter`] parses.
pub const JUDGE_SYSTEM_PROMPT: &str = r#"
You are a JSON validation expert. Determine whether the provided JSON document
is valid against each of the listed rules.

## Constraints
1. Evaluate ONLY the rules you are given - do not invent criteria
2. Check each rule carefully and independently
3. Report one error message per violated rule, naming the offending field
4. Use warnings for concerns that do not violate a rule

## Output Format (JSON only, no prose)
{
  "is_valid": true | false,
  "errors": ["error message", ...],
  "warnings": ["warning message", ...]
}

"errors" must be empty when "is_valid" is true. "warnings" is optional.
"#;

/// Heading that introduces the document in the user prompt.
pub const DOCUMENT_HEADING: &str = "JSON Data to validate:";

/// Heading that introduces the rules in the user prompt.
pub const RULES_HEADING: &str = "Custom Rules:";

/// Closing request in the user prompt.
pub const CLOSING_REQUEST: &str =
    "Please validate this JSON against the rules and provide your assessment.";

/// Build the user prompt from a canonical document and the ordered rules.
pub fn user_prompt(document: &str, rules: &[String]) -> String {
    let rule_lines: Vec<String> = rules.iter().map(|r| format!("- {}", r)).collect();
    format!(
        "{}\n{}\n\n{}\n{}\n\n{}",
        DOCUMENT_HEADING,
        document,
        RULES_HEADING,
        rule_lines.join("\n"),
        CLOSING_REQUEST
    )
}
